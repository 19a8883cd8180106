use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use crate::config::{ClientConfig, ConfigLoader};
use crate::domain::{IconicTaxon, ObservationQuery, PlaceRef, ProjectRef};
use crate::error::NatusferaError;
use crate::fetch::{Paginator, ProgressEvent, ProgressSink};
use crate::normalize;
use crate::query::{
    Filters, Resource, observations_request, place_search_request, project_request,
    project_search_request, taxa_request,
};
use crate::records::{Observation, Project};
use crate::transport::{HttpTransport, Transport};

pub struct Natusfera<T: Transport> {
    transport: T,
}

impl Natusfera<HttpTransport> {
    /// Client configured from the discovered config file or defaults.
    pub fn connect() -> Result<Self, NatusferaError> {
        Self::from_config(&ConfigLoader::resolve(None)?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, NatusferaError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Natusfera<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Every observation matching `query`, in API order.
    ///
    /// A place given by name fans out into one paginated fetch per matching
    /// place id; results are concatenated and capped at `num_max` overall.
    pub fn get_observations(
        &self,
        query: &ObservationQuery,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<Observation>, NatusferaError> {
        let taxon = query
            .taxon
            .as_deref()
            .map(str::parse::<IconicTaxon>)
            .transpose()?;
        if query.num_max == Some(0) {
            return Err(NatusferaError::InvalidArgument(
                "num_max must be greater than zero".to_string(),
            ));
        }
        if let Some(PlaceRef::Name(name)) = &query.place {
            if name.trim().is_empty() {
                return Err(NatusferaError::InvalidArgument(
                    "place name must not be empty".to_string(),
                ));
            }
        }

        let project_id = match &query.project {
            Some(project) => Some(self.resolve_project_id(project, sink)?),
            None => None,
        };
        let resource = Resource::select(project_id, query.observation_id, query.user.as_deref());

        let place_ids = match &query.place {
            None => vec![None],
            Some(PlaceRef::Id(id)) => vec![Some(*id)],
            Some(PlaceRef::Name(name)) => {
                let ids = self.place_ids(name)?;
                if ids.is_empty() {
                    sink.event(ProgressEvent::NoPlaceMatches { name: name.clone() });
                }
                ids.into_iter().map(Some).collect()
            }
        };

        let paginator = Paginator::new(&self.transport, sink);
        let mut observations: Vec<Observation> = Vec::new();
        for place_id in place_ids {
            let remaining = query.num_max.map(|max| max.saturating_sub(observations.len()));
            if remaining == Some(0) {
                break;
            }
            let filters = Filters {
                query: query.query.clone(),
                taxon,
                place_id,
                year: query.year,
            };
            let request = observations_request(&resource, &filters);
            let batch = if resource.is_single() {
                paginator.fetch_one(&request, normalize::observation)?
            } else {
                paginator.fetch_all(&request, remaining, normalize::observation)?
            };
            observations.extend(batch);
        }

        if let Some(max) = query.num_max {
            observations.truncate(max);
        }
        info!(count = observations.len(), "observations retrieved");
        Ok(observations)
    }

    /// Projects by id (zero or one) or by name search (all matches).
    pub fn get_project(
        &self,
        project: &ProjectRef,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<Project>, NatusferaError> {
        let paginator = Paginator::new(&self.transport, sink);
        let request = match project {
            ProjectRef::Id(id) => project_request(*id),
            ProjectRef::Name(name) => project_search_request(name),
        };
        paginator.fetch_one(&request, normalize::project)
    }

    /// Ids of every place whose name matches `name`, in API order.
    pub fn place_ids(&self, name: &str) -> Result<Vec<u64>, NatusferaError> {
        let response = self.transport.get_json(&place_search_request(name))?;
        let ids = response
            .body
            .as_array()
            .map(|places| {
                places
                    .iter()
                    .filter_map(|place| place.get("id"))
                    .filter_map(Value::as_u64)
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    /// Observation count per taxon name.
    pub fn count_by_taxon(&self) -> Result<BTreeMap<String, u64>, NatusferaError> {
        let response = self.transport.get_json(&taxa_request())?;
        let mut counts = BTreeMap::new();
        if let Some(taxa) = response.body.as_array() {
            for taxon in taxa {
                let name = taxon.get("name").and_then(|v| v.as_str());
                let count = taxon.get("observations_count").and_then(|v| v.as_u64());
                if let (Some(name), Some(count)) = (name, count) {
                    counts.insert(name.to_string(), count);
                }
            }
        }
        Ok(counts)
    }

    fn resolve_project_id(
        &self,
        project: &ProjectRef,
        sink: &dyn ProgressSink,
    ) -> Result<u64, NatusferaError> {
        match project {
            ProjectRef::Id(id) => Ok(*id),
            ProjectRef::Name(name) => self
                .get_project(project, sink)?
                .first()
                .map(|found| found.id)
                .ok_or_else(|| NatusferaError::ProjectNotFound(name.clone())),
        }
    }
}
