//! Turns observation filters into API requests.

use std::fmt;

use crate::domain::IconicTaxon;

pub const PER_PAGE: usize = 200;
pub const MAX_PAGE: u32 = 100;
pub const MAX_RESULTS: usize = PER_PAGE * MAX_PAGE as usize;

/// One GET against the API: a path relative to the base URL plus ordered
/// query parameters, kept unencoded until the transport sends it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Same request for a later page. Page 1 is the request itself.
    pub fn page(&self, page: u32) -> Self {
        if page <= 1 {
            return self.clone();
        }
        self.clone().param("page", page)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (index, (key, value)) in self.params.iter().enumerate() {
            let sep = if index == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// The observation collection a query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Observations,
    Observation(u64),
    UserObservations(String),
    ProjectObservations(u64),
}

impl Resource {
    /// Project wins over observation id, which wins over user.
    pub fn select(project_id: Option<u64>, observation_id: Option<u64>, user: Option<&str>) -> Self {
        if let Some(id) = project_id {
            Resource::ProjectObservations(id)
        } else if let Some(id) = observation_id {
            Resource::Observation(id)
        } else if let Some(user) = user {
            Resource::UserObservations(user.to_string())
        } else {
            Resource::Observations
        }
    }

    pub fn path(&self) -> String {
        match self {
            Resource::Observations => "/observations.json".to_string(),
            Resource::Observation(id) => format!("/observations/{id}.json"),
            Resource::UserObservations(user) => format!("/observations/{user}.json"),
            Resource::ProjectObservations(id) => format!("/observations/project/{id}.json"),
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Resource::Observation(_))
    }
}

/// Narrowing filters, appended in a fixed order: query, taxon, place, year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub query: Option<String>,
    pub taxon: Option<IconicTaxon>,
    pub place_id: Option<u64>,
    pub year: Option<i32>,
}

pub fn observations_request(resource: &Resource, filters: &Filters) -> ApiRequest {
    let mut request = ApiRequest::new(resource.path());
    if let Some(query) = &filters.query {
        request = request.param("q", format!("\"{query}\""));
    }
    if let Some(taxon) = filters.taxon {
        request = request.param("iconic_taxa", taxon);
    }
    if let Some(place_id) = filters.place_id {
        request = request.param("place_id", place_id);
    }
    if let Some(year) = filters.year {
        request = request.param("year", year);
    }
    request.param("per_page", PER_PAGE)
}

pub fn project_request(id: u64) -> ApiRequest {
    ApiRequest::new(format!("/projects/{id}.json"))
}

pub fn project_search_request(name: &str) -> ApiRequest {
    ApiRequest::new("/projects/search.json").param("q", name)
}

pub fn place_search_request(name: &str) -> ApiRequest {
    ApiRequest::new("/places.json").param("q", name)
}

pub fn taxa_request() -> ApiRequest {
    ApiRequest::new("/taxa.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_precedence() {
        assert_eq!(
            Resource::select(Some(806), Some(2084), Some("zolople")),
            Resource::ProjectObservations(806)
        );
        assert_eq!(
            Resource::select(None, Some(2084), Some("zolople")),
            Resource::Observation(2084)
        );
        assert_eq!(
            Resource::select(None, None, Some("zolople")),
            Resource::UserObservations("zolople".to_string())
        );
        assert_eq!(Resource::select(None, None, None), Resource::Observations);
    }

    #[test]
    fn filters_render_in_fixed_order() {
        let filters = Filters {
            query: Some("quercus quercus".to_string()),
            taxon: Some(IconicTaxon::Plantae),
            place_id: Some(42),
            year: Some(2019),
        };
        let request = observations_request(&Resource::Observations, &filters);
        assert_eq!(
            request.to_string(),
            "/observations.json?q=\"quercus quercus\"&iconic_taxa=Plantae&place_id=42&year=2019&per_page=200"
        );
    }

    #[test]
    fn page_param_only_after_first_page() {
        let request = observations_request(
            &Resource::UserObservations("zolople".to_string()),
            &Filters::default(),
        );
        assert_eq!(request.page(1).to_string(), "/observations/zolople.json?per_page=200");
        assert_eq!(
            request.page(2).to_string(),
            "/observations/zolople.json?per_page=200&page=2"
        );
    }
}
