use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NatusferaError;

/// Coarse taxonomic groups the API filters and classifies observations by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconicTaxon {
    Chromista,
    Protozoa,
    Animalia,
    Mollusca,
    Arachnida,
    Insecta,
    Aves,
    Mammalia,
    Amphibia,
    Reptilia,
    Actinopterygii,
    Fungi,
    Plantae,
    Unknown,
}

impl IconicTaxon {
    pub const ALL: [IconicTaxon; 14] = [
        IconicTaxon::Chromista,
        IconicTaxon::Protozoa,
        IconicTaxon::Animalia,
        IconicTaxon::Mollusca,
        IconicTaxon::Arachnida,
        IconicTaxon::Insecta,
        IconicTaxon::Aves,
        IconicTaxon::Mammalia,
        IconicTaxon::Amphibia,
        IconicTaxon::Reptilia,
        IconicTaxon::Actinopterygii,
        IconicTaxon::Fungi,
        IconicTaxon::Plantae,
        IconicTaxon::Unknown,
    ];

    /// Wire code used by `iconic_taxon_id`. `Unknown` has none.
    pub fn code(self) -> Option<u32> {
        match self {
            IconicTaxon::Animalia => Some(2),
            IconicTaxon::Actinopterygii => Some(3),
            IconicTaxon::Aves => Some(5),
            IconicTaxon::Reptilia => Some(6),
            IconicTaxon::Amphibia => Some(7),
            IconicTaxon::Mammalia => Some(8),
            IconicTaxon::Arachnida => Some(9),
            IconicTaxon::Insecta => Some(11),
            IconicTaxon::Plantae => Some(12),
            IconicTaxon::Fungi => Some(13),
            IconicTaxon::Protozoa => Some(14),
            IconicTaxon::Mollusca => Some(15),
            IconicTaxon::Chromista => Some(16),
            IconicTaxon::Unknown => None,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|taxon| taxon.code() == Some(code))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IconicTaxon::Chromista => "Chromista",
            IconicTaxon::Protozoa => "Protozoa",
            IconicTaxon::Animalia => "Animalia",
            IconicTaxon::Mollusca => "Mollusca",
            IconicTaxon::Arachnida => "Arachnida",
            IconicTaxon::Insecta => "Insecta",
            IconicTaxon::Aves => "Aves",
            IconicTaxon::Mammalia => "Mammalia",
            IconicTaxon::Amphibia => "Amphibia",
            IconicTaxon::Reptilia => "Reptilia",
            IconicTaxon::Actinopterygii => "Actinopterygii",
            IconicTaxon::Fungi => "Fungi",
            IconicTaxon::Plantae => "Plantae",
            IconicTaxon::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for IconicTaxon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IconicTaxon {
    type Err = NatusferaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = title_case(value.trim());
        Self::ALL
            .into_iter()
            .find(|taxon| taxon.as_str() == normalized)
            .ok_or_else(|| NatusferaError::InvalidTaxon(value.to_string()))
    }
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Casual,
    Research,
}

impl QualityGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityGrade::Casual => "casual",
            QualityGrade::Research => "research",
        }
    }
}

impl FromStr for QualityGrade {
    type Err = NatusferaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "casual" => Ok(QualityGrade::Casual),
            "research" => Ok(QualityGrade::Research),
            _ => Err(NatusferaError::InvalidArgument(format!(
                "unknown quality grade: {value}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    Id(u64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceRef {
    Id(u64),
    Name(String),
}

/// Filters accepted by an observation search.
///
/// `project`, `observation_id` and `user` select the resource and are
/// mutually exclusive in that order of precedence; the rest narrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationQuery {
    pub query: Option<String>,
    pub project: Option<ProjectRef>,
    pub observation_id: Option<u64>,
    pub user: Option<String>,
    pub taxon: Option<String>,
    pub place: Option<PlaceRef>,
    pub year: Option<i32>,
    pub num_max: Option<usize>,
}

impl ObservationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.query = Some(text.into());
        self
    }

    pub fn project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn observation_id(mut self, id: u64) -> Self {
        self.observation_id = Some(id);
        self
    }

    pub fn user(mut self, login: impl Into<String>) -> Self {
        self.user = Some(login.into());
        self
    }

    pub fn taxon(mut self, taxon: impl Into<String>) -> Self {
        self.taxon = Some(taxon.into());
        self
    }

    pub fn place(mut self, place: PlaceRef) -> Self {
        self.place = Some(place);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn num_max(mut self, num_max: usize) -> Self {
        self.num_max = Some(num_max);
        self
    }
}
