use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{IconicTaxon, QualityGrade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: u64,
    pub captive: Option<bool>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub observed_on: Option<NaiveDate>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    pub place_guess: Option<String>,
    pub taxon: Option<Taxon>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<u64>,
    pub quality_grade: Option<QualityGrade>,
    pub user_id: Option<u64>,
    pub user_login: Option<String>,
    pub project_ids: Vec<u64>,
    pub photos: Vec<Photo>,
    pub num_identification_agreements: Option<u64>,
    pub num_identification_disagreements: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxon {
    pub iconic_taxon: Option<IconicTaxon>,
    pub id: Option<u64>,
    pub name: Option<String>,
}

impl Taxon {
    pub fn is_empty(&self) -> bool {
        self.iconic_taxon.is_none() && self.id.is_none() && self.name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Option<u64>,
    pub large_url: Option<String>,
    pub medium_url: Option<String>,
    pub small_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<u64>,
    pub parent_id: Option<u64>,
    pub children_id: Vec<u64>,
    pub user_id: Option<u64>,
    pub icon_url: Option<String>,
    pub observed_taxa_count: Option<u64>,
}
