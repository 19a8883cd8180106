//! Flat, table-shaped views of observations for downstream analysis.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{IconicTaxon, QualityGrade};
use crate::error::NatusferaError;
use crate::records::Observation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRow {
    pub id: u64,
    pub captive: Option<bool>,
    pub created_at: Option<NaiveDate>,
    pub observed_on: Option<NaiveDate>,
    pub updated_at: Option<NaiveDate>,
    pub description: Option<String>,
    pub place_guess: Option<String>,
    pub taxon_id: Option<u64>,
    pub taxon_name: Option<String>,
    pub iconic_taxon: Option<IconicTaxon>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<u64>,
    pub quality_grade: Option<QualityGrade>,
    pub user_id: Option<u64>,
    pub user_login: Option<String>,
    pub project_ids: Vec<u64>,
    pub photo_id: Option<u64>,
    pub num_identification_agreements: Option<u64>,
    pub num_identification_disagreements: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRow {
    pub observation_id: u64,
    pub photo_id: u64,
    pub iconic_taxon: Option<IconicTaxon>,
    pub taxon_name: Option<String>,
    pub medium_url: Option<String>,
    pub user_login: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// File name the photo is stored under: `{observation_id}_{photo_id}.jpg`.
    pub path: String,
}

pub fn observation_rows(observations: &[Observation]) -> Vec<ObservationRow> {
    observations
        .iter()
        .map(|obs| ObservationRow {
            id: obs.id,
            captive: obs.captive,
            created_at: obs.created_at.map(|stamp| stamp.date_naive()),
            observed_on: obs.observed_on,
            updated_at: obs.updated_at.map(|stamp| stamp.date_naive()),
            description: obs.description.clone(),
            place_guess: obs.place_guess.clone(),
            taxon_id: obs.taxon.as_ref().and_then(|taxon| taxon.id),
            taxon_name: obs.taxon.as_ref().and_then(|taxon| taxon.name.clone()),
            iconic_taxon: obs.taxon.as_ref().and_then(|taxon| taxon.iconic_taxon),
            latitude: obs.latitude,
            longitude: obs.longitude,
            place_id: obs.place_id,
            quality_grade: obs.quality_grade,
            user_id: obs.user_id,
            user_login: obs.user_login.clone(),
            project_ids: obs.project_ids.clone(),
            photo_id: obs.photos.first().and_then(|photo| photo.id),
            num_identification_agreements: obs.num_identification_agreements,
            num_identification_disagreements: obs.num_identification_disagreements,
        })
        .collect()
}

/// One row per identified photo. Photos without an id cannot be named on
/// disk and are left out.
pub fn photo_rows(observations: &[Observation]) -> Vec<PhotoRow> {
    let mut rows = Vec::new();
    for obs in observations {
        for photo in &obs.photos {
            let Some(photo_id) = photo.id else {
                continue;
            };
            rows.push(PhotoRow {
                observation_id: obs.id,
                photo_id,
                iconic_taxon: obs.taxon.as_ref().and_then(|taxon| taxon.iconic_taxon),
                taxon_name: obs.taxon.as_ref().and_then(|taxon| taxon.name.clone()),
                medium_url: photo.medium_url.clone(),
                user_login: obs.user_login.clone(),
                latitude: obs.latitude,
                longitude: obs.longitude,
                path: format!("{}_{}.jpg", obs.id, photo_id),
            });
        }
    }
    rows
}

pub fn write_json_lines<W: Write, R: Serialize>(
    writer: &mut W,
    rows: &[R],
) -> Result<(), NatusferaError> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)
            .map_err(|err| NatusferaError::Filesystem(err.to_string()))?;
        writer
            .write_all(b"\n")
            .map_err(|err| NatusferaError::Filesystem(err.to_string()))?;
    }
    Ok(())
}
