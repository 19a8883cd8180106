//! Maps raw API JSON into typed records.
//!
//! Only `id` (and `title` for projects) is required. Any other field that is
//! missing, null or of an unexpected shape is left unset rather than failing
//! the record, so one odd record never costs the rest of a page.
//!
//! Line breaks in `description` become one space each, so paragraph spacing
//! survives as a double space. In `place_guess` a run of breaks and the blanks
//! around it collapse into a single space.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use crate::domain::IconicTaxon;
use crate::records::{Observation, Photo, Project, Taxon};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("static regex"));
static LINE_BREAK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*(?:\r\n|\r|\n)+[ \t]*").expect("static regex"));

pub fn observation(raw: &Value) -> Option<Observation> {
    let id = raw.get("id").and_then(as_u64)?;
    Some(Observation {
        id,
        captive: raw
            .get("captive")
            .or_else(|| raw.get("captive_flag"))
            .and_then(as_bool),
        created_at: raw.get("created_at").and_then(parse_timestamp),
        observed_on: raw.get("observed_on").and_then(parse_date),
        updated_at: raw.get("updated_at").and_then(parse_timestamp),
        description: text(raw, "description").map(|value| line_breaks_to_spaces(&value)),
        place_guess: text(raw, "place_guess")
            .map(|value| collapse_line_breaks(&value).trim().to_string())
            .filter(|value| !value.is_empty()),
        taxon: taxon(raw),
        latitude: raw.get("latitude").and_then(as_f64),
        longitude: raw.get("longitude").and_then(as_f64),
        place_id: raw.get("place_id").and_then(as_u64),
        quality_grade: text(raw, "quality_grade").and_then(|value| value.parse().ok()),
        user_id: raw.get("user_id").and_then(as_u64),
        user_login: text(raw, "user_login")
            .or_else(|| raw.get("user").and_then(|user| text(user, "login"))),
        project_ids: project_ids(raw),
        photos: photos(raw),
        num_identification_agreements: raw
            .get("num_identification_agreements")
            .and_then(as_u64),
        num_identification_disagreements: raw
            .get("num_identification_disagreements")
            .and_then(as_u64),
    })
}

pub fn project(raw: &Value) -> Option<Project> {
    let id = raw.get("id").and_then(as_u64)?;
    let title = text(raw, "title")?;
    let children_id = raw
        .get("children_id")
        .or_else(|| raw.get("children_ids"))
        .and_then(|value| value.as_array())
        .map(|items| items.iter().filter_map(as_u64).collect())
        .unwrap_or_default();
    Some(Project {
        id,
        title,
        description: text(raw, "description"),
        created_at: raw.get("created_at").and_then(parse_timestamp),
        updated_at: raw.get("updated_at").and_then(parse_timestamp),
        latitude: raw.get("latitude").and_then(as_f64),
        longitude: raw.get("longitude").and_then(as_f64),
        place_id: raw.get("place_id").and_then(as_u64),
        parent_id: raw.get("parent_id").and_then(as_u64),
        children_id,
        user_id: raw.get("user_id").and_then(as_u64),
        icon_url: text(raw, "icon_url"),
        observed_taxa_count: raw.get("observed_taxa_count").and_then(as_u64),
    })
}

/// Full timestamp with offset. Values without an offset are taken as UTC and
/// date-only values as midnight UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    let text = value.as_str()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(parsed);
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}

/// Calendar date; a full timestamp keeps the date as written in its own offset.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|stamp| stamp.date_naive()))
}

pub fn line_breaks_to_spaces(value: &str) -> String {
    LINE_BREAK.replace_all(value, " ").into_owned()
}

pub fn collapse_line_breaks(value: &str) -> String {
    LINE_BREAK_RUNS.replace_all(value, " ").into_owned()
}

fn taxon(raw: &Value) -> Option<Taxon> {
    let nested = raw.get("taxon").filter(|value| value.is_object());
    let taxon = Taxon {
        iconic_taxon: nested
            .and_then(iconic_taxon)
            .or_else(|| iconic_taxon(raw)),
        id: nested
            .and_then(|taxon| taxon.get("id"))
            .and_then(as_u64)
            .or_else(|| raw.get("taxon_id").and_then(as_u64)),
        name: nested.and_then(|taxon| text(taxon, "name")),
    };
    if taxon.is_empty() { None } else { Some(taxon) }
}

fn iconic_taxon(object: &Value) -> Option<IconicTaxon> {
    ["iconic_taxon_id", "iconic_taxon", "iconic_taxon_name"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::Number(_) => as_u64(value)
                .and_then(|code| u32::try_from(code).ok())
                .and_then(IconicTaxon::from_code),
            Value::String(text) => match text.trim().parse::<u32>() {
                Ok(code) => IconicTaxon::from_code(code),
                Err(_) => text.parse().ok(),
            },
            _ => None,
        })
}

fn photos(raw: &Value) -> Vec<Photo> {
    let flat: Vec<Photo> = raw
        .get("photos")
        .and_then(|value| value.as_array())
        .map(|items| items.iter().filter_map(photo).collect())
        .unwrap_or_default();
    if !flat.is_empty() {
        return flat;
    }
    raw.get("observation_photos")
        .and_then(|value| value.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("photo"))
                .filter_map(photo)
                .collect()
        })
        .unwrap_or_default()
}

fn photo(raw: &Value) -> Option<Photo> {
    if !raw.is_object() {
        return None;
    }
    Some(Photo {
        id: raw.get("id").and_then(as_u64),
        large_url: text(raw, "large_url"),
        medium_url: text(raw, "medium_url"),
        small_url: text(raw, "small_url"),
    })
}

fn project_ids(raw: &Value) -> Vec<u64> {
    let flat: Vec<u64> = raw
        .get("project_ids")
        .and_then(|value| value.as_array())
        .map(|items| items.iter().filter_map(as_u64).collect())
        .unwrap_or_default();
    if !flat.is_empty() {
        return flat;
    }
    raw.get("project_observations")
        .and_then(|value| value.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("project_id")
                        .and_then(as_u64)
                        .or_else(|| item.get("project").and_then(|p| p.get("id")).and_then(as_u64))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn text(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
