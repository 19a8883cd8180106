use std::fs;

use chrono::NaiveDate;
use serde_json::json;

use natusfera::domain::{IconicTaxon, QualityGrade};
use natusfera::normalize;

fn fixture(name: &str) -> serde_json::Value {
    let raw = fs::read_to_string(format!("tests/fixtures/{name}")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn observation_from_nested_shape() {
    let obs = normalize::observation(&fixture("observation_2084.json")).unwrap();

    assert_eq!(obs.id, 2084);
    assert_eq!(obs.captive, Some(false));
    assert_eq!(
        obs.created_at.unwrap().to_rfc3339(),
        "2016-05-01T06:32:03-10:00"
    );
    assert_eq!(obs.observed_on, NaiveDate::from_ymd_opt(2016, 5, 1));
    assert_eq!(
        obs.updated_at.unwrap().to_rfc3339(),
        "2021-03-15T01:19:22-10:00"
    );
    assert_eq!(
        obs.description.as_deref(),
        Some("Bajo la encina, junto al camino")
    );
    assert_eq!(
        obs.place_guess.as_deref(),
        Some("Parc de Collserola Barcelona")
    );
    assert_eq!(obs.latitude, Some(41.403373));
    assert_eq!(obs.longitude, Some(2.216873));
    assert_eq!(obs.place_id, Some(1011));
    assert_eq!(obs.quality_grade, Some(QualityGrade::Research));
    assert_eq!(obs.user_login.as_deref(), Some("zolople"));
    assert_eq!(obs.num_identification_agreements, Some(2));

    let taxon = obs.taxon.unwrap();
    assert_eq!(taxon.id, Some(48));
    assert_eq!(taxon.name.as_deref(), Some("Amanita muscaria"));
    assert_eq!(taxon.iconic_taxon, Some(IconicTaxon::Fungi));

    assert_eq!(obs.photos.len(), 2);
    assert_eq!(obs.photos[0].id, Some(9001));
    assert_eq!(obs.photos[1].large_url, None);
    assert_eq!(obs.project_ids, vec![806, 1191]);
}

#[test]
fn observation_from_flat_shape() {
    let raw = json!({
        "id": 17,
        "taxon_id": 3,
        "iconic_taxon_id": 5,
        "project_ids": [1, 2],
        "photos": [
            { "id": 4, "small_url": "https://example.org/s.jpg" },
            "not a photo"
        ],
        "captive_flag": "true",
        "quality_grade": "casual"
    });
    let obs = normalize::observation(&raw).unwrap();

    let taxon = obs.taxon.unwrap();
    assert_eq!(taxon.id, Some(3));
    assert_eq!(taxon.name, None);
    assert_eq!(taxon.iconic_taxon, Some(IconicTaxon::Aves));
    assert_eq!(obs.project_ids, vec![1, 2]);
    assert_eq!(obs.photos.len(), 1);
    assert_eq!(obs.photos[0].small_url.as_deref(), Some("https://example.org/s.jpg"));
    assert_eq!(obs.captive, Some(true));
    assert_eq!(obs.quality_grade, Some(QualityGrade::Casual));
}

#[test]
fn absent_fields_stay_unset() {
    let obs = normalize::observation(&json!({ "id": 1 })).unwrap();
    assert_eq!(obs.created_at, None);
    assert_eq!(obs.observed_on, None);
    assert_eq!(obs.updated_at, None);
    assert_eq!(obs.taxon, None);
    assert_eq!(obs.latitude, None);
    assert!(obs.photos.is_empty());
    assert!(obs.project_ids.is_empty());
}

#[test]
fn malformed_fields_are_suppressed() {
    let raw = json!({
        "id": 5,
        "created_at": "not a date",
        "observed_on": null,
        "taxon": "Fungi",
        "latitude": { "deg": 41 },
        "photos": "none",
        "project_observations": [{ "project_id": "x" }, { "project_id": 9 }],
        "quality_grade": "needs_id",
        "iconic_taxon_id": 999
    });
    let obs = normalize::observation(&raw).unwrap();
    assert_eq!(obs.created_at, None);
    assert_eq!(obs.observed_on, None);
    assert_eq!(obs.taxon, None);
    assert_eq!(obs.latitude, None);
    assert!(obs.photos.is_empty());
    assert_eq!(obs.project_ids, vec![9]);
    assert_eq!(obs.quality_grade, None);
}

#[test]
fn record_without_id_is_rejected() {
    assert!(normalize::observation(&json!({ "taxon_id": 3 })).is_none());
    assert!(normalize::observation(&json!({ "id": "abc" })).is_none());
    assert!(normalize::observation(&json!([1, 2])).is_none());
}

#[test]
fn normalizing_twice_is_idempotent() {
    let first = normalize::observation(&fixture("observation_2084.json")).unwrap();
    let reserialized = serde_json::to_value(&first).unwrap();
    let second = normalize::observation(&reserialized).unwrap();
    assert_eq!(first, second);
}

#[test]
fn project_from_api_record() {
    let project = normalize::project(&fixture("project_1191.json")).unwrap();
    assert_eq!(project.id, 1191);
    assert_eq!(project.title, "URBAMAR");
    assert_eq!(project.latitude, Some(41.403373));
    assert_eq!(project.place_id, None);
    assert_eq!(project.parent_id, Some(12));
    assert_eq!(project.children_id, vec![1300, 1301]);
    assert_eq!(project.observed_taxa_count, Some(312));
    assert_eq!(
        project.updated_at.unwrap().to_rfc3339(),
        "2020-09-26T00:00:00+00:00"
    );
}

#[test]
fn project_requires_title() {
    assert!(normalize::project(&json!({ "id": 806 })).is_none());
}

#[test]
fn empty_flat_lists_fall_back_to_nested_shape() {
    let raw = json!({
        "id": 1,
        "photos": [],
        "observation_photos": [{ "photo": { "id": 9, "medium_url": "https://example.org/m.jpg" } }],
        "project_ids": [],
        "project_observations": [{ "project_id": 806 }]
    });
    let obs = normalize::observation(&raw).unwrap();

    assert_eq!(obs.photos.len(), 1);
    assert_eq!(obs.photos[0].id, Some(9));
    assert_eq!(obs.photos[0].medium_url.as_deref(), Some("https://example.org/m.jpg"));
    assert_eq!(obs.project_ids, vec![806]);
}

#[test]
fn description_keeps_one_space_per_line_break() {
    let raw = json!({
        "id": 2,
        "description": "Primera línea\r\n\r\nSegunda línea",
        "place_guess": "Montseny\r\n\r\n  Catalunya"
    });
    let obs = normalize::observation(&raw).unwrap();

    assert_eq!(obs.description.as_deref(), Some("Primera línea  Segunda línea"));
    assert_eq!(obs.place_guess.as_deref(), Some("Montseny Catalunya"));
}
