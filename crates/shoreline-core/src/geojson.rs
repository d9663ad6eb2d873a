//! Transects from a GeoJSON `FeatureCollection`.
//!
//! Each feature must carry `id`, `site_id` and a numeric `along_dist` in its
//! properties. Everything else is kept as payload, in the order written.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ZoningError};
use crate::ordered::OrderedMap;
use crate::payload::Payload;
use crate::transect::Transect;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<OrderedMap<Payload>>,
    #[serde(default)]
    geometry: Option<Payload>,
}

pub fn parse_feature_collection(text: &str) -> Result<Vec<Transect>> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature_to_transect(index, feature))
        .collect()
}

pub fn read_feature_collection(path: impl AsRef<Path>) -> Result<Vec<Transect>> {
    parse_feature_collection(&std::fs::read_to_string(path)?)
}

fn feature_to_transect(index: usize, feature: Feature) -> Result<Transect> {
    let malformed = |reason: &str| ZoningError::MalformedFeature {
        index,
        reason: reason.to_string(),
    };
    let properties = feature
        .properties
        .ok_or_else(|| malformed("feature has no properties"))?;

    let id = properties
        .get("id")
        .and_then(identifier)
        .ok_or_else(|| malformed("missing or non-scalar 'id'"))?;
    let site_id = properties
        .get("site_id")
        .and_then(identifier)
        .ok_or_else(|| malformed("missing or non-scalar 'site_id'"))?;
    let along_dist = properties
        .get("along_dist")
        .and_then(Payload::as_f64)
        .ok_or_else(|| malformed("missing or non-numeric 'along_dist'"))?;

    Ok(Transect {
        id,
        site_id,
        along_dist,
        properties,
        geometry: feature.geometry,
    })
}

/// Identifiers may be written as strings or bare numbers. A numeric id keeps
/// its number in `properties`, which is what site ordering sorts on.
fn identifier(value: &Payload) -> Option<String> {
    match value {
        Payload::Text(s) => Some(s.clone()),
        Payload::Int(i) => Some(i.to_string()),
        Payload::Float(v) if v.is_finite() => Some(v.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "id": "aus0001-0002", "site_id": "aus0001", "along_dist": 100.0,
                    "trend": -0.95, "beach_slope": null, "r2_score": 0.4, "name": "north"
                },
                "geometry": {"type": "LineString", "coordinates": [[151.0, -33.0], [151.01, -33.0]]}
            },
            {
                "type": "Feature",
                "properties": {"id": 7, "site_id": "aus0001", "along_dist": 0},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn features_become_transects() {
        let ts = parse_feature_collection(SAMPLE).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[0].id, "aus0001-0002");
        assert_eq!(ts[0].site_id, "aus0001");
        assert_eq!(ts[0].along_dist, 100.0);
        assert_eq!(ts[0].attribute("trend"), Some(-0.95));
        assert_eq!(ts[0].attribute("beach_slope"), None);
        assert_eq!(ts[0].properties.get("name"), Some(&Payload::Text("north".into())));
        assert!(matches!(ts[0].geometry, Some(Payload::Geometry { .. })));

        assert_eq!(ts[1].id, "7");
        assert_eq!(ts[1].along_dist, 0.0);
        assert_eq!(ts[1].geometry, None);
    }

    #[test]
    fn missing_along_dist_names_the_feature() {
        let text = r#"{"features": [
            {"properties": {"id": "a", "site_id": "s", "along_dist": 1.0}},
            {"properties": {"id": "b", "site_id": "s"}}
        ]}"#;
        match parse_feature_collection(text) {
            Err(ZoningError::MalformedFeature { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("along_dist"));
            }
            other => panic!("expected MalformedFeature, got {other:?}"),
        }
    }

    #[test]
    fn numeric_ids_keep_coastal_order() {
        let text = r#"{"features": [
            {"properties": {"id": 10, "site_id": "aus0001", "along_dist": 1000, "trend": -1.0}},
            {"properties": {"id": 9, "site_id": "aus0001", "along_dist": 900, "trend": -1.0}},
            {"properties": {"id": 2, "site_id": "aus0001", "along_dist": 200, "trend": -1.0}}
        ]}"#;
        let all = parse_feature_collection(text).unwrap();
        let site = crate::transect::transects_for_site(&all, "aus0001");
        let ids: Vec<&str> = site.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2", "9", "10"]);
        assert_eq!(site[0].properties.get("id"), Some(&Payload::Int(2)));
    }

    #[test]
    fn properties_keep_written_order() {
        let text = r#"{"features": [
            {"properties": {"trend": 0.1, "id": "a", "zeta": 1, "site_id": "s", "along_dist": 0, "alpha": 2}}
        ]}"#;
        let ts = parse_feature_collection(text).unwrap();
        let keys: Vec<&str> = ts[0].properties.keys().collect();
        assert_eq!(keys, ["trend", "id", "zeta", "site_id", "along_dist", "alpha"]);
    }

    #[test]
    fn non_collection_is_a_json_error() {
        assert!(matches!(
            parse_feature_collection(r#"{"type": "Feature"}"#),
            Err(ZoningError::Json(_))
        ));
    }
}
