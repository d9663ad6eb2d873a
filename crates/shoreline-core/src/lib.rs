//! Narrative zoning of shoreline transects.
//!
//! A site's transects, ordered along the coast, are classified one by one
//! against a prioritised rule table and grouped into contiguous zones of the
//! same type. Each zone gets aggregate statistics and a narrative sentence.
//! The result is a self-describing [`Report`] that always serialises to JSON.

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod geojson;
pub mod ordered;
pub mod payload;
pub mod profile;
pub mod report;
pub mod rules;
pub mod segment;
pub mod stats;
pub mod summary;
pub mod template;
pub mod transect;

pub use batch::analyze_sites;
pub use classify::{classify, classify_all, FALLBACK_ZONE_TYPE};
pub use config::{ZoningConfig, DEFAULT_MIN_ZONE_LENGTH};
pub use error::{Result, ZoningError};
pub use geojson::{parse_feature_collection, read_feature_collection};
pub use ordered::OrderedMap;
pub use payload::Payload;
pub use profile::{profile_site, SiteProfile};
pub use report::{analyze_site, analyze_transects, assemble, Report};
pub use rules::{default_zone_definitions, Condition, Logic, Operator, RuleSet, ZoneDefinition};
pub use segment::segment;
pub use summary::{summarize, ZoneSummary};
pub use transect::{cmp_by_id, site_ids, transects_for_site, Transect};

#[cfg(test)]
mod tests {
    use super::*;

    fn eroding(i: usize, dist: f64, trend: Option<f64>) -> Transect {
        Transect::new(format!("aus0001-{i:04}"), "aus0001", dist)
            .with_attribute("trend", trend)
            .with_attribute("beach_slope", Some(0.05))
            .with_attribute("r2_score", Some(0.5))
            .with_attribute("rmse", Some(12.0))
    }

    /// Three consecutive transects below -0.8 m/yr form one rapid erosion zone.
    #[test]
    fn scenario_rapid_erosion_hotspot() {
        let ts: Vec<Transect> = [-1.0, -0.9, -1.2]
            .into_iter()
            .enumerate()
            .map(|(i, v)| eroding(i, i as f64 * 100.0, Some(v)))
            .collect();
        let report = analyze_transects("aus0001", &ts, &ZoningConfig::default());
        assert_eq!(report.zone_count, 1);
        assert_eq!(report.zones[0].zone_type, "rapid_erosion");
        assert_eq!(report.zones[0].transect_count, 3);
    }

    /// Alternating accretion and erosion never forms a run of two.
    #[test]
    fn scenario_alternating_trends() {
        let ts: Vec<Transect> = [1.0, -1.0, 1.0, -1.0, 1.0]
            .into_iter()
            .enumerate()
            .map(|(i, v)| eroding(i, i as f64 * 100.0, Some(v)))
            .collect();
        let report = analyze_transects("aus0001", &ts, &ZoningConfig::default().with_min_zone_length(2));
        assert_eq!(report.zone_count, 0);
        assert_eq!(report.transects.len(), 5);
        for (i, (_, record)) in report.transects.iter().enumerate() {
            let expected = if i % 2 == 0 { "rapid_accretion" } else { "rapid_erosion" };
            assert_eq!(record.zone_classification, expected);
        }
    }

    #[test]
    fn scenario_missing_trend_is_no_data() {
        let t = eroding(0, 0.0, None).with_attribute("r2_score", Some(0.0));
        assert_eq!(classify(&t, &default_zone_definitions()), "no_data");
    }

    #[test]
    fn scenario_zone_length_and_rendered_km() {
        let ts = vec![
            eroding(0, 100.0, Some(-1.0)),
            eroding(1, 180.0, Some(-1.0)),
            eroding(2, 340.0, Some(-1.0)),
        ];
        let zones = segment(&ts, 3, &default_zone_definitions());
        assert_eq!(zones[0].length_meters, 240.0);
        assert!(
            zones[0].narrative_description.contains("spanning 0.2km"),
            "{}",
            zones[0].narrative_description
        );
    }

    /// A transect with a trend but no fit statistics at all lands in
    /// high_uncertainty, ahead of the slope bands and the catch-all.
    #[test]
    fn fit_statistics_absent_but_trend_present_is_uncertain() {
        let t = Transect::new("aus0001-0000", "aus0001", 0.0)
            .with_attribute("trend", Some(0.0))
            .with_attribute("beach_slope", Some(0.2));
        assert_eq!(classify(&t, &default_zone_definitions()), "high_uncertainty");
    }

    #[test]
    fn end_to_end_from_geojson() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": "aus0001-0002", "site_id": "aus0001", "along_dist": 100, "trend": -1.1, "r2_score": 0.6, "rmse": 5, "beach_slope": 0.05}, "geometry": null},
            {"type": "Feature", "properties": {"id": "aus0001-0001", "site_id": "aus0001", "along_dist": 0, "trend": -0.9, "r2_score": 0.6, "rmse": 5, "beach_slope": 0.05}, "geometry": null},
            {"type": "Feature", "properties": {"id": "aus0001-0003", "site_id": "aus0001", "along_dist": 200, "trend": -1.5, "r2_score": 0.6, "rmse": 5, "beach_slope": 0.05}, "geometry": null},
            {"type": "Feature", "properties": {"id": "aus0002-0001", "site_id": "aus0002", "along_dist": 0, "trend": 0.0}, "geometry": null}
        ]}"#;
        let all = parse_feature_collection(text).unwrap();
        let report = analyze_site("aus0001", &all, &ZoningConfig::default());
        let zone = &report.zones[0];
        assert_eq!(zone.start_transect_id, "aus0001-0001");
        assert_eq!(zone.end_transect_id, "aus0001-0003");
        assert_eq!(zone.zone_name, "aus0001_rapid_erosion_zone_01");
        assert_eq!(zone.length_meters, 200.0);
    }

    #[test]
    fn numeric_ids_zone_in_coastal_order() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": 10, "site_id": "aus0001", "along_dist": 1000, "trend": -1.2, "r2_score": 0.6, "rmse": 5}, "geometry": null},
            {"type": "Feature", "properties": {"id": 9, "site_id": "aus0001", "along_dist": 900, "trend": -1.0, "r2_score": 0.6, "rmse": 5}, "geometry": null},
            {"type": "Feature", "properties": {"id": 2, "site_id": "aus0001", "along_dist": 200, "trend": -0.9, "r2_score": 0.6, "rmse": 5}, "geometry": null}
        ]}"#;
        let all = parse_feature_collection(text).unwrap();
        let report = analyze_site("aus0001", &all, &ZoningConfig::default());
        let zone = &report.zones[0];
        assert_eq!(zone.start_transect_id, "2");
        assert_eq!(zone.end_transect_id, "10");
        assert_eq!(zone.length_meters, 800.0);
        let order: Vec<&str> = report.transects.keys().collect();
        assert_eq!(order, ["2", "9", "10"]);
    }
}
