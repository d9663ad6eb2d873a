use serde::Serialize;
use shoreline_core::{analyze_site, parse_feature_collection, RuleSet, ZoningConfig};
use wasm_bindgen::prelude::*;

/// Zone one site of a GeoJSON transect collection.
/// `zone_definitions_json` replaces the built-in rule set when given.
/// Returns the report as a plain JS object.
#[wasm_bindgen]
pub fn analyze(
    site_id: &str,
    geojson: &str,
    min_zone_length: usize,
    zone_definitions_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let config = build_config(min_zone_length, zone_definitions_json.as_deref()).map_err(js_error)?;
    let transects = parse_feature_collection(geojson).map_err(js_error)?;
    to_js(&analyze_site(site_id, &transects, &config))
}

/// The built-in zone definitions as a plain JS object.
#[wasm_bindgen]
pub fn default_zone_definitions() -> Result<JsValue, JsValue> {
    to_js(&shoreline_core::default_zone_definitions())
}

fn build_config(
    min_zone_length: usize,
    zone_definitions_json: Option<&str>,
) -> shoreline_core::Result<ZoningConfig> {
    let config = ZoningConfig::default().with_min_zone_length(min_zone_length);
    Ok(match zone_definitions_json {
        Some(text) => config.with_rules(RuleSet::from_json_str(text)?),
        None => config,
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: shoreline_core::ZoningError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
