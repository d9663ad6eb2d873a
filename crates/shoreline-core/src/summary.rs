//! Zone statistics and narrative descriptions.

use serde::Serialize;

use crate::payload::{serialize_f64, serialize_opt_f64};
use crate::rules::RuleSet;
use crate::stats::{max, mean, min, present_values};
use crate::template::{render, TemplateValue};
use crate::transect::Transect;

/// Template used for zone types the rule set does not describe.
pub const UNCLASSIFIED_TEMPLATE: &str = "Unclassified zone spanning {length_km:.1f}km.";

/// A contiguous run of same-type transects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone_type: String,
    pub transect_count: usize,
    /// Position of the first member in the ordered site sequence.
    pub start_index: usize,
    pub end_index: usize,
    #[serde(serialize_with = "serialize_f64")]
    pub start_distance: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub end_distance: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub length_meters: f64,
    pub start_transect_id: String,
    pub end_transect_id: String,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub mean_trend: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_beach_slope: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_r2: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub max_trend: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub min_trend: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_rmse: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_mae: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_cil: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_ciu: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg_orientation: Option<f64>,
    pub transect_ids: Vec<String>,
    pub zone_name: String,
    pub narrative_description: String,
}

impl ZoneSummary {
    pub fn length_km(&self) -> f64 {
        self.length_meters / 1000.0
    }

    /// Placeholder values offered to narrative templates. Absent aggregates
    /// render as zero.
    pub fn template_vars(&self) -> Vec<(&'static str, TemplateValue)> {
        let or_zero = |v: Option<f64>| TemplateValue::Float(v.unwrap_or(0.0));
        let mean_trend = self.mean_trend.unwrap_or(0.0);
        vec![
            ("length_km", TemplateValue::Float(self.length_km())),
            ("mean_trend", TemplateValue::Float(mean_trend)),
            ("avg_trend", TemplateValue::Float(mean_trend)),
            ("avg_trend_abs", TemplateValue::Float(mean_trend.abs())),
            ("transect_count", TemplateValue::Int(self.transect_count as i64)),
            ("avg_beach_slope", or_zero(self.avg_beach_slope)),
            ("avg_slope", or_zero(self.avg_beach_slope)),
            ("avg_r2", or_zero(self.avg_r2)),
            ("max_trend", or_zero(self.max_trend)),
            ("min_trend", or_zero(self.min_trend)),
            ("avg_rmse", or_zero(self.avg_rmse)),
            ("avg_mae", or_zero(self.avg_mae)),
            ("avg_cil", or_zero(self.avg_cil)),
            ("avg_ciu", or_zero(self.avg_ciu)),
            ("avg_orientation", or_zero(self.avg_orientation)),
        ]
    }
}

/// Summarise one run of transects as zone number `zone_index` (1-based).
/// Returns `None` for an empty run.
pub fn summarize(
    zone_type: &str,
    transects: &[Transect],
    start_index: usize,
    rules: &RuleSet,
    zone_index: usize,
) -> Option<ZoneSummary> {
    let (first, last) = (transects.first()?, transects.last()?);
    let trends = present_values(transects, "trend");
    let avg = |field: &str| mean(&present_values(transects, field));

    let mut zone = ZoneSummary {
        zone_type: zone_type.to_string(),
        transect_count: transects.len(),
        start_index,
        end_index: start_index + transects.len() - 1,
        start_distance: first.along_dist,
        end_distance: last.along_dist,
        length_meters: (last.along_dist - first.along_dist).abs(),
        start_transect_id: first.id.clone(),
        end_transect_id: last.id.clone(),
        mean_trend: mean(&trends),
        avg_beach_slope: avg("beach_slope"),
        avg_r2: avg("r2_score"),
        max_trend: max(&trends),
        min_trend: min(&trends),
        avg_rmse: avg("rmse"),
        avg_mae: avg("mae"),
        avg_cil: avg("cil"),
        avg_ciu: avg("ciu"),
        avg_orientation: avg("orientation"),
        transect_ids: transects.iter().map(|t| t.id.clone()).collect(),
        zone_name: format!("{}_{zone_type}_zone_{zone_index:02}", first.site_id),
        narrative_description: String::new(),
    };
    zone.narrative_description = narrative_description(&zone, rules);
    Some(zone)
}

/// Render the zone type's template, falling back to a generic sentence when
/// rendering fails.
pub fn narrative_description(zone: &ZoneSummary, rules: &RuleSet) -> String {
    let template = rules
        .get(&zone.zone_type)
        .and_then(|d| d.description_template.as_deref())
        .unwrap_or(UNCLASSIFIED_TEMPLATE);

    match render(template, &zone.template_vars()) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(zone = %zone.zone_name, error = %err, "narrative template fallback");
            format!(
                "Zone spanning {:.1}km with {} transects.",
                zone.length_km(),
                zone.transect_count
            )
        }
    }
}
