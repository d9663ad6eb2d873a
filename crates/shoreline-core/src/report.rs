//! Per-site classification report and the top-level analysis entry points.

use serde::Serialize;
use serde_json::Value;

use crate::classify::classify_all;
use crate::config::ZoningConfig;
use crate::error::{Result, ZoningError};
use crate::ordered::OrderedMap;
use crate::payload::Payload;
use crate::rules::RuleSet;
use crate::segment::segment_classified;
use crate::summary::ZoneSummary;
use crate::transect::{transects_for_site, Transect};

// ── Report ────────────────────────────────────────────────────────────────────

/// A transect as written into the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransectRecord {
    pub properties: OrderedMap<Payload>,
    pub geometry: Option<Payload>,
    pub zone_classification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisParameters {
    pub min_zone_length: usize,
}

/// Everything known about one site after zoning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub site_id: String,
    pub transect_count: usize,
    pub zone_count: usize,
    pub zones: Vec<ZoneSummary>,
    /// Number of zones (not transects) per zone type, in order of first appearance.
    pub zone_type_distribution: OrderedMap<usize>,
    pub transects: OrderedMap<TransectRecord>,
    pub zone_definitions_used: RuleSet,
    pub analysis_parameters: AnalysisParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    /// Report for a site with nothing to classify.
    pub fn empty(site_id: &str, rules: &RuleSet, min_zone_length: usize) -> Self {
        Self {
            site_id: site_id.to_string(),
            transect_count: 0,
            zone_count: 0,
            zones: Vec::new(),
            zone_type_distribution: OrderedMap::new(),
            transects: OrderedMap::new(),
            zone_definitions_used: rules.clone(),
            analysis_parameters: AnalysisParameters { min_zone_length },
            error: Some(ZoningError::NoTransectsForSite(site_id.to_string()).to_string()),
        }
    }

    /// Plain JSON tree of the report. Object keys in the tree are sorted;
    /// [`Report::to_json_string`] keeps input order.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

/// Combine zones and per-transect classifications into a report.
/// `classifications[i]` is the zone type of `transects[i]`.
pub fn assemble(
    site_id: &str,
    transects: &[Transect],
    zones: Vec<ZoneSummary>,
    classifications: &[&str],
    rules: &RuleSet,
    min_zone_length: usize,
) -> Report {
    let mut distribution = OrderedMap::new();
    for zone in &zones {
        *distribution.entry_or(&zone.zone_type, 0) += 1;
    }

    let mut records = OrderedMap::new();
    for (t, class) in transects.iter().zip(classifications) {
        records.insert(
            t.id.clone(),
            TransectRecord {
                properties: t.properties.clone(),
                geometry: t.geometry.clone(),
                zone_classification: class.to_string(),
            },
        );
    }

    Report {
        site_id: site_id.to_string(),
        transect_count: transects.len(),
        zone_count: zones.len(),
        zones,
        zone_type_distribution: distribution,
        transects: records,
        zone_definitions_used: rules.clone(),
        analysis_parameters: AnalysisParameters { min_zone_length },
        error: None,
    }
}

/// Zone one site whose transects are already filtered and in order.
pub fn analyze_transects(site_id: &str, transects: &[Transect], config: &ZoningConfig) -> Report {
    let rules = &config.zone_definitions;
    if transects.is_empty() {
        tracing::debug!(site = site_id, "no transects for site");
        return Report::empty(site_id, rules, config.min_zone_length);
    }

    let classes = classify_all(transects, rules);
    let zones = segment_classified(transects, &classes, config.min_zone_length, rules);
    tracing::debug!(
        site = site_id,
        transects = transects.len(),
        zones = zones.len(),
        "site zoned"
    );
    assemble(site_id, transects, zones, &classes, rules, config.min_zone_length)
}

/// Pick `site_id`'s transects out of a mixed collection, order them by id and
/// zone them.
pub fn analyze_site(site_id: &str, all: &[Transect], config: &ZoningConfig) -> Report {
    let site = transects_for_site(all, site_id);
    analyze_transects(site_id, &site, config)
}
