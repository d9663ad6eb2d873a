//! Grouping of consecutive same-type transects into zones.

use crate::classify::classify_all;
use crate::rules::RuleSet;
use crate::summary::{summarize, ZoneSummary};
use crate::transect::Transect;

/// Classify `transects` (already in site order) and group them into zones of
/// at least `min_zone_length` members.
pub fn segment(transects: &[Transect], min_zone_length: usize, rules: &RuleSet) -> Vec<ZoneSummary> {
    let classes = classify_all(transects, rules);
    segment_classified(transects, &classes, min_zone_length, rules)
}

/// Segment using classifications computed by the caller. `classes[i]` is the
/// zone type of `transects[i]`; any excess in either slice is ignored.
///
/// Runs shorter than `min_zone_length` produce no zone. Zone indices count
/// emitted zones only, starting at 1.
pub fn segment_classified(
    transects: &[Transect],
    classes: &[&str],
    min_zone_length: usize,
    rules: &RuleSet,
) -> Vec<ZoneSummary> {
    let n = transects.len().min(classes.len());
    let mut zones = Vec::new();
    let mut run_start = 0;

    for i in 1..=n {
        if i < n && classes[i] == classes[run_start] {
            continue;
        }
        let run = &transects[run_start..i];
        if run.len() >= min_zone_length {
            let zone_index = zones.len() + 1;
            if let Some(zone) = summarize(classes[run_start], run, run_start, rules, zone_index) {
                tracing::debug!(
                    zone = %zone.zone_name,
                    start = run_start,
                    len = run.len(),
                    "zone emitted"
                );
                zones.push(zone);
            }
        }
        run_start = i;
    }
    zones
}
