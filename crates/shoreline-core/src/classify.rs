//! Per-transect zone classification.

use crate::rules::RuleSet;
use crate::transect::Transect;

/// Zone type used when no definition matches.
pub const FALLBACK_ZONE_TYPE: &str = "stable";

/// Classify one transect: the first definition in priority order that
/// matches wins.
pub fn classify<'r>(transect: &Transect, rules: &'r RuleSet) -> &'r str {
    rules
        .by_priority()
        .find(|(_, definition)| definition.matches(transect))
        .map_or(FALLBACK_ZONE_TYPE, |(name, _)| name)
}

/// Classify every transect, preserving order.
pub fn classify_all<'r>(transects: &[Transect], rules: &'r RuleSet) -> Vec<&'r str> {
    transects.iter().map(|t| classify(t, rules)).collect()
}
