use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::RuleSet;

/// Default minimum number of transects in an emitted zone.
pub const DEFAULT_MIN_ZONE_LENGTH: usize = 3;

/// Zoning parameters. Every field falls back to its default when absent from
/// a config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningConfig {
    /// Runs shorter than this are not reported as zones.
    pub min_zone_length: usize,
    pub zone_definitions: RuleSet,
}

impl Default for ZoningConfig {
    fn default() -> Self {
        Self {
            min_zone_length: DEFAULT_MIN_ZONE_LENGTH,
            zone_definitions: RuleSet::default(),
        }
    }
}

impl ZoningConfig {
    pub fn with_min_zone_length(mut self, min_zone_length: usize) -> Self {
        self.min_zone_length = min_zone_length;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.zone_definitions = rules;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}
