//! Zone definitions: named, prioritised rules that classify a transect.
//!
//! A [`RuleSet`] keeps definitions in the order they were written and
//! precomputes the evaluation order (priority ascending, ties in written
//! order). Documents are validated as they are read, so a malformed rule
//! surfaces as [`ZoningError::InvalidRule`] before any transect is touched.

pub mod condition;
mod defaults;

use std::path::Path;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, ZoningError};
use crate::ordered::OrderedMap;
use crate::transect::Transect;
pub use condition::{evaluate, Condition, Operator};
use condition::RawCondition;
pub use defaults::default_zone_definitions;

/// Priority given to a definition that does not state one.
pub const DEFAULT_PRIORITY: i64 = 999;

/// How a definition combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl FromStr for Logic {
    type Err = ZoningError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            other => Err(ZoningError::InvalidRule(format!("Unknown logic: {other}"))),
        }
    }
}

impl Serialize for Logic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        })
    }
}

/// One named zone type's classification rule and narrative template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDefinition {
    pub priority: i64,
    pub conditions: Vec<Condition>,
    pub logic: Logic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_template: Option<String>,
}

impl ZoneDefinition {
    pub fn new(priority: i64, conditions: Vec<Condition>) -> Self {
        Self {
            priority,
            conditions,
            logic: Logic::And,
            description_template: None,
        }
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.description_template = Some(template.to_string());
        self
    }

    /// Empty condition lists match everything.
    pub fn matches(&self, transect: &Transect) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        let holds = |c: &Condition| evaluate(transect.attribute(&c.field), c);
        match self.logic {
            Logic::And => self.conditions.iter().all(holds),
            Logic::Or => self.conditions.iter().any(holds),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawZoneDefinition {
    #[serde(default)]
    priority: Option<i64>,
    #[serde(default)]
    conditions: Vec<RawCondition>,
    #[serde(default)]
    logic: Option<String>,
    #[serde(default)]
    description_template: Option<String>,
}

impl TryFrom<RawZoneDefinition> for ZoneDefinition {
    type Error = ZoningError;

    fn try_from(raw: RawZoneDefinition) -> Result<Self> {
        let conditions = raw
            .conditions
            .into_iter()
            .map(Condition::try_from)
            .collect::<Result<Vec<_>>>()?;
        let logic = match raw.logic.as_deref() {
            Some(s) => s.parse()?,
            None => Logic::And,
        };
        Ok(Self {
            priority: raw.priority.unwrap_or(DEFAULT_PRIORITY),
            conditions,
            logic,
            description_template: raw.description_template,
        })
    }
}

// ── Rule set ──────────────────────────────────────────────────────────────────

/// Ordered collection of named zone definitions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRuleSet")]
pub struct RuleSet {
    entries: Vec<(String, ZoneDefinition)>,
    /// Indices into `entries`, priority ascending.
    evaluation_order: Vec<usize>,
}

impl RuleSet {
    /// Build from definitions in written order. A repeated name replaces the
    /// earlier definition in place.
    pub fn new(definitions: impl IntoIterator<Item = (String, ZoneDefinition)>) -> Self {
        let mut entries: Vec<(String, ZoneDefinition)> = Vec::new();
        for (name, definition) in definitions {
            match entries.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = definition,
                None => entries.push((name, definition)),
            }
        }
        let mut evaluation_order: Vec<usize> = (0..entries.len()).collect();
        // Stable: equal priorities keep written order.
        evaluation_order.sort_by_key(|&i| entries[i].1.priority);
        Self {
            entries,
            evaluation_order,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawRuleSet = serde_json::from_str(text)?;
        Self::try_from(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn get(&self, zone_type: &str) -> Option<&ZoneDefinition> {
        self.entries
            .iter()
            .find(|(name, _)| name == zone_type)
            .map(|(_, definition)| definition)
    }

    /// Definitions in written order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneDefinition)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Definitions in evaluation order.
    pub fn by_priority(&self) -> impl Iterator<Item = (&str, &ZoneDefinition)> {
        self.evaluation_order.iter().map(|&i| {
            let (name, d) = &self.entries[i];
            (name.as_str(), d)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        default_zone_definitions()
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, definition) in &self.entries {
            map.serialize_entry(name, definition)?;
        }
        map.end()
    }
}

/// Rule document exactly as written, entry order preserved.
#[derive(Deserialize)]
#[serde(transparent)]
pub(crate) struct RawRuleSet(OrderedMap<RawZoneDefinition>);

impl TryFrom<RawRuleSet> for RuleSet {
    type Error = ZoningError;

    fn try_from(raw: RawRuleSet) -> Result<Self> {
        let definitions = raw
            .0
            .into_iter()
            .map(|(name, raw_def)| {
                ZoneDefinition::try_from(raw_def)
                    .map(|d| (name.clone(), d))
                    .map_err(|e| match e {
                        ZoningError::InvalidRule(msg) => {
                            ZoningError::InvalidRule(format!("zone '{name}': {msg}"))
                        }
                        other => other,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(definitions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_order_survives_parse_and_serialise() {
        let text = r#"{
            "zeta": {"priority": 2, "conditions": []},
            "alpha": {"priority": 1, "conditions": [{"field": "trend", "operator": ">", "value": 0}]}
        }"#;
        let rules = RuleSet::from_json_str(text).unwrap();
        let written: Vec<&str> = rules.iter().map(|(n, _)| n).collect();
        assert_eq!(written, ["zeta", "alpha"]);
        let evaluated: Vec<&str> = rules.by_priority().map(|(n, _)| n).collect();
        assert_eq!(evaluated, ["alpha", "zeta"]);

        let out = serde_json::to_string(&rules).unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
    }

    #[test]
    fn equal_priorities_keep_written_order() {
        let rules = RuleSet::new([
            ("b".to_string(), ZoneDefinition::new(5, vec![])),
            ("a".to_string(), ZoneDefinition::new(5, vec![])),
            ("c".to_string(), ZoneDefinition::new(1, vec![])),
        ]);
        let evaluated: Vec<&str> = rules.by_priority().map(|(n, _)| n).collect();
        assert_eq!(evaluated, ["c", "b", "a"]);
    }

    #[test]
    fn missing_priority_and_logic_take_defaults() {
        let rules = RuleSet::from_json_str(r#"{"x": {"conditions": []}}"#).unwrap();
        let x = rules.get("x").unwrap();
        assert_eq!(x.priority, DEFAULT_PRIORITY);
        assert_eq!(x.logic, Logic::And);
        assert_eq!(x.description_template, None);
    }

    #[test]
    fn unknown_operator_in_document_is_invalid_rule() {
        let text = r#"{"bad": {"priority": 1, "conditions": [{"field": "trend", "operator": "approx", "value": 1}]}}"#;
        let err = RuleSet::from_json_str(text).unwrap_err();
        match err {
            ZoningError::InvalidRule(msg) => {
                assert!(msg.contains("bad"), "{msg}");
                assert!(msg.contains("approx"), "{msg}");
            }
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn unknown_logic_is_invalid_rule() {
        let text = r#"{"bad": {"conditions": [], "logic": "XOR"}}"#;
        assert!(matches!(
            RuleSet::from_json_str(text),
            Err(ZoningError::InvalidRule(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            RuleSet::from_json_str("{not json"),
            Err(ZoningError::Json(_))
        ));
    }

    #[test]
    fn or_logic_matches_on_any_condition() {
        let def = ZoneDefinition::new(
            1,
            vec![
                Condition::compare("r2_score", Operator::Lt, 0.05),
                Condition::compare("rmse", Operator::Gt, 30.0),
            ],
        );
        let t = Transect::new("t", "s", 0.0)
            .with_attribute("r2_score", Some(0.9))
            .with_attribute("rmse", Some(45.0));
        assert!(!def.matches(&t));
        assert!(def.clone().with_logic(Logic::Or).matches(&t));
    }

    #[test]
    fn duplicate_names_replace_in_place() {
        let rules = RuleSet::new([
            ("a".to_string(), ZoneDefinition::new(1, vec![])),
            ("b".to_string(), ZoneDefinition::new(2, vec![])),
            ("a".to_string(), ZoneDefinition::new(3, vec![])),
        ]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("a").unwrap().priority, 3);
        let evaluated: Vec<&str> = rules.by_priority().map(|(n, _)| n).collect();
        assert_eq!(evaluated, ["b", "a"]);
    }
}
