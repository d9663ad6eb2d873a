//! Single-field predicates and their evaluation against possibly absent values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ZoningError;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    IsNull,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::IsNull => "is_null",
        }
    }

    fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Lt => value < threshold,
            Operator::Le => value <= threshold,
            Operator::Gt => value > threshold,
            Operator::Ge => value >= threshold,
            Operator::Eq => value == threshold,
            Operator::Ne => value != threshold,
            Operator::IsNull => false,
        }
    }
}

impl FromStr for Operator {
    type Err = ZoningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "is_null" => Ok(Operator::IsNull),
            other => Err(ZoningError::InvalidRule(format!("Unknown operator: {other}"))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A predicate on one transect attribute.
///
/// Comparison operators always carry a threshold; `is_null` never needs one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Option<f64>,
    /// Whether a missing attribute satisfies a comparison.
    #[serde(skip_serializing_if = "is_false")]
    pub allow_null: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Condition {
    pub fn compare(field: &str, operator: Operator, threshold: f64) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: Some(threshold),
            allow_null: false,
        }
    }

    pub fn is_null(field: &str) -> Self {
        Self {
            field: field.to_string(),
            operator: Operator::IsNull,
            value: None,
            allow_null: false,
        }
    }

    pub fn allowing_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

/// Condition as written in a rule document, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCondition {
    field: String,
    operator: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    allow_null: bool,
}

impl TryFrom<RawCondition> for Condition {
    type Error = ZoningError;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let operator: Operator = raw.operator.parse()?;
        let value = match operator {
            Operator::IsNull => None,
            _ => Some(raw.value.ok_or_else(|| {
                ZoningError::InvalidRule(format!(
                    "condition on '{}' uses '{}' without a threshold",
                    raw.field, operator
                ))
            })?),
        };
        Ok(Self {
            field: raw.field,
            operator,
            value,
            allow_null: raw.allow_null,
        })
    }
}

/// Evaluate `condition` against an attribute value.
///
/// An absent value satisfies `is_null` and otherwise satisfies the condition
/// only when `allow_null` is set. A present value never satisfies `is_null`.
pub fn evaluate(value: Option<f64>, condition: &Condition) -> bool {
    match value {
        None => condition.operator == Operator::IsNull || condition.allow_null,
        Some(v) => condition
            .value
            .is_some_and(|threshold| condition.operator.compare(v, threshold)),
    }
}
