//! Aggregates over the present values of one transect attribute.

use serde::Serialize;

use crate::payload::serialize_opt_f64;
use crate::transect::Transect;

/// Present values of `field`, in transect order.
pub fn present_values(transects: &[Transect], field: &str) -> Vec<f64> {
    transects.iter().filter_map(|t| t.attribute(field)).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Min / max / mean of one attribute; all absent when nothing was present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldRange {
    #[serde(serialize_with = "serialize_opt_f64")]
    pub min: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub max: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub avg: Option<f64>,
}

impl FieldRange {
    pub fn of(transects: &[Transect], field: &str) -> Self {
        let values = present_values(transects, field);
        Self {
            min: min(&values),
            max: max(&values),
            avg: mean(&values),
        }
    }
}
