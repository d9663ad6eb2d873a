use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::ordered::OrderedMap;
use crate::payload::Payload;

/// Numeric transect attributes aggregated per zone.
pub const ATTRIBUTE_FIELDS: [&str; 8] = [
    "trend",
    "beach_slope",
    "r2_score",
    "rmse",
    "mae",
    "cil",
    "ciu",
    "orientation",
];

/// A cross-shore measurement line.
///
/// `properties` holds every feature property in input order, identity fields
/// included, so the record can be written back out unchanged. Rule conditions
/// read numeric attributes from it by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Transect {
    pub id: String,
    pub site_id: String,
    /// Position along the coast in metres.
    pub along_dist: f64,
    pub properties: OrderedMap<Payload>,
    pub geometry: Option<Payload>,
}

impl Transect {
    pub fn new(id: impl Into<String>, site_id: impl Into<String>, along_dist: f64) -> Self {
        let id = id.into();
        let site_id = site_id.into();
        let mut properties = OrderedMap::new();
        properties.insert("id".to_string(), Payload::Text(id.clone()));
        properties.insert("site_id".to_string(), Payload::Text(site_id.clone()));
        properties.insert("along_dist".to_string(), Payload::Float(along_dist));
        Self {
            id,
            site_id,
            along_dist,
            properties,
            geometry: None,
        }
    }

    /// Set a numeric attribute; `None` stores an explicit null.
    pub fn with_attribute(mut self, field: &str, value: Option<f64>) -> Self {
        self.properties
            .insert(field.to_string(), Payload::from_option(value));
        self
    }

    /// Set any property, replacing an existing value in place.
    pub fn with_property(mut self, field: &str, value: Payload) -> Self {
        self.properties.insert(field.to_string(), value);
        self
    }

    pub fn with_geometry(mut self, geometry: Payload) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Numeric value of a named attribute. Missing, null, NaN and non-numeric
    /// properties all read as absent.
    pub fn attribute(&self, field: &str) -> Option<f64> {
        self.properties.get(field).and_then(Payload::as_f64)
    }

    /// The id as written, when it was a number rather than a string.
    fn numeric_id(&self) -> Option<f64> {
        match self.properties.get("id") {
            Some(Payload::Int(i)) => Some(*i as f64),
            Some(Payload::Float(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Site order: numeric ids by value, ahead of string ids in lexical order.
pub fn cmp_by_id(a: &Transect, b: &Transect) -> Ordering {
    match (a.numeric_id(), b.numeric_id()) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

/// Transects belonging to `site_id`, ordered by transect id.
pub fn transects_for_site(transects: &[Transect], site_id: &str) -> Vec<Transect> {
    let mut site: Vec<Transect> = transects
        .iter()
        .filter(|t| t.site_id == site_id)
        .cloned()
        .collect();
    site.sort_by(cmp_by_id);
    site
}

/// Distinct site ids in sorted order.
pub fn site_ids(transects: &[Transect]) -> Vec<String> {
    transects
        .iter()
        .map(|t| t.site_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup_treats_missing_and_null_alike() {
        let t = Transect::new("aus0001-0001", "aus0001", 0.0)
            .with_attribute("trend", Some(-0.4))
            .with_attribute("r2_score", None);
        assert_eq!(t.attribute("trend"), Some(-0.4));
        assert_eq!(t.attribute("r2_score"), None);
        assert_eq!(t.attribute("rmse"), None);
        assert_eq!(t.attribute("along_dist"), Some(0.0));
        assert_eq!(t.attribute("site_id"), None);
    }

    #[test]
    fn site_filter_sorts_by_id_not_input_order() {
        let all = vec![
            Transect::new("aus0001-0003", "aus0001", 200.0),
            Transect::new("aus0002-0001", "aus0002", 0.0),
            Transect::new("aus0001-0001", "aus0001", 0.0),
            Transect::new("aus0001-0002", "aus0001", 100.0),
        ];
        let site = transects_for_site(&all, "aus0001");
        let ids: Vec<&str> = site.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["aus0001-0001", "aus0001-0002", "aus0001-0003"]);
        assert!(transects_for_site(&all, "nzd0001").is_empty());
    }

    #[test]
    fn numeric_ids_sort_by_value() {
        let numbered = |n: i64, dist: f64| {
            Transect::new(n.to_string(), "aus0001", dist).with_property("id", Payload::Int(n))
        };
        let all = vec![numbered(10, 1000.0), numbered(9, 900.0), numbered(2, 200.0)];
        let site = transects_for_site(&all, "aus0001");
        let ids: Vec<&str> = site.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2", "9", "10"]);

        let mixed = vec![Transect::new("a-1", "aus0001", 0.0), numbered(10, 1000.0)];
        assert_eq!(transects_for_site(&mixed, "aus0001")[0].id, "10");
    }

    #[test]
    fn site_ids_are_distinct_and_sorted() {
        let all = vec![
            Transect::new("b-1", "b", 0.0),
            Transect::new("a-1", "a", 0.0),
            Transect::new("b-2", "b", 1.0),
        ];
        assert_eq!(site_ids(&all), ["a", "b"]);
    }
}
