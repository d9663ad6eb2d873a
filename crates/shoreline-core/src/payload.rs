//! Opaque feature payloads and the JSON sanitizer.
//!
//! Transect properties and geometries are carried through zoning untouched and
//! only reduced to plain JSON when a report is serialised. The reduction is a
//! single total walk over [`Payload`]: NaN becomes `null`, infinities become
//! ±[`FINITE_SENTINEL`], geometry-like values shrink to `{type, coordinates}`
//! and anything that cannot be represented structurally falls back to text.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Number, Value};

use crate::ordered::OrderedMap;

/// Stand-in for ±infinity in serialised output.
pub const FINITE_SENTINEL: f64 = 1e308;

/// A feature property or geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Payload>),
    Map(OrderedMap<Payload>),
    /// Anything shaped like a GeoJSON geometry: a `type` tag plus `coordinates`.
    Geometry { kind: String, coordinates: Box<Payload> },
}

impl Payload {
    /// Numeric view of the payload. NaN counts as absent.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Payload::Int(i) => Some(i as f64),
            Payload::Float(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Payload::Null, Payload::Float)
    }

    /// Reduce to a JSON value. Never fails.
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Null => Value::Null,
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Int(i) => Value::from(*i),
            Payload::Float(v) => finite_json(*v),
            Payload::Text(s) => Value::String(s.clone()),
            Payload::List(items) => Value::Array(items.iter().map(Payload::to_json).collect()),
            Payload::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Payload::Geometry { kind, coordinates } => {
                if coordinates.is_coordinate_nest() {
                    json!({ "type": kind, "coordinates": coordinates.to_json() })
                } else {
                    Value::String(self.to_string())
                }
            }
        }
    }

    /// True for a list nesting whose leaves are all numbers.
    fn is_coordinate_nest(&self) -> bool {
        match self {
            Payload::List(items) => items.iter().all(|item| {
                matches!(item, Payload::Int(_) | Payload::Float(_)) || item.is_coordinate_nest()
            }),
            _ => false,
        }
    }

    /// An object becomes a geometry when it carries a string `type` and
    /// `coordinates`; any other members are dropped.
    fn from_entries(entries: OrderedMap<Payload>) -> Self {
        match (entries.get("type"), entries.get("coordinates")) {
            (Some(Payload::Text(kind)), Some(coordinates)) => Payload::Geometry {
                kind: kind.clone(),
                coordinates: Box::new(coordinates.clone()),
            },
            _ => Payload::Map(entries),
        }
    }
}

impl From<&Value> for Payload {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Payload::Int(i),
                None => Payload::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Payload::Text(s.clone()),
            Value::Array(items) => Payload::List(items.iter().map(Payload::from).collect()),
            Value::Object(map) => Payload::from_entries(
                map.iter()
                    .map(|(k, v)| (k.clone(), Payload::from(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => f.write_str("null"),
            Payload::Bool(b) => write!(f, "{b}"),
            Payload::Int(i) => write!(f, "{i}"),
            Payload::Float(v) => write!(f, "{v}"),
            Payload::Text(s) => write!(f, "{s:?}"),
            Payload::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Payload::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Payload::Geometry { kind, coordinates } => write!(f, "{kind}({coordinates})"),
        }
    }
}

/// Serialises the same tree as [`Payload::to_json`] but keeps object members
/// in input order.
impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Null => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Int(i) => serializer.serialize_i64(*i),
            Payload::Float(v) => serialize_f64(v, serializer),
            Payload::Text(s) => serializer.serialize_str(s),
            Payload::List(items) => items.serialize(serializer),
            Payload::Map(entries) => entries.serialize(serializer),
            Payload::Geometry { kind, coordinates } if coordinates.is_coordinate_nest() => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", kind)?;
                map.serialize_entry("coordinates", coordinates.as_ref())?;
                map.end()
            }
            Payload::Geometry { .. } => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Payload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Payload, E> {
        Ok(Payload::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Payload, E> {
        Ok(Payload::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Payload, D::Error> {
        Payload::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Payload, E> {
        Ok(Payload::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Payload, E> {
        Ok(Payload::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Payload, E> {
        Ok(i64::try_from(v).map_or(Payload::Float(v as f64), Payload::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Payload, E> {
        Ok(Payload::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Payload, E> {
        Ok(Payload::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Payload, E> {
        Ok(Payload::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Payload, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Payload::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Payload, A::Error> {
        let mut entries = OrderedMap::new();
        while let Some((k, v)) = access.next_entry::<String, Payload>()? {
            entries.insert(k, v);
        }
        Ok(Payload::from_entries(entries))
    }
}

// ── Float helpers ─────────────────────────────────────────────────────────────

/// Map a float onto something JSON can carry: NaN is absent, infinities clamp
/// to ±[`FINITE_SENTINEL`].
pub fn finite(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else if v.is_infinite() {
        Some(FINITE_SENTINEL.copysign(v))
    } else {
        Some(v)
    }
}

fn finite_json(v: f64) -> Value {
    finite(v)
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// `serialize_with` adapter for plain float fields.
pub(crate) fn serialize_f64<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match finite(*v) {
        Some(x) => serializer.serialize_f64(x),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` adapter for optional float fields.
pub(crate) fn serialize_opt_f64<S: Serializer>(
    v: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match v.and_then(finite) {
        Some(x) => serializer.serialize_f64(x),
        None => serializer.serialize_none(),
    }
}
