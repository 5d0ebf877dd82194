//! Scientific metadata attached to datasets.
//!
//! DataFlow stores metadata as a flat list of `field_name`/`field_value`
//! records, while instruments usually produce nested structures. [`flatten`]
//! collapses a nested [`Metadata`] tree into a single-level map whose keys
//! join the path of parent keys with a separator.

use crate::{
    error::{DataFlowError, DataFlowResult},
    models::MetadataFieldValue,
};
use serde_json::{Map, Value};

/// Default separator between keys of different nesting levels
pub const DEFAULT_SEPARATOR: char = '-';

/// A metadata value as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    /// Non-finite values have no JSON form and are dropped like bytes
    Float(f64),
    String(String),
    /// Raw bytes are never sent to the server
    Bytes(Vec<u8>),
    List(Vec<MetadataValue>),
    Map(Metadata),
}

/// Insertion-ordered mapping of metadata keys to values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Option<MetadataValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interpret an optional JSON value passed as dataset metadata.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`, `[]`) mean "no metadata".
    /// An object becomes [`Metadata`]; any other value is rejected.
    pub fn from_json_option(value: &Value) -> DataFlowResult<Option<Self>> {
        match value {
            Value::Object(map) => Ok(Some(Self::from(map.clone()))),
            v if is_falsy(v) => Ok(None),
            _ => Err(DataFlowError::invalid_type("metadata should be a dict")),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Value> for MetadataValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(Metadata::from(map)),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for MetadataValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u64> for MetadataValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::UInt(v),
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for MetadataValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(v: Vec<MetadataValue>) -> Self {
        Self::List(v)
    }
}

impl From<Metadata> for MetadataValue {
    fn from(v: Metadata) -> Self {
        Self::Map(v)
    }
}

impl MetadataValue {
    /// JSON form of this value; `None` for bytes and non-finite floats,
    /// which have no JSON form. Such values nested inside lists or maps are
    /// dropped.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Integer(i) => Some(Value::from(*i)),
            Self::UInt(u) => Some(Value::from(*u)),
            Self::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Bytes(_) => None,
            Self::List(items) => Some(Value::Array(
                items.iter().filter_map(MetadataValue::to_json).collect(),
            )),
            Self::Map(map) => Some(Value::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|v| (k.to_string(), v)))
                    .collect(),
            )),
        }
    }
}

/// Character substituted for `separator` inside keys
fn replacement_for(separator: char) -> char {
    if separator == '-' {
        '_'
    } else {
        '-'
    }
}

/// Flatten nested metadata into a single-level, insertion-ordered map.
///
/// * nested maps are joined as `parent<sep>child`
/// * a separator occurring inside a key is replaced so joined keys stay
///   unambiguous (`-` becomes `_`, any other separator becomes `-`)
/// * a list of maps yields one `dim-<key>-<index>` entry per inner key
/// * byte values are dropped
///
/// A key produced twice keeps its first position and its last value.
pub fn flatten(metadata: &Metadata, separator: char) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, metadata, separator, None);
    flat
}

fn flatten_into(flat: &mut Map<String, Value>, metadata: &Metadata, sep: char, parent: Option<&str>) {
    let repl = replacement_for(sep);

    for (key, value) in metadata.iter() {
        let key = key.replace(sep, &repl.to_string());
        let new_key = match parent {
            Some(parent) => format!("{}{}{}", parent, sep, key),
            None => key,
        };

        match value {
            MetadataValue::Map(child) => flatten_into(flat, child, sep, Some(new_key.as_str())),
            MetadataValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    match item {
                        MetadataValue::Map(record) => {
                            for (inner_key, inner_value) in record.iter() {
                                if let Some(v) = inner_value.to_json() {
                                    flat.insert(format!("dim-{}-{}", inner_key, index), v);
                                }
                            }
                        }
                        _ => {
                            if let Some(v) = value.to_json() {
                                flat.insert(new_key.clone(), v);
                            }
                        }
                    }
                }
            }
            MetadataValue::Bytes(_) => {}
            leaf => {
                if let Some(v) = leaf.to_json() {
                    flat.insert(new_key, v);
                }
            }
        }
    }
}

/// Convert a flat metadata map into the record list DataFlow expects
pub fn to_field_values(flat: Map<String, Value>) -> Vec<MetadataFieldValue> {
    flat.into_iter()
        .map(|(field_name, field_value)| MetadataFieldValue {
            field_name,
            field_value,
        })
        .collect()
}
