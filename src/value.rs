// used to persist property bags as JSON blobs
use serde::{Deserialize, Serialize};

// used to print out readable forms of a value
use std::fmt;

// property bags are hashmaps with a fast hashing algo for string keys
use seahash::SeaHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use tracing::warn;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

/// A bag of named property values, as attached to events and profiles.
pub type Properties = HashMap<String, Value, OtherHasher>;

/// Pending numeric accumulators, keyed by property name.
pub type Increments = HashMap<String, i64, OtherHasher>;

/// The closed set of shapes a property value can take.
///
/// Every property bag in the crate is made of these and nothing else, so
/// merging and serialization are total. The serialized form is plain JSON
/// (untagged), which is also the persisted blob format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Map(Properties),
}

impl Value {
    /// Whether the value can be encoded as JSON. Non-finite doubles are the
    /// only inhabitants of the type that cannot.
    pub fn encodable(&self) -> bool {
        match self {
            Value::Double(d) => d.is_finite(),
            Value::Array(values) => values.iter().all(Value::encodable),
            Value::Map(map) => map.values().all(Value::encodable),
            _ => true,
        }
    }
}

/// Removes every key whose value cannot be encoded, logging each removal.
/// The remaining keys are kept, a single bad property never suppresses the
/// rest of the record.
pub fn retain_encodable(props: &mut Properties) {
    props.retain(|key, value| {
        let keep = value.encodable();
        if !keep {
            warn!(%key, "dropping property with unencodable value");
        }
        keep
    });
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("null"),
        }
    }
}

// ------------- Conversions -------------
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}
impl From<Properties> for Value {
    fn from(v: Properties) -> Self {
        Value::Map(v)
    }
}
impl From<&Increments> for Value {
    fn from(adds: &Increments) -> Self {
        let mut map = Properties::default();
        for (key, amount) in adds {
            map.insert(key.clone(), Value::Int(*amount));
        }
        Value::Map(map)
    }
}

// Interop with hosts that already speak serde_json. A JSON number that fits
// in an i64 becomes Int, anything else becomes Double.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Double(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(values) => {
                Value::Array(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut props = Properties::default();
                for (key, value) in map {
                    props.insert(key, Value::from(value));
                }
                Value::Map(props)
            }
        }
    }
}

// The lossy direction: a non-finite double has no JSON form and becomes null.
impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Double(d) => {
                serde_json::Number::from_f64(*d).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(values) => {
                serde_json::Value::Array(values.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), serde_json::Value::from(value));
                }
                serde_json::Value::Object(object)
            }
        }
    }
}
