//! Value representations for the payload templating engine.
//!
//! Two trees live here:
//!
//! - [`RawValue`] is the declarative input handed to the compiler. It is
//!   decoded once at the system boundary from JSON, YAML or TOML.
//! - [`RenderedValue`] is the concrete output of a render call, ready to be
//!   serialized into a request body.

use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;

/// Errors raised while decoding foreign value trees into a [`RawValue`].
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// A mapping key that cannot be represented as a string
    #[error("Unsupported mapping key: {0}")]
    UnsupportedKey(String),
}

/// Untyped input tree, as produced by parsing a JSON/YAML/TOML document.
///
/// Mappings are ordered so that rendering with a seeded random source walks
/// keys in a stable order. Key order carries no meaning otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Template source text
    String(String),

    /// Ordered sequence of values
    Sequence(Vec<RawValue>),

    /// String-keyed mapping of values
    Mapping(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Decode a YAML value.
    ///
    /// Tags are unwrapped and scalar keys are stringified. Sequence or
    /// mapping keys have no string form and are rejected.
    pub fn from_yaml(yaml: &YamlValue) -> Result<Self, ValueError> {
        let value = match yaml {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::String(n.to_string())
                }
            }
            YamlValue::String(s) => Self::String(s.clone()),
            YamlValue::Sequence(seq) => Self::Sequence(
                seq.iter()
                    .map(Self::from_yaml)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            YamlValue::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(yaml_key(k)?, Self::from_yaml(v)?);
                }
                Self::Mapping(out)
            }
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value)?,
        };
        Ok(value)
    }
}

fn yaml_key(key: &YamlValue) -> Result<String, ValueError> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(&tagged.value),
        other => Err(ValueError::UnsupportedKey(format!("{other:?}"))),
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            Json::String(s) => Self::String(s),
            Json::Array(arr) => Self::Sequence(arr.into_iter().map(Self::from).collect()),
            Json::Object(obj) => {
                Self::Mapping(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl TryFrom<YamlValue> for RawValue {
    type Error = ValueError;

    fn try_from(yaml: YamlValue) -> Result<Self, Self::Error> {
        Self::from_yaml(&yaml)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Concrete value tree produced by a render call.
///
/// Mirrors [`RawValue`], with every template leaf resolved to a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Rendered string
    String(String),

    /// Ordered sequence of values
    Sequence(Vec<RenderedValue>),

    /// String-keyed mapping of values
    Mapping(BTreeMap<String, RenderedValue>),
}

impl RenderedValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a sequence.
    pub fn as_sequence(&self) -> Option<&Vec<RenderedValue>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Try to get this value as a mapping.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, RenderedValue>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&RenderedValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<RawValue> for RenderedValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Self::Null,
            RawValue::Bool(b) => Self::Bool(b),
            RawValue::Int(i) => Self::Int(i),
            RawValue::Float(f) => Self::Float(f),
            RawValue::String(s) => Self::String(s),
            RawValue::Sequence(seq) => Self::Sequence(seq.into_iter().map(Self::from).collect()),
            RawValue::Mapping(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<RenderedValue> for serde_json::Value {
    fn from(value: RenderedValue) -> Self {
        use serde_json::Value as Json;
        match value {
            RenderedValue::Null => Json::Null,
            RenderedValue::Bool(b) => Json::Bool(b),
            RenderedValue::Int(i) => Json::from(i),
            // JSON has no NaN or infinity
            RenderedValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            RenderedValue::String(s) => Json::String(s),
            RenderedValue::Sequence(seq) => Json::Array(seq.into_iter().map(Json::from).collect()),
            RenderedValue::Mapping(map) => {
                Json::Object(map.into_iter().map(|(k, v)| (k, Json::from(v))).collect())
            }
        }
    }
}
