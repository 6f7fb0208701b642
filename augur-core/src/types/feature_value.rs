//! The heterogeneous feature value type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single extracted feature value.
///
/// Serializes untagged, so a feature map round-trips as plain JSON
/// (`{"tests_failed": 3, "branch": "main"}`), which is what the storage
/// layer persists and what downstream dataset builders consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FeatureValue>),
    Map(BTreeMap<String, FeatureValue>),
}

impl FeatureValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: integers coerce to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FeatureValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// The catalog data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Mixed,
            Self::Bool(_) => DataType::Boolean,
            Self::Int(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Text(_) => DataType::Text,
            Self::List(_) => DataType::List,
            Self::Map(_) => DataType::Map,
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for FeatureValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Catalog-level data type labels for exported feature descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Text,
    List,
    Map,
    /// Used when the declared default is `Null` and the concrete type is
    /// only known at extraction time.
    Mixed,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::List => "list",
            Self::Map => "map",
            Self::Mixed => "mixed",
        }
    }
}
