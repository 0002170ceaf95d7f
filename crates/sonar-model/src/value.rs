//! Cell values for flattened records.

use chrono::{DateTime, Utc};

/// A single flattened cell value.
///
/// Arrays stay ordered sequences of strings; they are loaded as `TEXT[]`
/// columns and never flattened further.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Text(String),
    Bool(bool),
    Float(f64),
    Timestamp(DateTime<Utc>),
    TextArray(Vec<String>),
    Null,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for `Null` and for the empty string, the two shapes a primary
    /// key column must never contain.
    pub fn is_missing_key(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}
