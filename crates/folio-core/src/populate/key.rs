//! Cache keys identifying a unique document load.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// A document id as it appears in a reference slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DocId {
    /// String id.
    Str(String),
    /// Integer id.
    Int(i64),
}

impl DocId {
    /// Normalize a raw JSON value into an id.
    ///
    /// Strings and integers pass through. Values with an obvious string
    /// form that are not structured (booleans, non-integer numbers) are
    /// stringified, which covers store-native id representations without
    /// coupling the engine to a specific store. Null and structured
    /// values do not normalize.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Str(n.to_string())),
            },
            Value::Bool(b) => Some(Self::Str(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The id as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
        }
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// Identity of one load: the full context for fetching a single target
/// document. Two loads share one fetch iff their keys are equal.
///
/// Keys live for one request; they are never persisted or reused across
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey {
    /// Transaction the read runs under.
    pub transaction_id: Option<String>,
    /// Target collection slug.
    pub collection: String,
    /// Target document id.
    pub id: DocId,
    /// Depth budget of the populate that issued the load.
    pub depth: u32,
    /// Depth the loaded document will be populated at.
    pub current_depth: u32,
    /// Locale selection (`"all"` or a locale code).
    pub locale: Option<String>,
    /// Fallback locale code.
    pub fallback_locale: Option<String>,
    /// Skip access control on the nested read.
    pub override_access: bool,
    /// Include hidden fields on the nested read.
    pub show_hidden_fields: bool,
}

impl LoadKey {
    /// Canonical string encoding, used as the in-flight map key.
    ///
    /// Fields encode as a JSON array in declaration order, so equal keys
    /// always produce the same string within one process.
    pub fn encode(&self) -> Result<String, Error> {
        serde_json::to_string(&(
            &self.transaction_id,
            &self.collection,
            &self.id,
            self.depth,
            self.current_depth,
            &self.locale,
            &self.fallback_locale,
            self.override_access,
            self.show_hidden_fields,
        ))
        .map_err(|e| Error::KeyEncoding(e.to_string()))
    }
}
