//! Core types for component reconciliation

use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Attribute that carries a resource's natural identity.
pub const NAME: &str = "name";

/// Attribute that carries the server-assigned identifier.
pub const ID: &str = "id";

/// A typed attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl AttributeValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce a raw command-line value: booleans, then integers, then strings
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => raw
                .parse::<i64>()
                .map_or_else(|_| Self::String(raw.to_string()), Self::Integer),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Ordered mapping from attribute name to value
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a value, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// The natural identity key, if present and a string
    pub fn name(&self) -> Option<&str> {
        self.get(NAME).and_then(AttributeValue::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Server-assigned identifier of a remote record
///
/// Opaque to the engine: rendered verbatim as a path segment and echoed back
/// in update bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordId {
    Integer(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<RecordId> for AttributeValue {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Integer(i) => Self::Integer(i),
            RecordId::Text(s) => Self::String(s),
        }
    }
}

/// A resource as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRecord(serde_json::Map<String, serde_json::Value>);

impl RemoteRecord {
    /// The server-assigned id, if it is a string or an integer
    pub fn id(&self) -> Option<RecordId> {
        match self.0.get(ID)? {
            serde_json::Value::Number(n) => n.as_i64().map(RecordId::Integer),
            serde_json::Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME).and_then(serde_json::Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// Target state requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    #[default]
    Present,
    Absent,
}

impl TargetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(Error::config(format!(
                "unsupported state {other:?}, expected \"present\" or \"absent\""
            ))),
        }
    }
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Resource did not exist and was created
    Created(RemoteRecord),
    /// Resource existed and was updated; the record is the re-read one
    Updated(RemoteRecord),
    /// Resource existed and was deleted
    Deleted,
    /// Resource was already absent
    Noop,
}

impl Outcome {
    /// Whether the remote state was changed
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Noop)
    }

    pub fn record(&self) -> Option<&RemoteRecord> {
        match self {
            Self::Created(r) | Self::Updated(r) => Some(r),
            Self::Deleted | Self::Noop => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted => "deleted",
            Self::Noop => "noop",
        }
    }
}

/// Success surface handed back to command wrappers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RemoteRecord>,
}

impl From<Outcome> for Report {
    fn from(outcome: Outcome) -> Self {
        let changed = outcome.changed();
        let result = match outcome {
            Outcome::Created(r) | Outcome::Updated(r) => Some(r),
            Outcome::Deleted | Outcome::Noop => None,
        };
        Self { changed, result }
    }
}

/// Failure surface handed back to command wrappers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub changed: bool,
    pub failed: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: err.to_string(),
            phase: err.phase().map(|p| p.as_str()),
            status: err.status(),
            body: err.body().map(str::to_string),
        }
    }
}
