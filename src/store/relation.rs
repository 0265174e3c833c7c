//! Identifier references between collections.
//!
//! Relation fields in the source JSON are loosely typed. The deserializers
//! here normalise them so a value of the wrong shape reads as "no relation"
//! instead of failing the whole load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a record, unique within its own collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Singular relation: only a string is a reference.
pub fn deserialize_reference<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(RecordId(id)),
        _ => None,
    })
}

/// List relation: `None` unless the field holds an array.
///
/// Elements that are not strings can never match an `_id` and are skipped.
pub fn deserialize_reference_list<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<RecordId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(id) => Some(RecordId(id)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
