//! Context bag - explicit context forwarding.
//!
//! Teleported content often depends on ambient values provided near its
//! origin (theme, locale, ids). Because the content renders at a distant
//! target, those values must travel with the record. A [`ContextBag`] is an
//! explicit, serializable key/value bag attached to a teleport at creation
//! time; targets read it from the record (or its view snapshot) and
//! re-provide the values on their side.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serializable key/value bag carried by each teleport record.
///
/// Values are JSON values, so anything the origin wants to forward must be
/// expressed as plain data rather than live references.
///
/// # Example
///
/// ```
/// use spark_teleport::ContextBag;
///
/// let ctx = ContextBag::new()
///     .with("theme", "dracula")
///     .with("columns", 3);
///
/// assert_eq!(ctx.get("theme").and_then(|v| v.as_str()), Some("dracula"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextBag {
    values: HashMap<String, Value>,
}

impl ContextBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for chaining at the creation site.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Remove a value, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl FromIterator<(String, Value)> for ContextBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
