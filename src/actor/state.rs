//! Per-actor key-value state
//!
//! Each actor owns one [`ActorState`]: a string-to-string map with
//! last-write-wins semantics and deterministic iteration order. Lookup
//! misses are reported as `None`; the default substitution (`"0"`) belongs
//! to the evaluator, not the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered mapping from state key to value, owned by one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    entries: BTreeMap<String, String>,
}

impl ActorState {
    /// Create an empty state store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value, overwriting any existing entry for the key.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Read a value; `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in deterministic (key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for ActorState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
