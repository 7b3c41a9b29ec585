//! Cache key serialization.

use serde_json::Value;
use std::fmt;

/// Deterministic string form of a canonical parameter set.
///
/// A compact JSON object with entries in canonical order, e.g.
/// `{"body":"f7f6f5","hair":"545454"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub(crate) fn from_entries<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut key = String::from("{");
        for (i, (slot, color)) in entries.enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&Value::from(slot).to_string());
            key.push(':');
            key.push_str(&Value::from(color).to_string());
        }
        key.push('}');
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
