//! Product identifiers.
//!
//! The mobiles API assigns identifiers server-side and stores them under the
//! `_id` key. Depending on the backing store they arrive either as strings
//! (document ids) or as plain integers, so [`ProductId`] keeps whichever form
//! the server sent. Records are echoed back to the API unchanged, which means
//! the original JSON type must survive a round trip.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier, e.g. `1`.
    Number(u64),
    /// String identifier, e.g. `"64b7f0c2e4a1b2c3d4e5f601"`.
    Text(String),
}

impl ProductId {
    /// Returns true if this id renders as `key`.
    ///
    /// Form fields and CLI arguments carry ids as plain text, so lookups
    /// compare on the rendered form rather than the JSON type.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Number(n) => key.parse::<u64>().is_ok_and(|k| k == *n),
            Self::Text(s) => s == key,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}
