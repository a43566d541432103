//! Cart mutation actions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single-unit change to a cart line.
///
/// Sent as the `type` query parameter of `PUT /cart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Increment,
    Decrement,
}

impl CartAction {
    /// Wire spelling of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
