//! Action names.
//!
//! An action is the key a policy is registered under, e.g. `"user.read"`.
//! The only structural rule is that it is non-empty; equality is exact,
//! case-sensitive string comparison.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{WarrantError, WarrantResult};

/// A named, protectable operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Construct an action, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> WarrantResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(WarrantError::ConfigError {
                reason: "action name must not be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Action {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
