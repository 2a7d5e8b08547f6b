//! Decision results and the canonical decision type.
//!
//! Decision functions may answer with a bare boolean or with a structured
//! `{allow, reason}` value. The evaluator normalizes either shape into a
//! `Decision` immediately, so nothing downstream ever branches on the raw form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WarrantError;

/// The raw answer of a policy or condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecisionResult {
    /// `true` allows, `false` denies without a reason.
    Bool(bool),

    /// An explicit verdict. `reason` is only meaningful when `allow` is false.
    Structured {
        allow: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl DecisionResult {
    pub fn allow() -> Self {
        DecisionResult::Structured { allow: true, reason: None }
    }

    pub fn deny() -> Self {
        DecisionResult::Structured { allow: false, reason: None }
    }

    /// A denial carrying a human-readable reason.
    pub fn deny_with(reason: impl Into<String>) -> Self {
        DecisionResult::Structured {
            allow: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<bool> for DecisionResult {
    fn from(value: bool) -> Self {
        DecisionResult::Bool(value)
    }
}

impl From<Decision> for DecisionResult {
    fn from(decision: Decision) -> Self {
        DecisionResult::Structured {
            allow: decision.allowed,
            reason: decision.reason,
        }
    }
}

/// Strict conversion for decisions that arrive as JSON.
///
/// Accepts `true`, `false`, or an object with a boolean `allow` and an
/// optional string (or `null`) `reason`. Any other shape, including objects
/// with extra keys, is a `TypeMismatch`.
impl TryFrom<Value> for DecisionResult {
    type Error = WarrantError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(DecisionResult::Bool(b)),
            Value::Object(map) => {
                let allow = match map.get("allow") {
                    Some(Value::Bool(b)) => *b,
                    Some(other) => {
                        return Err(WarrantError::TypeMismatch {
                            found: format!("'allow' must be a boolean, got {}", other),
                        })
                    }
                    None => {
                        return Err(WarrantError::TypeMismatch {
                            found: "object without an 'allow' field".to_string(),
                        })
                    }
                };

                let reason = match map.get("reason") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => {
                        return Err(WarrantError::TypeMismatch {
                            found: format!("'reason' must be a string, got {}", other),
                        })
                    }
                };

                if let Some(extra) = map.keys().find(|k| *k != "allow" && *k != "reason") {
                    return Err(WarrantError::TypeMismatch {
                        found: format!("unexpected field '{}'", extra),
                    });
                }

                Ok(DecisionResult::Structured { allow, reason })
            }
            other => Err(WarrantError::TypeMismatch {
                found: other.to_string(),
            }),
        }
    }
}

/// The canonical, normalized decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<String>,
}

/// Which decision function an error or timeout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionStage {
    /// The policy registered for the action.
    Policy,
    /// The per-call `when` condition.
    Condition,
}

impl fmt::Display for DecisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStage::Policy => f.write_str("policy"),
            DecisionStage::Condition => f.write_str("condition"),
        }
    }
}
