//! Evaluation outcomes.
//!
//! `Outcome` is what the evaluator hands back to the adapter. Adapters
//! pattern-match on it:
//! - `Proceed` → continue handling the request
//! - `Denied` / `PolicyMissing` → forbidden response
//! - `Fault` → generic server error, never a forbidden response

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    error::{WarrantError, WarrantResult},
};

/// Error code attached to forbidden responses.
pub const FORBIDDEN_CODE: &str = "E_FORBIDDEN";

/// Unique identifier for one evaluation, attached to its log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub uuid::Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Terminal result of one authorization evaluation.
#[derive(Debug)]
pub enum Outcome {
    /// Both the policy and the condition (if any) allowed the action.
    Proceed,

    /// The policy or the condition refused.
    Denied {
        action: Action,
        /// Present only when the caller asked for an explanation and the
        /// decision function supplied one.
        reason: Option<String>,
    },

    /// No policy is registered for the action. Always a denial.
    PolicyMissing { action: Action },

    /// Building the context or running a decision function failed.
    Fault(WarrantError),
}

impl Outcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Outcome::Proceed)
    }

    /// True for the two outcomes an adapter turns into a forbidden response.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Outcome::Denied { .. } | Outcome::PolicyMissing { .. })
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Fault(_))
    }

    /// The exposed denial reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Denied { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// Collapse into a `Result` for `?`-style adapters.
    ///
    /// Refusals become `WarrantError::Forbidden`; faults pass through as the
    /// original error.
    pub fn into_result(self) -> WarrantResult<()> {
        match self {
            Outcome::Proceed => Ok(()),
            Outcome::Denied { action, reason } => Err(WarrantError::Forbidden {
                action: action.to_string(),
                reason,
            }),
            Outcome::PolicyMissing { action } => Err(WarrantError::Forbidden {
                action: action.to_string(),
                reason: None,
            }),
            Outcome::Fault(err) => Err(err),
        }
    }
}
