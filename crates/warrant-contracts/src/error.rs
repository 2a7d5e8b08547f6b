//! Error types for the WARRANT evaluation pipeline.
//!
//! Every fallible operation in WARRANT returns `WarrantResult<T>`. Variants
//! split into two families the adapter must never confuse:
//!
//! - `Forbidden` is a deliberate authorization decision (403-style).
//! - Everything else is an operational fault (500-style).

use thiserror::Error;

use crate::decision::DecisionStage;

/// A type-erased error raised by a user-supplied decision function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The unified error type for WARRANT.
#[derive(Debug, Error)]
pub enum WarrantError {
    /// The context builder could not turn the transport request into a context.
    #[error("failed to build authorization context: {reason}")]
    ContextBuild { reason: String },

    /// The policy bound to the action returned an error.
    #[error("policy for action '{action}' failed: {source}")]
    PolicyFailed {
        action: String,
        #[source]
        source: BoxError,
    },

    /// The inline `when` condition returned an error.
    #[error("condition for action '{action}' failed: {source}")]
    ConditionFailed {
        action: String,
        #[source]
        source: BoxError,
    },

    /// A decision function panicked while it was being awaited.
    #[error("{stage} for action '{action}' panicked")]
    DecisionPanicked { action: String, stage: DecisionStage },

    /// A dynamically typed decision result was neither a boolean nor an
    /// `{allow, reason}` object.
    #[error("decision result has unexpected shape: {found}")]
    TypeMismatch { found: String },

    /// A decision function did not resolve within the configured timeout.
    #[error("{stage} for action '{action}' timed out after {elapsed_ms}ms")]
    Timeout {
        action: String,
        stage: DecisionStage,
        elapsed_ms: u64,
    },

    /// The caller abandoned the evaluation before a decision was reached.
    #[error("evaluation of action '{action}' was cancelled")]
    Cancelled { action: String },

    /// Access to the action was refused, either by a decision function or
    /// because no policy is registered for it.
    #[error("access denied for action '{action}'")]
    Forbidden {
        action: String,
        reason: Option<String>,
    },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl WarrantError {
    /// True only for deliberate authorization refusals.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, WarrantError::Forbidden { .. })
    }
}

/// Convenience alias used throughout the WARRANT crates.
pub type WarrantResult<T> = Result<T, WarrantError>;
