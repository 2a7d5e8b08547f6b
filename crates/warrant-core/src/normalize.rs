//! Decision normalizer.
//!
//! Collapses the two accepted raw shapes into a `Decision`. Booleans never
//! carry a reason; structured results pass theirs through untouched. Whether
//! that reason is shown to anyone is the evaluator's call, not ours.

use serde_json::Value;

use warrant_contracts::{
    decision::{Decision, DecisionResult},
    error::WarrantResult,
};

pub fn normalize(raw: DecisionResult) -> Decision {
    match raw {
        DecisionResult::Bool(allowed) => Decision { allowed, reason: None },
        DecisionResult::Structured { allow, reason } => Decision {
            allowed: allow,
            reason,
        },
    }
}

/// Normalize a decision that arrived as untyped JSON.
///
/// Fails with `WarrantError::TypeMismatch` for anything other than a boolean
/// or an `{allow, reason}` object.
pub fn normalize_value(raw: Value) -> WarrantResult<Decision> {
    DecisionResult::try_from(raw).map(normalize)
}
