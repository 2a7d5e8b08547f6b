//! # warrant-contracts
//!
//! Shared types and error contracts for the WARRANT authorization engine.
//!
//! Every crate in the workspace imports from here. No evaluation logic lives
//! in this crate, only data definitions and error types.

pub mod action;
pub mod context;
pub mod decision;
pub mod error;
pub mod outcome;

pub use action::Action;
pub use context::AuthorizationContext;
pub use decision::{Decision, DecisionResult, DecisionStage};
pub use error::{BoxError, WarrantError, WarrantResult};
pub use outcome::{EvaluationId, Outcome, FORBIDDEN_CODE};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── Action ───────────────────────────────────────────────────────────────

    #[test]
    fn action_rejects_empty_name() {
        match Action::new("") {
            Err(WarrantError::ConfigError { reason }) => {
                assert!(reason.contains("must not be empty"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn action_equality_is_exact() {
        let a = Action::new("user.read").unwrap();
        assert_eq!(a.as_str(), "user.read");
        assert_ne!(a, Action::new("User.Read").unwrap());
        assert_ne!(a, Action::new("user.read ").unwrap());
    }

    // ── AuthorizationContext::lookup ─────────────────────────────────────────

    fn sample_context() -> AuthorizationContext {
        AuthorizationContext::new()
            .with_user(json!({ "id": 1, "role": "user", "teams": ["ops", "billing"] }))
            .with_params(json!({ "id": "2" }))
            .with_headers(json!({ "x-tenant": null }))
            .with_extension("tenant", json!({ "plan": "enterprise" }))
    }

    #[test]
    fn lookup_resolves_standard_fields() {
        let ctx = sample_context();
        assert_eq!(ctx.lookup("user.id"), Some(&json!(1)));
        assert_eq!(ctx.lookup("params.id"), Some(&json!("2")));
        assert_eq!(ctx.lookup("user.teams.1"), Some(&json!("billing")));
    }

    #[test]
    fn lookup_falls_back_to_extensions() {
        let ctx = sample_context();
        assert_eq!(ctx.lookup("tenant.plan"), Some(&json!("enterprise")));
        assert_eq!(ctx.lookup("unknown.plan"), None);
    }

    #[test]
    fn lookup_treats_null_and_missing_alike() {
        let ctx = sample_context();
        assert_eq!(ctx.lookup("headers.x-tenant"), None);
        assert_eq!(ctx.lookup("user.email"), None);
        assert_eq!(ctx.lookup("body"), None);
        assert_eq!(ctx.lookup("user.role.name"), None);
    }

    // ── DecisionResult from JSON ─────────────────────────────────────────────

    #[test]
    fn decision_from_json_accepts_both_shapes() {
        assert_eq!(
            DecisionResult::try_from(json!(true)).unwrap(),
            DecisionResult::Bool(true)
        );
        assert_eq!(
            DecisionResult::try_from(json!({ "allow": false, "reason": "Forbidden" })).unwrap(),
            DecisionResult::deny_with("Forbidden")
        );
        assert_eq!(
            DecisionResult::try_from(json!({ "allow": true, "reason": null })).unwrap(),
            DecisionResult::allow()
        );
    }

    #[test]
    fn decision_from_json_rejects_other_shapes() {
        for bad in [
            json!("yes"),
            json!(1),
            json!(null),
            json!([true]),
            json!({ "reason": "no allow field" }),
            json!({ "allow": "true" }),
            json!({ "allow": false, "reason": 7 }),
            json!({ "allow": true, "ttl": 30 }),
        ] {
            match DecisionResult::try_from(bad.clone()) {
                Err(WarrantError::TypeMismatch { .. }) => {}
                other => panic!("expected TypeMismatch for {bad}, got {:?}", other),
            }
        }
    }

    #[test]
    fn structured_decision_serializes_without_empty_reason() {
        let json = serde_json::to_value(DecisionResult::allow()).unwrap();
        assert_eq!(json, json!({ "allow": true }));
        let json = serde_json::to_value(DecisionResult::Bool(false)).unwrap();
        assert_eq!(json, json!(false));
    }

    // ── Outcome ──────────────────────────────────────────────────────────────

    #[test]
    fn outcome_into_result_keeps_denial_and_fault_apart() {
        let action = Action::new("user.read").unwrap();

        assert!(Outcome::Proceed.into_result().is_ok());

        let denied = Outcome::Denied { action: action.clone(), reason: Some("Forbidden".into()) };
        match denied.into_result() {
            Err(e @ WarrantError::Forbidden { .. }) => {
                assert!(e.is_forbidden());
                assert!(e.to_string().contains("user.read"));
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }

        let missing = Outcome::PolicyMissing { action };
        assert!(missing.into_result().unwrap_err().is_forbidden());

        let fault = Outcome::Fault(WarrantError::ContextBuild { reason: "no user".into() });
        let err = fault.into_result().unwrap_err();
        assert!(!err.is_forbidden());
    }

    #[test]
    fn outcome_reason_only_for_denied() {
        let action = Action::new("user.read").unwrap();
        let denied = Outcome::Denied { action: action.clone(), reason: Some("nope".into()) };
        assert_eq!(denied.reason(), Some("nope"));
        assert!(denied.is_forbidden());
        assert_eq!(Outcome::PolicyMissing { action }.reason(), None);
        assert_eq!(Outcome::Proceed.reason(), None);
    }

    #[test]
    fn evaluation_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| EvaluationId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── WarrantError display messages ────────────────────────────────────────

    #[test]
    fn error_timeout_display() {
        let err = WarrantError::Timeout {
            action: "user.read".to_string(),
            stage: DecisionStage::Condition,
            elapsed_ms: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("condition"));
        assert!(msg.contains("user.read"));
        assert!(msg.contains("250ms"));
    }

    #[test]
    fn error_policy_failed_keeps_source() {
        let err = WarrantError::PolicyFailed {
            action: "user.read".to_string(),
            source: "permission service unreachable".into(),
        };
        assert!(err.to_string().contains("permission service unreachable"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
