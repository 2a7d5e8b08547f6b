//! Scenario 2: Inline `when` conditions
//!
//! The global `user.read` policy lets anyone in, and the route narrows it
//! with a per-call condition: a caller may read their own record, admins
//! may read any record.
//!
//! Sub-case A: user 1 reads /users/1                  → 200
//! Sub-case B: user 1 reads /users/2                  → 403
//! Sub-case C: admin reads /users/2                   → 200
//! Sub-case D: global policy denies; the condition is
//!             never consulted                        → 403, 0 condition calls

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use warrant_contracts::{context::AuthorizationContext, decision::DecisionResult, error::WarrantResult};
use warrant_core::{
    authorizer::Authorizer,
    options::AuthorizeOptions,
    traits::{from_fn, Policy},
};

use super::{app, ok_handler, print_response, request_as};
use crate::{
    mock_data::{admin_user, current_user},
    request::HttpRequest,
    response::{authorize, HttpResponse, STATUS_FORBIDDEN, STATUS_OK},
};

pub const ACTION: &str = "user.read";

/// True when the caller's id equals the `:id` path segment.
pub fn is_self(ctx: &AuthorizationContext) -> bool {
    let user_id = ctx.lookup("user.id").and_then(Value::as_u64);
    let requested = ctx
        .lookup("params.id")
        .and_then(Value::as_str)
        .and_then(|id| id.parse::<u64>().ok());
    user_id.is_some() && user_id == requested
}

/// The route condition: self-access, or any access for admins.
pub fn self_or_admin() -> impl Policy {
    from_fn(|ctx: &AuthorizationContext| {
        if ctx.lookup("user.role").and_then(Value::as_str) == Some("admin") || is_self(ctx) {
            DecisionResult::allow()
        } else {
            DecisionResult::deny_with("users may only read their own record")
        }
    })
}

pub async fn read_user_as(
    authz: &Authorizer<HttpRequest>,
    options: &AuthorizeOptions,
    user: Value,
    id: u32,
) -> WarrantResult<HttpResponse> {
    let req = request_as(user, &format!("/users/{id}"), "/users/:id")?;
    Ok(authorize(authz, ACTION, options, &req, ok_handler).await)
}

/// Run Scenario 2: policy allows, condition decides.
pub async fn run_scenario() -> WarrantResult<()> {
    println!("=== Scenario 2: Inline when conditions ===");
    println!();

    let authz = app();
    authz.registry().define(ACTION, from_fn(|_| true));
    let options = AuthorizeOptions::new().explain(true).when(self_or_admin());

    let response = read_user_as(&authz, &options, current_user(), 1).await?;
    print_response("Sub-case A: user 1 reads /users/1", STATUS_OK, &response);

    let response = read_user_as(&authz, &options, current_user(), 2).await?;
    print_response("Sub-case B: user 1 reads /users/2", STATUS_FORBIDDEN, &response);

    let response = read_user_as(&authz, &options, admin_user(), 2).await?;
    print_response("Sub-case C: admin reads /users/2", STATUS_OK, &response);

    // ── Sub-case D: policy denial short-circuits the condition ────────────────

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let counting = AuthorizeOptions::new().when(from_fn(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    }));
    authz.registry().define(ACTION, from_fn(|_| false));

    let response = read_user_as(&authz, &counting, current_user(), 1).await?;
    print_response("Sub-case D: policy denies before the condition", STATUS_FORBIDDEN, &response);
    println!("    Condition calls: {}", calls.load(Ordering::SeqCst));
    println!();

    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use warrant_contracts::context::AuthorizationContext;
    use warrant_core::{options::AuthorizeOptions, traits::from_fn};

    use super::{is_self, read_user_as, self_or_admin, ACTION};
    use crate::{
        mock_data::{admin_user, current_user},
        response::{STATUS_FORBIDDEN, STATUS_OK},
        scenarios::app,
    };

    #[test]
    fn is_self_compares_numeric_id_with_path_segment() {
        let ctx = AuthorizationContext::new()
            .with_user(json!({ "id": 1 }))
            .with_params(json!({ "id": "1" }));
        assert!(is_self(&ctx));

        let other = ctx.clone().with_params(json!({ "id": "2" }));
        assert!(!is_self(&other));

        let anonymous = AuthorizationContext::new().with_params(json!({ "id": "1" }));
        assert!(!is_self(&anonymous));
    }

    #[tokio::test]
    async fn condition_decides_after_policy_allows() {
        let authz = app();
        authz.registry().define(ACTION, from_fn(|_| true));
        let options = AuthorizeOptions::new().when(self_or_admin());

        let own = read_user_as(&authz, &options, current_user(), 1).await.unwrap();
        assert_eq!(own.status, STATUS_OK);

        let other = read_user_as(&authz, &options, current_user(), 2).await.unwrap();
        assert_eq!(other.status, STATUS_FORBIDDEN);
        assert!(other.body.get("reason").is_none(), "reason hidden without explain");

        let admin = read_user_as(&authz, &options, admin_user(), 2).await.unwrap();
        assert_eq!(admin.status, STATUS_OK);
    }

    #[tokio::test]
    async fn explained_condition_denial_carries_reason() {
        let authz = app();
        authz.registry().define(ACTION, from_fn(|_| true));
        let options = AuthorizeOptions::new().explain(true).when(self_or_admin());

        let response = read_user_as(&authz, &options, current_user(), 2).await.unwrap();
        assert_eq!(response.status, STATUS_FORBIDDEN);
        assert_eq!(response.body["reason"], "users may only read their own record");
    }

    #[tokio::test]
    async fn condition_never_runs_after_policy_denial() {
        let authz = app();
        authz.registry().define(ACTION, from_fn(|_| false));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let options = AuthorizeOptions::new().when(from_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }));

        let response = read_user_as(&authz, &options, current_user(), 1).await.unwrap();
        assert_eq!(response.status, STATUS_FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn scenario_runs_to_completion() {
        super::run_scenario().await.unwrap();
    }
}
