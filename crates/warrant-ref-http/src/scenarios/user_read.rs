//! Scenario 1: Reading a user record
//!
//! One route, `GET /users/:id`, protected by the `user.read` policy. The
//! policy is redefined between sub-cases to show each decision shape:
//!
//! Sub-case A: policy returns `true`                        → 200
//! Sub-case B: policy returns `false`, explain on           → 403, no reason
//! Sub-case C: policy returns `{allow: false, "Forbidden"}` → 403 with reason
//!             when explained, 403 without it otherwise
//! Sub-case D: async policy that resolves after 10ms        → 200

use std::time::Duration;

use warrant_contracts::{
    decision::DecisionResult,
    error::{BoxError, WarrantResult},
};
use warrant_core::{
    authorizer::Authorizer,
    options::AuthorizeOptions,
    traits::{from_async, from_fn},
};

use super::{app, ok_handler, print_response, request_as};
use crate::{
    mock_data::current_user,
    request::HttpRequest,
    response::{authorize, HttpResponse, STATUS_FORBIDDEN, STATUS_OK},
};

pub const ACTION: &str = "user.read";

/// `GET /users/{id}` as the current user.
pub async fn read_user(
    authz: &Authorizer<HttpRequest>,
    options: &AuthorizeOptions,
    id: u32,
) -> WarrantResult<HttpResponse> {
    let req = request_as(current_user(), &format!("/users/{id}"), "/users/:id")?;
    Ok(authorize(authz, ACTION, options, &req, ok_handler).await)
}

/// Run Scenario 1: four policy shapes on the same route.
pub async fn run_scenario() -> WarrantResult<()> {
    println!("=== Scenario 1: Reading a user record ===");
    println!();

    let authz = app();
    let explain = AuthorizeOptions::new().explain(true);

    // ── Sub-case A: policy allows ─────────────────────────────────────────────

    authz.registry().define(ACTION, from_fn(|_| true));
    let response = read_user(&authz, &AuthorizeOptions::new(), 1).await?;
    print_response("Sub-case A: policy returns true", STATUS_OK, &response);

    // ── Sub-case B: policy denies with a bare boolean ─────────────────────────

    authz.registry().define(ACTION, from_fn(|_| false));
    let response = read_user(&authz, &explain, 1).await?;
    print_response(
        "Sub-case B: policy returns false (explain on, nothing to explain)",
        STATUS_FORBIDDEN,
        &response,
    );

    // ── Sub-case C: structured denial, with and without explain ───────────────

    authz
        .registry()
        .define(ACTION, from_fn(|_| DecisionResult::deny_with("Forbidden")));
    let response = read_user(&authz, &explain, 1).await?;
    print_response("Sub-case C1: structured denial, explain on", STATUS_FORBIDDEN, &response);
    let response = read_user(&authz, &AuthorizeOptions::new(), 1).await?;
    print_response("Sub-case C2: structured denial, explain off", STATUS_FORBIDDEN, &response);

    // ── Sub-case D: asynchronous policy ───────────────────────────────────────

    authz.registry().define(
        ACTION,
        from_async(|_ctx| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, BoxError>(true)
        }),
    );
    let response = read_user(&authz, &AuthorizeOptions::new(), 1).await?;
    print_response("Sub-case D: async policy resolving after 10ms", STATUS_OK, &response);

    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
