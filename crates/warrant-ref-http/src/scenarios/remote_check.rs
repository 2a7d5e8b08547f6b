//! Scenario 3: Delegating to a remote permission service
//!
//! Every `report.*` action is bound to a policy that asks the (simulated)
//! permission service and trusts its JSON answer only if it has one of the
//! two accepted shapes.
//!
//! Sub-case A: user views a report                    → 200
//! Sub-case B: user deletes a report (explained)      → 403 with reason
//! Sub-case C: service answers `"granted"` for export → 500 (type mismatch)
//! Sub-case D: admin exports                          → 200
//! Sub-case E: 5ms decision timeout configured        → 500 (timeout)

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use warrant_contracts::{
    context::AuthorizationContext,
    decision::DecisionResult,
    error::WarrantResult,
};
use warrant_core::{
    authorizer::Authorizer,
    config::AuthorizerConfig,
    options::AuthorizeOptions,
    traits::{from_async, Policy},
};

use super::{app, ok_handler, print_response, request_as};
use crate::{
    mock_data::{admin_user, current_user, remote_permission_check},
    request::HttpRequest,
    response::{authorize, HttpResponse, STATUS_FORBIDDEN, STATUS_OK, STATUS_SERVER_ERROR},
};

pub const ACTIONS: [&str; 3] = ["report.view", "report.delete", "report.export"];

/// A policy that forwards the decision for `action` to the remote service.
pub fn remote_policy(action: &'static str) -> impl Policy {
    from_async(move |ctx: Arc<AuthorizationContext>| async move {
        let role = ctx
            .lookup("user.role")
            .and_then(Value::as_str)
            .unwrap_or("anonymous")
            .to_string();
        let answer = remote_permission_check(&role, action).await;
        DecisionResult::try_from(answer)
    })
}

/// Register the remote-backed policies on `authz`.
pub fn install(authz: &Authorizer<HttpRequest>) {
    for action in ACTIONS {
        authz.registry().define(action, remote_policy(action));
    }
}

pub async fn call(
    authz: &Authorizer<HttpRequest>,
    user: Value,
    action: &str,
) -> WarrantResult<HttpResponse> {
    let req = request_as(user, "/reports/q3", "/reports/:id")?;
    let options = AuthorizeOptions::new().explain(true);
    Ok(authorize(authz, action, &options, &req, ok_handler).await)
}

/// Run Scenario 3: remote decisions, strict shapes, bounded latency.
pub async fn run_scenario() -> WarrantResult<()> {
    println!("=== Scenario 3: Remote permission service ===");
    println!();

    let authz = app();
    install(&authz);

    let response = call(&authz, current_user(), "report.view").await?;
    print_response("Sub-case A: user views a report", STATUS_OK, &response);

    let response = call(&authz, current_user(), "report.delete").await?;
    print_response("Sub-case B: user deletes a report", STATUS_FORBIDDEN, &response);

    let response = call(&authz, current_user(), "report.export").await?;
    print_response(
        "Sub-case C: service answers with a bare string",
        STATUS_SERVER_ERROR,
        &response,
    );

    let response = call(&authz, admin_user(), "report.export").await?;
    print_response("Sub-case D: admin exports a report", STATUS_OK, &response);

    // ── Sub-case E: the service is slower than we are willing to wait ────────

    let impatient = app()
        .with_config(AuthorizerConfig::default().with_decision_timeout(Duration::from_millis(5))?);
    install(&impatient);
    let response = call(&impatient, current_user(), "report.view").await?;
    print_response("Sub-case E: 5ms decision timeout", STATUS_SERVER_ERROR, &response);

    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
