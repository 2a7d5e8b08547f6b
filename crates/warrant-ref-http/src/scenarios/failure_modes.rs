//! Scenario 4: Misconfiguration and operational failures
//!
//! Shows that nothing other than an explicit allow ever reaches the handler,
//! and that operational failures are reported as server errors rather than
//! as access denials.
//!
//! Sub-case A: route protected by an unregistered action     → 403
//! Sub-case B: request body is not valid JSON                → 500
//! Sub-case C: policy's backing store is unavailable         → 500
//! Sub-case D: client disconnects while the policy is pending → 500

use std::time::Duration;

use warrant_contracts::{
    context::AuthorizationContext,
    error::{BoxError, WarrantError, WarrantResult},
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
    response::{authorize, respond, HttpResponse, STATUS_FORBIDDEN, STATUS_SERVER_ERROR},
};

/// `POST /users` with a raw body.
pub async fn create_user(authz: &Authorizer<HttpRequest>, body: &str) -> HttpResponse {
    let req = HttpRequest::post("/users", body).with_user(current_user());
    authorize(authz, "user.create", &AuthorizeOptions::new(), &req, ok_handler).await
}

/// `GET /users/1/audit`, abandoned by the client after `patience`.
pub async fn read_audit_log_impatiently(
    authz: &Authorizer<HttpRequest>,
    patience: Duration,
) -> WarrantResult<HttpResponse> {
    let req = request_as(current_user(), "/users/1/audit", "/users/:id/audit")?;
    let outcome = authz
        .evaluate_until(
            "user.audit",
            &AuthorizeOptions::new(),
            &req,
            tokio::time::sleep(patience),
        )
        .await;
    Ok(respond(&outcome).unwrap_or_else(|| ok_handler(&req)))
}

/// An authorizer where `user.create` checks the payload and `user.audit`
/// depends on an unavailable store.
pub fn configured_app() -> Authorizer<HttpRequest> {
    let authz = app();
    authz
        .registry()
        .define("user.create", from_fn(|ctx: &AuthorizationContext| ctx.lookup("body.name").is_some()));
    authz.registry().define(
        "user.audit",
        from_async(|_ctx| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<bool, BoxError>(Box::new(WarrantError::ConfigError {
                reason: "audit store unavailable".to_string(),
            }))
        }),
    );
    authz
}

/// Run Scenario 4: every failure path stays closed.
pub async fn run_scenario() -> WarrantResult<()> {
    println!("=== Scenario 4: Misconfiguration and failures ===");
    println!();

    let authz = configured_app();

    let req = request_as(current_user(), "/users/1", "/users/:id")?;
    let response = authorize(&authz, "user.update", &AuthorizeOptions::new(), &req, ok_handler).await;
    print_response("Sub-case A: no policy registered for 'user.update'", STATUS_FORBIDDEN, &response);

    let response = create_user(&authz, "{\"name\": ").await;
    print_response("Sub-case B: malformed JSON body", STATUS_SERVER_ERROR, &response);

    let req = request_as(current_user(), "/users/1/audit", "/users/:id/audit")?;
    let response = authorize(&authz, "user.audit", &AuthorizeOptions::new(), &req, ok_handler).await;
    print_response("Sub-case C: policy store unavailable", STATUS_SERVER_ERROR, &response);

    let response = read_audit_log_impatiently(&authz, Duration::from_millis(10)).await?;
    print_response("Sub-case D: client gave up after 10ms", STATUS_SERVER_ERROR, &response);

    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
