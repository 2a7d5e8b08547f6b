//! Translating outcomes into HTTP responses.
//!
//! The mapping:
//!
//! | Outcome         | Status | Body                                        |
//! |-----------------|--------|---------------------------------------------|
//! | `Proceed`       | n/a    | handler runs                                |
//! | `Denied`        | 403    | `{"code":"E_FORBIDDEN","action",…,"reason"?}` |
//! | `PolicyMissing` | 403    | same, never with a reason                   |
//! | `Fault`         | 500    | `{"error":"SERVER_ERROR"}`                  |
//!
//! Fault details are logged, never sent to the client.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use warrant_contracts::outcome::{Outcome, FORBIDDEN_CODE};
use warrant_core::{authorizer::Authorizer, options::AuthorizeOptions};

use crate::request::HttpRequest;

pub const STATUS_OK: u16 = 200;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Message used when a denial carries no (exposed) reason.
const DEFAULT_DENIAL_MESSAGE: &str = "Access denied";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: STATUS_OK, body }
    }
}

/// Body of a 403 response.
#[derive(Debug, Clone, Serialize)]
pub struct ForbiddenBody {
    pub code: &'static str,
    pub action: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Map an outcome to a rejection, or `None` when the request may continue.
pub fn respond(outcome: &Outcome) -> Option<HttpResponse> {
    let forbidden = |action: String, reason: Option<String>| {
        let body = ForbiddenBody {
            code: FORBIDDEN_CODE,
            message: reason.clone().unwrap_or_else(|| DEFAULT_DENIAL_MESSAGE.to_string()),
            action,
            reason,
        };
        HttpResponse {
            status: STATUS_FORBIDDEN,
            body: serde_json::to_value(body).unwrap_or_else(|_| json!({ "code": FORBIDDEN_CODE })),
        }
    };

    match outcome {
        Outcome::Proceed => None,
        Outcome::Denied { action, reason } => Some(forbidden(action.to_string(), reason.clone())),
        Outcome::PolicyMissing { action } => {
            warn!(action = %action, "request to unprotected action rejected; register a policy for it");
            Some(forbidden(action.to_string(), None))
        }
        Outcome::Fault(err) => {
            error!(error = %err, "authorization fault");
            Some(HttpResponse {
                status: STATUS_SERVER_ERROR,
                body: json!({ "error": "SERVER_ERROR" }),
            })
        }
    }
}

/// Run `handler` only if `action` is authorized for `request`.
///
/// This is the reference "authorize middleware": evaluate, then either
/// reject or hand the request on.
pub async fn authorize<H>(
    authz: &Authorizer<HttpRequest>,
    action: &str,
    options: &AuthorizeOptions,
    request: &HttpRequest,
    handler: H,
) -> HttpResponse
where
    H: FnOnce(&HttpRequest) -> HttpResponse,
{
    let outcome = authz.evaluate(action, options, request).await;
    match respond(&outcome) {
        Some(rejection) => rejection,
        None => handler(request),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use warrant_contracts::{action::Action, error::WarrantError, outcome::Outcome};

    use super::{respond, STATUS_FORBIDDEN, STATUS_SERVER_ERROR};

    fn action() -> Action {
        Action::new("user.read").unwrap()
    }

    #[test]
    fn proceed_has_no_rejection() {
        assert!(respond(&Outcome::Proceed).is_none());
    }

    #[test]
    fn denial_with_reason_is_forbidden_with_body() {
        let rejection = respond(&Outcome::Denied {
            action: action(),
            reason: Some("Forbidden".to_string()),
        })
        .unwrap();

        assert_eq!(rejection.status, STATUS_FORBIDDEN);
        assert_eq!(
            rejection.body,
            json!({
                "code": "E_FORBIDDEN",
                "action": "user.read",
                "message": "Forbidden",
                "reason": "Forbidden"
            })
        );
    }

    #[test]
    fn silent_denial_and_missing_policy_share_generic_body() {
        let denied = respond(&Outcome::Denied { action: action(), reason: None }).unwrap();
        let missing = respond(&Outcome::PolicyMissing { action: action() }).unwrap();

        for rejection in [denied, missing] {
            assert_eq!(rejection.status, STATUS_FORBIDDEN);
            assert_eq!(rejection.body["message"], "Access denied");
            assert!(rejection.body.get("reason").is_none());
        }
    }

    #[test]
    fn fault_is_a_server_error_without_details() {
        let rejection = respond(&Outcome::Fault(WarrantError::ContextBuild {
            reason: "secret internal detail".to_string(),
        }))
        .unwrap();

        assert_eq!(rejection.status, STATUS_SERVER_ERROR);
        assert_eq!(rejection.body, json!({ "error": "SERVER_ERROR" }));
    }
}
