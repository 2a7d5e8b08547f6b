//! Turning transport requests into authorization contexts.
//!
//! Each authorizer owns one `ContextSlot` holding the active builder. The
//! builder can be replaced at any time and the swap takes effect for every
//! evaluation that has not yet built its context. It is meant to be set once
//! at startup; replacing it under live traffic gives no ordering guarantee
//! between in-flight requests.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;
use tracing::info;

use warrant_contracts::{context::AuthorizationContext, error::WarrantResult};

/// The pieces of a transport request the default builder knows how to read.
///
/// Adapters implement this for their framework's request type. Every method
/// defaults to `Null`; an error means the request is malformed and the
/// evaluation faults.
pub trait RequestParts {
    /// The authenticated identity attached upstream.
    fn identity(&self) -> WarrantResult<Value> {
        Ok(Value::Null)
    }

    fn path_params(&self) -> WarrantResult<Value> {
        Ok(Value::Null)
    }

    /// The decoded request body.
    fn payload(&self) -> WarrantResult<Value> {
        Ok(Value::Null)
    }

    fn query_params(&self) -> WarrantResult<Value> {
        Ok(Value::Null)
    }

    fn headers(&self) -> WarrantResult<Value> {
        Ok(Value::Null)
    }
}

/// Builds an `AuthorizationContext` from a request of type `R`.
///
/// Any `Fn(&R) -> WarrantResult<AuthorizationContext>` closure is a builder.
pub trait ContextBuilder<R>: Send + Sync {
    fn build(&self, request: &R) -> WarrantResult<AuthorizationContext>;
}

impl<R, F> ContextBuilder<R> for F
where
    F: Fn(&R) -> WarrantResult<AuthorizationContext> + Send + Sync,
{
    fn build(&self, request: &R) -> WarrantResult<AuthorizationContext> {
        self(request)
    }
}

/// Copies identity, path parameters, payload, query and headers verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContextBuilder;

impl<R: RequestParts> ContextBuilder<R> for DefaultContextBuilder {
    fn build(&self, request: &R) -> WarrantResult<AuthorizationContext> {
        Ok(AuthorizationContext::new()
            .with_user(request.identity()?)
            .with_params(request.path_params()?)
            .with_body(request.payload()?)
            .with_query(request.query_params()?)
            .with_headers(request.headers()?))
    }
}

/// The single active builder for one authorizer.
pub struct ContextSlot<R> {
    builder: ArcSwap<Box<dyn ContextBuilder<R>>>,
}

impl<R: 'static> ContextSlot<R> {
    pub fn new<B: ContextBuilder<R> + 'static>(builder: B) -> Self {
        let boxed: Box<dyn ContextBuilder<R>> = Box::new(builder);
        Self {
            builder: ArcSwap::from_pointee(boxed),
        }
    }

    /// Replace the active builder for all subsequent evaluations.
    pub fn set<B: ContextBuilder<R> + 'static>(&self, builder: B) {
        let boxed: Box<dyn ContextBuilder<R>> = Box::new(builder);
        self.builder.store(Arc::new(boxed));
        info!("context builder replaced");
    }

    /// Build a context with whichever builder is active right now.
    pub fn build(&self, request: &R) -> WarrantResult<AuthorizationContext> {
        self.builder.load().build(request)
    }
}

impl<R: RequestParts + 'static> Default for ContextSlot<R> {
    fn default() -> Self {
        Self::new(DefaultContextBuilder)
    }
}

impl<R> fmt::Debug for ContextSlot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSlot").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use warrant_contracts::{
        context::AuthorizationContext,
        error::{WarrantError, WarrantResult},
    };

    use super::{ContextSlot, RequestParts};

    struct FakeRequest {
        user: Value,
        id: &'static str,
        raw_body: &'static str,
    }

    impl RequestParts for FakeRequest {
        fn identity(&self) -> WarrantResult<Value> {
            Ok(self.user.clone())
        }

        fn path_params(&self) -> WarrantResult<Value> {
            Ok(json!({ "id": self.id }))
        }

        fn payload(&self) -> WarrantResult<Value> {
            if self.raw_body.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(self.raw_body).map_err(|e| WarrantError::ContextBuild {
                reason: format!("request body is not valid JSON: {}", e),
            })
        }
    }

    fn request(raw_body: &'static str) -> FakeRequest {
        FakeRequest {
            user: json!({ "id": 1, "role": "user" }),
            id: "7",
            raw_body,
        }
    }

    #[test]
    fn default_builder_copies_request_parts() {
        let slot: ContextSlot<FakeRequest> = ContextSlot::default();
        let ctx = slot.build(&request(r#"{"title":"draft"}"#)).unwrap();

        assert_eq!(ctx.lookup("user.id"), Some(&json!(1)));
        assert_eq!(ctx.lookup("params.id"), Some(&json!("7")));
        assert_eq!(ctx.lookup("body.title"), Some(&json!("draft")));
        assert_eq!(ctx.query, Value::Null);
        assert_eq!(ctx.headers, Value::Null);
    }

    #[test]
    fn malformed_request_surfaces_context_build_error() {
        let slot: ContextSlot<FakeRequest> = ContextSlot::default();

        match slot.build(&request("{not json")) {
            Err(WarrantError::ContextBuild { reason }) => {
                assert!(reason.contains("not valid JSON"), "unexpected reason: {reason}");
            }
            other => panic!("expected ContextBuild, got {:?}", other),
        }
    }

    #[test]
    fn replaced_builder_applies_to_next_build() {
        let slot: ContextSlot<FakeRequest> = ContextSlot::default();

        slot.set(|req: &FakeRequest| -> WarrantResult<AuthorizationContext> {
            Ok(AuthorizationContext::new()
                .with_user(req.user.clone())
                .with_extension("tenant", json!("acme")))
        });

        let ctx = slot.build(&request("")).unwrap();
        assert_eq!(ctx.lookup("tenant"), Some(&json!("acme")));
        assert_eq!(ctx.params, Value::Null, "custom builder omits params");
    }
}
