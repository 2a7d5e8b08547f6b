//! Runnable reference scenarios.
//!
//! Each scenario wires a real `Authorizer` to the in-memory HTTP adapter and
//! walks through a handful of requests, printing what the client would see.

pub mod failure_modes;
pub mod remote_check;
pub mod self_access;
pub mod user_read;

use std::sync::Arc;

use serde_json::{json, Value};

use warrant_contracts::error::{WarrantError, WarrantResult};
use warrant_core::{authorizer::Authorizer, registry::PolicyRegistry};

use crate::{request::HttpRequest, response::HttpResponse};

/// A fresh authorizer with an empty registry and the default context builder.
pub fn app() -> Authorizer<HttpRequest> {
    Authorizer::new(Arc::new(PolicyRegistry::new()))
}

/// Build a GET request for `path` as `user`, routed through `pattern`.
pub fn request_as(user: Value, path: &str, pattern: &str) -> WarrantResult<HttpRequest> {
    HttpRequest::get(path)
        .with_user(user)
        .route(pattern)
        .ok_or_else(|| WarrantError::ConfigError {
            reason: format!("path '{}' does not match route '{}'", path, pattern),
        })
}

/// The handler behind every protected route.
pub fn ok_handler(_req: &HttpRequest) -> HttpResponse {
    HttpResponse::ok(json!({ "ok": true }))
}

fn print_response(label: &str, expected: u16, response: &HttpResponse) {
    println!("  {label}");
    println!("    Status:   {}", response.status);
    println!("    Body:     {}", response.body);
    if response.status == expected {
        println!("    RESULT:   {} (expected)", response.status);
    } else {
        println!("    RESULT:   UNEXPECTED, wanted {}", expected);
    }
    println!();
}
