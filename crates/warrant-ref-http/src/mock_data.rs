//! Simulated identities and a simulated remote permission service.
//!
//! All data here is hardcoded and fictional. Nothing leaves the process.

use std::time::Duration;

use serde_json::{json, Value};

/// The identity the fake authentication middleware attaches to every request.
pub fn current_user() -> Value {
    json!({ "id": 1, "role": "user" })
}

pub fn admin_user() -> Value {
    json!({ "id": 99, "role": "admin" })
}

/// Ask the (simulated) remote permission service whether `role` may run
/// `action`.
///
/// Answers after a short delay, the way a network round-trip would. The
/// answer is untyped JSON; `report.export` deliberately comes back in the
/// wrong shape.
pub async fn remote_permission_check(role: &str, action: &str) -> Value {
    tokio::time::sleep(Duration::from_millis(20)).await;

    match (role, action) {
        ("admin", _) => json!({ "allow": true }),
        (_, "report.view") => json!(true),
        (_, "report.export") => json!("granted"),
        _ => json!({ "allow": false, "reason": format!("role '{}' may not {}", role, action) }),
    }
}
