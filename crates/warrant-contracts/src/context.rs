//! The authorization context handed to every decision function.
//!
//! The context is rebuilt for each evaluation and shared with the policy and
//! the inline condition behind an `Arc`, so decision functions can read it
//! but never mutate it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contextual facts a decision function may inspect.
///
/// The five named fields cover what an HTTP request usually carries. Anything
/// else a deployment wants to expose goes into `extensions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// The already-authenticated identity, or `Null` for anonymous requests.
    #[serde(default)]
    pub user: Value,
    /// Path parameters, e.g. `{"id": "1"}` for `/users/:id`.
    #[serde(default)]
    pub params: Value,
    /// The request payload.
    #[serde(default)]
    pub body: Value,
    /// Query-string parameters.
    #[serde(default)]
    pub query: Value,
    /// Request headers.
    #[serde(default)]
    pub headers: Value,
    /// Deployment-defined facts outside the five standard fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl AuthorizationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: Value) -> Self {
        self.user = user;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn with_headers(mut self, headers: Value) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Resolve a dotted path such as `"user.id"` or `"params.id"`.
    ///
    /// The first segment names one of the standard fields, or else an
    /// extension key. Later segments index into objects (by key) and arrays
    /// (by position). Missing and `null` values both resolve to `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let root = match segments.next()? {
            "user" => &self.user,
            "params" => &self.params,
            "body" => &self.body,
            "query" => &self.query,
            "headers" => &self.headers,
            other => self.extensions.get(other)?,
        };

        let mut current = root;
        for segment in segments {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(v) => current = v,
                None => return None,
            }
        }

        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }
}
