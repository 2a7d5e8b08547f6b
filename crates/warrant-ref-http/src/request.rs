//! An in-memory HTTP request.
//!
//! Stands in for a web framework's request type. Upstream middleware (the
//! "fake auth" in the scenarios) attaches `user`; routing fills `params`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use warrant_contracts::error::{WarrantError, WarrantResult};
use warrant_core::context::RequestParts;

#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    /// Header names are stored lowercased.
    pub headers: BTreeMap<String, String>,
    /// Raw body text, decoded as JSON when the context is built.
    pub body: Option<String>,
    /// Identity resolved by authentication middleware.
    pub user: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: &str, path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path, Map::new()),
        };
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            query,
            ..Self::default()
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: &str, body: &str) -> Self {
        Self::new("POST", path)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Match the path against an express-style pattern such as
    /// `/users/:id` and record the captured segments as path parameters.
    ///
    /// Returns `None` when the path does not fit the pattern.
    pub fn route(mut self, pattern: &str) -> Option<Self> {
        let expected: Vec<&str> = pattern.trim_matches('/').split('/').collect();
        let actual: Vec<&str> = self.path.trim_matches('/').split('/').collect();
        if expected.len() != actual.len() {
            return None;
        }

        let mut params = Map::new();
        for (want, got) in expected.iter().zip(&actual) {
            match want.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), Value::String(got.to_string()));
                }
                None if want == got => {}
                None => return None,
            }
        }

        self.params = params;
        Some(self)
    }
}

fn parse_query(raw: &str) -> Map<String, Value> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), Value::String(v.to_string())),
            None => (pair.to_string(), Value::String(String::new())),
        })
        .collect()
}

impl RequestParts for HttpRequest {
    fn identity(&self) -> WarrantResult<Value> {
        Ok(self.user.clone().unwrap_or(Value::Null))
    }

    fn path_params(&self) -> WarrantResult<Value> {
        Ok(Value::Object(self.params.clone()))
    }

    fn payload(&self) -> WarrantResult<Value> {
        match self.body.as_deref() {
            None | Some("") => Ok(Value::Null),
            Some(raw) => serde_json::from_str(raw).map_err(|e| WarrantError::ContextBuild {
                reason: format!("{} {}: request body is not valid JSON: {}", self.method, self.path, e),
            }),
        }
    }

    fn query_params(&self) -> WarrantResult<Value> {
        Ok(Value::Object(self.query.clone()))
    }

    fn headers(&self) -> WarrantResult<Value> {
        Ok(Value::Object(
            self.headers
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ))
    }
}
