//! Per-call evaluation options.

use std::fmt;
use std::sync::Arc;

use crate::{config::AuthorizerConfig, traits::Policy};

/// Options for a single `Authorizer::evaluate` call.
#[derive(Clone, Default)]
pub struct AuthorizeOptions {
    /// Expose the decision function's denial reason in the outcome.
    pub explain: bool,
    /// Extra condition, evaluated only after the registered policy allows.
    pub when: Option<Arc<dyn Policy>>,
}

impl AuthorizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose `explain` follows `explain_by_default`.
    pub fn from_config(config: &AuthorizerConfig) -> Self {
        Self {
            explain: config.explain_by_default,
            when: None,
        }
    }

    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn when<P: Policy + 'static>(mut self, condition: P) -> Self {
        self.when = Some(Arc::new(condition));
        self
    }
}

impl fmt::Debug for AuthorizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeOptions")
            .field("explain", &self.explain)
            .field("when", &self.when.is_some())
            .finish()
    }
}
