//! # warrant-core
//!
//! The authorization decision pipeline for WARRANT.
//!
//! This crate provides:
//! - The `Policy` trait shared by registered policies and inline conditions
//! - `PolicyRegistry`, the action → policy mapping
//! - `ContextSlot` and the `ContextBuilder` / `RequestParts` seams
//! - The decision normalizer
//! - `Authorizer`, which wires them together in the correct order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warrant_core::{from_fn, AuthorizeOptions, Authorizer, PolicyRegistry};
//!
//! let registry = Arc::new(PolicyRegistry::new());
//! registry.define("user.read", from_fn(|_ctx| true));
//!
//! let authz: Authorizer<MyRequest> = Authorizer::new(Arc::clone(&registry));
//! let outcome = authz.evaluate("user.read", &AuthorizeOptions::new(), &request).await;
//! ```

pub mod authorizer;
pub mod config;
pub mod context;
pub mod normalize;
pub mod options;
pub mod registry;
pub mod traits;

pub use authorizer::Authorizer;
pub use config::AuthorizerConfig;
pub use context::{ContextBuilder, ContextSlot, DefaultContextBuilder, RequestParts};
pub use normalize::{normalize, normalize_value};
pub use options::AuthorizeOptions;
pub use registry::PolicyRegistry;
pub use traits::{from_async, from_fn, Policy};
