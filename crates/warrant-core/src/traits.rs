//! Decision-function seam for the WARRANT pipeline.
//!
//! Policies and inline conditions share one trait, `Policy`. Both receive
//! the evaluation's context behind an `Arc` and answer with a raw
//! `DecisionResult`; the evaluator normalizes whatever they return.
//!
//! Implementations are treated as black boxes: they may await remote
//! permission services, take arbitrarily long, or fail. Any error they
//! return becomes a `Fault`, never a denial.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use warrant_contracts::{
    context::AuthorizationContext,
    decision::DecisionResult,
    error::BoxError,
};

/// A decision function: a registered policy or a per-call `when` condition.
#[async_trait]
pub trait Policy: Send + Sync {
    /// Decide whether the action described by `ctx` may proceed.
    ///
    /// Returning a `WarrantError` (boxed) surfaces that exact error as the
    /// evaluation's fault; any other error is wrapped as `PolicyFailed` or
    /// `ConditionFailed`.
    async fn decide(&self, ctx: Arc<AuthorizationContext>) -> Result<DecisionResult, BoxError>;
}

#[async_trait]
impl<P: Policy + ?Sized> Policy for Arc<P> {
    async fn decide(&self, ctx: Arc<AuthorizationContext>) -> Result<DecisionResult, BoxError> {
        (**self).decide(ctx).await
    }
}

/// A policy backed by a synchronous, infallible closure.
///
/// Built with [`from_fn`].
pub struct FnPolicy<F>(F);

#[async_trait]
impl<F, R> Policy for FnPolicy<F>
where
    F: Fn(&AuthorizationContext) -> R + Send + Sync,
    R: Into<DecisionResult>,
{
    async fn decide(&self, ctx: Arc<AuthorizationContext>) -> Result<DecisionResult, BoxError> {
        Ok((self.0)(ctx.as_ref()).into())
    }
}

/// A policy backed by an asynchronous, fallible closure.
///
/// Built with [`from_async`].
pub struct AsyncFnPolicy<F>(F);

#[async_trait]
impl<F, Fut, R, E> Policy for AsyncFnPolicy<F>
where
    F: Fn(Arc<AuthorizationContext>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send,
    R: Into<DecisionResult> + Send,
    E: Into<BoxError> + Send,
{
    async fn decide(&self, ctx: Arc<AuthorizationContext>) -> Result<DecisionResult, BoxError> {
        (self.0)(ctx).await.map(Into::into).map_err(Into::into)
    }
}

/// Wrap a synchronous closure returning a `bool`, a `Decision`, or a
/// `DecisionResult`.
///
/// ```rust,ignore
/// registry.define("user.read", from_fn(|_ctx| true));
/// ```
pub fn from_fn<F, R>(f: F) -> FnPolicy<F>
where
    F: Fn(&AuthorizationContext) -> R + Send + Sync,
    R: Into<DecisionResult>,
{
    FnPolicy(f)
}

/// Wrap an asynchronous closure that may fail.
///
/// ```rust,ignore
/// registry.define("doc.edit", from_async(|ctx| async move {
///     let acl = acl_service.fetch(&ctx.params).await?;
///     Ok::<_, BoxError>(acl.can_edit)
/// }));
/// ```
pub fn from_async<F, Fut, R, E>(f: F) -> AsyncFnPolicy<F>
where
    F: Fn(Arc<AuthorizationContext>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send,
    R: Into<DecisionResult> + Send,
    E: Into<BoxError> + Send,
{
    AsyncFnPolicy(f)
}
