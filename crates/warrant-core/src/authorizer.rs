//! The WARRANT authorizer: the two-stage evaluation pipeline.
//!
//!   Lookup → Context → Policy → [Condition] → Outcome
//!
//! The deny-by-default invariant is absolute: `Outcome::Proceed` is only
//! reachable after the registered policy allowed AND the inline condition
//! (when present) allowed. A missing policy, a denial, or any error on the
//! way ends the evaluation early with a non-proceed outcome.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info, warn};

use warrant_contracts::{
    action::Action,
    context::AuthorizationContext,
    decision::{Decision, DecisionStage},
    error::{BoxError, WarrantError, WarrantResult},
    outcome::{EvaluationId, Outcome},
};

use crate::{
    config::AuthorizerConfig,
    context::{ContextBuilder, ContextSlot, DefaultContextBuilder, RequestParts},
    normalize::normalize,
    options::AuthorizeOptions,
    registry::PolicyRegistry,
    traits::Policy,
};

/// Evaluates actions against a policy registry for requests of type `R`.
///
/// Construct one authorizer per service at startup. The registry is shared
/// through an `Arc` so registration code and the authorizer can both hold it;
/// the context builder slot is owned by the authorizer.
pub struct Authorizer<R> {
    registry: Arc<PolicyRegistry>,
    context: ContextSlot<R>,
    config: AuthorizerConfig,
}

impl<R: RequestParts + 'static> Authorizer<R> {
    /// Create an authorizer that uses the default context builder.
    pub fn new(registry: Arc<PolicyRegistry>) -> Self {
        Self::with_builder(registry, DefaultContextBuilder)
    }
}

impl<R: 'static> Authorizer<R> {
    /// Create an authorizer with a custom context builder.
    pub fn with_builder<B: ContextBuilder<R> + 'static>(
        registry: Arc<PolicyRegistry>,
        builder: B,
    ) -> Self {
        Self {
            registry,
            context: ContextSlot::new(builder),
            config: AuthorizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AuthorizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<PolicyRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &AuthorizerConfig {
        &self.config
    }

    /// Replace the context builder for all subsequent evaluations.
    pub fn set_context_builder<B: ContextBuilder<R> + 'static>(&self, builder: B) {
        self.context.set(builder);
    }

    /// Build a context with the active builder.
    pub fn build_context(&self, request: &R) -> WarrantResult<AuthorizationContext> {
        self.context.build(request)
    }

    /// Decide whether `action` may proceed for `request`.
    ///
    /// # Pipeline
    ///
    /// 1. Look up the policy for `action`; absent → `PolicyMissing`
    /// 2. Build the context; failure or panic → `Fault`
    /// 3. Await the policy and normalize:
    ///    - denied → `Denied` (the condition is never invoked)
    ///    - allowed → continue
    /// 4. If `options.when` is set, await it with the same context:
    ///    - denied → `Denied`
    ///    - allowed → `Proceed`
    ///
    /// Errors, panics and timeouts of either decision function yield
    /// `Fault`. Denial reasons are only kept when `options.explain` is set.
    pub async fn evaluate(&self, action: &str, options: &AuthorizeOptions, request: &R) -> Outcome {
        self.run(EvaluationId::new(), action, options, request).await
    }

    /// Like [`evaluate`](Self::evaluate), abandoned when `cancel` resolves first.
    ///
    /// The in-flight decision future is dropped and the outcome is
    /// `Fault(WarrantError::Cancelled)`.
    pub async fn evaluate_until<C>(
        &self,
        action: &str,
        options: &AuthorizeOptions,
        request: &R,
        cancel: C,
    ) -> Outcome
    where
        C: Future<Output = ()>,
    {
        let evaluation_id = EvaluationId::new();
        tokio::select! {
            biased;
            outcome = self.run(evaluation_id, action, options, request) => outcome,
            () = cancel => {
                warn!(
                    evaluation_id = %evaluation_id,
                    action = %action,
                    "evaluation cancelled before a decision was reached"
                );
                Outcome::Fault(WarrantError::Cancelled { action: action.to_string() })
            }
        }
    }

    async fn run(
        &self,
        evaluation_id: EvaluationId,
        action: &str,
        options: &AuthorizeOptions,
        request: &R,
    ) -> Outcome {
        debug!(
            evaluation_id = %evaluation_id,
            action = %action,
            explain = options.explain,
            has_condition = options.when.is_some(),
            "evaluation starting"
        );

        let action = match Action::new(action) {
            Ok(action) => action,
            Err(e) => {
                warn!(evaluation_id = %evaluation_id, error = %e, "evaluation rejected");
                return Outcome::Fault(e);
            }
        };

        // ── Step 1: Policy lookup ────────────────────────────────────────────
        let Some(policy) = self.registry.get(action.as_str()) else {
            warn!(
                evaluation_id = %evaluation_id,
                action = %action,
                "no policy registered for action; denying by default"
            );
            return Outcome::PolicyMissing { action };
        };

        // ── Step 2: Context ──────────────────────────────────────────────────
        //
        // The builder is caller-supplied; a panic in it is a fault like any
        // other build failure.
        let built = std::panic::catch_unwind(AssertUnwindSafe(|| self.context.build(request)))
            .unwrap_or_else(|_| {
                Err(WarrantError::ContextBuild {
                    reason: "context builder panicked".to_string(),
                })
            });
        let ctx = match built {
            Ok(ctx) => Arc::new(ctx),
            Err(e) => {
                warn!(
                    evaluation_id = %evaluation_id,
                    action = %action,
                    error = %e,
                    "context builder failed"
                );
                return Outcome::Fault(e);
            }
        };

        // ── Step 3: Registered policy ────────────────────────────────────────
        let decision = match self.decide(&action, DecisionStage::Policy, policy.as_ref(), &ctx).await {
            Ok(decision) => decision,
            Err(e) => return fault(evaluation_id, &action, e),
        };
        if !decision.allowed {
            return denied(evaluation_id, action, DecisionStage::Policy, decision, options.explain);
        }

        // ── Step 4: Inline condition ─────────────────────────────────────────
        //
        // Only reachable once the policy allowed.
        if let Some(condition) = &options.when {
            let decision = match self
                .decide(&action, DecisionStage::Condition, condition.as_ref(), &ctx)
                .await
            {
                Ok(decision) => decision,
                Err(e) => return fault(evaluation_id, &action, e),
            };
            if !decision.allowed {
                return denied(evaluation_id, action, DecisionStage::Condition, decision, options.explain);
            }
        }

        debug!(evaluation_id = %evaluation_id, action = %action, "action allowed");
        Outcome::Proceed
    }

    /// Await one decision function and normalize its answer.
    async fn decide(
        &self,
        action: &Action,
        stage: DecisionStage,
        decider: &dyn Policy,
        ctx: &Arc<AuthorizationContext>,
    ) -> WarrantResult<Decision> {
        let call = AssertUnwindSafe(decider.decide(Arc::clone(ctx))).catch_unwind();

        let settled = match self.config.decision_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(settled) => settled,
                Err(_) => {
                    return Err(WarrantError::Timeout {
                        action: action.to_string(),
                        stage,
                        elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => call.await,
        };

        match settled {
            Ok(Ok(raw)) => {
                let decision = normalize(raw);
                debug!(action = %action, stage = %stage, allowed = decision.allowed, "decision resolved");
                Ok(decision)
            }
            Ok(Err(source)) => Err(decision_error(action, stage, source)),
            Err(_) => Err(WarrantError::DecisionPanicked {
                action: action.to_string(),
                stage,
            }),
        }
    }
}

/// Map a decision function's error to the evaluation's fault.
///
/// A `WarrantError` raised by the function itself (e.g. `TypeMismatch` from a
/// JSON decision) is surfaced unchanged.
fn decision_error(action: &Action, stage: DecisionStage, source: BoxError) -> WarrantError {
    match source.downcast::<WarrantError>() {
        Ok(err) => *err,
        Err(source) => match stage {
            DecisionStage::Policy => WarrantError::PolicyFailed {
                action: action.to_string(),
                source,
            },
            DecisionStage::Condition => WarrantError::ConditionFailed {
                action: action.to_string(),
                source,
            },
        },
    }
}

fn denied(
    evaluation_id: EvaluationId,
    action: Action,
    stage: DecisionStage,
    decision: Decision,
    explain: bool,
) -> Outcome {
    info!(
        evaluation_id = %evaluation_id,
        action = %action,
        stage = %stage,
        explained = explain && decision.reason.is_some(),
        "action denied"
    );
    if let Some(reason) = &decision.reason {
        debug!(evaluation_id = %evaluation_id, reason = %reason, "denial reason");
    }

    Outcome::Denied {
        action,
        reason: if explain { decision.reason } else { None },
    }
}

fn fault(evaluation_id: EvaluationId, action: &Action, error: WarrantError) -> Outcome {
    warn!(
        evaluation_id = %evaluation_id,
        action = %action,
        error = %error,
        "evaluation faulted"
    );
    Outcome::Fault(error)
}

// ── Tests ────────────────────────────────────────────────────────────────────
