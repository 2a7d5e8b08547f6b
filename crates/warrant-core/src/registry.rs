//! The policy registry: action name → decision function.
//!
//! The mapping is published copy-on-write through `ArcSwap`. Evaluations
//! load the current snapshot without taking a lock; `define` and `clear`
//! swap in a new map atomically, so a reader sees either the old binding or
//! the new one, never a partial update.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

use warrant_contracts::action::Action;

use crate::traits::Policy;

type Bindings = HashMap<Action, Arc<dyn Policy>>;

/// Holds exactly one policy per action.
///
/// One registry is owned per authorizer (shared via `Arc`), so independent
/// instances never see each other's registrations.
pub struct PolicyRegistry {
    bindings: ArcSwap<Bindings>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self {
            bindings: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Bind `policy` to `action`, replacing any previous binding.
    ///
    /// An empty action name is not an action; it is logged and ignored.
    pub fn define<P: Policy + 'static>(&self, action: &str, policy: P) {
        self.define_shared(action, Arc::new(policy));
    }

    /// Like [`define`](Self::define) for a policy that is already shared.
    pub fn define_shared(&self, action: &str, policy: Arc<dyn Policy>) {
        let action = match Action::new(action) {
            Ok(action) => action,
            Err(e) => {
                warn!(error = %e, "ignoring policy registration");
                return;
            }
        };

        let mut replaced = false;
        self.bindings.rcu(|current| {
            let mut next = Bindings::clone(current);
            replaced = next.insert(action.clone(), Arc::clone(&policy)).is_some();
            next
        });

        if replaced {
            debug!(action = %action, "policy redefined, previous binding replaced");
        } else {
            debug!(action = %action, "policy defined");
        }
    }

    /// Return the policy bound to `action`, if any.
    pub fn get(&self, action: &str) -> Option<Arc<dyn Policy>> {
        self.bindings.load().get(action).cloned()
    }

    pub fn contains(&self, action: &str) -> bool {
        self.bindings.load().contains_key(action)
    }

    pub fn len(&self) -> usize {
        self.bindings.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.load().is_empty()
    }

    /// All registered actions, sorted.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.bindings.load().keys().cloned().collect();
        actions.sort();
        actions
    }

    /// Remove every binding. Used to isolate test cases.
    pub fn clear(&self) {
        let previous = self.bindings.swap(Arc::new(HashMap::new()));
        info!(removed = previous.len(), "policy registry cleared");
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("actions", &self.actions())
            .finish()
    }
}
