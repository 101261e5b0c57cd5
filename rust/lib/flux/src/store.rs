use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace, warn};

use crate::action::Action;
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::FluxError;
use crate::reducer::{self, ReduceContext, Transition};
use crate::state::AppState;
use crate::trie::TopicTrie;

/// Callback type for slice change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &Arc<AppState>) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// The single owner of the current [`AppState`] snapshot.
///
/// - `dispatch(action)` applies one action and publishes the next snapshot.
/// - `dispatch_json(text)` does the same for an action encoded as JSON.
/// - `state()` returns the current snapshot (Arc clone, cheap).
/// - `subscribe(pattern, handler)` observes slice topics such as
///   `session/user` or `links/+`.
///
/// Dispatches are serialized: the write lock is held across reduce and swap,
/// so two producers never build on the same snapshot. Handlers run on the
/// dispatching thread after the lock is released and may dispatch again.
pub struct Store {
    state: RwLock<Arc<AppState>>,
    handlers: RwLock<TopicTrie<HandlerEntry>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl Store {
    /// Store with default config and the system clock.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let initial = AppState::with_routes(config.initial_routes.clone());
        Self {
            state: RwLock::new(Arc::new(initial)),
            handlers: RwLock::new(TopicTrie::new()),
            next_id: AtomicU64::new(1),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<AppState> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state)
    }

    /// Apply `action` and return the resulting snapshot.
    ///
    /// When nothing changes the returned `Arc` is the previous snapshot and
    /// no handler runs.
    pub fn dispatch(&self, action: Action) -> Arc<AppState> {
        if matches!(action, Action::Unknown) {
            warn!("flux: ignoring action with unknown type");
        }

        let transition = {
            let mut current = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let ctx = ReduceContext {
                now: self.clock.now(),
                toast_id_prefix: &self.config.toast_id_prefix,
            };
            let transition = reducer::reduce(&current, &action, &ctx);
            *current = Arc::clone(&transition.state);
            transition
        };

        if transition.is_noop() {
            trace!("flux: {} changed nothing", action.tag());
        } else {
            debug!("flux: {} changed {:?}", action.tag(), transition.changed);
            self.notify(&transition);
        }
        transition.state
    }

    /// Decode one JSON-encoded action and dispatch it.
    pub fn dispatch_json(&self, text: &str) -> Result<Arc<AppState>, FluxError> {
        let action: Action = serde_json::from_str(text).map_err(|e| {
            warn!("flux: rejected action payload: {}", e);
            FluxError::InvalidAction(e)
        })?;
        Ok(self.dispatch(action))
    }

    /// Register `handler` for every changed slice whose topic matches
    /// `pattern`. The handler receives the topic and the new snapshot.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> Result<SubscriptionId, FluxError>
    where
        F: Fn(&str, &Arc<AppState>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandlerEntry {
            id,
            handler: Arc::new(handler),
        };
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern, entry)?;
        debug!("flux: subscription {} on {}", id.0, pattern);
        Ok(id)
    }

    /// Remove a subscription. `pattern` must be the one it was registered
    /// with. Returns whether anything was removed.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        let removed = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(pattern, |entry| entry.id == id);
        removed > 0
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn notify(&self, transition: &Transition) {
        for &topic in &transition.changed {
            // Clone out of the lock so handlers can subscribe or unsubscribe.
            let entries: Vec<HandlerEntry> = self
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .matches(topic)
                .into_iter()
                .cloned()
                .collect();
            for entry in entries {
                (entry.handler)(topic, &transition.state);
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
