//! Store runtime for coordinating reducer execution and effect handling.

use crate::metrics::{
    counter, histogram, COMMANDS_TOTAL, EFFECTS_COUNT, EFFECTS_EXECUTED, REDUCER_DURATION,
    SHUTDOWN_REJECTED, SHUTDOWN_TIMEOUT,
};
use crate::{
    AtomicCounterGuard, DecrementGuard, EffectHandle, EffectTracking, StoreConfig, StoreError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tasklane_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{broadcast, watch, RwLock};

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock`; the reducer runs under the write lock, so
///    actions are applied one at a time, each to completion)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
/// 5. State snapshots for renderers (`subscribe_state`)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    config: StoreConfig,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Actions produced by effects, for observers waiting on outcomes
    action_broadcast: broadcast::Sender<A>,
    /// Latest state after every action that changed it
    state_broadcast: Arc<watch::Sender<S>>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Clone + PartialEq + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses [`StoreConfig::default`].
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let (state_broadcast, _) = watch::channel(initial_state.clone());

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
            state_broadcast: Arc::new(state_broadcast),
        }
    }

    /// The configuration this store was built with
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Publishes the new state to snapshot subscribers if it changed
    /// 4. Starts the returned effects; any action they yield is sent back here
    ///
    /// `send()` returns once the reducer has run and effects are started, not
    /// when they finish. Use the returned [`EffectHandle`] to wait for them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    ///
    /// # Panics
    ///
    /// If the reducer panics, the panic propagates to the caller.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
    where
        R: Clone,
        E: Clone,
    {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            counter!(SHUTDOWN_REJECTED).increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        tracing::debug!("Processing action");
        counter!(COMMANDS_TOTAL).increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

            // Published while still holding the lock so snapshots arrive in order
            let changed = self.state_broadcast.send_if_modified(|current| {
                if *current == *state {
                    false
                } else {
                    current.clone_from(&*state);
                    true
                }
            });

            tracing::trace!(changed, effects = effects.len(), "Reducer completed");

            // Note: Precision loss acceptable for metrics (effect counts < 2^52)
            #[allow(clippy::cast_precision_loss)]
            histogram!(EFFECTS_COUNT).record(effects.len() as f64);

            effects
        };

        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching action produced by its effects
    ///
    /// Subscribes to the action broadcast before sending, so a fast effect
    /// cannot be missed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: Timeout expired before a matching action arrived
    /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        R: Clone,
        E: Clone,
        F: Fn(&A) -> bool,
    {
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects
    ///
    /// Actions sent directly through [`Store::send`] are not broadcast.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Subscribe to state snapshots
    ///
    /// The receiver starts out holding the current state (marked as seen) and
    /// is notified only when an action actually changed the state. A snapshot
    /// is an owned copy, so later actions never alter it.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<S> {
        self.state_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let count = store.state(|s| s.count()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Owned copy of the current state
    pub async fn snapshot(&self) -> S {
        self.state(Clone::clone).await
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Rejects new actions, then waits for running effects to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
    /// pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                counter!(SHUTDOWN_TIMEOUT).increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tracing::debug!(pending_effects = pending, "Waiting for effects to complete");
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Graceful shutdown using the configured timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when [`StoreConfig::shutdown_timeout`] elapses.
    pub async fn shutdown_gracefully(&self) -> Result<(), StoreError> {
        self.shutdown(self.config.shutdown_timeout).await
    }

    /// Returns true once shutdown has been initiated
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Execute an effect with tracking
    ///
    /// - `None`: No-op
    /// - `Future`: Spawned; a resulting action is broadcast and sent back
    /// - `Parallel`: Each child executed with the same tracking
    ///
    /// Effect failures never halt the store. If a spawned effect panics the
    /// guards still release its tracking slots.
    #[allow(clippy::needless_pass_by_value)] // tracking is cloned per spawned effect
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
    where
        R: Clone,
        E: Clone,
    {
        match effect {
            Effect::None => {
                counter!(EFFECTS_EXECUTED, "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                counter!(EFFECTS_EXECUTED, "type" => "future").increment(1);
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let guard = DecrementGuard(tracking);
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = guard;
                    let _pending_guard = pending_guard;

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action, sending to store");

                        // No receivers is fine
                        let _ = store.action_broadcast.send(action.clone());

                        if let Err(error) = store.send(action).await {
                            tracing::warn!(%error, "Dropped feedback action");
                        }
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                });
            },
            Effect::Parallel(effects) => {
                counter!(EFFECTS_EXECUTED, "type" => "parallel").increment(1);
                for effect in effects {
                    self.execute_effect(effect, tracking.clone());
                }
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            config: self.config.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
            state_broadcast: Arc::clone(&self.state_broadcast),
        }
    }
}
