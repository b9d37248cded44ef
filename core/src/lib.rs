//! # Tasklane Core
//!
//! Core traits and types for the Tasklane architecture.
//!
//! Tasklane keeps all state transitions in one place: a reducer receives the
//! current state, an action and its injected dependencies, mutates the state
//! and returns descriptions of any side effects. The runtime crate executes
//! those descriptions; nothing in this crate performs I/O.
//!
//! ## Core Concepts
//!
//! - **State**: Owned domain data for a feature
//! - **Action**: Every input a reducer accepts (commands and the events they produce)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of work for the runtime, never the work itself
//! - **Environment**: Dependencies injected behind traits (`Clock`, `IdSource`, ...)
//!
//! ## Example
//!
//! ```
//! use tasklane_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Tally {
//!     value: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum TallyAction {
//!     Bump,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Tally,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Bump => state.value += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Tally::default();
//! let effects = TallyReducer.reduce(&mut state, TallyAction::Bump, &());
//! assert_eq!(state.value, 1);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are deterministic: given the same state, action and environment
/// they make the same change and return the same effect descriptions.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Most reducers return no effects, so the return type keeps up to four
    /// effects inline without allocating.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effect descriptions for the runtime to execute
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values. A reducer returns them, the runtime runs them, and any
/// action they yield is fed back into the reducer.
pub mod effect {
    use futures::future::BoxFuture;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Returns true if running this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Anything a reducer would otherwise read from the outside world (time,
/// fresh identifiers) is reached through these traits so tests can pin it.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh numeric identifiers
    ///
    /// Every call returns a value no earlier call on the same source returned.
    pub trait IdSource: Send + Sync {
        /// Draw the next identifier
        fn next_id(&self) -> u64;
    }

    /// Monotonic counter starting at 1
    #[derive(Debug)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a counter whose first id is 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Create a counter whose first id is `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdSource for SequentialIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }

    /// Millisecond-timestamp identifiers
    ///
    /// Ids follow the clock, but two draws within the same millisecond (or a
    /// clock that steps backwards) still yield strictly increasing values.
    pub struct ClockIds {
        clock: Arc<dyn Clock>,
        last: AtomicU64,
    }

    impl ClockIds {
        /// Create an id source reading from `clock`
        #[must_use]
        pub fn new(clock: Arc<dyn Clock>) -> Self {
            Self {
                clock,
                last: AtomicU64::new(0),
            }
        }
    }

    impl std::fmt::Debug for ClockIds {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ClockIds")
                .field("last", &self.last.load(Ordering::SeqCst))
                .finish_non_exhaustive()
        }
    }

    impl IdSource for ClockIds {
        fn next_id(&self) -> u64 {
            // Pre-epoch clocks clamp to zero and fall back to the counter
            let candidate = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
            let previous = self
                .last
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                    Some(candidate.max(last.saturating_add(1)))
                })
                .unwrap_or_else(|last| last);
            candidate.max(previous.saturating_add(1))
        }
    }
}
