//! # Tasklane Testing
//!
//! Testing utilities and helpers for the Tasklane architecture.
//!
//! This crate provides:
//! - Deterministic implementations of environment traits
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use tasklane_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TaskListReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TaskListState::new())
//!     .when_action(TaskAction::AddTask { title: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.count(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tasklane_core::environment::{Clock, IdSource};

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdSource, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use tasklane_testing::mocks::FixedClock;
    /// use tasklane_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Id source that hands out a scripted sequence, then counts up from the
    /// largest scripted value
    ///
    /// ```
    /// use tasklane_testing::mocks::ScriptedIds;
    /// use tasklane_core::environment::IdSource;
    ///
    /// let ids = ScriptedIds::new([7, 3]);
    /// assert_eq!(ids.next_id(), 7);
    /// assert_eq!(ids.next_id(), 3);
    /// assert_eq!(ids.next_id(), 8);
    /// ```
    #[derive(Debug)]
    pub struct ScriptedIds {
        inner: Mutex<(VecDeque<u64>, u64)>,
    }

    impl ScriptedIds {
        /// Create a source replaying `ids` in order
        #[must_use]
        pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
            let script: VecDeque<u64> = ids.into_iter().collect();
            let high = script.iter().copied().max().unwrap_or(0);
            Self {
                inner: Mutex::new((script, high)),
            }
        }
    }

    impl IdSource for ScriptedIds {
        fn next_id(&self) -> u64 {
            let mut guard = match self.inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let (script, high) = &mut *guard;
            if let Some(id) = script.pop_front() {
                id
            } else {
                *high += 1;
                *high
            }
        }
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, ScriptedIds};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_scripted_ids_fall_back_to_counting() {
        let ids = ScriptedIds::new([]);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }
}
