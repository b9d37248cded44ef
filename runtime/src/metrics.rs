//! Metric names and descriptions emitted by the Store.
//!
//! The runtime records through the `metrics` facade only. Whichever recorder
//! the host process installs (if any) receives the values; without one every
//! call is a no-op.

use metrics::{describe_counter, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total actions accepted by `Store::send`
pub const COMMANDS_TOTAL: &str = "store.commands.total";
/// Reducer wall time per action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
/// Effects returned per action
pub const EFFECTS_COUNT: &str = "store.effects.count";
/// Effects executed, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";
/// Actions rejected because the store was shutting down
pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";
/// Graceful shutdowns that timed out with effects still running
pub const SHUTDOWN_TIMEOUT: &str = "store.shutdown.timeout";

/// Register human-readable descriptions for every Store metric.
///
/// Call once after installing a recorder. Safe to call without one.
pub fn describe_store_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Actions processed by the store");
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent inside the reducer per action"
    );
    describe_histogram!(EFFECTS_COUNT, Unit::Count, "Effects returned per action");
    describe_counter!(EFFECTS_EXECUTED, Unit::Count, "Effects executed by type");
    describe_counter!(
        SHUTDOWN_REJECTED,
        Unit::Count,
        "Actions rejected during shutdown"
    );
    describe_counter!(
        SHUTDOWN_TIMEOUT,
        Unit::Count,
        "Shutdowns that gave up waiting for effects"
    );
}
