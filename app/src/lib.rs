//! Tasklane: a single to-do list behind a store.
//!
//! The list supports four operations:
//!
//! - Add a task (rejected with a notice if the title is already taken)
//! - Toggle a task's done flag
//! - Edit a task's title
//! - Remove a task, optionally after a confirmation dialog
//!
//! Unknown ids are silently ignored by every operation. The list itself is a
//! copy-on-write value: each change produces a new [`TaskList`] and older
//! snapshots stay valid.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklane::{AutoConfirm, RemovalPolicy, TaskAction, TaskEnvironment, TaskListReducer,
//!     TaskListState, TaskStore};
//! use tasklane_core::environment::SequentialIds;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TaskEnvironment::new(
//!     Arc::new(SequentialIds::new()),
//!     Arc::new(AutoConfirm),
//!     RemovalPolicy::Immediate,
//! );
//! let store = TaskStore::new(TaskListState::new(), TaskListReducer::new(), env);
//!
//! store.send(TaskAction::AddTask { title: "Buy milk".to_string() }).await?;
//!
//! let count = store.state(TaskListState::count).await;
//! println!("{count} task(s)");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod list;
pub mod notice;
pub mod prompter;
pub mod reducer;
pub mod render;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{CommandError, ConfigError, DuplicateTitle, SessionError};
pub use list::TaskList;
pub use notice::Notice;
pub use prompter::{AutoConfirm, Prompter};
pub use reducer::{RemovalPolicy, TaskEnvironment, TaskListReducer};
pub use types::{Task, TaskAction, TaskId, TaskListState};

/// Store specialised to the task list
pub type TaskStore =
    tasklane_runtime::Store<TaskListState, TaskAction, TaskEnvironment, TaskListReducer>;
