//! Error types for the task list.

use tasklane_runtime::StoreError;
use thiserror::Error;

/// A task with the same title is already in the list.
///
/// Raised by [`crate::list::TaskList::add`]; the reducer turns it into a
/// [`crate::notice::Notice`] instead of propagating it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("task already registered: {title:?}")]
pub struct DuplicateTitle {
    /// The rejected title
    pub title: String,
}

/// A line typed at the terminal could not be turned into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank input
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// A required argument is missing
    #[error("`{command}` needs {what}")]
    MissingArgument {
        /// Command that was typed
        command: &'static str,
        /// Description of the missing argument
        what: &'static str,
    },

    /// The id argument is not a number
    #[error("`{0}` is not a task id")]
    InvalidId(String),
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Expected a boolean such as `true` or `off`
    #[error("{key}: expected a boolean, got {value:?}")]
    InvalidBool {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },

    /// Expected a non-negative integer
    #[error("{key}: expected a number, got {value:?}")]
    InvalidNumber {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },

    /// Unknown id source name
    #[error("{key}: expected `sequential` or `clock`, got {value:?}")]
    InvalidIdSource {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}

/// Failure while running a terminal session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The store refused the action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing output failed
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON export failed
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
}
