//! User-facing notices.

use crate::error::DuplicateTitle;
use serde::{Deserialize, Serialize};

/// Informational message for the user. Not an error: the store has already
/// recovered by leaving its state untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// An add was rejected because a task with this title exists
    DuplicateTitle {
        /// The rejected title
        title: String,
    },
}

impl Notice {
    /// Short heading, as shown in a dialog title
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::DuplicateTitle { .. } => "Task already registered",
        }
    }

    /// Body text
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::DuplicateTitle { .. } => "You cannot register a task with the same name",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.heading(), self.message())
    }
}

impl From<DuplicateTitle> for Notice {
    fn from(err: DuplicateTitle) -> Self {
        Self::DuplicateTitle { title: err.title }
    }
}
