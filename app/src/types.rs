//! Domain types for the task list.
//!
//! A single ordered list of tasks. Each task has a numeric id, a title and a
//! done flag; the list is the only place tasks live.

use crate::list::TaskList;
use crate::notice::Notice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tasklane_macros::Action;

/// Unique identifier for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    /// Accepts `7` as well as `#7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        digits.parse().map(Self)
    }
}

/// A single to-do entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What needs doing
    pub title: String,
    /// Whether the task is completed
    pub done: bool,
}

impl Task {
    /// Creates a new, not yet done task
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// State of the task list store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListState {
    /// All tasks, in the order they were added
    pub tasks: TaskList,
    /// Most recent user-facing notice, until dismissed or a task is added
    pub last_notice: Option<Notice>,
    /// Tasks waiting on a removal confirmation
    pub pending_removals: BTreeSet<TaskId>,
}

impl TaskListState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `tasks`
    #[must_use]
    pub fn with_tasks(tasks: TaskList) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Number of tasks (shown in the header)
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of tasks marked done
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.completed_count()
    }

    /// Returns a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Returns true while a removal of `id` awaits confirmation
    #[must_use]
    pub fn is_removal_pending(&self, id: TaskId) -> bool {
        self.pending_removals.contains(&id)
    }
}

/// Actions representing commands and events for the task list
///
/// Commands come from user input and are validated by the reducer. Events
/// describe what changed; applying the same events in order to the same
/// starting state always yields the same list.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    // ========== Commands ==========
    /// Command: Add a task with this title
    #[command]
    AddTask {
        /// Title of the new task
        title: String,
    },

    /// Command: Flip the done flag of a task
    #[command]
    ToggleTaskDone {
        /// Task to toggle
        id: TaskId,
    },

    /// Command: Remove a task (possibly after confirmation)
    #[command]
    RemoveTask {
        /// Task to remove
        id: TaskId,
    },

    /// Command: Replace the title of a task
    #[command]
    EditTask {
        /// Task to edit
        id: TaskId,
        /// Replacement title
        title: String,
    },

    /// Command: Clear the current notice
    #[command]
    DismissNotice,

    // ========== Events ==========
    /// Event: Task was appended to the list
    #[event]
    TaskAdded {
        /// The new task
        task: Task,
    },

    /// Event: Done flag was flipped
    #[event]
    TaskDoneToggled {
        /// Toggled task
        id: TaskId,
    },

    /// Event: Task was removed without confirmation
    #[event]
    TaskRemoved {
        /// Removed task
        id: TaskId,
    },

    /// Event: Title was replaced
    #[event]
    TaskEdited {
        /// Edited task
        id: TaskId,
        /// New title
        title: String,
    },

    /// Event: Add was rejected because the title is taken
    #[event]
    DuplicateTitleRejected {
        /// Rejected title
        title: String,
    },

    /// Event: User confirmed a pending removal
    #[event]
    RemovalConfirmed {
        /// Task to remove
        id: TaskId,
    },

    /// Event: User declined a pending removal
    #[event]
    RemovalDeclined {
        /// Task to keep
        id: TaskId,
    },
}
