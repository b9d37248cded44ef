//! Plain-text projection of the state: a header with the task count and one
//! row per task.

use crate::types::{Task, TaskListState};

/// Header line, e.g. `3 task(s)`
#[must_use]
pub fn header(state: &TaskListState) -> String {
    format!("{} task(s)", state.count())
}

/// One task row, e.g. `[x] #2 Walk dog`
#[must_use]
pub fn row(task: &Task) -> String {
    let mark = if task.done { 'x' } else { ' ' };
    format!("[{mark}] #{} {}", task.id, task.title)
}

/// Full screen: header and rows
///
/// Notices are not drawn here; the [`crate::prompter::Prompter`] shows them.
#[must_use]
pub fn render(state: &TaskListState) -> String {
    let mut out = header(state);
    out.push('\n');
    for task in &state.tasks {
        out.push_str("  ");
        out.push_str(&row(task));
        if state.is_removal_pending(task.id) {
            out.push_str("  (removal pending)");
        }
        out.push('\n');
    }
    out
}
