//! Ordered, copy-on-write list of tasks.
//!
//! Every operation returns a new list and leaves the receiver untouched.
//! Clones share storage until one of them is changed, so keeping older
//! snapshots around (for the state channel, for tests) is cheap.

use crate::error::DuplicateTitle;
use crate::types::{Task, TaskId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Insertion-ordered task list
#[derive(Clone, Default)]
pub struct TaskList {
    tasks: Arc<Vec<Task>>,
}

impl TaskList {
    /// Creates an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a list with a new, not yet done task appended.
    ///
    /// Titles are compared exactly: case and surrounding whitespace count.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateTitle`] if a task with the same title is already
    /// present. The receiver is unchanged either way.
    pub fn add(&self, id: TaskId, title: impl Into<String>) -> Result<Self, DuplicateTitle> {
        let title = title.into();
        if self.contains_title(&title) {
            return Err(DuplicateTitle { title });
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.tasks).push(Task::new(id, title));
        Ok(next)
    }

    /// Returns a list where the task with `id` has its done flag flipped.
    /// Unknown ids yield an equal list.
    #[must_use]
    pub fn toggle_done(&self, id: TaskId) -> Self {
        self.update(id, |task| task.done = !task.done)
    }

    /// Returns a list without the task `id`. Unknown ids yield an equal list.
    #[must_use]
    pub fn remove(&self, id: TaskId) -> Self {
        if !self.contains_id(id) {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.tasks).retain(|task| task.id != id);
        next
    }

    /// Returns a list where task `id` carries `title`. Position, id and done
    /// flag are preserved. Unknown ids yield an equal list.
    #[must_use]
    pub fn edit(&self, id: TaskId, title: impl Into<String>) -> Self {
        let title = title.into();
        self.update(id, move |task| task.title = title)
    }

    fn update(&self, id: TaskId, f: impl FnOnce(&mut Task)) -> Self {
        let Some(index) = self.position(id) else {
            return self.clone();
        };
        let mut next = self.clone();
        if let Some(task) = Arc::make_mut(&mut next.tasks).get_mut(index) {
            f(task);
        }
        next
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Returns the task with `id`
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Returns true if some task is titled exactly `title`
    #[must_use]
    pub fn contains_title(&self, title: &str) -> bool {
        self.tasks.iter().any(|task| task.title == title)
    }

    /// Returns true if some task has `id`
    #[must_use]
    pub fn contains_id(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the list holds no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks marked done
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Tasks as a slice, in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }
}

impl PartialEq for TaskList {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tasks, &other.tasks) || self.tasks == other.tasks
    }
}

impl Eq for TaskList {}

impl std::fmt::Debug for TaskList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tasks.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(tasks),
        }
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Serialize for TaskList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tasks.iter())
    }
}

impl<'de> Deserialize<'de> for TaskList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Task>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str) -> Task {
        Task::new(TaskId::new(id), title)
    }

    fn sample() -> TaskList {
        TaskList::from(vec![task(1, "Buy milk"), task(2, "Walk dog"), task(3, "Call mum")])
    }

    fn titles(list: &TaskList) -> Vec<&str> {
        list.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn add_appends_at_end() {
        let list = sample().add(TaskId::new(9), "Pay rent").unwrap();
        assert_eq!(titles(&list), ["Buy milk", "Walk dog", "Call mum", "Pay rent"]);
        assert!(!list.get(TaskId::new(9)).unwrap().done);
    }

    #[test]
    fn add_leaves_receiver_untouched() {
        let before = sample();
        let after = before.add(TaskId::new(9), "Pay rent").unwrap();
        assert_eq!(before.len(), 3);
        assert_eq!(after.len(), 4);
    }

    #[test]
    fn add_rejects_duplicate_title() {
        let err = sample().add(TaskId::new(9), "Walk dog").unwrap_err();
        assert_eq!(err.title, "Walk dog");
    }

    #[test]
    fn titles_compare_exactly() {
        let list = sample();
        assert!(list.add(TaskId::new(9), "walk dog").is_ok());
        assert!(list.add(TaskId::new(9), "Walk dog ").is_ok());
    }

    #[test]
    fn toggle_flips_only_target() {
        let list = sample().toggle_done(TaskId::new(2));
        let done: Vec<bool> = list.iter().map(|t| t.done).collect();
        assert_eq!(done, [false, true, false]);

        let back = list.toggle_done(TaskId::new(2));
        assert_eq!(back, sample());
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let list = sample().remove(TaskId::new(2));
        assert_eq!(titles(&list), ["Buy milk", "Call mum"]);
    }

    #[test]
    fn edit_keeps_position_id_and_done() {
        let list = sample().toggle_done(TaskId::new(2)).edit(TaskId::new(2), "Walk cat");
        let edited = &list.as_slice()[1];
        assert_eq!(edited.id, TaskId::new(2));
        assert_eq!(edited.title, "Walk cat");
        assert!(edited.done);
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let list = sample();
        let missing = TaskId::new(404);
        assert_eq!(list.toggle_done(missing), list);
        assert_eq!(list.remove(missing), list);
        assert_eq!(list.edit(missing, "Nope"), list);
    }

    #[test]
    fn unknown_id_shares_storage() {
        let list = sample();
        let same = list.remove(TaskId::new(404));
        assert!(Arc::ptr_eq(&list.tasks, &same.tasks));
    }

    #[test]
    fn completed_count() {
        let list = sample().toggle_done(TaskId::new(1)).toggle_done(TaskId::new(3));
        assert_eq!(list.completed_count(), 2);
    }

    #[test]
    fn serializes_as_array() {
        let list = TaskList::from(vec![task(1, "Buy milk")]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"id":1,"title":"Buy milk","done":false}]"#);
        let back: TaskList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
