//! Reducer logic for the task list.
//!
//! Commands are validated against the current list and turned into events;
//! events are applied through [`TaskListReducer::apply_event`], the only
//! place the list changes. The two dialogs (duplicate title notice, removal
//! confirmation) leave the reducer as effects.

use crate::notice::Notice;
use crate::prompter::Prompter;
use crate::types::{Task, TaskAction, TaskId, TaskListState};
use std::sync::Arc;
use tasklane_core::{
    async_effect, effect::Effect, environment::IdSource, reducer::Reducer, smallvec, SmallVec,
};

/// What happens when a removal is requested
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Remove at once
    Immediate,
    /// Ask the [`Prompter`] first
    #[default]
    Confirm,
}

/// Environment dependencies for the task list reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Source of ids for new tasks
    pub ids: Arc<dyn IdSource>,
    /// Dialogs
    pub prompter: Arc<dyn Prompter>,
    /// Whether removals need confirmation
    pub removal: RemovalPolicy,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(
        ids: Arc<dyn IdSource>,
        prompter: Arc<dyn Prompter>,
        removal: RemovalPolicy,
    ) -> Self {
        Self {
            ids,
            prompter,
            removal,
        }
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment")
            .field("removal", &self.removal)
            .finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Creates a new `TaskListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draws ids until one is not already in the list
    fn fresh_id(state: &TaskListState, ids: &dyn IdSource) -> TaskId {
        loop {
            let id = TaskId::new(ids.next_id());
            if !state.tasks.contains_id(id) {
                return id;
            }
            tracing::debug!(%id, "Id already in use, drawing another");
        }
    }

    /// Applies an event to state
    ///
    /// Replaying the same events in order against the same starting state
    /// reproduces the same list. Commands are ignored.
    pub fn apply_event(state: &mut TaskListState, action: &TaskAction) {
        match action {
            TaskAction::TaskAdded { task } => {
                if state.tasks.contains_id(task.id) {
                    tracing::debug!(id = %task.id, "Ignoring add with an id already in use");
                    return;
                }
                match state.tasks.add(task.id, task.title.clone()) {
                    Ok(tasks) => {
                        state.tasks = tasks;
                        state.last_notice = None;
                    }
                    Err(err) => tracing::debug!(%err, "Ignoring replayed add"),
                }
            }
            TaskAction::TaskDoneToggled { id } => {
                state.tasks = state.tasks.toggle_done(*id);
            }
            TaskAction::TaskRemoved { id } | TaskAction::RemovalConfirmed { id } => {
                state.pending_removals.remove(id);
                state.tasks = state.tasks.remove(*id);
            }
            TaskAction::RemovalDeclined { id } => {
                state.pending_removals.remove(id);
            }
            TaskAction::TaskEdited { id, title } => {
                state.tasks = state.tasks.edit(*id, title.clone());
            }
            TaskAction::DuplicateTitleRejected { title } => {
                state.last_notice = Some(Notice::DuplicateTitle {
                    title: title.clone(),
                });
            }
            // Commands are not applied to state
            TaskAction::AddTask { .. }
            | TaskAction::ToggleTaskDone { .. }
            | TaskAction::RemoveTask { .. }
            | TaskAction::EditTask { .. }
            | TaskAction::DismissNotice => {}
        }
    }

    fn add_task(
        state: &mut TaskListState,
        title: String,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        if title.trim().is_empty() {
            tracing::debug!("Ignoring blank title");
            return SmallVec::new();
        }

        if state.tasks.contains_title(&title) {
            tracing::info!(%title, "Rejected duplicate title");
            let notice = Notice::DuplicateTitle {
                title: title.clone(),
            };
            Self::apply_event(state, &TaskAction::DuplicateTitleRejected { title });

            let shown = env.prompter.notify(&notice);
            return smallvec![async_effect! {
                shown.await;
                None
            }];
        }

        let id = Self::fresh_id(state, env.ids.as_ref());
        let event = TaskAction::TaskAdded {
            task: Task::new(id, title),
        };
        Self::apply_event(state, &event);
        tracing::info!(%id, "Task added");

        SmallVec::new()
    }

    fn remove_task(
        state: &mut TaskListState,
        id: TaskId,
        env: &TaskEnvironment,
    ) -> SmallVec<[Effect<TaskAction>; 4]> {
        let Some(task) = state.get(id) else {
            tracing::debug!(%id, "Remove of unknown task ignored");
            return SmallVec::new();
        };

        match env.removal {
            RemovalPolicy::Immediate => {
                Self::apply_event(state, &TaskAction::TaskRemoved { id });
                tracing::info!(%id, "Task removed");
                SmallVec::new()
            }
            RemovalPolicy::Confirm => {
                if state.is_removal_pending(id) {
                    tracing::debug!(%id, "Removal already awaiting confirmation");
                    return SmallVec::new();
                }
                let answer = env.prompter.confirm_removal(task);
                state.pending_removals.insert(id);

                smallvec![async_effect! {
                    if answer.await {
                        Some(TaskAction::RemovalConfirmed { id })
                    } else {
                        Some(TaskAction::RemovalDeclined { id })
                    }
                }]
            }
        }
    }
}

impl Reducer for TaskListReducer {
    type State = TaskListState;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TaskAction::AddTask { title } => Self::add_task(state, title, env),

            TaskAction::ToggleTaskDone { id } => {
                if !state.tasks.contains_id(id) {
                    tracing::debug!(%id, "Toggle of unknown task ignored");
                    return SmallVec::new();
                }
                Self::apply_event(state, &TaskAction::TaskDoneToggled { id });
                SmallVec::new()
            }

            TaskAction::RemoveTask { id } => Self::remove_task(state, id, env),

            TaskAction::EditTask { id, title } => {
                if !state.tasks.contains_id(id) {
                    tracing::debug!(%id, "Edit of unknown task ignored");
                    return SmallVec::new();
                }
                Self::apply_event(state, &TaskAction::TaskEdited { id, title });
                SmallVec::new()
            }

            TaskAction::DismissNotice => {
                state.last_notice = None;
                SmallVec::new()
            }

            // ========== Events ==========
            TaskAction::TaskAdded { .. }
            | TaskAction::TaskDoneToggled { .. }
            | TaskAction::TaskRemoved { .. }
            | TaskAction::TaskEdited { .. }
            | TaskAction::DuplicateTitleRejected { .. }
            | TaskAction::RemovalConfirmed { .. }
            | TaskAction::RemovalDeclined { .. } => {
                if let TaskAction::RemovalConfirmed { id } = &action {
                    tracing::info!(%id, "Task removed after confirmation");
                }
                Self::apply_event(state, &action);
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::TaskList;
    use crate::prompter::mocks::RecordingPrompter;
    use tasklane_core::environment::SequentialIds;
    use tasklane_testing::{assertions, ReducerTest, ScriptedIds};

    fn env_with(removal: RemovalPolicy) -> TaskEnvironment {
        TaskEnvironment::new(
            Arc::new(SequentialIds::new()),
            Arc::new(RecordingPrompter::default()),
            removal,
        )
    }

    fn test_env() -> TaskEnvironment {
        env_with(RemovalPolicy::Immediate)
    }

    fn seeded() -> TaskListState {
        TaskListState::with_tasks(TaskList::from(vec![
            Task::new(TaskId::new(1), "Buy milk"),
            Task::new(TaskId::new(2), "Walk dog"),
        ]))
    }

    fn add(title: &str) -> TaskAction {
        TaskAction::AddTask {
            title: title.to_string(),
        }
    }

    #[test]
    fn test_add_task_success() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(TaskListState::new())
            .when_action(add("Buy milk"))
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                let task = state.get(TaskId::new(1)).unwrap();
                assert_eq!(task.title, "Buy milk");
                assert!(!task.done);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_task_duplicate_title() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(add("Walk dog"))
            .then_state(|state| {
                assert_eq!(state.tasks, seeded().tasks);
                assert_eq!(
                    state.last_notice,
                    Some(Notice::DuplicateTitle {
                        title: "Walk dog".to_string()
                    })
                );
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_add_task_blank_title_is_ignored() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(TaskListState::new())
            .when_action(add("   "))
            .then_state(|state| assert_eq!(state.count(), 0))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_task_skips_ids_in_use() {
        let env = TaskEnvironment::new(
            Arc::new(ScriptedIds::new([2, 1, 7])),
            Arc::new(RecordingPrompter::default()),
            RemovalPolicy::Immediate,
        );

        ReducerTest::new(TaskListReducer::new())
            .with_env(env)
            .given_state(seeded())
            .when_action(add("Pay rent"))
            .then_state(|state| {
                assert_eq!(state.get(TaskId::new(7)).unwrap().title, "Pay rent");
            })
            .run();
    }

    #[test]
    fn test_successful_add_clears_notice() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_actions([add("Walk dog"), add("Pay rent")])
            .then_state(|state| {
                assert_eq!(state.count(), 3);
                assert!(state.last_notice.is_none());
            })
            .run();
    }

    #[test]
    fn test_dismiss_notice() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_actions([add("Walk dog"), TaskAction::DismissNotice])
            .then_state(|state| assert!(state.last_notice.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_toggle_done() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(TaskAction::ToggleTaskDone { id: TaskId::new(2) })
            .then_state(|state| {
                assert!(!state.get(TaskId::new(1)).unwrap().done);
                assert!(state.get(TaskId::new(2)).unwrap().done);
                assert_eq!(state.completed_count(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let missing = TaskId::new(99);

        ReducerTest::new(TaskListReducer::new())
            .with_env(env_with(RemovalPolicy::Confirm))
            .given_state(seeded())
            .when_actions([
                TaskAction::ToggleTaskDone { id: missing },
                TaskAction::EditTask {
                    id: missing,
                    title: "Nope".to_string(),
                },
                TaskAction::RemoveTask { id: missing },
            ])
            .then_state(|state| assert_eq!(*state, seeded()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_task() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(TaskAction::EditTask {
                id: TaskId::new(1),
                title: "Walk dog".to_string(),
            })
            .then_state(|state| {
                // Edits do not enforce unique titles
                let titles: Vec<_> = state.tasks.iter().map(|t| t.title.as_str()).collect();
                assert_eq!(titles, ["Walk dog", "Walk dog"]);
            })
            .run();
    }

    #[test]
    fn test_remove_immediately() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_action(TaskAction::RemoveTask { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert!(state.get(TaskId::new(1)).is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_remove_with_confirmation_is_pending() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(env_with(RemovalPolicy::Confirm))
            .given_state(seeded())
            .when_action(TaskAction::RemoveTask { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state.count(), 2);
                assert!(state.is_removal_pending(TaskId::new(1)));
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_second_remove_while_pending_is_ignored() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(env_with(RemovalPolicy::Confirm))
            .given_state(seeded())
            .when_actions([
                TaskAction::RemoveTask { id: TaskId::new(1) },
                TaskAction::RemoveTask { id: TaskId::new(1) },
            ])
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_removal_confirmed_and_declined() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(env_with(RemovalPolicy::Confirm))
            .given_state(seeded())
            .when_actions([
                TaskAction::RemoveTask { id: TaskId::new(1) },
                TaskAction::RemoveTask { id: TaskId::new(2) },
                TaskAction::RemovalConfirmed { id: TaskId::new(1) },
                TaskAction::RemovalDeclined { id: TaskId::new(2) },
            ])
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert!(state.get(TaskId::new(2)).is_some());
                assert!(state.pending_removals.is_empty());
            })
            .run();
    }

    #[tokio::test]
    async fn test_confirmation_effect_asks_prompter() {
        let prompter = RecordingPrompter::answering([false]);
        let env = TaskEnvironment::new(
            Arc::new(SequentialIds::new()),
            Arc::new(prompter.clone()),
            RemovalPolicy::Confirm,
        );
        let mut state = seeded();

        let mut effects =
            TaskListReducer.reduce(&mut state, TaskAction::RemoveTask { id: TaskId::new(2) }, &env);
        let Some(Effect::Future(fut)) = effects.pop() else {
            unreachable!("confirmation is always a future effect");
        };

        assert_eq!(fut.await, Some(TaskAction::RemovalDeclined { id: TaskId::new(2) }));
        assert_eq!(prompter.asked(), [TaskId::new(2)]);
    }

    #[test]
    fn test_added_event_with_taken_id_is_ignored() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(test_env())
            .given_state(seeded())
            .when_actions([
                TaskAction::TaskAdded {
                    task: Task::new(TaskId::new(1), "Pay rent"),
                },
                TaskAction::RemoveTask { id: TaskId::new(1) },
            ])
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert!(!state.tasks.contains_title("Pay rent"));
                assert_eq!(state.get(TaskId::new(2)).unwrap().title, "Walk dog");
            })
            .run();
    }

    #[test]
    fn test_event_replay() {
        let events = [
            TaskAction::TaskAdded {
                task: Task::new(TaskId::new(5), "Buy milk"),
            },
            TaskAction::TaskAdded {
                task: Task::new(TaskId::new(6), "Walk dog"),
            },
            TaskAction::TaskDoneToggled { id: TaskId::new(5) },
            TaskAction::TaskEdited {
                id: TaskId::new(6),
                title: "Walk cat".to_string(),
            },
            TaskAction::TaskRemoved { id: TaskId::new(5) },
        ];

        let mut first = TaskListState::new();
        let mut second = TaskListState::new();
        for event in &events {
            TaskListReducer::apply_event(&mut first, event);
            TaskListReducer::apply_event(&mut second, event);
        }

        assert_eq!(first, second);
        assert_eq!(first.count(), 1);
        assert_eq!(first.get(TaskId::new(6)).unwrap().title, "Walk cat");
    }
}
