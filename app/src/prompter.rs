//! User interaction behind a trait.
//!
//! The reducer never talks to the terminal. Asking for a removal
//! confirmation and showing a notice both go through [`Prompter`], which the
//! environment carries as a trait object.

use crate::notice::Notice;
use crate::types::Task;
use futures::future::BoxFuture;

/// Dialogs the task list may need
pub trait Prompter: Send + Sync {
    /// Ask whether `task` should really be removed
    fn confirm_removal(&self, task: &Task) -> BoxFuture<'static, bool>;

    /// Show a notice. Resolves once the user has seen it.
    fn notify(&self, notice: &Notice) -> BoxFuture<'static, ()>;
}

/// Answers every confirmation with yes and logs notices
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm_removal(&self, task: &Task) -> BoxFuture<'static, bool> {
        tracing::debug!(id = %task.id, "Removal confirmed automatically");
        Box::pin(async { true })
    }

    fn notify(&self, notice: &Notice) -> BoxFuture<'static, ()> {
        tracing::warn!(%notice, "Notice");
        Box::pin(async {})
    }
}

/// Prompter doubles for tests
pub mod mocks {
    use super::{BoxFuture, Notice, Prompter, Task};
    use crate::types::TaskId;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard};

    #[derive(Debug, Default)]
    struct Log {
        answers: VecDeque<bool>,
        asked: Vec<TaskId>,
        notices: Vec<Notice>,
    }

    /// Replays scripted answers and records every dialog
    ///
    /// Once the script runs out, confirmations are answered with yes.
    /// Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPrompter {
        log: Arc<Mutex<Log>>,
    }

    impl RecordingPrompter {
        /// Creates a prompter answering with `answers` in order
        #[must_use]
        pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                log: Arc::new(Mutex::new(Log {
                    answers: answers.into_iter().collect(),
                    ..Log::default()
                })),
            }
        }

        fn lock(&self) -> MutexGuard<'_, Log> {
            match self.log.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            }
        }

        /// Ids of the tasks a confirmation was asked for
        #[must_use]
        pub fn asked(&self) -> Vec<TaskId> {
            self.lock().asked.clone()
        }

        /// Notices shown so far
        #[must_use]
        pub fn notices(&self) -> Vec<Notice> {
            self.lock().notices.clone()
        }
    }

    impl Prompter for RecordingPrompter {
        fn confirm_removal(&self, task: &Task) -> BoxFuture<'static, bool> {
            let answer = {
                let mut log = self.lock();
                log.asked.push(task.id);
                log.answers.pop_front().unwrap_or(true)
            };
            Box::pin(async move { answer })
        }

        fn notify(&self, notice: &Notice) -> BoxFuture<'static, ()> {
            self.lock().notices.push(notice.clone());
            Box::pin(async {})
        }
    }
}
