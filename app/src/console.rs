//! Terminal plumbing: shared line input and the console [`Prompter`].

use crate::notice::Notice;
use crate::prompter::Prompter;
use crate::types::Task;
use futures::future::BoxFuture;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

type BoxedReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Line input shared by the command loop and the prompter
///
/// The lock is only held while a single line is read, so a confirmation
/// dialog running as an effect can take the next line while the command loop
/// waits for the effect to finish.
#[derive(Clone)]
pub struct LineSource {
    lines: Arc<tokio::sync::Mutex<Lines<BoxedReader>>>,
}

impl LineSource {
    /// Lines from standard input
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Lines from any buffered reader
    pub fn new(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let boxed: BoxedReader = Box::new(reader);
        Self {
            lines: Arc::new(tokio::sync::Mutex::new(boxed.lines())),
        }
    }

    /// Next line without its terminator, `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn next_line(&self) -> std::io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource").finish_non_exhaustive()
    }
}

/// Output shared between the prompter and whoever else writes to the terminal
pub type SharedOutput = Arc<Mutex<dyn Write + Send>>;

/// Asks `y`/`n` questions on the terminal
#[derive(Clone)]
pub struct ConsolePrompter {
    input: LineSource,
    output: SharedOutput,
}

impl ConsolePrompter {
    /// Creates a prompter reading answers from `input` and writing to `output`
    #[must_use]
    pub fn new(input: LineSource, output: SharedOutput) -> Self {
        Self { input, output }
    }

    fn write(output: &SharedOutput, text: &str) {
        let mut out = match output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(error) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(%error, "Failed to write prompt");
        }
    }
}

impl std::fmt::Debug for ConsolePrompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePrompter").finish_non_exhaustive()
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Prompter for ConsolePrompter {
    fn confirm_removal(&self, task: &Task) -> BoxFuture<'static, bool> {
        let question = format!("Remove #{} {:?}? [y/N] ", task.id, task.title);
        let input = self.input.clone();
        let output = Arc::clone(&self.output);

        Box::pin(async move {
            Self::write(&output, &question);
            match input.next_line().await {
                Ok(Some(answer)) => is_yes(&answer),
                // End of input declines
                Ok(None) => false,
                Err(error) => {
                    tracing::warn!(%error, "Failed to read answer");
                    false
                }
            }
        })
    }

    fn notify(&self, notice: &Notice) -> BoxFuture<'static, ()> {
        let text = format!("! {}\n  {}\n", notice.heading(), notice.message());
        let output = Arc::clone(&self.output);
        Box::pin(async move { Self::write(&output, &text) })
    }
}
