//! Line-oriented terminal session over a [`TaskStore`].
//!
//! Each input line is parsed into a [`Command`]; commands that change the
//! list are sent to the store, and the list is redrawn only when the store's
//! state channel reports a change.

use crate::command::{Command, HELP};
use crate::console::LineSource;
use crate::error::SessionError;
use crate::render;
use crate::types::TaskListState;
use crate::TaskStore;
use std::io::Write;
use tokio::sync::watch;

/// Whether the session should keep reading input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Leave
    Quit,
}

/// Terminal session writing to `Out`
pub struct Session<Out: Write> {
    store: TaskStore,
    state: watch::Receiver<TaskListState>,
    out: Out,
}

impl<Out: Write> Session<Out> {
    /// Creates a session over `store`
    pub fn new(store: TaskStore, out: Out) -> Self {
        let state = store.subscribe_state();
        Self { store, state, out }
    }

    /// The output written so far
    pub const fn output(&self) -> &Out {
        &self.out
    }

    /// Prints a short hint and the current list
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if writing fails.
    pub fn greet(&mut self) -> Result<(), SessionError> {
        writeln!(self.out, "tasklane: type `help` for commands")?;
        let state = self.state.borrow_and_update().clone();
        write!(self.out, "{}", render::render(&state))?;
        Ok(())
    }

    /// Reads and executes lines until `quit` or end of input
    ///
    /// # Errors
    ///
    /// Returns the first I/O or store failure.
    pub async fn run(&mut self, input: &LineSource) -> Result<(), SessionError> {
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = input.next_line().await? else {
                writeln!(self.out)?;
                return Ok(());
            };
            if self.execute(&line).await? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Executes one line of input
    ///
    /// Typing mistakes are reported to the user and do not end the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if output fails or the store rejects the action.
    pub async fn execute(&mut self, line: &str) -> Result<Flow, SessionError> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(crate::error::CommandError::Empty) => return Ok(Flow::Continue),
            Err(error) => {
                writeln!(self.out, "error: {error}")?;
                return Ok(Flow::Continue);
            }
        };
        tracing::debug!(?command, "Executing command");

        match command {
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::List => {
                let state = self.store.snapshot().await;
                write!(self.out, "{}", render::render(&state))?;
            }
            Command::Json => {
                let tasks = self.store.state(|s| s.tasks.clone()).await;
                writeln!(self.out, "{}", serde_json::to_string_pretty(&tasks)?)?;
            }
            Command::Quit => return Ok(Flow::Quit),
            other => {
                if let Some(action) = other.into_action() {
                    let mut handle = self.store.send(action).await?;
                    // Dialogs run as effects; let them finish before the next prompt
                    handle.wait().await;
                    self.report()?;
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Redraws the list if the state changed since the last draw
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if writing fails.
    pub fn report(&mut self) -> Result<bool, SessionError> {
        // A closed channel means the store is gone; nothing left to draw
        if !self.state.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        let state = self.state.borrow_and_update().clone();
        write!(self.out, "{}", render::render(&state))?;
        Ok(true)
    }
}

impl<Out: Write> std::fmt::Debug for Session<Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
