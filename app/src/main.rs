//! Terminal front-end for the task list.
//!
//! Reads commands from standard input, one per line. Run `help` inside the
//! session for the list of commands.

use anyhow::Context;
use std::sync::{Arc, Mutex};
use tasklane::config::Config;
use tasklane::console::{ConsolePrompter, LineSource, SharedOutput};
use tasklane::session::Session;
use tasklane::{TaskEnvironment, TaskListReducer, TaskListState, TaskStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&config);
    tasklane_runtime::metrics::describe_store_metrics();

    tracing::info!(removal = ?config.removal, ids = ?config.ids, "Starting tasklane");

    let input = LineSource::stdin();
    let output: SharedOutput = Arc::new(Mutex::new(std::io::stdout()));
    let env = TaskEnvironment::new(
        config.id_source(),
        Arc::new(ConsolePrompter::new(input.clone(), output)),
        config.removal,
    );
    let store = TaskStore::with_config(
        TaskListState::new(),
        TaskListReducer::new(),
        env,
        config.store_config(),
    );

    let mut session = Session::new(store.clone(), std::io::stdout());
    session.greet()?;
    let outcome = session.run(&input).await;

    store
        .shutdown_gracefully()
        .await
        .context("effects still running at shutdown")?;
    tracing::info!("Bye");

    outcome.context("session failed")
}

/// Logs go to stderr so they never mix with the list on stdout
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
