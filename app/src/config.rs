//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `TASKLANE_CONFIRM_REMOVAL` | `true` |
//! | `TASKLANE_ID_SOURCE` | `sequential` (or `clock`) |
//! | `TASKLANE_LOG` | `tasklane=info,tasklane_runtime=warn` |
//! | `TASKLANE_BROADCAST_CAPACITY` | `16` |
//! | `TASKLANE_SHUTDOWN_TIMEOUT_SECS` | `5` |

use crate::error::ConfigError;
use crate::reducer::RemovalPolicy;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tasklane_core::environment::{ClockIds, IdSource, SequentialIds, SystemClock};
use tasklane_runtime::StoreConfig;

const CONFIRM_REMOVAL: &str = "TASKLANE_CONFIRM_REMOVAL";
const ID_SOURCE: &str = "TASKLANE_ID_SOURCE";
const LOG: &str = "TASKLANE_LOG";
const BROADCAST_CAPACITY: &str = "TASKLANE_BROADCAST_CAPACITY";
const SHUTDOWN_TIMEOUT_SECS: &str = "TASKLANE_SHUTDOWN_TIMEOUT_SECS";

/// Default log filter when neither `RUST_LOG` nor `TASKLANE_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "tasklane=info,tasklane_runtime=warn";

/// How ids for new tasks are generated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// 1, 2, 3, ...
    #[default]
    Sequential,
    /// Millisecond timestamps
    Clock,
}

impl FromStr for IdStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "clock" | "timestamp" => Ok(Self::Clock),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether removals ask for confirmation
    pub removal: RemovalPolicy,
    /// Id generation
    pub ids: IdStrategy,
    /// `tracing` filter directive
    pub log_filter: String,
    /// Capacity of the store's action broadcast channel
    pub broadcast_capacity: usize,
    /// How long shutdown waits for in-flight effects
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            removal: RemovalPolicy::Confirm,
            ids: IdStrategy::Sequential,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            broadcast_capacity: 16,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Reads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(CONFIRM_REMOVAL) {
            config.removal = if parse_bool(CONFIRM_REMOVAL, value)? {
                RemovalPolicy::Confirm
            } else {
                RemovalPolicy::Immediate
            };
        }

        if let Some(value) = lookup(ID_SOURCE) {
            config.ids = value.parse().map_err(|()| ConfigError::InvalidIdSource {
                key: ID_SOURCE,
                value,
            })?;
        }

        if let Some(value) = lookup(LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = value;
        }

        if let Some(value) = lookup(BROADCAST_CAPACITY) {
            config.broadcast_capacity = parse_number(BROADCAST_CAPACITY, value)?;
        }

        if let Some(value) = lookup(SHUTDOWN_TIMEOUT_SECS) {
            config.shutdown_timeout =
                Duration::from_secs(parse_number(SHUTDOWN_TIMEOUT_SECS, value)?);
        }

        Ok(config)
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_broadcast_capacity(self.broadcast_capacity)
            .with_shutdown_timeout(self.shutdown_timeout)
    }

    /// Builds the configured id source
    #[must_use]
    pub fn id_source(&self) -> Arc<dyn IdSource> {
        match self.ids {
            IdStrategy::Sequential => Arc::new(SequentialIds::new()),
            IdStrategy::Clock => Arc::new(ClockIds::new(Arc::new(SystemClock))),
        }
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value }),
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}
