//! Environment-based bridge configuration.
//!
//! | Variable | Required | Meaning |
//! |---|---|---|
//! | `DOMAIN` | yes | SWF domain polled by every worker |
//! | `ACTIVITY_TASK_LISTS` | no | comma-separated activity task lists |
//! | `DECISION_TASK_LISTS` | no | comma-separated decision task lists |
//! | `STREAM_NAME` | yes | Kinesis stream receiving the records |
//! | `WORKER_IDENTITY` | no | identity sent with every poll |
//! | `RETRY_DELAY_MS` | no | pause after a failed cycle (default `0`) |
//!
//! Task list values are split on commas; each entry is trimmed and empty
//! entries are dropped. Order and duplicates are preserved here and resolved
//! by the supervisor.
//!
//! A `.env` file is read with [`load_env_file`] before the environment is
//! consulted. Only a missing file is tolerated.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    ENV_ACTIVITY_TASK_LISTS, ENV_DECISION_TASK_LISTS, ENV_DOMAIN, ENV_RETRY_DELAY_MS,
    ENV_STREAM_NAME, ENV_WORKER_IDENTITY,
};
use crate::error::{BridgeError, BridgeResult};
use crate::types::TaskList;

/// Everything the bridge needs besides the service clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// SWF domain.
    pub domain: String,
    /// Activity task lists, in configured order.
    pub activity_task_lists: Vec<TaskList>,
    /// Decision task lists, in configured order.
    pub decision_task_lists: Vec<TaskList>,
    /// Target Kinesis stream.
    pub stream_name: String,
    /// Identity reported with each poll.
    pub identity: Option<String>,
    /// Pause after a failed cycle. Zero retries immediately.
    pub retry_delay: Duration,
}

impl BridgeConfig {
    /// Creates a configuration with no task lists.
    pub fn new(domain: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            activity_task_lists: Vec::new(),
            decision_task_lists: Vec::new(),
            stream_name: stream_name.into(),
            identity: None,
            retry_delay: Duration::ZERO,
        }
    }

    /// Sets the activity task lists.
    pub fn with_activity_task_lists(mut self, lists: Vec<TaskList>) -> Self {
        self.activity_task_lists = lists;
        self
    }

    /// Sets the decision task lists.
    pub fn with_decision_task_lists(mut self, lists: Vec<TaskList>) -> Self {
        self.decision_task_lists = lists;
        self
    }

    /// Sets the poll identity.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Sets the pause after a failed cycle.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use swf_kinesis_bridge::BridgeConfig;
    ///
    /// let env: HashMap<&str, &str> = HashMap::from([
    ///     ("DOMAIN", "orders"),
    ///     ("STREAM_NAME", "swf-events"),
    ///     ("DECISION_TASK_LISTS", " deciders , ,"),
    /// ]);
    /// let config = BridgeConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.decision_task_lists.len(), 1);
    /// assert!(config.activity_task_lists.is_empty());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = required(&lookup, ENV_DOMAIN)?;
        let stream_name = required(&lookup, ENV_STREAM_NAME)?;

        let retry_delay = match lookup(ENV_RETRY_DELAY_MS) {
            Some(raw) if !raw.trim().is_empty() => {
                let millis = raw.trim().parse::<u64>().map_err(|e| {
                    BridgeError::Config(format!("{ENV_RETRY_DELAY_MS} must be milliseconds: {e}"))
                })?;
                Duration::from_millis(millis)
            },
            _ => Duration::ZERO,
        };

        Ok(Self {
            domain,
            activity_task_lists: parse_task_lists(lookup(ENV_ACTIVITY_TASK_LISTS).as_deref()),
            decision_task_lists: parse_task_lists(lookup(ENV_DECISION_TASK_LISTS).as_deref()),
            stream_name,
            identity: lookup(ENV_WORKER_IDENTITY)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            retry_delay,
        })
    }

    /// Total number of configured task lists, duplicates included.
    pub fn task_list_count(&self) -> usize {
        self.activity_task_lists.len() + self.decision_task_lists.len()
    }
}

fn required<F>(lookup: &F, key: &str) -> BridgeResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BridgeError::Config(format!("{key} is not set")))
}

/// Loads `.env` from the working directory or one of its parents.
///
/// Returns `Ok(false)` when there is no such file. Variables already set in
/// the process environment are left untouched.
pub fn load_env_file() -> BridgeResult<bool> {
    env_file_result(dotenvy::dotenv().map(|_| ()))
}

/// Loads a specific env file. Same contract as [`load_env_file`].
pub fn load_env_file_from(path: impl AsRef<Path>) -> BridgeResult<bool> {
    env_file_result(dotenvy::from_path(path))
}

fn env_file_result(result: Result<(), dotenvy::Error>) -> BridgeResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(BridgeError::Config(format!("failed to load env file: {err}"))),
    }
}

/// Parses a comma-separated task list value.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::config::parse_task_lists;
///
/// let names: Vec<String> = parse_task_lists(Some(" a , ,b ,"))
///     .into_iter()
///     .map(|t| t.name)
///     .collect();
/// assert_eq!(names, vec!["a", "b"]);
/// assert!(parse_task_lists(None).is_empty());
/// ```
pub fn parse_task_lists(names: Option<&str>) -> Vec<TaskList> {
    names
        .map(|names| {
            names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(TaskList::new)
                .collect()
        })
        .unwrap_or_default()
}
