//! Error types for the bridge.
//!
//! Every failure inside a poll cycle is a [`BridgeError`]. The worker loop in
//! [`supervisor`](crate::supervisor) logs it with the queue name and starts
//! the next cycle, so nothing here is ever fatal to a running worker. Only
//! [`BridgeError::Config`] is raised before workers exist.

use thiserror::Error;

/// Boxed source error carried by backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring the bridge or running a poll cycle.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::BridgeError;
///
/// let err = BridgeError::MissingWorkflowId {
///     task_type: "decisionTask",
/// };
/// assert_eq!(err.to_string(), "decisionTask has no workflow id to use as partition key");
/// assert_eq!(err.category(), "task");
/// ```
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required setting is missing or a value could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The stream record could not be encoded as JSON.
    #[error("Failed to serialize stream record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The coordination service rejected or failed a poll.
    #[error("Poll on task list '{task_list}' failed: {message}")]
    Poll {
        /// Task list that was being polled.
        task_list: String,
        /// Human-readable description of the failure.
        message: String,
        /// Underlying SDK or transport error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The event stream rejected or failed a publish.
    #[error("Publish to stream '{stream}' failed: {message}")]
    Publish {
        /// Target stream name.
        stream: String,
        /// Human-readable description of the failure.
        message: String,
        /// Underlying SDK or transport error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// A genuine task arrived without a workflow execution id.
    #[error("{task_type} has no workflow id to use as partition key")]
    MissingWorkflowId {
        /// Record key of the task kind (`activityTask` / `decisionTask`).
        task_type: &'static str,
    },

    /// A poll cycle panicked. The worker survives and keeps polling.
    #[error("Poll cycle panicked: {0}")]
    Panicked(String),
}

impl BridgeError {
    /// Builds a [`BridgeError::Poll`] from an SDK error.
    pub fn poll(
        task_list: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Poll {
            task_list: task_list.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Builds a [`BridgeError::Publish`] from an SDK error.
    pub fn publish(
        stream: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Publish {
            stream: stream.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns the error category as a static string for log fields.
    ///
    /// Categories: `"config"`, `"serialization"`, `"poll"`, `"publish"`,
    /// `"task"`, `"panic"`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Poll { .. } => "poll",
            Self::Publish { .. } => "publish",
            Self::MissingWorkflowId { .. } => "task",
            Self::Panicked(_) => "panic",
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_poll_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
        let err = BridgeError::poll("orders", io);
        assert_eq!(
            err.to_string(),
            "Poll on task list 'orders' failed: read timed out"
        );
        assert!(err.source().is_some());
        assert_eq!(err.category(), "poll");
    }

    #[test]
    fn test_publish_error_display() {
        let err = BridgeError::Publish {
            stream: "events".to_string(),
            message: "ProvisionedThroughputExceededException".to_string(),
            source: None,
        };
        assert!(err.to_string().contains("events"));
        assert!(err.source().is_none());
        assert_eq!(err.category(), "publish");
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BridgeError = serde_err.into();
        assert_eq!(err.category(), "serialization");
        assert!(err.to_string().starts_with("Failed to serialize stream record"));
    }

    #[test]
    fn test_config_and_panic_categories() {
        assert_eq!(BridgeError::Config("x".to_string()).category(), "config");
        assert_eq!(BridgeError::Panicked("boom".to_string()).category(), "panic");
    }
}
