//! Amazon SWF to Amazon Kinesis task bridge.
//!
//! The bridge long-polls a fixed set of SWF task lists and republishes every
//! task it receives as one JSON record on a Kinesis stream, partitioned by
//! workflow id. Downstream consumers then see the workflow's work as an
//! ordered event stream instead of polling SWF themselves.
//!
//! # Overview
//!
//! Each configured task list gets its own worker. A worker runs the same
//! cycle forever: poll once, publish the task if there was one, log and
//! retry on any failure. Activity lists are polled with
//! `PollForActivityTask`; decision lists with `PollForDecisionTask`, one
//! history event per page, newest first.
//!
//! Each record has exactly two keys, the request followed by the task:
//!
//! ```text
//! {"pollForDecisionTask": {"domain": "...", "taskList": {...}, ...},
//!  "decisionTask": {"taskToken": "...", "events": [...], ...}}
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Serializable request and task views (the record schema)
//! - [`backend`] - Coordination-service and event-stream traits, in-memory
//!   and AWS implementations
//! - [`forwarder`] - Record assembly and publishing
//! - [`poller`] - One poll-and-forward cycle
//! - [`supervisor`] - Worker pool and per-queue retry loops
//! - [`config`] - Environment configuration
//! - [`error`] - Error types
//! - [`constants`] - Record keys, environment variable names, poll options
//!
//! # Example
//!
//! ```
//! use swf_kinesis_bridge::config::parse_task_lists;
//! use swf_kinesis_bridge::{BridgeConfig, DecisionTask, Task};
//!
//! let config = BridgeConfig::new("orders", "order-events")
//!     .with_decision_task_lists(parse_task_lists(Some(" deciders, ,priority ")));
//! assert_eq!(config.decision_task_lists.len(), 2);
//!
//! // A decision poll without an event list is an empty long poll.
//! assert!(!Task::Decision(DecisionTask::default()).is_present());
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod forwarder;
pub mod poller;
pub mod supervisor;
pub mod types;

// Re-exports for ergonomic access
pub use backend::{CoordinationService, EventStream, PutRecordReceipt};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use forwarder::TaskForwarder;
pub use poller::{CycleOutcome, Poller};
pub use supervisor::{Supervisor, SupervisorHandle, WorkerStats};
pub use types::*;
