//! In-process backends.
//!
//! [`InMemoryCoordinator`] replays scripted poll results per task list and
//! behaves like an idle long poll once its script runs out.
//! [`RecordingStream`] keeps every published record and can be told to
//! reject some of them. Together they drive the bridge without AWS.
//!
//! # Examples
//!
//! ```
//! use swf_kinesis_bridge::backend::memory::{InMemoryCoordinator, RecordingStream};
//! use swf_kinesis_bridge::DecisionTask;
//!
//! let coordinator = InMemoryCoordinator::new();
//! coordinator.push_decision_task("deciders", DecisionTask::default());
//! coordinator.push_decision_error("deciders", "ThrottlingException");
//!
//! let stream = RecordingStream::new();
//! stream.fail_partition_key("wf-poison");
//! assert!(stream.records().is_empty());
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::backend::{CoordinationService, EventStream, PutRecordReceipt};
use crate::error::{BridgeError, BridgeResult};
use crate::types::{
    ActivityTask, DecisionTask, PollForActivityTaskRequest, PollForDecisionTaskRequest,
};

/// Default time an unscripted poll waits before answering "no task".
const DEFAULT_IDLE_POLL: Duration = Duration::from_millis(10);

/// One scripted poll outcome.
#[derive(Debug, Clone)]
enum Scripted<T> {
    Task(Option<T>),
    Error(String),
}

/// Per-task-list queues of scripted outcomes.
#[derive(Debug)]
struct Script<T> {
    queues: Mutex<HashMap<String, VecDeque<Scripted<T>>>>,
}

impl<T> Script<T> {
    fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
        }
    }

    fn push(&self, task_list: &str, outcome: Scripted<T>) {
        self.queues
            .lock()
            .entry(task_list.to_string())
            .or_default()
            .push_back(outcome);
    }

    fn pop(&self, task_list: &str) -> Option<Scripted<T>> {
        self.queues.lock().get_mut(task_list)?.pop_front()
    }
}

/// Scripted [`CoordinationService`].
///
/// Outcomes are consumed in push order, independently per task list and per
/// poll kind. An unscripted poll sleeps for the idle delay and returns no
/// task, like a long poll that timed out.
#[derive(Debug)]
pub struct InMemoryCoordinator {
    activity: Script<ActivityTask>,
    decision: Script<DecisionTask>,
    activity_requests: Mutex<Vec<PollForActivityTaskRequest>>,
    decision_requests: Mutex<Vec<PollForDecisionTaskRequest>>,
    idle_poll: Duration,
}

impl InMemoryCoordinator {
    /// Creates a coordinator with empty scripts.
    pub fn new() -> Self {
        Self {
            activity: Script::new(),
            decision: Script::new(),
            activity_requests: Mutex::new(Vec::new()),
            decision_requests: Mutex::new(Vec::new()),
            idle_poll: DEFAULT_IDLE_POLL,
        }
    }

    /// Sets how long an unscripted poll waits before returning no task.
    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    /// Queues an activity task for `task_list`.
    pub fn push_activity_task(&self, task_list: &str, task: ActivityTask) {
        self.activity.push(task_list, Scripted::Task(Some(task)));
    }

    /// Queues an activity poll that returns nothing.
    pub fn push_activity_empty(&self, task_list: &str) {
        self.activity.push(task_list, Scripted::Task(None));
    }

    /// Queues a failing activity poll.
    pub fn push_activity_error(&self, task_list: &str, message: impl Into<String>) {
        self.activity.push(task_list, Scripted::Error(message.into()));
    }

    /// Queues a decision task for `task_list`.
    pub fn push_decision_task(&self, task_list: &str, task: DecisionTask) {
        self.decision.push(task_list, Scripted::Task(Some(task)));
    }

    /// Queues a decision poll that returns nothing.
    pub fn push_decision_empty(&self, task_list: &str) {
        self.decision.push(task_list, Scripted::Task(None));
    }

    /// Queues a failing decision poll.
    pub fn push_decision_error(&self, task_list: &str, message: impl Into<String>) {
        self.decision.push(task_list, Scripted::Error(message.into()));
    }

    /// Every activity poll request received so far.
    pub fn activity_requests(&self) -> Vec<PollForActivityTaskRequest> {
        self.activity_requests.lock().clone()
    }

    /// Every decision poll request received so far.
    pub fn decision_requests(&self) -> Vec<PollForDecisionTaskRequest> {
        self.decision_requests.lock().clone()
    }

    async fn answer<T>(&self, script: &Script<T>, task_list: &str) -> BridgeResult<Option<T>> {
        match script.pop(task_list) {
            Some(Scripted::Task(task)) => Ok(task),
            Some(Scripted::Error(message)) => Err(BridgeError::Poll {
                task_list: task_list.to_string(),
                message,
                source: None,
            }),
            None => {
                tokio::time::sleep(self.idle_poll).await;
                Ok(None)
            },
        }
    }
}

impl Default for InMemoryCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoordinationService for InMemoryCoordinator {
    async fn poll_for_activity_task(
        &self,
        request: &PollForActivityTaskRequest,
    ) -> BridgeResult<Option<ActivityTask>> {
        self.activity_requests.lock().push(request.clone());
        self.answer(&self.activity, &request.task_list.name).await
    }

    async fn poll_for_decision_task(
        &self,
        request: &PollForDecisionTaskRequest,
    ) -> BridgeResult<Option<DecisionTask>> {
        self.decision_requests.lock().push(request.clone());
        self.answer(&self.decision, &request.task_list.name).await
    }
}

/// A record accepted by [`RecordingStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    /// Stream the record was sent to.
    pub stream_name: String,
    /// Partition key used.
    pub partition_key: String,
    /// Raw payload.
    pub data: Vec<u8>,
}

impl PublishedRecord {
    /// Parses the payload as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.data)
    }
}

/// Recording [`EventStream`] with failure injection.
#[derive(Debug, Default)]
pub struct RecordingStream {
    records: Mutex<Vec<PublishedRecord>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_next: AtomicU64,
    rejected: AtomicU64,
    sequence: AtomicU64,
}

impl RecordingStream {
    /// Creates an empty stream that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every record published with `partition_key`.
    pub fn fail_partition_key(&self, partition_key: impl Into<String>) {
        self.failing_keys.lock().insert(partition_key.into());
    }

    /// Rejects the next `count` records regardless of key.
    pub fn fail_next(&self, count: u64) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// All accepted records in publish order.
    pub fn records(&self) -> Vec<PublishedRecord> {
        self.records.lock().clone()
    }

    /// Accepted records with the given partition key.
    pub fn records_for(&self, partition_key: &str) -> Vec<PublishedRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.partition_key == partition_key)
            .cloned()
            .collect()
    }

    /// Number of publishes rejected so far.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    fn should_fail(&self, partition_key: &str) -> bool {
        if self.failing_keys.lock().contains(partition_key) {
            return true;
        }
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl EventStream for RecordingStream {
    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> BridgeResult<PutRecordReceipt> {
        if self.should_fail(partition_key) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(BridgeError::Publish {
                stream: stream_name.to_string(),
                message: format!("record for {partition_key} rejected"),
                source: None,
            });
        }

        self.records.lock().push(PublishedRecord {
            stream_name: stream_name.to_string(),
            partition_key: partition_key.to_string(),
            data,
        });
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PutRecordReceipt {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number: sequence.to_string(),
        })
    }
}
