//! One poll-and-forward cycle per call.
//!
//! A cycle builds a fresh request, long-polls the coordination service once
//! and, if a genuine task came back, publishes it through the
//! [`TaskForwarder`]. Empty polls are not errors.

use std::sync::Arc;

use tracing::debug;

use crate::backend::{CoordinationService, PutRecordReceipt};
use crate::constants::{POLL_FOR_ACTIVITY_TASK, POLL_FOR_DECISION_TASK};
use crate::error::{BridgeError, BridgeResult};
use crate::forwarder::TaskForwarder;
use crate::types::{
    PollForActivityTaskRequest, PollForDecisionTaskRequest, QueueDescriptor, QueueKind, Task,
    TaskList,
};

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A task was published.
    Published(PutRecordReceipt),
    /// The long poll ended without a task.
    Empty,
}

impl CycleOutcome {
    /// Returns `true` if a record was published.
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Polls task lists of one domain and forwards what it finds.
#[derive(Clone)]
pub struct Poller {
    domain: String,
    identity: Option<String>,
    coordinator: Arc<dyn CoordinationService>,
    forwarder: TaskForwarder,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("domain", &self.domain)
            .field("identity", &self.identity)
            .field("forwarder", &self.forwarder)
            .finish_non_exhaustive()
    }
}

impl Poller {
    /// Creates a poller for `domain`.
    pub fn new(
        domain: impl Into<String>,
        coordinator: Arc<dyn CoordinationService>,
        forwarder: TaskForwarder,
    ) -> Self {
        Self {
            domain: domain.into(),
            identity: None,
            coordinator,
            forwarder,
        }
    }

    /// Sets the identity reported on every poll.
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }

    /// Workflow domain polled.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Runs one cycle for `queue` using the poll operation its kind calls for.
    pub async fn poll_and_forward(&self, queue: &QueueDescriptor) -> BridgeResult<CycleOutcome> {
        match queue.kind {
            QueueKind::Activity => self.poll_for_activity_task(&queue.task_list).await,
            QueueKind::Decision => self.poll_for_decision_task(&queue.task_list).await,
        }
    }

    /// Polls a decision task list once, newest history event first, and
    /// forwards the task if one arrived.
    pub async fn poll_for_decision_task(&self, task_list: &TaskList) -> BridgeResult<CycleOutcome> {
        let request = PollForDecisionTaskRequest::new(self.domain.as_str(), task_list.clone())
            .with_identity(self.identity.clone());

        let task = self.coordinator.poll_for_decision_task(&request).await?;
        let Some(task) = task.map(Task::Decision).filter(Task::is_present) else {
            debug!(queue = %task_list, "Decision poll returned no task");
            return Ok(CycleOutcome::Empty);
        };

        self.forward(POLL_FOR_DECISION_TASK, &request, &task).await
    }

    /// Polls an activity task list once and forwards the task if one
    /// arrived.
    pub async fn poll_for_activity_task(&self, task_list: &TaskList) -> BridgeResult<CycleOutcome> {
        let request = PollForActivityTaskRequest::new(self.domain.as_str(), task_list.clone())
            .with_identity(self.identity.clone());

        let task = self.coordinator.poll_for_activity_task(&request).await?;
        let Some(task) = task.map(Task::Activity).filter(Task::is_present) else {
            debug!(queue = %task_list, "Activity poll returned no task");
            return Ok(CycleOutcome::Empty);
        };

        self.forward(POLL_FOR_ACTIVITY_TASK, &request, &task).await
    }

    async fn forward<R>(
        &self,
        request_type: &str,
        request: &R,
        task: &Task,
    ) -> BridgeResult<CycleOutcome>
    where
        R: serde::Serialize + Sync,
    {
        let workflow_id = task
            .workflow_id()
            .ok_or(BridgeError::MissingWorkflowId {
                task_type: task.record_key(),
            })?;

        let receipt = self
            .forwarder
            .put_record(workflow_id, request_type, request, task.record_key(), task)
            .await?;
        Ok(CycleOutcome::Published(receipt))
    }
}
