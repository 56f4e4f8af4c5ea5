//! Activity and decision task views.
//!
//! A poll yields a [`Task`]: either an [`ActivityTask`] or a
//! [`DecisionTask`]. SWF answers a long poll that timed out with an empty
//! envelope rather than an error, so each variant has a defining field whose
//! absence means "no task": the activity type for activity tasks and the
//! event list for decision tasks. [`Task::is_present`] is that check.

use serde::{Deserialize, Serialize};

use crate::constants::{ACTIVITY_TASK, DECISION_TASK};
use crate::types::history::HistoryEvent;

/// Identifies one run of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    /// User-assigned workflow id. Used as the stream partition key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// SWF-assigned run id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

/// A registered workflow type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowType {
    /// Type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A registered activity type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityType {
    /// Type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Result of `PollForActivityTask`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTask {
    /// Opaque token used to report the task's outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_token: Option<String>,
    /// Activity id assigned by the decider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Id of the `ActivityTaskStarted` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
    /// Workflow run the activity belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution: Option<WorkflowExecution>,
    /// Activity type. Absent on an empty poll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    /// Activity input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl ActivityTask {
    /// The non-empty workflow id, if the task carries one.
    pub fn workflow_id(&self) -> Option<&str> {
        workflow_id_of(self.workflow_execution.as_ref())
    }
}

/// Result of `PollForDecisionTask`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTask {
    /// Opaque token used to respond with decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_token: Option<String>,
    /// Id of the `DecisionTaskStarted` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
    /// Workflow run awaiting a decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution: Option<WorkflowExecution>,
    /// Workflow type of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<WorkflowType>,
    /// History page, newest first. Absent on an empty poll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<HistoryEvent>>,
    /// Token for the next history page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Id of the previous `DecisionTaskStarted` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_started_event_id: Option<i64>,
}

impl DecisionTask {
    /// The non-empty workflow id, if the task carries one.
    pub fn workflow_id(&self) -> Option<&str> {
        workflow_id_of(self.workflow_execution.as_ref())
    }
}

fn workflow_id_of(execution: Option<&WorkflowExecution>) -> Option<&str> {
    execution
        .and_then(|e| e.workflow_id.as_deref())
        .filter(|id| !id.is_empty())
}

/// A polled task of either kind.
///
/// Serializes as the inner task object, without a tag.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::{ActivityTask, ActivityType, Task};
///
/// let empty = Task::Activity(ActivityTask::default());
/// assert!(!empty.is_present());
///
/// let task = Task::Activity(ActivityTask {
///     activity_type: Some(ActivityType::default()),
///     ..ActivityTask::default()
/// });
/// assert!(task.is_present());
/// assert_eq!(task.record_key(), "activityTask");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Task {
    /// An activity task.
    Activity(ActivityTask),
    /// A decision task.
    Decision(DecisionTask),
}

impl Task {
    /// Returns `true` if the poll produced a genuine task rather than an
    /// empty long-poll envelope.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Activity(task) => task.activity_type.is_some(),
            Self::Decision(task) => task.events.is_some(),
        }
    }

    /// The record key this task is published under.
    pub fn record_key(&self) -> &'static str {
        match self {
            Self::Activity(_) => ACTIVITY_TASK,
            Self::Decision(_) => DECISION_TASK,
        }
    }

    /// The non-empty workflow id used as partition key.
    pub fn workflow_id(&self) -> Option<&str> {
        match self {
            Self::Activity(task) => task.workflow_id(),
            Self::Decision(task) => task.workflow_id(),
        }
    }
}
