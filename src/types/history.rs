//! Workflow history event views carried by decision tasks.
//!
//! Every event keeps its id, type, and timestamp (epoch milliseconds). The
//! attribute objects of the event kinds a decider usually inspects are
//! carried as well; other kinds are published with the three common fields
//! only.

use serde::{Deserialize, Serialize};

use crate::types::queue::TaskList;
use crate::types::task::{ActivityType, WorkflowType};

/// One entry of a workflow execution history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    /// Event time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<i64>,
    /// SWF event type, e.g. `WorkflowExecutionStarted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Monotonic event id within the execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,

    /// Set on `WorkflowExecutionStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution_started_event_attributes:
        Option<WorkflowExecutionStartedEventAttributes>,
    /// Set on `WorkflowExecutionSignaled` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution_signaled_event_attributes:
        Option<WorkflowExecutionSignaledEventAttributes>,
    /// Set on `WorkflowExecutionCompleted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution_completed_event_attributes:
        Option<WorkflowExecutionCompletedEventAttributes>,
    /// Set on `DecisionTaskScheduled` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_scheduled_event_attributes: Option<DecisionTaskScheduledEventAttributes>,
    /// Set on `DecisionTaskStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_started_event_attributes: Option<TaskStartedEventAttributes>,
    /// Set on `DecisionTaskCompleted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_completed_event_attributes: Option<DecisionTaskCompletedEventAttributes>,
    /// Set on `ActivityTaskScheduled` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_task_scheduled_event_attributes: Option<ActivityTaskScheduledEventAttributes>,
    /// Set on `ActivityTaskStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_task_started_event_attributes: Option<TaskStartedEventAttributes>,
    /// Set on `ActivityTaskCompleted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_task_completed_event_attributes: Option<ActivityTaskCompletedEventAttributes>,
    /// Set on `ActivityTaskFailed` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_task_failed_event_attributes: Option<ActivityTaskFailedEventAttributes>,
    /// Set on `TimerStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_started_event_attributes: Option<TimerStartedEventAttributes>,
    /// Set on `TimerFired` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_fired_event_attributes: Option<TimerFiredEventAttributes>,
}

/// Attributes of a `WorkflowExecutionStarted` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionStartedEventAttributes {
    /// Input passed to the execution or activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Maximum execution duration, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_start_to_close_timeout: Option<String>,
    /// Maximum decision task duration, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_start_to_close_timeout: Option<String>,
    /// Policy applied to child executions on termination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_policy: Option<String>,
    /// Task list the work was scheduled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list: Option<TaskList>,
    /// Task priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_priority: Option<String>,
    /// Workflow type of the execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<WorkflowType>,
    /// Tags attached to the execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<String>>,
}

/// Attributes of a `WorkflowExecutionSignaled` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionSignaledEventAttributes {
    /// Name of the signal received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_name: Option<String>,
    /// Input passed to the execution or activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Id of the `SignalExternalWorkflowExecutionInitiated` event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_initiated_event_id: Option<i64>,
}

/// Attributes of a `WorkflowExecutionCompleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionCompletedEventAttributes {
    /// Result reported on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Id of the `DecisionTaskCompleted` event that led to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_completed_event_id: Option<i64>,
}

/// Attributes of a `DecisionTaskScheduled` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTaskScheduledEventAttributes {
    /// Task list the work was scheduled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list: Option<TaskList>,
    /// Task priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_priority: Option<String>,
    /// Maximum task duration, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout: Option<String>,
}

/// Attributes shared by `DecisionTaskStarted` and `ActivityTaskStarted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStartedEventAttributes {
    /// Identity of the worker that picked up the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Id of the matching `*Scheduled` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_event_id: Option<i64>,
}

/// Attributes of a `DecisionTaskCompleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTaskCompletedEventAttributes {
    /// Context the decider attached to its response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_context: Option<String>,
    /// Id of the matching `*Scheduled` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_event_id: Option<i64>,
    /// Id of the matching `*Started` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
}

/// Attributes of an `ActivityTaskScheduled` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskScheduledEventAttributes {
    /// Activity type scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    /// Activity id assigned by the decider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Input passed to the execution or activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Data the decider attached for its own use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,
    /// Maximum wait before a worker picks the task up, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_to_start_timeout: Option<String>,
    /// Maximum total duration, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_to_close_timeout: Option<String>,
    /// Maximum task duration, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout: Option<String>,
    /// Maximum time between heartbeats, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<String>,
    /// Task list the work was scheduled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list: Option<TaskList>,
    /// Task priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_priority: Option<String>,
    /// Id of the `DecisionTaskCompleted` event that led to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_completed_event_id: Option<i64>,
}

/// Attributes of an `ActivityTaskCompleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskCompletedEventAttributes {
    /// Result reported on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Id of the matching `*Scheduled` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_event_id: Option<i64>,
    /// Id of the matching `*Started` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
}

/// Attributes of an `ActivityTaskFailed` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskFailedEventAttributes {
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Failure details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Id of the matching `*Scheduled` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_event_id: Option<i64>,
    /// Id of the matching `*Started` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
}

/// Attributes of a `TimerStarted` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStartedEventAttributes {
    /// Timer id assigned by the decider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_id: Option<String>,
    /// Data the decider attached for its own use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,
    /// Delay before the timer fires, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_to_fire_timeout: Option<String>,
    /// Id of the `DecisionTaskCompleted` event that led to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_task_completed_event_id: Option<i64>,
}

/// Attributes of a `TimerFired` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerFiredEventAttributes {
    /// Timer id assigned by the decider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_id: Option<String>,
    /// Id of the matching `*Started` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_event_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_event_reads_swf_json() {
        let event: HistoryEvent = serde_json::from_value(json!({
            "eventTimestamp": 1326592619474_i64,
            "eventType": "WorkflowExecutionStarted",
            "eventId": 1,
            "workflowExecutionStartedEventAttributes": {
                "input": "arbitrary-string-that-is-meaningful-to-the-workflow",
                "executionStartToCloseTimeout": "3600",
                "taskStartToCloseTimeout": "600",
                "childPolicy": "TERMINATE",
                "taskList": { "name": "specialTaskList" },
                "workflowType": { "name": "customerOrderWorkflow", "version": "1.0" },
                "tagList": ["music purchase", "digital"]
            }
        }))
        .unwrap();

        assert_eq!(event.event_id, Some(1));
        let attrs = event.workflow_execution_started_event_attributes.unwrap();
        assert_eq!(attrs.task_list, Some(TaskList::new("specialTaskList")));
        assert_eq!(attrs.tag_list.map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_event_without_attributes_serializes_common_fields() {
        let event = HistoryEvent {
            event_timestamp: Some(1_700_000_000_000),
            event_type: Some("MarkerRecorded".to_string()),
            event_id: Some(12),
            ..HistoryEvent::default()
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "eventTimestamp": 1_700_000_000_000_i64,
                "eventType": "MarkerRecorded",
                "eventId": 12
            })
        );
    }
}
