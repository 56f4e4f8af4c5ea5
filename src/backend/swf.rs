//! Amazon SWF coordination backend.
//!
//! [`SwfCoordinator`] issues `PollForActivityTask` / `PollForDecisionTask`
//! through the AWS SDK and converts the outputs into the crate's
//! serializable task views.
//!
//! # Empty long polls
//!
//! When a long poll times out SWF answers with an envelope that has no task
//! token. The SDK fills members the service model marks as required with
//! defaults (empty strings, zero ids, empty lists), so an empty poll shows up
//! as an output with an empty token. Such an output maps to `Ok(None)`, and
//! an empty event list maps to an absent one.
//!
//! # Usage
//!
//! ```rust,no_run
//! use swf_kinesis_bridge::backend::swf::SwfCoordinator;
//!
//! # async fn example() {
//! let sdk_config = swf_kinesis_bridge::backend::load_sdk_config().await;
//! let coordinator = SwfCoordinator::from_conf(&sdk_config);
//! # }
//! ```

use async_trait::async_trait;
use aws_sdk_swf::error::DisplayErrorContext;
use aws_sdk_swf::operation::poll_for_activity_task::PollForActivityTaskOutput;
use aws_sdk_swf::operation::poll_for_decision_task::PollForDecisionTaskOutput;
use aws_sdk_swf::types as sdk;
use aws_sdk_swf::Client;

use crate::backend::{CoordinationService, Present};
use crate::error::{BridgeError, BridgeResult};
use crate::types::{
    ActivityTask, ActivityTaskCompletedEventAttributes, ActivityTaskFailedEventAttributes,
    ActivityTaskScheduledEventAttributes, ActivityType, DecisionTask,
    DecisionTaskCompletedEventAttributes, DecisionTaskScheduledEventAttributes, HistoryEvent,
    PollForActivityTaskRequest, PollForDecisionTaskRequest, TaskList,
    TaskStartedEventAttributes, TimerFiredEventAttributes, TimerStartedEventAttributes,
    WorkflowExecution, WorkflowExecutionCompletedEventAttributes,
    WorkflowExecutionSignaledEventAttributes, WorkflowExecutionStartedEventAttributes,
    WorkflowType,
};

/// SWF-backed [`CoordinationService`].
#[derive(Debug, Clone)]
pub struct SwfCoordinator {
    client: Client,
}

impl SwfCoordinator {
    /// Wraps a pre-built SWF client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from shared SDK configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl CoordinationService for SwfCoordinator {
    async fn poll_for_activity_task(
        &self,
        request: &PollForActivityTaskRequest,
    ) -> BridgeResult<Option<ActivityTask>> {
        let task_list = &request.task_list.name;
        let output = self
            .client
            .poll_for_activity_task()
            .domain(&request.domain)
            .task_list(sdk_task_list(&request.task_list)?)
            .set_identity(request.identity.clone())
            .send()
            .await
            .map_err(|e| map_sdk_error(e, task_list))?;

        Ok(activity_task_from(&output))
    }

    async fn poll_for_decision_task(
        &self,
        request: &PollForDecisionTaskRequest,
    ) -> BridgeResult<Option<DecisionTask>> {
        let task_list = &request.task_list.name;
        let output = self
            .client
            .poll_for_decision_task()
            .domain(&request.domain)
            .task_list(sdk_task_list(&request.task_list)?)
            .set_identity(request.identity.clone())
            .set_next_page_token(request.next_page_token.clone())
            .set_maximum_page_size(request.maximum_page_size)
            .set_reverse_order(request.reverse_order)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, task_list))?;

        Ok(decision_task_from(&output))
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Maps an AWS SDK error to a [`BridgeError::Poll`].
fn map_sdk_error(
    err: impl std::error::Error + Send + Sync + 'static,
    task_list: &str,
) -> BridgeError {
    BridgeError::Poll {
        task_list: task_list.to_string(),
        message: DisplayErrorContext(&err).to_string(),
        source: Some(Box::new(err)),
    }
}

fn sdk_task_list(task_list: &TaskList) -> BridgeResult<sdk::TaskList> {
    sdk::TaskList::builder()
        .name(&task_list.name)
        .build()
        .map_err(|e| map_sdk_error(e, &task_list.name))
}

/// Owned, non-empty text.
fn text(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Event ids start at 1; zero is a defaulted member.
fn id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id != 0)
}

fn activity_task_from(output: &PollForActivityTaskOutput) -> Option<ActivityTask> {
    let task_token = text(output.task_token().present())?;
    Some(ActivityTask {
        task_token: Some(task_token),
        activity_id: text(output.activity_id().present()),
        started_event_id: id(output.started_event_id().present()),
        workflow_execution: output
            .workflow_execution()
            .present()
            .map(workflow_execution_from),
        activity_type: output.activity_type().present().map(activity_type_from),
        input: text(output.input().present()),
    })
}

fn decision_task_from(output: &PollForDecisionTaskOutput) -> Option<DecisionTask> {
    let task_token = text(output.task_token().present())?;
    let events = output
        .events()
        .present()
        .filter(|events| !events.is_empty())
        .map(|events| events.iter().map(history_event_from).collect());

    Some(DecisionTask {
        task_token: Some(task_token),
        started_event_id: id(output.started_event_id().present()),
        workflow_execution: output
            .workflow_execution()
            .present()
            .map(workflow_execution_from),
        workflow_type: output.workflow_type().present().map(workflow_type_from),
        events,
        next_page_token: text(output.next_page_token().present()),
        previous_started_event_id: id(output.previous_started_event_id().present()),
    })
}

fn workflow_execution_from(execution: &sdk::WorkflowExecution) -> WorkflowExecution {
    WorkflowExecution {
        workflow_id: text(execution.workflow_id().present()),
        run_id: text(execution.run_id().present()),
    }
}

fn workflow_type_from(workflow_type: &sdk::WorkflowType) -> WorkflowType {
    WorkflowType {
        name: text(workflow_type.name().present()),
        version: text(workflow_type.version().present()),
    }
}

fn activity_type_from(activity_type: &sdk::ActivityType) -> ActivityType {
    ActivityType {
        name: text(activity_type.name().present()),
        version: text(activity_type.version().present()),
    }
}

fn task_list_from(task_list: &sdk::TaskList) -> TaskList {
    TaskList::new(task_list.name().present().unwrap_or_default())
}

fn history_event_from(event: &sdk::HistoryEvent) -> HistoryEvent {
    HistoryEvent {
        event_timestamp: event
            .event_timestamp()
            .present()
            .and_then(|ts| ts.to_millis().ok()),
        event_type: event
            .event_type()
            .present()
            .map(|t| t.as_str().to_string()),
        event_id: id(event.event_id().present()),

        workflow_execution_started_event_attributes: event
            .workflow_execution_started_event_attributes()
            .present()
            .map(|a| WorkflowExecutionStartedEventAttributes {
                input: text(a.input().present()),
                execution_start_to_close_timeout: text(
                    a.execution_start_to_close_timeout().present(),
                ),
                task_start_to_close_timeout: text(a.task_start_to_close_timeout().present()),
                child_policy: a.child_policy().present().map(|p| p.as_str().to_string()),
                task_list: a.task_list().present().map(task_list_from),
                task_priority: text(a.task_priority().present()),
                workflow_type: a.workflow_type().present().map(workflow_type_from),
                tag_list: a
                    .tag_list()
                    .present()
                    .filter(|tags| !tags.is_empty())
                    .map(|tags| tags.to_vec()),
            }),
        workflow_execution_signaled_event_attributes: event
            .workflow_execution_signaled_event_attributes()
            .present()
            .map(|a| WorkflowExecutionSignaledEventAttributes {
                signal_name: text(a.signal_name().present()),
                input: text(a.input().present()),
                external_initiated_event_id: id(a.external_initiated_event_id().present()),
            }),
        workflow_execution_completed_event_attributes: event
            .workflow_execution_completed_event_attributes()
            .present()
            .map(|a| WorkflowExecutionCompletedEventAttributes {
                result: text(a.result().present()),
                decision_task_completed_event_id: id(
                    a.decision_task_completed_event_id().present(),
                ),
            }),
        decision_task_scheduled_event_attributes: event
            .decision_task_scheduled_event_attributes()
            .present()
            .map(|a| DecisionTaskScheduledEventAttributes {
                task_list: a.task_list().present().map(task_list_from),
                task_priority: text(a.task_priority().present()),
                start_to_close_timeout: text(a.start_to_close_timeout().present()),
            }),
        decision_task_started_event_attributes: event
            .decision_task_started_event_attributes()
            .present()
            .map(|a| TaskStartedEventAttributes {
                identity: text(a.identity().present()),
                scheduled_event_id: id(a.scheduled_event_id().present()),
            }),
        decision_task_completed_event_attributes: event
            .decision_task_completed_event_attributes()
            .present()
            .map(|a| DecisionTaskCompletedEventAttributes {
                execution_context: text(a.execution_context().present()),
                scheduled_event_id: id(a.scheduled_event_id().present()),
                started_event_id: id(a.started_event_id().present()),
            }),
        activity_task_scheduled_event_attributes: event
            .activity_task_scheduled_event_attributes()
            .present()
            .map(|a| ActivityTaskScheduledEventAttributes {
                activity_type: a.activity_type().present().map(activity_type_from),
                activity_id: text(a.activity_id().present()),
                input: text(a.input().present()),
                control: text(a.control().present()),
                schedule_to_start_timeout: text(a.schedule_to_start_timeout().present()),
                schedule_to_close_timeout: text(a.schedule_to_close_timeout().present()),
                start_to_close_timeout: text(a.start_to_close_timeout().present()),
                heartbeat_timeout: text(a.heartbeat_timeout().present()),
                task_list: a.task_list().present().map(task_list_from),
                task_priority: text(a.task_priority().present()),
                decision_task_completed_event_id: id(
                    a.decision_task_completed_event_id().present(),
                ),
            }),
        activity_task_started_event_attributes: event
            .activity_task_started_event_attributes()
            .present()
            .map(|a| TaskStartedEventAttributes {
                identity: text(a.identity().present()),
                scheduled_event_id: id(a.scheduled_event_id().present()),
            }),
        activity_task_completed_event_attributes: event
            .activity_task_completed_event_attributes()
            .present()
            .map(|a| ActivityTaskCompletedEventAttributes {
                result: text(a.result().present()),
                scheduled_event_id: id(a.scheduled_event_id().present()),
                started_event_id: id(a.started_event_id().present()),
            }),
        activity_task_failed_event_attributes: event
            .activity_task_failed_event_attributes()
            .present()
            .map(|a| ActivityTaskFailedEventAttributes {
                reason: text(a.reason().present()),
                details: text(a.details().present()),
                scheduled_event_id: id(a.scheduled_event_id().present()),
                started_event_id: id(a.started_event_id().present()),
            }),
        timer_started_event_attributes: event
            .timer_started_event_attributes()
            .present()
            .map(|a| TimerStartedEventAttributes {
                timer_id: text(a.timer_id().present()),
                control: text(a.control().present()),
                start_to_fire_timeout: text(a.start_to_fire_timeout().present()),
                decision_task_completed_event_id: id(
                    a.decision_task_completed_event_id().present(),
                ),
            }),
        timer_fired_event_attributes: event
            .timer_fired_event_attributes()
            .present()
            .map(|a| TimerFiredEventAttributes {
                timer_id: text(a.timer_id().present()),
                started_event_id: id(a.started_event_id().present()),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_swf::primitives::DateTime;

    fn execution() -> sdk::WorkflowExecution {
        sdk::WorkflowExecution::builder()
            .workflow_id("ExampleWorkflow-1")
            .run_id("run-1")
            .build()
            .unwrap()
    }

    fn workflow_type() -> sdk::WorkflowType {
        sdk::WorkflowType::builder()
            .name("ExampleWorkflow")
            .version("1.0")
            .build()
            .unwrap()
    }

    fn activity_output(task_token: &str) -> PollForActivityTaskOutput {
        PollForActivityTaskOutput::builder()
            .task_token(task_token)
            .activity_id("charge-1")
            .started_event_id(6)
            .workflow_execution(execution())
            .activity_type(
                sdk::ActivityType::builder()
                    .name("Charge")
                    .version("1.0")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_token_is_no_task() {
        assert_eq!(activity_task_from(&activity_output("")), None);
    }

    #[test]
    fn test_activity_output_conversion() {
        let task = activity_task_from(&activity_output("token-1")).unwrap();
        assert_eq!(task.task_token.as_deref(), Some("token-1"));
        assert_eq!(task.activity_id.as_deref(), Some("charge-1"));
        assert_eq!(task.started_event_id, Some(6));
        assert_eq!(task.workflow_id(), Some("ExampleWorkflow-1"));
        assert_eq!(
            task.activity_type.and_then(|t| t.name).as_deref(),
            Some("Charge")
        );
        assert_eq!(task.input, None);
    }

    #[test]
    fn test_decision_output_conversion() {
        let event = sdk::HistoryEvent::builder()
            .event_timestamp(DateTime::from_millis(1_326_592_619_474))
            .event_type(sdk::EventType::WorkflowExecutionStarted)
            .event_id(1)
            .workflow_execution_started_event_attributes(
                sdk::WorkflowExecutionStartedEventAttributes::builder()
                    .input("hello")
                    .child_policy(sdk::ChildPolicy::Terminate)
                    .task_list(sdk::TaskList::builder().name("swf-tasklist").build().unwrap())
                    .workflow_type(workflow_type())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let output = PollForDecisionTaskOutput::builder()
            .task_token("ZXJhdCwgdXQgcGhhcmV0cmEgbGVjdHV==")
            .started_event_id(3)
            .workflow_execution(execution())
            .workflow_type(workflow_type())
            .events(event)
            .build()
            .unwrap();

        let task = decision_task_from(&output).unwrap();
        assert_eq!(task.workflow_id(), Some("ExampleWorkflow-1"));
        assert_eq!(task.previous_started_event_id, None);
        let events = task.events.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, Some(1));
        assert_eq!(events[0].event_timestamp, Some(1_326_592_619_474));
        assert_eq!(
            events[0].event_type.as_deref(),
            Some("WorkflowExecutionStarted")
        );
        let attrs = events[0]
            .workflow_execution_started_event_attributes
            .clone()
            .unwrap();
        assert_eq!(attrs.child_policy.as_deref(), Some("TERMINATE"));
        assert_eq!(attrs.task_list, Some(TaskList::new("swf-tasklist")));
        assert_eq!(attrs.tag_list, None);
    }

    #[test]
    fn test_decision_without_events_has_absent_list() {
        let output = PollForDecisionTaskOutput::builder()
            .task_token("token")
            .started_event_id(3)
            .workflow_execution(execution())
            .workflow_type(workflow_type())
            .set_events(Some(Vec::new()))
            .build()
            .unwrap();
        let task = decision_task_from(&output).unwrap();
        assert_eq!(task.events, None);
    }
}
