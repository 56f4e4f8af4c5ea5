//! Poll request views.
//!
//! A request is built fresh for every poll attempt and carried verbatim into
//! the published record so consumers can see exactly what was asked for.

use serde::{Deserialize, Serialize};

use crate::constants::{DECISION_PAGE_SIZE, DECISION_REVERSE_ORDER};
use crate::types::queue::TaskList;

/// Parameters of one `PollForActivityTask` call.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::{PollForActivityTaskRequest, TaskList};
///
/// let poll = PollForActivityTaskRequest::new("billing", TaskList::new("charges"));
/// assert_eq!(
///     serde_json::to_string(&poll).unwrap(),
///     r#"{"domain":"billing","taskList":{"name":"charges"}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollForActivityTaskRequest {
    /// Workflow domain.
    pub domain: String,
    /// Task list polled.
    pub task_list: TaskList,
    /// Poller identity recorded in `ActivityTaskStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

impl PollForActivityTaskRequest {
    /// Creates an activity poll for `task_list` in `domain`.
    pub fn new(domain: impl Into<String>, task_list: TaskList) -> Self {
        Self {
            domain: domain.into(),
            task_list,
            identity: None,
        }
    }

    /// Sets the poller identity.
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }
}

/// Parameters of one `PollForDecisionTask` call.
///
/// [`new`](Self::new) fixes the page size at one event and asks for the
/// newest events first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollForDecisionTaskRequest {
    /// Workflow domain.
    pub domain: String,
    /// Task list polled.
    pub task_list: TaskList,
    /// Poller identity recorded in `DecisionTaskStarted` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Continuation token for paging through a long history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Maximum history events per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_page_size: Option<i32>,
    /// Whether events come newest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_order: Option<bool>,
}

impl PollForDecisionTaskRequest {
    /// Creates a decision poll for `task_list` in `domain`.
    pub fn new(domain: impl Into<String>, task_list: TaskList) -> Self {
        Self {
            domain: domain.into(),
            task_list,
            identity: None,
            next_page_token: None,
            maximum_page_size: Some(DECISION_PAGE_SIZE),
            reverse_order: Some(DECISION_REVERSE_ORDER),
        }
    }

    /// Sets the poller identity.
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decision_request_fixed_options() {
        let poll = PollForDecisionTaskRequest::new("swf-domain", TaskList::new("swf-tasklist"));
        assert_eq!(
            serde_json::to_value(&poll).unwrap(),
            json!({
                "domain": "swf-domain",
                "taskList": { "name": "swf-tasklist" },
                "maximumPageSize": 1,
                "reverseOrder": true
            })
        );
    }

    #[test]
    fn test_identity_serialized_only_when_set() {
        let poll = PollForActivityTaskRequest::new("d", TaskList::new("q"))
            .with_identity(Some("bridge-1".to_string()));
        let value = serde_json::to_value(&poll).unwrap();
        assert_eq!(value["identity"], "bridge-1");

        let poll = PollForActivityTaskRequest::new("d", TaskList::new("q")).with_identity(None);
        let value = serde_json::to_value(&poll).unwrap();
        assert!(value.get("identity").is_none());
    }

    #[test]
    fn test_request_drops_sdk_bookkeeping_on_deserialize() {
        let poll: PollForActivityTaskRequest = serde_json::from_value(json!({
            "domain": "d",
            "taskList": { "name": "q" },
            "customRequestHeaders": { "x-trace": "1" },
            "readLimit": 131073
        }))
        .unwrap();
        let out = serde_json::to_value(&poll).unwrap();
        assert_eq!(out, json!({ "domain": "d", "taskList": { "name": "q" } }));
    }
}
