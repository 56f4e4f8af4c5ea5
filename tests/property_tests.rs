//! Property-based tests using proptest.
//!
//! Covers task list parsing, queue deduplication, and the invariant that a
//! stream record always has exactly two keys, request first.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;

use swf_kinesis_bridge::backend::memory::{InMemoryCoordinator, RecordingStream};
use swf_kinesis_bridge::config::parse_task_lists;
use swf_kinesis_bridge::forwarder::StreamRecord;
use swf_kinesis_bridge::{
    DecisionTask, Poller, PollForDecisionTaskRequest, Supervisor, TaskForwarder, TaskList,
    WorkflowExecution,
};

// ─── Arbitrary Strategies ───────────────────────────────────────────────────

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}"
}

/// A name surrounded by random spaces and tabs.
fn arb_padded_name() -> impl Strategy<Value = (String, String)> {
    (arb_name(), "[ \t]{0,3}", "[ \t]{0,3}")
        .prop_map(|(name, left, right)| (name.clone(), format!("{left}{name}{right}")))
}

fn poller() -> Poller {
    Poller::new(
        "domain",
        Arc::new(InMemoryCoordinator::new()),
        TaskForwarder::new(Arc::new(RecordingStream::new()), "stream"),
    )
}

// ─── Property Tests: Task List Parsing ──────────────────────────────────────

proptest! {
    /// Parsing keeps every non-blank entry, trimmed, in order, duplicates
    /// included.
    #[test]
    fn parse_keeps_trimmed_entries_in_order(
        entries in proptest::collection::vec(arb_padded_name(), 0..8),
        blanks in proptest::collection::vec(0usize..8, 0..4),
    ) {
        let mut raw: Vec<String> = entries.iter().map(|(_, padded)| padded.clone()).collect();
        for at in blanks {
            let at = at.min(raw.len());
            raw.insert(at, "  ".to_string());
        }
        let joined = raw.join(",");

        let parsed: Vec<String> = parse_task_lists(Some(&joined))
            .into_iter()
            .map(|t| t.name)
            .collect();
        let expected: Vec<String> = entries.into_iter().map(|(name, _)| name).collect();
        prop_assert_eq!(parsed, expected);
    }

    /// Parsed names are never empty and never carry surrounding whitespace.
    #[test]
    fn parsed_names_are_trimmed_and_non_empty(raw in "[a-z ,\t]{0,40}") {
        for task_list in parse_task_lists(Some(&raw)) {
            prop_assert!(!task_list.name.is_empty());
            prop_assert_eq!(task_list.name.trim(), task_list.name.as_str());
        }
    }
}

// ─── Property Tests: Queue Deduplication ────────────────────────────────────

proptest! {
    /// One worker per distinct (kind, name) pair, and the pool is never empty.
    #[test]
    fn one_queue_per_distinct_descriptor(
        activity in proptest::collection::vec("[a-c]", 0..6),
        decision in proptest::collection::vec("[a-c]", 0..6),
    ) {
        let supervisor = Supervisor::new(
            activity.iter().map(TaskList::new),
            decision.iter().map(TaskList::new),
            poller(),
        );

        let distinct_activity: HashSet<&String> = activity.iter().collect();
        let distinct_decision: HashSet<&String> = decision.iter().collect();
        let distinct = distinct_activity.len() + distinct_decision.len();

        prop_assert_eq!(supervisor.queues().len(), distinct);
        prop_assert_eq!(supervisor.pool_size(), distinct.max(1));
    }
}

// ─── Property Tests: Record Shape ───────────────────────────────────────────

proptest! {
    /// A record always has exactly two keys, request first, whatever the
    /// task carries.
    #[test]
    fn record_has_two_keys_request_first(
        token in proptest::option::of("[A-Za-z0-9+/=]{0,24}"),
        workflow_id in proptest::option::of(arb_name()),
        with_events in any::<bool>(),
    ) {
        let request = PollForDecisionTaskRequest::new("domain", TaskList::new("list"));
        let task = DecisionTask {
            task_token: token,
            workflow_execution: workflow_id.map(|id| WorkflowExecution {
                workflow_id: Some(id),
                run_id: None,
            }),
            events: with_events.then(Vec::new),
            ..DecisionTask::default()
        };

        let value = serde_json::to_value(StreamRecord::new(
            "pollForDecisionTask",
            &request,
            "decisionTask",
            &task,
        ))
        .unwrap();

        let Value::Object(map) = value else {
            return Err(TestCaseError::fail("record is not an object"));
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        prop_assert_eq!(keys, vec!["pollForDecisionTask", "decisionTask"]);
    }

    /// Arbitrary JSON never makes task deserialization panic.
    #[test]
    fn fuzz_decision_task_deserialization(s in "\\PC{0,256}") {
        let _ = serde_json::from_str::<DecisionTask>(&s);
    }
}
