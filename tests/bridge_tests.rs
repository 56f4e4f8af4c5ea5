//! End-to-end behavior of the bridge against the in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use swf_kinesis_bridge::backend::memory::{InMemoryCoordinator, RecordingStream};
use swf_kinesis_bridge::{
    ActivityTask, BridgeConfig, CycleOutcome, DecisionTask, Poller, QueueDescriptor, Supervisor,
    SupervisorHandle, TaskForwarder, TaskList, WorkflowExecution,
};

const DOMAIN: &str = "swf-domain";
const TASK_LIST: &str = "swf-tasklist";
const STREAM: &str = "kinesis-streamname";
const TOKEN: &str = "ZXJhdCwgdXQgcGhhcmV0cmEgbGVjdHV==";

const BOOKKEEPING_FIELDS: &[&str] = &[
    "requestMetricCollector",
    "requestCredentials",
    "requestCredentialsProvider",
    "requestClientOptions",
    "generalProgressListener",
    "customRequestHeaders",
    "customQueryParameters",
    "readLimit",
    "sdkResponseMetadata",
];

fn fixture_decision_task() -> DecisionTask {
    serde_json::from_str(include_str!("fixtures/decision_task.json"))
        .expect("fixture parses as a decision task")
}

fn backends() -> (Arc<InMemoryCoordinator>, Arc<RecordingStream>) {
    (
        Arc::new(InMemoryCoordinator::new().with_idle_poll(Duration::from_millis(5))),
        Arc::new(RecordingStream::new()),
    )
}

fn poller(coordinator: &Arc<InMemoryCoordinator>, stream: &Arc<RecordingStream>) -> Poller {
    Poller::new(
        DOMAIN,
        coordinator.clone(),
        TaskForwarder::new(stream.clone(), STREAM),
    )
}

async fn wait_for_cycles(handle: &SupervisorHandle, queue: &QueueDescriptor, cycles: u64) {
    let stats = handle.stats(queue).expect("queue has a worker");
    tokio::time::timeout(Duration::from_secs(5), async {
        while stats.cycles() < cycles {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("worker reached the expected cycle count");
}

fn contains_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(key) || map.values().any(|v| contains_key(v, key))
        },
        Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
        _ => false,
    }
}

#[tokio::test]
async fn test_decision_task_reaches_stream_end_to_end() {
    let (coordinator, stream) = backends();
    coordinator.push_decision_task(TASK_LIST, fixture_decision_task());

    let config = BridgeConfig::new(DOMAIN, STREAM)
        .with_decision_task_lists(vec![TaskList::new(TASK_LIST)]);
    let handle = Supervisor::from_config(&config, coordinator.clone(), stream.clone()).start();

    let queue = QueueDescriptor::decision(TaskList::new(TASK_LIST));
    wait_for_cycles(&handle, &queue, 3).await;
    handle.shutdown();
    handle.wait().await;

    let records = stream.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].stream_name, STREAM);
    assert_eq!(records[0].partition_key, "ExampleWorkflow-1");

    let payload = records[0].json().unwrap();
    let keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["pollForDecisionTask", "decisionTask"]);

    assert_eq!(payload["pollForDecisionTask"]["domain"], json!(DOMAIN));
    assert_eq!(
        payload["pollForDecisionTask"]["taskList"]["name"],
        json!(TASK_LIST)
    );
    assert_eq!(payload["decisionTask"]["taskToken"], json!(TOKEN));
    assert_eq!(payload["decisionTask"]["events"].as_array().unwrap().len(), 1);
    assert_eq!(
        payload["decisionTask"]["workflowType"]["name"],
        json!("ExampleWorkflow")
    );
    assert_eq!(
        payload["decisionTask"]["events"][0]["eventTimestamp"],
        json!(1_700_000_000_123_i64)
    );
    assert_eq!(payload["decisionTask"]["startedEventId"], json!(3));
    assert!(payload["decisionTask"].get("previousStartedEventId").is_none());
}

#[tokio::test]
async fn test_decision_poll_options_are_fixed() {
    let (coordinator, stream) = backends();
    let poller = poller(&coordinator, &stream).with_identity(Some("bridge-host".to_string()));

    poller
        .poll_for_decision_task(&TaskList::new(TASK_LIST))
        .await
        .unwrap();

    let request = serde_json::to_value(&coordinator.decision_requests()[0]).unwrap();
    assert_eq!(
        request,
        json!({
            "domain": DOMAIN,
            "taskList": {"name": TASK_LIST},
            "identity": "bridge-host",
            "maximumPageSize": 1,
            "reverseOrder": true
        })
    );
}

#[tokio::test]
async fn test_bookkeeping_fields_never_reach_the_stream() {
    let (coordinator, stream) = backends();
    coordinator.push_decision_task(TASK_LIST, fixture_decision_task());

    poller(&coordinator, &stream)
        .poll_for_decision_task(&TaskList::new(TASK_LIST))
        .await
        .unwrap();

    let payload = stream.records()[0].json().unwrap();
    for field in BOOKKEEPING_FIELDS {
        assert!(!contains_key(&payload, field), "{field} leaked into payload");
    }
}

#[tokio::test]
async fn test_decision_without_events_publishes_nothing() {
    let (coordinator, stream) = backends();
    let mut task = fixture_decision_task();
    task.events = None;
    coordinator.push_decision_task(TASK_LIST, task);
    coordinator.push_decision_empty(TASK_LIST);

    let poller = poller(&coordinator, &stream);
    for _ in 0..2 {
        let outcome = poller
            .poll_for_decision_task(&TaskList::new(TASK_LIST))
            .await
            .unwrap();
        assert!(!outcome.is_published());
    }
    assert!(stream.records().is_empty());
}

#[tokio::test]
async fn test_activity_without_type_publishes_nothing() {
    let (coordinator, stream) = backends();
    coordinator.push_activity_task(
        "activities",
        ActivityTask {
            task_token: Some(TOKEN.to_string()),
            workflow_execution: Some(WorkflowExecution {
                workflow_id: Some("ExampleWorkflow-1".to_string()),
                run_id: None,
            }),
            ..ActivityTask::default()
        },
    );

    let outcome = poller(&coordinator, &stream)
        .poll_for_activity_task(&TaskList::new("activities"))
        .await
        .unwrap();
    assert!(!outcome.is_published());
    assert!(stream.records().is_empty());
}

#[tokio::test]
async fn test_empty_activity_poll_publishes_nothing() {
    let (coordinator, stream) = backends();
    coordinator.push_activity_empty("activities");

    let outcome = poller(&coordinator, &stream)
        .poll_and_forward(&QueueDescriptor::activity(TaskList::new("activities")))
        .await
        .unwrap();
    assert_eq!(outcome, CycleOutcome::Empty);
    assert!(stream.records().is_empty());
}

#[tokio::test]
async fn test_activity_task_record_shape() {
    let (coordinator, stream) = backends();
    let task: ActivityTask = serde_json::from_value(json!({
        "taskToken": "act-token",
        "activityId": "charge-1",
        "startedEventId": 9,
        "workflowExecution": {"workflowId": "order-1", "runId": "r1"},
        "activityType": {"name": "Charge", "version": "2"},
        "input": "{\"amount\":10}",
        "readLimit": 131073
    }))
    .unwrap();
    coordinator.push_activity_task("activities", task);

    poller(&coordinator, &stream)
        .poll_for_activity_task(&TaskList::new("activities"))
        .await
        .unwrap();

    let records = stream.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].partition_key, "order-1");
    assert_eq!(
        records[0].json().unwrap(),
        json!({
            "pollForActivityTask": {
                "domain": DOMAIN,
                "taskList": {"name": "activities"}
            },
            "activityTask": {
                "taskToken": "act-token",
                "activityId": "charge-1",
                "startedEventId": 9,
                "workflowExecution": {"workflowId": "order-1", "runId": "r1"},
                "activityType": {"name": "Charge", "version": "2"},
                "input": "{\"amount\":10}"
            }
        })
    );
}

#[tokio::test]
async fn test_records_of_one_workflow_keep_poll_order() {
    let (coordinator, stream) = backends();
    for token in ["first", "second", "third"] {
        let mut task = fixture_decision_task();
        task.task_token = Some(token.to_string());
        coordinator.push_decision_task(TASK_LIST, task);
    }

    let poller = poller(&coordinator, &stream);
    for _ in 0..3 {
        poller
            .poll_for_decision_task(&TaskList::new(TASK_LIST))
            .await
            .unwrap();
    }

    let tokens: Vec<Value> = stream
        .records_for("ExampleWorkflow-1")
        .iter()
        .map(|r| r.json().unwrap()["decisionTask"]["taskToken"].clone())
        .collect();
    assert_eq!(tokens, vec![json!("first"), json!("second"), json!("third")]);
}
