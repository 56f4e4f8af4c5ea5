//! Assembles stream records and publishes them.
//!
//! A record is a JSON object with exactly two entries: the poll request under
//! its operation name, then the task under its task name.
//!
//! ```text
//! {"pollForDecisionTask": {...}, "decisionTask": {...}}
//! ```
//!
//! The request and task views only carry service-model fields, so nothing
//! the SDK keeps for its own bookkeeping can leak into a payload. Absent
//! fields are omitted and a view with nothing set encodes as `{}`.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::backend::{EventStream, PutRecordReceipt};
use crate::error::BridgeResult;

/// The two-entry record published for one task. Request first, task second.
///
/// # Examples
///
/// ```
/// use swf_kinesis_bridge::forwarder::StreamRecord;
/// use swf_kinesis_bridge::{ActivityTask, PollForActivityTaskRequest, TaskList};
///
/// let request = PollForActivityTaskRequest::new("billing", TaskList::new("charges"));
/// let task = ActivityTask::default();
/// let record = StreamRecord::new("pollForActivityTask", &request, "activityTask", &task);
///
/// assert_eq!(
///     serde_json::to_string(&record).unwrap(),
///     r#"{"pollForActivityTask":{"domain":"billing","taskList":{"name":"charges"}},"activityTask":{}}"#
/// );
/// ```
#[derive(Debug)]
pub struct StreamRecord<'a, R, T> {
    request_type: &'a str,
    request: &'a R,
    task_type: &'a str,
    task: &'a T,
}

impl<'a, R, T> StreamRecord<'a, R, T> {
    /// Pairs a request with the task it produced.
    pub fn new(request_type: &'a str, request: &'a R, task_type: &'a str, task: &'a T) -> Self {
        Self {
            request_type,
            request,
            task_type,
            task,
        }
    }
}

impl<R: Serialize, T: Serialize> Serialize for StreamRecord<'_, R, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.request_type, self.request)?;
        map.serialize_entry(self.task_type, self.task)?;
        map.end()
    }
}

/// Publishes task records to one stream.
///
/// Cheap to clone; every worker holds its own copy sharing the same
/// [`EventStream`].
#[derive(Clone)]
pub struct TaskForwarder {
    stream: Arc<dyn EventStream>,
    stream_name: String,
}

impl std::fmt::Debug for TaskForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskForwarder")
            .field("stream_name", &self.stream_name)
            .finish_non_exhaustive()
    }
}

impl TaskForwarder {
    /// Creates a forwarder publishing to `stream_name`.
    pub fn new(stream: Arc<dyn EventStream>, stream_name: impl Into<String>) -> Self {
        Self {
            stream,
            stream_name: stream_name.into(),
        }
    }

    /// Serializes `{request_type: request, task_type: task}` and publishes it
    /// with `workflow_id` as partition key.
    ///
    /// Nothing is published if serialization fails.
    pub async fn put_record<R, T>(
        &self,
        workflow_id: &str,
        request_type: &str,
        request: &R,
        task_type: &str,
        task: &T,
    ) -> BridgeResult<PutRecordReceipt>
    where
        R: Serialize + Sync,
        T: Serialize + Sync,
    {
        let data = serde_json::to_vec(&StreamRecord::new(request_type, request, task_type, task))?;

        info!(
            stream = %self.stream_name,
            partition_key = %workflow_id,
            payload = %String::from_utf8_lossy(&data),
            "Publishing task record"
        );

        let receipt = self
            .stream
            .put_record(&self.stream_name, workflow_id, data)
            .await?;

        debug!(
            stream = %self.stream_name,
            partition_key = %workflow_id,
            shard_id = %receipt.shard_id,
            sequence_number = %receipt.sequence_number,
            "Record accepted"
        );
        Ok(receipt)
    }
}
