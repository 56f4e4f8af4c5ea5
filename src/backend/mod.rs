//! Service seams: the coordination service polled for tasks and the event
//! stream records are published to.
//!
//! The bridge only ever talks to these two traits. [`memory`] provides
//! scripted, in-process implementations; with the `aws` feature, [`swf`] and
//! [`kinesis`] adapt the AWS SDK clients.
//!
//! Implementations are shared by every worker behind an `Arc`, so they must
//! be `Send + Sync` and hold no per-call mutable state.

use async_trait::async_trait;

use crate::error::BridgeResult;
use crate::types::{
    ActivityTask, DecisionTask, PollForActivityTaskRequest, PollForDecisionTaskRequest,
};

pub mod memory;

#[cfg(feature = "aws")]
pub mod kinesis;
#[cfg(feature = "aws")]
pub mod swf;

/// Long-polling task source (Amazon SWF).
///
/// Both calls may block for tens of seconds. `Ok(None)` means the long poll
/// ended without a task. A returned task may still be an empty envelope; the
/// caller checks [`Task::is_present`](crate::types::Task::is_present).
#[async_trait]
pub trait CoordinationService: Send + Sync {
    /// Polls an activity task list.
    async fn poll_for_activity_task(
        &self,
        request: &PollForActivityTaskRequest,
    ) -> BridgeResult<Option<ActivityTask>>;

    /// Polls a decision task list.
    async fn poll_for_decision_task(
        &self,
        request: &PollForDecisionTaskRequest,
    ) -> BridgeResult<Option<DecisionTask>>;
}

/// Acknowledgement of a published record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PutRecordReceipt {
    /// Shard the record landed on.
    pub shard_id: String,
    /// Sequence number assigned within the shard.
    pub sequence_number: String,
}

/// Partitioned record stream (Amazon Kinesis).
#[async_trait]
pub trait EventStream: Send + Sync {
    /// Publishes one record. Records sharing a partition key keep their
    /// relative order.
    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> BridgeResult<PutRecordReceipt>;
}

/// Loads the shared AWS SDK configuration.
///
/// The region comes from the default provider chain (environment, profile,
/// instance metadata) and falls back to
/// [`FALLBACK_REGION`](crate::constants::FALLBACK_REGION).
#[cfg(feature = "aws")]
pub async fn load_sdk_config() -> aws_config::SdkConfig {
    use aws_config::meta::region::RegionProviderChain;
    use aws_config::{BehaviorVersion, Region};

    use crate::constants::FALLBACK_REGION;

    let region = RegionProviderChain::default_provider().or_else(Region::new(FALLBACK_REGION));
    aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .load()
        .await
}

#[cfg(feature = "aws")]
/// Uniform access to SDK members whether the model marks them required
/// (plain value) or optional (`Option`).
pub(crate) trait Present {
    type Item;

    fn present(self) -> Option<Self::Item>;
}

#[cfg(feature = "aws")]
impl<'a, T: ?Sized> Present for &'a T {
    type Item = &'a T;

    fn present(self) -> Option<&'a T> {
        Some(self)
    }
}

#[cfg(feature = "aws")]
impl<'a, T: ?Sized> Present for Option<&'a T> {
    type Item = &'a T;

    fn present(self) -> Option<&'a T> {
        self
    }
}

#[cfg(feature = "aws")]
impl Present for i64 {
    type Item = i64;

    fn present(self) -> Option<i64> {
        Some(self)
    }
}

#[cfg(feature = "aws")]
impl Present for Option<i64> {
    type Item = i64;

    fn present(self) -> Option<i64> {
        self
    }
}
