//! Amazon Kinesis stream backend.

use async_trait::async_trait;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client;

use crate::backend::{EventStream, Present, PutRecordReceipt};
use crate::error::{BridgeError, BridgeResult};

/// Kinesis-backed [`EventStream`] publishing one `PutRecord` per task.
///
/// # Examples
///
/// ```rust,no_run
/// use swf_kinesis_bridge::backend::kinesis::KinesisStream;
///
/// # async fn example() {
/// let sdk_config = swf_kinesis_bridge::backend::load_sdk_config().await;
/// let stream = KinesisStream::from_conf(&sdk_config);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KinesisStream {
    client: Client,
}

impl KinesisStream {
    /// Wraps a pre-built Kinesis client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from shared SDK configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl EventStream for KinesisStream {
    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> BridgeResult<PutRecordReceipt> {
        let output = self
            .client
            .put_record()
            .stream_name(stream_name)
            .partition_key(partition_key)
            .data(Blob::new(data))
            .send()
            .await
            .map_err(|e| BridgeError::Publish {
                stream: stream_name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(PutRecordReceipt {
            shard_id: output.shard_id().present().unwrap_or_default().to_string(),
            sequence_number: output
                .sequence_number()
                .present()
                .unwrap_or_default()
                .to_string(),
        })
    }
}
