//! `swf-kinesis-bridge` binary.
//!
//! Reads configuration from the environment (and `.env` if present), starts
//! one worker per task list and runs until ctrl-c.

use std::sync::Arc;

use anyhow::Context;
use swf_kinesis_bridge::backend::kinesis::KinesisStream;
use swf_kinesis_bridge::backend::load_sdk_config;
use swf_kinesis_bridge::backend::swf::SwfCoordinator;
use swf_kinesis_bridge::config::load_env_file;
use swf_kinesis_bridge::{BridgeConfig, Supervisor};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file().context("invalid .env file")?;
    init_logging();
    tracing::debug!(env_file, "Environment loaded");

    let config = BridgeConfig::from_env().context("invalid bridge configuration")?;
    if config.task_list_count() == 0 {
        tracing::warn!("No task lists configured; the bridge will idle until stopped");
    }

    let sdk_config = load_sdk_config().await;
    tracing::info!(
        domain = %config.domain,
        stream = %config.stream_name,
        region = ?sdk_config.region(),
        "Loaded AWS configuration"
    );

    let coordinator = Arc::new(SwfCoordinator::from_conf(&sdk_config));
    let stream = Arc::new(KinesisStream::from_conf(&sdk_config));
    let handle = Supervisor::from_config(&config, coordinator, stream).start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    handle.shutdown();
    handle.wait().await;
    tracing::info!("Bridge stopped");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
