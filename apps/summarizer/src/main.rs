mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod publisher;
mod source;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SourceConfig};
use crate::llm_client::LlmClient;
use crate::pipeline::{Pipeline, RecordOutcome};
use crate::publisher::SinkPublisher;
use crate::source::{FeedbackSource, StaticSource, StoreSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting feedback summarizer v{}", env!("CARGO_PKG_VERSION"));

    let source: Arc<dyn FeedbackSource> = match &config.source {
        SourceConfig::Store {
            url,
            username,
            password,
        } => {
            info!("Reading feedback from data store at {url}");
            Arc::new(StoreSource::new(url, username, password)?)
        }
        SourceConfig::File { path } => Arc::new(StaticSource::from_file(path)?),
    };

    let llm = LlmClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        config.openai_org.clone(),
        &config.openai_model,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let sink = SinkPublisher::new(
        &config.sink_url,
        &config.sink_username,
        &config.sink_password,
    )?;

    let report = Pipeline::new(source, Arc::new(llm), Arc::new(sink))
        .run()
        .await?;

    info!(
        "Processed {} records: {} published, {} unauthorized, {} completion failures, {} publish failures",
        report.total(),
        report.count(RecordOutcome::Published),
        report.count(RecordOutcome::Unauthorized),
        report.count(RecordOutcome::ModelFailed),
        report.count(RecordOutcome::PublishFailed),
    );

    Ok(())
}
