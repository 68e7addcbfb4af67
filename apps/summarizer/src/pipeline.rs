//! Pipeline driver — fetch → prompt → complete → publish, one record at a time.
//!
//! Per-record failures are logged and recorded in the [`RunReport`]; the loop
//! always moves on to the next record. Only a failed fetch aborts the run.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::{PipelineError, RecordError};
use crate::llm_client::prompts::{build_prompt, QUESTION_LABELS};
use crate::llm_client::Completer;
use crate::models::{FeedbackRecord, PublishPayload, Summary};
use crate::publisher::SummarySink;
use crate::source::FeedbackSource;

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Published,
    Unauthorized,
    ModelFailed,
    PublishFailed,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per fetched record, in fetch order.
    pub outcomes: Vec<(String, RecordOutcome)>,
}

impl RunReport {
    pub fn count(&self, outcome: RecordOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// The three collaborators, built once at startup and shared read-only.
pub struct Pipeline {
    source: Arc<dyn FeedbackSource>,
    completer: Arc<dyn Completer>,
    sink: Arc<dyn SummarySink>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn FeedbackSource>,
        completer: Arc<dyn Completer>,
        sink: Arc<dyn SummarySink>,
    ) -> Self {
        Self {
            source,
            completer,
            sink,
        }
    }

    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let records = self.source.fetch_all().await?;
        info!("Processing {} feedback records", records.len());

        let mut report = RunReport::default();
        for record in &records {
            let outcome = match self.process(record).await {
                Ok(()) => RecordOutcome::Published,
                Err(RecordError::Unauthorized(body)) => {
                    error!("UNAUTHORIZED: {} ({})", body, record.slug);
                    RecordOutcome::Unauthorized
                }
                Err(RecordError::ModelService(e)) => {
                    error!("Completion failed for {}: {}", record.slug, e);
                    RecordOutcome::ModelFailed
                }
                Err(RecordError::Publish(e)) => {
                    error!("Publish failed for {}: {}", record.slug, e);
                    RecordOutcome::PublishFailed
                }
            };
            report.outcomes.push((record.slug.clone(), outcome));
        }

        Ok(report)
    }

    async fn process(&self, record: &FeedbackRecord) -> Result<(), RecordError> {
        // Step 1: Prompt
        let prompt = build_prompt(&record.transcript);
        debug!("Prompt for {} is {} bytes", record.slug, prompt.len());

        // Step 2: Completion
        let summary = Summary::parse(self.completer.complete(&prompt).await?);
        info!("Summary for {}: {}", record.slug, summary.raw);
        if let Some(answers) = &summary.answers {
            debug!(
                "{} answered {}/{} questions (product: {:?}, sentiment: {:?})",
                record.slug,
                answers.answered(),
                QUESTION_LABELS.len(),
                answers.product,
                answers.sentiment
            );
        }
        if summary.parse_failed() {
            warn!(
                "Summary for {} is not a JSON answer object; forwarding raw text",
                record.slug
            );
        }

        // Step 3: Publish
        self.sink
            .publish(&PublishPayload::new(record, &summary.raw))
            .await?;
        info!("ok: {}", record.slug);

        Ok(())
    }
}
