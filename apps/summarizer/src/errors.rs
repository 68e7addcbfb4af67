use thiserror::Error;

use crate::llm_client::LlmError;
use crate::publisher::PublishError;
use crate::source::SourceError;

/// A failure scoped to a single feedback record.
/// None of these stop the run; the driver logs them and moves on.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("model service rejected credentials: {0}")]
    Unauthorized(String),

    #[error("model service failure: {0}")]
    ModelService(LlmError),

    #[error("publish failure: {0}")]
    Publish(#[from] PublishError),
}

impl From<LlmError> for RecordError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unauthorized { body } => RecordError::Unauthorized(body),
            other => RecordError::ModelService(other),
        }
    }
}

/// A failure that aborts the whole run before any record is processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch feedback records: {0}")]
    SourceFetch(#[from] SourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_llm_error_maps_to_distinct_variant() {
        let err: RecordError = LlmError::Unauthorized {
            body: "bad key".into(),
        }
        .into();
        assert!(matches!(err, RecordError::Unauthorized(ref body) if body == "bad key"));
    }

    #[test]
    fn test_other_llm_errors_map_to_model_service() {
        let err: RecordError = LlmError::Api {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(matches!(err, RecordError::ModelService(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_source_error_display() {
        let err = PipelineError::from(SourceError::Login("invalid password".into()));
        assert_eq!(
            err.to_string(),
            "failed to fetch feedback records: login failed: invalid password"
        );
    }
}
