//! Feedback sources — everything that can hand the pipeline a list of records.
//!
//! Both the live store and the file-backed source receive raw contracts and run
//! them through the same projection, so the driver never sees the difference.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::models::{FeedbackField, FeedbackRecord};

pub mod store;

pub use store::StoreSource;

/// Contract type holding user feedback in the data store.
pub const FEEDBACK_TYPE: &str = "user-feedback@1.0.0";

/// `data.*` keys extracted from a contract, in transcript order, with their labels.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("user", "user"),
    (
        "howDidYouFirstHearAboutBalenaCloud",
        "How Did You First Hear About Balena Cloud",
    ),
    ("role", "Role"),
    ("experience", "Experience"),
    ("useCase", "Use Case"),
    ("recommendBalenaCloud", "Recommend Balena Cloud"),
];

/// Legacy labels still carrying the old product name, with their display form.
/// Applied to labels only, never to answer text.
const LEGACY_LABELS: &[(&str, &str)] = &[
    (
        "How Did You First Hear About Balena Cloud",
        "How Did You First Hear About Balena",
    ),
    ("Recommend Balena Cloud", "Recommend Balena"),
];

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("login failed: {0}")]
    Login(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data store error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed feedback contract: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can produce the full list of feedback records for a run.
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FeedbackRecord>, SourceError>;
}

/// A feedback contract as returned by the data store.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContract {
    pub slug: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RawContract {
    /// Projects the contract into a record: mirrors, the known fields in a
    /// fixed order with legacy labels renamed, and the transcript.
    pub fn into_record(self) -> FeedbackRecord {
        let mirrors = self
            .data
            .get("mirrors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let fields: Vec<FeedbackField> = FIELD_LABELS
            .iter()
            .filter_map(|(key, label)| {
                field_text(self.data.get(*key)?).map(|value| FeedbackField {
                    label: display_label(label).to_string(),
                    value,
                })
            })
            .collect();

        let transcript = render_transcript(&fields);

        FeedbackRecord {
            slug: self.slug,
            created_at: self.created_at,
            mirrors,
            fields,
            transcript,
        }
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn render_transcript(fields: &[FeedbackField]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.label, f.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps a field label to its display form.
pub fn display_label(label: &str) -> &str {
    LEGACY_LABELS
        .iter()
        .find(|(old, _)| *old == label)
        .map_or(label, |(_, new)| *new)
}

/// In-memory records, typically loaded from a JSON export of contracts.
pub struct StaticSource {
    records: Vec<FeedbackRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<FeedbackRecord>) -> Self {
        Self { records }
    }

    /// Reads a JSON array of feedback contracts from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let contracts: Vec<RawContract> = serde_json::from_str(&text)?;
        info!(
            "Loaded {} feedback contracts from {}",
            contracts.len(),
            path.display()
        );
        Ok(Self::new(
            contracts.into_iter().map(RawContract::into_record).collect(),
        ))
    }
}

#[async_trait]
impl FeedbackSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<FeedbackRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn contract(data: Value) -> RawContract {
        serde_json::from_value(json!({
            "slug": "user-feedback-1",
            "type": FEEDBACK_TYPE,
            "created_at": "2023-03-14T10:00:00Z",
            "data": data,
        }))
        .unwrap()
    }

    #[test]
    fn test_rename_origin_label() {
        let record = contract(json!({
            "user": "alice",
            "howDidYouFirstHearAboutBalenaCloud": "forum",
        }))
        .into_record();

        assert_eq!(
            record.transcript,
            "user: alice\nHow Did You First Hear About Balena: forum"
        );
        assert!(!record.transcript.contains("Balena Cloud"));
    }

    #[test]
    fn test_rename_ignores_legacy_text_in_answers() {
        let record = contract(json!({
            "user": "Recommend Balena Cloud fan",
            "howDidYouFirstHearAboutBalenaCloud": "a Balena Cloud webinar",
            "experience": "I would Recommend Balena Cloud to anyone",
            "recommendBalenaCloud": 9,
        }))
        .into_record();

        assert_eq!(
            record.transcript,
            "user: Recommend Balena Cloud fan\n\
             How Did You First Hear About Balena: a Balena Cloud webinar\n\
             Experience: I would Recommend Balena Cloud to anyone\n\
             Recommend Balena: 9"
        );
        // Exactly the two labels were rewritten; every answer is untouched.
        let values: Vec<_> = record.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "Recommend Balena Cloud fan",
                "a Balena Cloud webinar",
                "I would Recommend Balena Cloud to anyone",
                "9"
            ]
        );
    }

    #[test]
    fn test_display_label() {
        assert_eq!(
            display_label("How Did You First Hear About Balena Cloud"),
            "How Did You First Hear About Balena"
        );
        assert_eq!(display_label("Recommend Balena Cloud"), "Recommend Balena");
        assert_eq!(display_label("Experience"), "Experience");
        assert_eq!(display_label("Recommend Balena Cloud!"), "Recommend Balena Cloud!");
    }

    #[test]
    fn test_contract_projection() {
        let record = contract(json!({
            "mirrors": ["https://forums.example.com/t/1", 42],
            "recommendBalenaCloud": 8,
            "user": "alice",
            "howDidYouFirstHearAboutBalenaCloud": "forum",
            "role": null,
            "useCase": "home automation",
            "unrelated": "ignored",
        }))
        .into_record();

        assert_eq!(record.slug, "user-feedback-1");
        assert_eq!(record.mirrors, vec!["https://forums.example.com/t/1"]);
        let labels: Vec<_> = record.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "user",
                "How Did You First Hear About Balena",
                "Use Case",
                "Recommend Balena"
            ]
        );
        assert_eq!(
            record.transcript,
            "user: alice\n\
             How Did You First Hear About Balena: forum\n\
             Use Case: home automation\n\
             Recommend Balena: 8"
        );
    }

    #[test]
    fn test_contract_without_data() {
        let record: RawContract = serde_json::from_value(json!({
            "slug": "user-feedback-empty",
            "created_at": "2023-03-14T10:00:00Z",
        }))
        .unwrap();
        let record = record.into_record();
        assert!(record.mirrors.is_empty());
        assert!(record.fields.is_empty());
        assert_eq!(record.transcript, "");
    }

    #[tokio::test]
    async fn test_static_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!([
                {"slug": "a", "created_at": "2023-01-01T00:00:00Z", "data": {"user": "alice"}},
                {"slug": "b", "created_at": "2023-01-02T00:00:00Z", "data": {"user": "bob"}},
            ])
        )
        .unwrap();

        let source = StaticSource::from_file(file.path()).unwrap();
        let records = source.fetch_all().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].slug, "a");
        assert_eq!(records[1].transcript, "user: bob");
    }

    #[test]
    fn test_static_source_missing_file() {
        let result = StaticSource::from_file("/nonexistent/feedback.json");
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
