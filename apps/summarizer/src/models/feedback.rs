use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named answer from a feedback form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackField {
    pub label: String,
    pub value: String,
}

/// A customer's feedback entry, immutable once fetched.
///
/// `transcript` is the flat `label: value` rendering of `fields`, with legacy
/// labels already renamed. It is what the prompt embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub mirrors: Vec<String>,
    pub fields: Vec<FeedbackField>,
    pub transcript: String,
}

/// Body POSTed to the sink collection endpoint.
///
/// Borrows the originating record so the metadata cannot drift from it.
#[derive(Debug, Serialize)]
pub struct PublishPayload<'a> {
    pub metadata: &'a FeedbackRecord,
    pub text: &'a str,
    skip_summarize: bool,
}

impl<'a> PublishPayload<'a> {
    pub fn new(metadata: &'a FeedbackRecord, text: &'a str) -> Self {
        Self {
            metadata,
            text,
            skip_summarize: true,
        }
    }
}
