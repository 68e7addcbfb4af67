use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::llm_client::strip_json_fences;

/// Answers to the ten summary questions. Every answer is optional since the
/// model's output is never guaranteed to follow the requested shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryAnswers {
    #[serde(rename = "Product", default, deserialize_with = "lenient_text")]
    pub product: Option<String>,
    #[serde(rename = "Reason", default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
    #[serde(rename = "Spam", default, deserialize_with = "lenient_text")]
    pub spam: Option<String>,
    #[serde(rename = "Industry", default, deserialize_with = "lenient_text")]
    pub industry: Option<String>,
    #[serde(rename = "Professional", default, deserialize_with = "lenient_text")]
    pub professional: Option<String>,
    #[serde(rename = "Sentiment", default, deserialize_with = "lenient_text")]
    pub sentiment: Option<String>,
    #[serde(rename = "NPS", default, deserialize_with = "lenient_text")]
    pub nps: Option<String>,
    #[serde(rename = "Discovery", default, deserialize_with = "lenient_text")]
    pub discovery: Option<String>,
    #[serde(rename = "Usecase", default, deserialize_with = "lenient_text")]
    pub usecase: Option<String>,
    #[serde(rename = "Feedback", default, deserialize_with = "lenient_text")]
    pub feedback: Option<String>,
}

impl SummaryAnswers {
    /// Number of questions the model gave an answer for.
    pub fn answered(&self) -> usize {
        [
            &self.product,
            &self.reason,
            &self.spam,
            &self.industry,
            &self.professional,
            &self.sentiment,
            &self.nps,
            &self.discovery,
            &self.usecase,
            &self.feedback,
        ]
        .iter()
        .filter(|a| a.is_some())
        .count()
    }
}

/// A completion's text plus a best-effort structured reading of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub raw: String,
    pub answers: Option<SummaryAnswers>,
}

impl Summary {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let answers = serde_json::from_str::<SummaryAnswers>(strip_json_fences(&raw)).ok();
        Self { raw, answers }
    }

    pub fn parse_failed(&self) -> bool {
        self.answers.is_none()
    }
}

// Models answer "NPS": 8 as often as "NPS": "8".
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_answer() {
        let raw = r#"{
            "Product": "balenaCloud",
            "Reason": "mentions fleets",
            "Spam": "unlikely",
            "Industry": "agriculture",
            "Professional": "professional",
            "Sentiment": "positive",
            "NPS": 9,
            "Discovery": "forum",
            "Usecase": "sensor fleet",
            "Feedback": "wants cheaper plans"
        }"#;
        let summary = Summary::parse(raw);
        let answers = summary.answers.as_ref().unwrap();

        assert!(!summary.parse_failed());
        assert_eq!(answers.answered(), 10);
        assert_eq!(answers.product.as_deref(), Some("balenaCloud"));
        assert_eq!(answers.nps.as_deref(), Some("9"));
        assert_eq!(answers.feedback.as_deref(), Some("wants cheaper plans"));
        assert_eq!(summary.raw, raw);
    }

    #[test]
    fn test_parse_partial_answer_in_code_fence() {
        let summary = Summary::parse("```json\n{\"Product\": \"balenaEtcher\", \"Spam\": null}\n```");
        let answers = summary.answers.unwrap();

        assert_eq!(answers.product.as_deref(), Some("balenaEtcher"));
        assert!(answers.spam.is_none());
        assert!(answers.usecase.is_none());
        assert_eq!(answers.answered(), 1);
    }

    #[test]
    fn test_parse_answer_in_untagged_fence() {
        let summary = Summary::parse("```\n{\"Sentiment\": \"negative\", \"NPS\": \"3\"}\n```");
        let answers = summary.answers.unwrap();

        assert_eq!(answers.sentiment.as_deref(), Some("negative"));
        assert_eq!(answers.nps.as_deref(), Some("3"));
        assert_eq!(answers.answered(), 2);
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        let summary = Summary::parse("Product: balenaOS, Sentiment: positive");
        assert!(summary.parse_failed());
        assert_eq!(summary.raw, "Product: balenaOS, Sentiment: positive");
    }

    #[test]
    fn test_non_object_json_is_a_parse_failure() {
        assert!(Summary::parse("[\"balenaOS\"]").parse_failed());
    }
}
