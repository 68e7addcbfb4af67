//! Summary publisher — forwards each summary to the sink collection endpoint.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::PublishPayload;

const COLLECTION_PATH: &str = "/api/collection/feedback";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink rejected payload (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait SummarySink: Send + Sync {
    async fn publish(&self, payload: &PublishPayload<'_>) -> Result<(), PublishError>;
}

/// POSTs payloads as JSON with basic-auth credentials.
#[derive(Clone)]
pub struct SinkPublisher {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl SinkPublisher {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, PublishError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        })
    }
}

#[async_trait]
impl SummarySink for SinkPublisher {
    async fn publish(&self, payload: &PublishPayload<'_>) -> Result<(), PublishError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, COLLECTION_PATH))
            .basic_auth(&self.username, Some(&self.password))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
