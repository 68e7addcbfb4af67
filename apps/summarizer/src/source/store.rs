//! Live data-store adapter: log in with a username/password pair, then pull
//! every feedback contract with the resulting session token.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::{FeedbackSource, RawContract, SourceError, FEEDBACK_TYPE};
use crate::models::FeedbackRecord;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Envelope wrapping every data-store response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    error: bool,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Session {
    id: String,
}

#[derive(Clone)]
pub struct StoreSource {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl StoreSource {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Exchanges the configured credentials for a session token.
    pub async fn login(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .post(format!("{}/api/v2/login", self.base_url))
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Login(format!("status {status}: {body}")));
        }

        let envelope: Envelope<Session> = serde_json::from_str(&body)?;
        match envelope {
            Envelope {
                error: false,
                data: Some(session),
            } => Ok(session.id),
            _ => Err(SourceError::Login(body)),
        }
    }

    /// Fetches every contract of `type_slug` visible to the session.
    pub async fn get_all_by_type(
        &self,
        token: &str,
        type_slug: &str,
    ) -> Result<Vec<RawContract>, SourceError> {
        let query = json!({
            "query": {
                "type": "object",
                "properties": {
                    "type": { "const": type_slug }
                },
                "required": ["type"]
            }
        });

        let response = self
            .client
            .post(format!("{}/api/v2/query", self.base_url))
            .bearer_auth(token)
            .json(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<Vec<RawContract>> = serde_json::from_str(&body)?;
        if envelope.error {
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl FeedbackSource for StoreSource {
    async fn fetch_all(&self) -> Result<Vec<FeedbackRecord>, SourceError> {
        let token = self.login().await?;
        debug!("Data store session established for {}", self.username);

        let contracts = self.get_all_by_type(&token, FEEDBACK_TYPE).await?;
        info!("Fetched {} {} contracts", contracts.len(), FEEDBACK_TYPE);

        Ok(contracts.into_iter().map(RawContract::into_record).collect())
    }
}
