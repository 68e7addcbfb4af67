use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Where feedback records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// Live data store, authenticated with a username/password pair.
    Store {
        url: String,
        username: String,
        password: String,
    },
    /// A JSON file holding an array of feedback contracts.
    File { path: String },
}

/// Application configuration loaded from environment variables.
/// Credentials are read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_org: Option<String>,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub source: SourceConfig,
    pub sink_url: String,
    pub sink_username: String,
    pub sink_password: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let source = match lookup("FEEDBACK_FILE").filter(|v| !v.is_empty()) {
            Some(path) => SourceConfig::File { path },
            None => SourceConfig::Store {
                url: trim_url(require("DATA_STORE_URL")?),
                username: require("DATA_STORE_USERNAME")?,
                password: require("DATA_STORE_PASSWORD")?,
            },
        };

        Ok(Config {
            openai_org: lookup("OPENAI_ORG").filter(|v| !v.is_empty()),
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_model: lookup("OPENAI_MODEL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: trim_url(
                lookup("OPENAI_BASE_URL")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ),
            source,
            sink_url: trim_url(require("SINK_URL")?),
            sink_username: require("SINK_USERNAME")?,
            sink_password: require("SINK_PASSWORD")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
