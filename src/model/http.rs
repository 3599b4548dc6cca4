//! HTTP-backed model provider for OpenAI-compatible chat endpoints.

use super::{ChatMessage, ModelProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use keyring::Entry;
use serde_json::json;
use std::env;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// The API key is resolved once at construction (keyring first, then the
/// `LITSCOPE_API_KEY` environment variable); a missing key is an eager
/// configuration error rather than a per-call failure.
pub struct HttpModelProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpModelProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = resolve_api_key().ok_or_else(|| {
            Error::configuration(
                "no model API key found; set LITSCOPE_API_KEY or store one in the OS keyring",
            )
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Construct from `LITSCOPE_MODEL_BASE_URL` / `LITSCOPE_MODEL`, with
    /// hosted defaults.
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("LITSCOPE_MODEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("LITSCOPE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, model)
    }
}

fn resolve_api_key() -> Option<String> {
    // 1. Try Keyring
    if let Ok(entry) = Entry::new("litscope", "model-api") {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    // 2. Try Environment Variable
    env::var("LITSCOPE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

#[async_trait]
impl ModelProvider for HttpModelProvider {
    async fn complete(&self, messages: &[ChatMessage], temperature: f64) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(model = %self.model, %request_id, "dispatching model call");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            // Correlation id; providers may ignore it, but applications can
            // use it for linkage.
            .header("x-litscope-request-id", &request_id)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "temperature": temperature,
            }))
            .send()
            .await
            .map_err(|err| Error::from_transport(err, "model call"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Some(status.as_u16()),
                format!("model endpoint returned {status}: {body}"),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| Error::malformed(format!("model response was not JSON: {err}")))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::malformed("model response carried no message content"))
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}
