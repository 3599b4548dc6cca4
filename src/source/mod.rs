//! Book text fetching with caching, truncation, and error mapping.

use crate::cache::{text_key, KeyValueCache};
use crate::config::AnalysisConfig;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Marker appended when a document is cut at the length cap.
pub const TRUNCATION_MARKER: &str = "...";

/// Resolves an external catalog identifier to raw document text.
///
/// Reads through the cache: a hit returns the stored text unchanged, a
/// miss fetches `{base}/{id}/{id}-0.txt`, truncates to the configured cap,
/// and stores the result before returning it. Truncation happens before
/// caching, so cached and live paths are observably identical to callers.
pub struct TextSource {
    client: reqwest::Client,
    base_url: Url,
    cache: Arc<KeyValueCache>,
    max_text_chars: usize,
    text_ttl: Duration,
}

impl TextSource {
    pub fn new(config: &AnalysisConfig, cache: Arc<KeyValueCache>) -> Result<Self> {
        let base_url = Url::parse(&config.text_base_url).map_err(|err| {
            Error::configuration(format!(
                "invalid text provider base URL '{}': {err}",
                config.text_base_url
            ))
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| Error::configuration(format!("HTTP client construction: {err}")))?;

        Ok(Self {
            client,
            base_url,
            cache,
            max_text_chars: config.max_text_chars,
            text_ttl: config.text_ttl,
        })
    }

    /// Fetch the text for `id`, serving from cache when possible.
    pub async fn fetch_text(&self, id: &str) -> Result<String> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidIdentifier);
        }

        let key = text_key(id);
        if let Some(cached) = self.cache.get::<String>(&key).await {
            debug!(book_id = id, "book text cache hit");
            return Ok(cached);
        }

        let url = format!("{}/{id}/{id}-0.txt", self.base_url.as_str().trim_end_matches('/'));
        debug!(book_id = id, %url, "fetching book text");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::from_transport(err, "book text fetch"))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::DocumentNotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(Error::upstream(
                Some(status.as_u16()),
                format!("text provider returned {status}"),
            ));
        }

        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                Error::RequestTimeout {
                    operation: "book text fetch",
                }
            } else {
                Error::malformed(format!("failed to read body: {err}"))
            }
        })?;
        if body.trim().is_empty() {
            return Err(Error::malformed("text provider returned an empty body"));
        }

        let text = truncate_chars(&body, self.max_text_chars);
        info!(
            book_id = id,
            chars = text.chars().count(),
            truncated = text.len() != body.len(),
            "fetched book text"
        );

        self.cache
            .set_with_ttl(&key, &text, Some(self.text_ttl))
            .await;
        Ok(text)
    }
}

/// Cut `text` at `max_chars` characters, appending the truncation marker
/// when anything was dropped.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut truncated = text[..byte_idx].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through_unchanged() {
        assert_eq!(truncate_chars("hello", 5000), "hello");
    }

    #[test]
    fn text_at_exactly_the_cap_is_not_marked() {
        let text = "a".repeat(5000);
        assert_eq!(truncate_chars(&text, 5000), text);
    }

    #[test]
    fn long_text_is_cut_to_cap_plus_marker() {
        let text = "a".repeat(6000);
        let truncated = truncate_chars(&text, 5000);
        assert_eq!(truncated.chars().count(), 5003);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert_eq!(&truncated[..5000], &text[..5000]);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(&text, 4);
        assert_eq!(truncated, format!("{}{}", "é".repeat(4), TRUNCATION_MARKER));
    }
}
