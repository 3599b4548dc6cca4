//! The cache-first analysis coordinator.
//!
//! Per request: `check cache → {hit: return} | {miss: fetch text → call
//! model → normalize → store → return}`. No state persists across requests
//! beyond cache reads/writes and the in-flight request map.

use crate::cache::{analysis_key, text_key, KeyValueCache};
use crate::config::AnalysisConfig;
use crate::model::{ChatMessage, ModelProvider};
use crate::normalize::{normalize, NormalizedAnalysis};
use crate::source::TextSource;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are a literary analyst. Respond with a single JSON object and \
nothing else: no prose, no code fences. The object may contain these keys: \
\"title\", \"author\", \"characters\" (a list of objects with \"name\", \
\"importance\" between 0 and 1, \"description\", \"moral_category\", and \
\"relationships\": a list of {\"character\", \"relationship\"} objects), \
\"themes\" (a list of strings), \"plot_summary\", and \"key_events\" (a list \
of {\"event\", \"significance\", \"characters_involved\"} objects).";

/// The persisted and returned unit of analysis.
///
/// Immutable after creation: a cache hit returns the stored value
/// verbatim, including its original timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub analysis: NormalizedAnalysis,
    pub timestamp: DateTime<Utc>,
}

/// Which cache tiers currently hold entries for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    #[serde(rename = "bookTextCached")]
    pub book_text_cached: bool,
    #[serde(rename = "analysisCached")]
    pub analysis_cached: bool,
}

/// Orchestrates text fetch, model call, normalization, and caching.
///
/// Concurrent requests for the same identifier are collapsed: the first
/// caller does the work while followers wait on a per-key lock and are
/// then served from the freshly written cache entry.
pub struct AnalysisService {
    cache: Arc<KeyValueCache>,
    source: TextSource,
    model: Arc<dyn ModelProvider>,
    temperature: f64,
    model_timeout: Duration,
    analysis_ttl: Option<Duration>,
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl AnalysisService {
    pub fn new(
        config: &AnalysisConfig,
        cache: Arc<KeyValueCache>,
        source: TextSource,
        model: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            cache,
            source,
            model,
            temperature: config.temperature,
            model_timeout: config.model_timeout,
            analysis_ttl: config.analysis_ttl,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Return the analysis for `id`, producing and caching it on a miss.
    ///
    /// Failures from the text fetch, the model call, and normalization
    /// propagate with their specific kinds; a failure to cache the result
    /// does not fail the request.
    pub async fn get_analysis(&self, id: &str) -> Result<AnalysisResult> {
        let key = analysis_key(id);
        if let Some(hit) = self.cache.get::<AnalysisResult>(&key).await {
            debug!(book_id = id, "analysis cache hit");
            return Ok(hit);
        }

        let lock = self.inflight_lock(&key);
        let result = {
            let _leader = lock.lock().await;
            // A concurrent leader may have filled the cache while we
            // waited on the lock.
            match self.cache.get::<AnalysisResult>(&key).await {
                Some(hit) => {
                    debug!(book_id = id, "analysis cache hit after in-flight wait");
                    Ok(hit)
                }
                None => self.analyze_uncached(id, &key).await,
            }
        };
        self.release_inflight(&key, lock);
        result
    }

    /// Report which cache tiers hold entries for `id`.
    pub async fn status(&self, id: &str) -> CacheStatus {
        let (book_text_cached, analysis_cached) = futures::future::join(
            self.cache.exists(&text_key(id)),
            self.cache.exists(&analysis_key(id)),
        )
        .await;
        CacheStatus {
            book_text_cached,
            analysis_cached,
        }
    }

    /// Drop both cache tiers for `id`. Returns whether anything existed.
    pub async fn clear(&self, id: &str) -> bool {
        let (text_deleted, analysis_deleted) = futures::future::join(
            self.cache.delete(&text_key(id)),
            self.cache.delete(&analysis_key(id)),
        )
        .await;
        text_deleted || analysis_deleted
    }

    async fn analyze_uncached(&self, id: &str, key: &str) -> Result<AnalysisResult> {
        let text = self.source.fetch_text(id).await?;
        let words = word_count(&text);

        let messages = analysis_messages(&text);
        let raw = tokio::time::timeout(
            self.model_timeout,
            self.model.complete(&messages, self.temperature),
        )
        .await
        .map_err(|_| Error::RequestTimeout {
            operation: "model call",
        })??;

        let analysis = normalize(&raw, words)?;
        let result = AnalysisResult {
            book_id: id.trim().to_string(),
            title: analysis.title.clone(),
            author: analysis.author.clone(),
            analysis,
            timestamp: Utc::now(),
        };

        // Best-effort: a failed write degrades to recomputation next time.
        self.cache.set_with_ttl(key, &result, self.analysis_ttl).await;
        info!(book_id = id, words, "analysis produced");
        Ok(result)
    }

    fn inflight_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inflight.lock().unwrap();
        Arc::clone(map.entry(key.to_string()).or_default())
    }

    fn release_inflight(&self, key: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        drop(lock);
        let mut map = self.inflight.lock().unwrap();
        if let Some(entry) = map.get(key) {
            if Arc::strong_count(entry) == 1 {
                map.remove(key);
            }
        }
    }
}

/// Whitespace-delimited token count of the source text.
///
/// Computed here, never taken from the model.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

fn analysis_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Analyze this book excerpt:\n\n{text}")),
    ]
}
