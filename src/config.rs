//! Runtime configuration with documented defaults.

use std::time::Duration;

/// Tunables for the analysis pipeline.
///
/// Every knob has a documented default; deployments override per-instance
/// with the `with_*` builders rather than editing constants.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the text provider. Documents resolve to
    /// `{base}/{id}/{id}-0.txt`.
    pub text_base_url: String,
    /// User-Agent sent on every text fetch.
    pub user_agent: String,
    /// Hard deadline for one text fetch.
    pub fetch_timeout: Duration,
    /// Hard deadline for one model call, enforced by the coordinator.
    pub model_timeout: Duration,
    /// Maximum characters of book text kept; longer payloads are truncated
    /// with a marker before caching.
    pub max_text_chars: usize,
    /// Expiry for cached raw text.
    pub text_ttl: Duration,
    /// Expiry for cached analyses. `None` means entries never expire and
    /// are only removed by explicit deletion.
    pub analysis_ttl: Option<Duration>,
    /// Sampling temperature for the model call.
    pub temperature: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            text_base_url: "https://www.gutenberg.org/files".to_string(),
            user_agent: concat!("litscope/", env!("CARGO_PKG_VERSION")).to_string(),
            fetch_timeout: Duration::from_secs(10),
            model_timeout: Duration::from_secs(60),
            max_text_chars: 5000,
            text_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            analysis_ttl: None,
            temperature: 0.7,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_base_url(mut self, base: impl Into<String>) -> Self {
        self.text_base_url = base.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_max_text_chars(mut self, max: usize) -> Self {
        self.max_text_chars = max;
        self
    }

    pub fn with_text_ttl(mut self, ttl: Duration) -> Self {
        self.text_ttl = ttl;
        self
    }

    pub fn with_analysis_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.analysis_ttl = ttl;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
