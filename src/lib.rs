//! # litscope
//!
//! Literary analysis engine for public-domain books. Given an external
//! catalog identifier (a Project Gutenberg numeric ID), litscope fetches
//! the book's raw text, asks a hosted language model for a structured
//! literary analysis, normalizes the model's loosely-structured JSON reply
//! into a stable schema, and coordinates the whole flow with a two-tier
//! (raw-text + derived-analysis) cache.
//!
//! ## Overview
//!
//! The model's reply is untrusted: it may be wrapped in code fences,
//! surrounded by prose, or missing fields entirely. The normalizer is
//! permissive about missing data and strict only about being unable to
//! recover a JSON object at all — "no themes detected" is a legitimate
//! analysis outcome, not an error.
//!
//! Caching is a performance optimization, not a correctness dependency.
//! Every cache failure degrades to a miss with a logged diagnostic, so the
//! pipeline works correctly with caching fully disabled.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | The cache-first analysis coordinator and its result type |
//! | [`cache`] | Key derivation, pluggable backends, never-raising store |
//! | [`config`] | Runtime configuration with documented defaults |
//! | [`model`] | Chat message types and the model provider seam |
//! | [`normalize`] | Raw model output → [`normalize::NormalizedAnalysis`] |
//! | [`source`] | Book text fetching, truncation, and error mapping |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use litscope::{
//!     AnalysisConfig, AnalysisService, CacheConfig, HttpModelProvider, KeyValueCache,
//!     MemoryCache, TextSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> litscope::Result<()> {
//!     let config = AnalysisConfig::default();
//!     let cache = Arc::new(KeyValueCache::new(
//!         CacheConfig::default(),
//!         Box::new(MemoryCache::new(1024)),
//!     ));
//!     let source = TextSource::new(&config, Arc::clone(&cache))?;
//!     let model = Arc::new(HttpModelProvider::from_env()?);
//!     let service = AnalysisService::new(&config, cache, source, model);
//!
//!     let result = service.get_analysis("1342").await?;
//!     println!("{} by {}", result.title, result.author);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod model;
pub mod normalize;
pub mod source;

// Re-export main types for convenience
pub use analysis::{AnalysisResult, AnalysisService, CacheStatus};
pub use cache::{CacheBackend, CacheConfig, CacheStats, KeyValueCache, MemoryCache, NullCache};
pub use config::AnalysisConfig;
pub use model::{ChatMessage, HttpModelProvider, ModelProvider, Role};
pub use normalize::{normalize, NormalizedAnalysis};
pub use source::TextSource;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
