//! Chat message types and the model provider seam.

mod http;

pub use http::HttpModelProvider;

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role-tagged message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Seam to the hosted text-generation service.
///
/// One synchronous completion per call: an ordered list of role-tagged
/// messages and a temperature in, a single generated string out. No
/// retries, no streaming.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], temperature: f64) -> Result<String>;

    fn name(&self) -> &'static str {
        "model"
    }
}
