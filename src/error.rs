use thiserror::Error;

/// Unified error type for the litscope runtime.
///
/// Aggregates low-level failures into the small set of stable categories
/// callers are expected to branch on. Cache failures never appear here:
/// the cache layer degrades to a miss by contract (see [`crate::cache`]).
#[derive(Debug, Error)]
pub enum Error {
    /// The book identifier was empty or whitespace-only.
    #[error("Invalid book ID: identifier must be a non-empty string")]
    InvalidIdentifier,

    /// The upstream catalog has no document under this identifier.
    #[error("Book with ID {id} not found")]
    DocumentNotFound { id: String },

    /// An outbound call exceeded its deadline.
    #[error("Request timed out during {operation}")]
    RequestTimeout { operation: &'static str },

    /// Connection or DNS failure reaching an upstream service.
    #[error("Connection error: {message}")]
    Connectivity { message: String },

    /// The upstream service responded, but not usefully.
    #[error("Upstream error{}: {message}", fmt_status(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// The upstream body was empty or not the expected text/JSON payload.
    #[error("Malformed upstream response: {message}")]
    MalformedResponse { message: String },

    /// The model output contained no recoverable JSON object.
    #[error("Model response did not contain a parsable JSON object")]
    UnparsableResponse,

    /// Required credential or configuration missing at construction time.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

impl Error {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Classify a transport-layer failure from the HTTP client.
    ///
    /// Timeouts and connect/DNS failures get their own categories; anything
    /// else is surfaced as an upstream error carrying the original message.
    pub fn from_transport(err: reqwest::Error, operation: &'static str) -> Self {
        if err.is_timeout() {
            Error::RequestTimeout { operation }
        } else if err.is_connect() {
            Error::Connectivity {
                message: err.to_string(),
            }
        } else {
            Error::Upstream {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}
