// Error types for fetching and normalizing a report.
use thiserror::Error;

/// The single message users see for any failed search.
pub const GATHERING_FAILED: &str = "Intelligence gathering failed. The hotel listing might be highly inconsistent across platforms. Please try again.";

/// Failures talking to the report service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API key was configured for the live service.
    #[error("no API key configured (set GEMINI_API_KEY or pass --api-key)")]
    MissingApiKey,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The response carried no candidate text.
    #[error("response contained no report text")]
    EmptyResponse,

    /// A saved response could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum IntelError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("report payload is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

impl IntelError {
    /// What to show the user. Transport and payload failures are not told
    /// apart; the detailed cause goes to the log.
    pub fn user_message(&self) -> &'static str {
        GATHERING_FAILED
    }
}
