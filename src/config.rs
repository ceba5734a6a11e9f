// Settings for the report service, resolved once at startup and handed to
// the client that needs them.
use std::fmt;
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(api_key: Option<String>, model: String, endpoint: String, timeout_secs: u64) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn require_api_key(&self) -> Result<&str, FetchError> {
        self.api_key.as_deref().ok_or(FetchError::MissingApiKey)
    }

    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(
            None,
            DEFAULT_MODEL.to_string(),
            DEFAULT_ENDPOINT.to_string(),
            DEFAULT_TIMEOUT_SECS,
        )
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key() {
        let config = ServiceConfig::new(
            Some("secret-key".into()),
            DEFAULT_MODEL.into(),
            DEFAULT_ENDPOINT.into(),
            30,
        );
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = ServiceConfig::new(Some("  ".into()), "m".into(), "https://x/".into(), 5);
        assert!(matches!(config.require_api_key(), Err(FetchError::MissingApiKey)));
        assert_eq!(config.generate_url(), "https://x/models/m:generateContent");
    }
}
