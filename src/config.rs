//! Assembler configuration
//!
//! Defaults come from the environment so a host can tune fetch behaviour
//! without code changes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LANGUAGE: &str = "en";

/// Configuration for the navigation assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Timeout applied to every remote fragment request
    pub fetch_timeout: Duration,
    /// Language used when the request does not carry one
    pub default_language: String,
    /// User agent sent with remote fragment requests
    pub user_agent: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(
                std::env::var("PORTAL_NAV_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            ),
            default_language: std::env::var("PORTAL_NAV_DEFAULT_LANGUAGE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            user_agent: format!("portal-nav/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AssemblerConfig {
    /// Language to resolve texts in: the request's own, else the configured default
    pub fn language_for<'a>(&'a self, requested: &'a str) -> &'a str {
        if requested.trim().is_empty() {
            &self.default_language
        } else {
            requested
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_language_wins_over_default() {
        let config = AssemblerConfig::default().with_default_language("de");
        assert_eq!(config.language_for("fr"), "fr");
        assert_eq!(config.language_for(""), "de");
        assert_eq!(config.language_for("  "), "de");
    }

    #[test]
    fn test_builder_overrides() {
        let config = AssemblerConfig::default()
            .with_fetch_timeout(Duration::from_millis(250));
        assert_eq!(config.fetch_timeout, Duration::from_millis(250));
        assert!(config.user_agent.starts_with("portal-nav/"));
    }
}
