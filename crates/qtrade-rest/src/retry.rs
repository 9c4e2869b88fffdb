//! Retry policy for the request dispatcher

use std::time::Duration;

/// Configuration for retrying transient failures
///
/// Rate-limited responses wait for the server-given reset; server errors
/// (and, when enabled, transport failures) wait for the fixed `backoff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Fixed delay before retrying a server or transport error
    pub backoff: Duration,
    /// Also retry connection and body-read failures
    pub retry_transport_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(1),
            retry_transport_errors: false,
        }
    }
}

impl RetryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set backoff delay
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Enable or disable transport-failure retries
    pub fn with_retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    /// Single attempt, never retry
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Check if another attempt is allowed after `retries` retries
    pub fn should_retry(&self, retries: u32) -> bool {
        retries < self.max_retries
    }

    /// Upper bound on physical attempts for one call
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff, Duration::from_secs(1));
        assert!(!config.retry_transport_errors);
        assert_eq!(config.max_attempts(), 4);
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::new().with_max_retries(1);
        assert!(config.should_retry(0));
        assert!(!config.should_retry(1));
        assert!(!config.should_retry(2));
    }

    #[test]
    fn test_disabled() {
        let config = RetryConfig::disabled();
        assert!(!config.should_retry(0));
        assert_eq!(config.max_attempts(), 1);
    }
}
