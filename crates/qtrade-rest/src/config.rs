//! Client configuration

use qtrade_auth::{BodySigning, Credentials};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{RestError, RestResult};
use crate::retry::RetryConfig;

/// Production API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.qtrade.io";
/// Default overall request deadline
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 1000;

/// Client configuration
///
/// Deserializable from any serde format, or loaded from `QTRADE_*`
/// environment variables with [`ClientConfig::from_env`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, without trailing path
    pub endpoint: String,
    /// `<keyID>:<secret>`; public endpoints only when absent
    pub hmac_keypair: Option<String>,
    /// Overall deadline per call, also used as the per-attempt transport timeout.
    /// Must be at least 1; the client refuses to build with 0.
    pub timeout_secs: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before retrying a server error
    pub backoff_ms: u64,
    /// Whether request bodies are part of the signature
    pub body_signing: BodySigning,
    /// Retry connection failures with the fixed backoff
    pub retry_transport_errors: bool,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            hmac_keypair: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_ms: DEFAULT_BACKOFF_MS,
            body_signing: BodySigning::default(),
            retry_transport_errors: false,
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "hmac_keypair",
                &self.hmac_keypair.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_ms", &self.backoff_ms)
            .field("body_signing", &self.body_signing)
            .field("retry_transport_errors", &self.retry_transport_errors)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the environment
    ///
    /// Reads `QTRADE_ENDPOINT`, `QTRADE_HMAC_KEYPAIR`, `QTRADE_TIMEOUT_SECS`,
    /// `QTRADE_MAX_RETRIES` and `QTRADE_BACKOFF_MS`. Unset variables keep
    /// their defaults; set but unparseable ones are an error.
    pub fn from_env() -> RestResult<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = env_var("QTRADE_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.hmac_keypair = env_var("QTRADE_HMAC_KEYPAIR");
        if let Some(timeout) = env_parse("QTRADE_TIMEOUT_SECS")? {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = env_parse("QTRADE_MAX_RETRIES")? {
            config.max_retries = retries;
        }
        if let Some(backoff) = env_parse("QTRADE_BACKOFF_MS")? {
            config.backoff_ms = backoff;
        }

        Ok(config)
    }

    /// Set the base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the `<keyID>:<secret>` keypair
    pub fn with_hmac_keypair(mut self, keypair: impl Into<String>) -> Self {
        self.hmac_keypair = Some(keypair.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set backoff delay
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Set body signing mode
    pub fn with_body_signing(mut self, mode: BodySigning) -> Self {
        self.body_signing = mode;
        self
    }

    /// Enable or disable transport-failure retries
    pub fn with_retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Overall call deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy derived from this configuration
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(self.max_retries)
            .with_backoff(Duration::from_millis(self.backoff_ms))
            .with_retry_transport_errors(self.retry_transport_errors)
    }

    /// Parse the keypair, if one is configured
    pub fn credentials(&self) -> RestResult<Option<Credentials>> {
        self.hmac_keypair
            .as_deref()
            .map(Credentials::parse)
            .transpose()
            .map_err(RestError::from)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> RestResult<Option<T>> {
    env_var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| RestError::Config(format!("{name} is not a valid number: {raw}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://api.qtrade.io");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.body_signing, BodySigning::Omit);
        assert!(config.credentials().unwrap().is_none());

        let retry = config.retry_config();
        assert_eq!(retry.max_retries, 3);
        assert_eq!(retry.backoff, Duration::from_millis(1000));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_endpoint("http://localhost:8080")
            .with_timeout(60)
            .with_max_retries(1)
            .with_backoff(Duration::from_millis(50))
            .with_user_agent("test-agent");

        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.retry_config().max_retries, 1);
        assert_eq!(config.backoff_ms, 50);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
    }

    #[test]
    fn test_credentials_from_keypair() {
        let config = ClientConfig::new().with_hmac_keypair("1:1111");
        let creds = config.credentials().unwrap().unwrap();
        assert_eq!(creds.key_id(), "1");

        let config = ClientConfig::new().with_hmac_keypair("420:69:69");
        assert!(matches!(config.credentials(), Err(RestError::Auth(_))));
    }

    #[test]
    fn test_debug_redacts_keypair() {
        let config = ClientConfig::new().with_hmac_keypair("1:supersecret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{"endpoint": "http://localhost", "max_retries": 0, "body_signing": "include"}"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.endpoint, "http://localhost");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.body_signing, BodySigning::Include);
        assert_eq!(config.timeout_secs, 30);
    }
}
