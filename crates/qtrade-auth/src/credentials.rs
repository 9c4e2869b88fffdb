//! API credentials and qTrade request signing
//!
//! The exchange authenticates private requests with a plain SHA-256 digest
//! over the canonical request followed by the shared secret:
//!
//! ```text
//! METHOD \n REQUEST_URI \n TIMESTAMP \n [BODY] \n SECRET
//! ```
//!
//! # Security
//!
//! The secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Header carrying the signature
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Header carrying the timestamp that was signed
pub const TIMESTAMP_HEADER: &str = "HMAC-Timestamp";

const KEYPAIR_ENV_VAR: &str = "QTRADE_HMAC_KEYPAIR";

/// Current Unix time in whole seconds
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Whether request body bytes are part of the signed message
///
/// The exchange's reference client never fed body bytes into the digest, and
/// the exchange accepts signatures built that way, so `Omit` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySigning {
    /// Sign an empty body slot even when a body is sent
    #[default]
    Omit,
    /// Sign the exact body bytes that are sent
    Include,
}

/// API credentials for authenticated requests
///
/// Secrets are automatically zeroized when the Credentials are dropped.
pub struct Credentials {
    /// Key identifier (public)
    key_id: String,
    /// Shared secret (zeroized on drop)
    secret: SecretString,
}

impl Credentials {
    /// Create credentials from a key identifier and secret
    ///
    /// Both parts must be non-empty.
    pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> AuthResult<Self> {
        let key_id = key_id.into();
        let secret = secret.into();

        if key_id.is_empty() {
            return Err(AuthError::MalformedCredential(
                "key id is empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(AuthError::MalformedCredential("secret is empty".to_string()));
        }

        Ok(Self {
            key_id,
            secret: SecretString::from(secret),
        })
    }

    /// Parse a `"<keyID>:<secret>"` keypair string
    ///
    /// Exactly one `:` is allowed and neither half may be empty.
    pub fn parse(keypair: &str) -> AuthResult<Self> {
        let mut parts = keypair.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key_id), Some(secret), None) => Self::new(key_id, secret),
            (_, None, _) => Err(AuthError::MalformedCredential(
                "expected '<keyID>:<secret>', found no ':'".to_string(),
            )),
            _ => Err(AuthError::MalformedCredential(
                "expected '<keyID>:<secret>', found more than one ':'".to_string(),
            )),
        }
    }

    /// Create credentials from the environment
    ///
    /// Reads `QTRADE_HMAC_KEYPAIR` in `<keyID>:<secret>` form.
    pub fn from_env() -> AuthResult<Self> {
        let keypair = std::env::var(KEYPAIR_ENV_VAR)
            .map_err(|_| AuthError::EnvVarNotSet(KEYPAIR_ENV_VAR.to_string()))?;

        let creds = Self::parse(keypair.trim())?;
        debug!(key_id = %creds.key_id, "Loaded credentials from environment");
        Ok(creds)
    }

    /// Get the key identifier
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Compute the `Authorization` header value for one request
    ///
    /// `request_uri` is the path plus `?query` when the query is non-empty.
    /// `body` is what gets signed, which may differ from what gets sent
    /// (see [`BodySigning`]).
    pub fn sign(
        &self,
        method: &str,
        request_uri: &str,
        timestamp: u64,
        body: Option<&[u8]>,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(method.to_ascii_uppercase().as_bytes());
        hasher.update(b"\n");
        hasher.update(request_uri.as_bytes());
        hasher.update(b"\n");
        hasher.update(timestamp.to_string().as_bytes());
        hasher.update(b"\n");
        if let Some(body) = body {
            hasher.update(body);
        }
        hasher.update(b"\n");
        hasher.update(self.secret.expose_secret().as_bytes());

        let digest = BASE64.encode(hasher.finalize());
        format!("HMAC-SHA256 {}:{}", self.key_id, digest)
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretString with same content)
    fn clone(&self) -> Self {
        Self {
            key_id: self.key_id.clone(),
            secret: SecretString::from(self.secret.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Header values produced for one physical request attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// `Authorization` header value
    pub authorization: String,
    /// `HMAC-Timestamp` header value
    pub timestamp: String,
}

/// Request signer applying one body-signing mode
///
/// Create a fresh envelope for every attempt, retries included, so each one
/// carries the current timestamp.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    body_signing: BodySigning,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(credentials: &'a Credentials, body_signing: BodySigning) -> Self {
        Self {
            credentials,
            body_signing,
        }
    }

    /// Get the key identifier
    pub fn key_id(&self) -> &str {
        self.credentials.key_id()
    }

    /// Sign a request with the current time
    pub fn sign(&self, method: &str, request_uri: &str, body: Option<&[u8]>) -> SignedEnvelope {
        self.sign_at(method, request_uri, unix_timestamp(), body)
    }

    /// Sign a request with an explicit timestamp
    pub fn sign_at(
        &self,
        method: &str,
        request_uri: &str,
        timestamp: u64,
        body: Option<&[u8]>,
    ) -> SignedEnvelope {
        let signed_body = match self.body_signing {
            BodySigning::Omit => None,
            BodySigning::Include => body,
        };

        SignedEnvelope {
            authorization: self
                .credentials
                .sign(method, request_uri, timestamp, signed_body),
            timestamp: timestamp.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones_secret() -> String {
        "1".repeat(64)
    }

    #[test]
    fn test_parse_keypair() {
        let creds = Credentials::parse("1:1111").unwrap();
        assert_eq!(creds.key_id(), "1");
        assert_eq!(creds.secret.expose_secret(), "1111");
    }

    #[test]
    fn test_parse_rejects_malformed_keypairs() {
        for keypair in ["", "nocolon", "420:69:69", ":secret", "256:", ":"] {
            assert!(
                matches!(
                    Credentials::parse(keypair),
                    Err(AuthError::MalformedCredential(_))
                ),
                "{keypair:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_error_does_not_leak_secret() {
        let err = Credentials::parse("1:topsecret:extra").unwrap_err();
        assert!(!err.to_string().contains("topsecret"));
    }

    #[test]
    fn test_sign_root_path() {
        let creds = Credentials::parse("256:vwj043jtrw4o5igw4oi5jwoi45g").unwrap();
        assert_eq!(
            creds.sign("GET", "/", 12345, None),
            "HMAC-SHA256 256:iyfC4n+bE+3hLgMJns1Z67FKA7O5qm5PgDvZHGraMTQ="
        );
    }

    #[test]
    fn test_sign_path_with_query() {
        let creds = Credentials::new("1", ones_secret()).unwrap();
        assert_eq!(
            creds.sign("GET", "/v1/user/orders?open=false", 12345, None),
            "HMAC-SHA256 1:4S8CauoSJcBbQsdcqpqvzN/aFyVJgADXU05eppDxiFA="
        );
    }

    #[test]
    fn test_sign_lowercase_method_is_normalized() {
        let creds = Credentials::parse("256:vwj043jtrw4o5igw4oi5jwoi45g").unwrap();
        assert_eq!(
            creds.sign("get", "/", 12345, None),
            creds.sign("GET", "/", 12345, None)
        );
    }

    #[test]
    fn test_body_signing_modes() {
        let creds = Credentials::new("1", ones_secret()).unwrap();
        let body = br#"{"id":42}"#;

        let omit = RequestSigner::new(&creds, BodySigning::Omit).sign_at(
            "POST",
            "/v1/user/cancel_order",
            12345,
            Some(body),
        );
        assert_eq!(
            omit.authorization,
            "HMAC-SHA256 1:jABOoZfXrfB/JcP5HVDMSdlxYOb/62t9cisuphtf93M="
        );

        let include = RequestSigner::new(&creds, BodySigning::Include).sign_at(
            "POST",
            "/v1/user/cancel_order",
            12345,
            Some(body),
        );
        assert_eq!(
            include.authorization,
            "HMAC-SHA256 1:8UJc0T6KmXLKtrI+imVHYvVAwSeeCAYucsFPLl/6ps4="
        );
        assert_eq!(include.timestamp, "12345");
    }

    #[test]
    fn test_signer_uses_current_time() {
        let creds = Credentials::new("1", ones_secret()).unwrap();
        let before = unix_timestamp();
        let envelope = RequestSigner::new(&creds, BodySigning::Omit).sign("GET", "/", None);
        let ts: u64 = envelope.timestamp.parse().unwrap();
        assert!(ts >= before);
        assert!(envelope.authorization.starts_with("HMAC-SHA256 1:"));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::parse("256:vwj043jtrw4o5igw4oi5jwoi45g").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("vwj043"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("256"));
    }

    #[test]
    fn test_body_signing_serde() {
        assert_eq!(BodySigning::default(), BodySigning::Omit);
        let parsed: BodySigning = serde_json::from_str("\"include\"").unwrap();
        assert_eq!(parsed, BodySigning::Include);
    }
}
