//! Structured error envelope returned by the exchange on failed requests
//!
//! Every response with status >= 400 is expected to carry
//! `{"errors": [{"code": "...", "title": "..."}]}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable code (e.g. "invalid_auth")
    pub code: String,
    /// Human-readable description
    pub title: String,
}

impl ApiErrorDetail {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.title)
    }
}

/// `{"errors": [...]}` wrapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

impl ErrorEnvelope {
    /// Parse an error body, returning None if it is not valid JSON of this shape
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// Returns true if any entry carries `code`
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let body = br#"{"errors": [{"code": "invalid_auth","title": "Invalid HMAC signature"}]}"#;
        let envelope = ErrorEnvelope::parse(body).unwrap();
        assert_eq!(envelope.errors.len(), 1);
        assert!(envelope.has_code("invalid_auth"));
        assert_eq!(
            envelope.errors[0].to_string(),
            "invalid_auth: Invalid HMAC signature"
        );
    }

    #[test]
    fn test_parse_envelope_rejects_garbage() {
        assert!(ErrorEnvelope::parse(b"short and stout").is_none());
        assert!(ErrorEnvelope::parse(b"").is_none());
    }

    #[test]
    fn test_parse_envelope_without_errors_field() {
        let envelope = ErrorEnvelope::parse(b"{}").unwrap();
        assert!(envelope.errors.is_empty());
    }
}
