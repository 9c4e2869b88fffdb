//! Error types for authentication operations

/// Errors that can occur while loading or parsing credentials
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Keypair string is not `<keyID>:<secret>`
    ///
    /// The message never contains the secret.
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("QTRADE_HMAC_KEYPAIR".to_string());
        assert!(err.to_string().contains("QTRADE_HMAC_KEYPAIR"));

        let err = AuthError::MalformedCredential("expected exactly one ':'".to_string());
        assert!(err.to_string().starts_with("Malformed credential"));
    }
}
