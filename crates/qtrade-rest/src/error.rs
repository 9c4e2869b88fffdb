//! Error types for REST API operations

use qtrade_auth::AuthError;
use qtrade_types::{ApiErrorDetail, TypesError};
use std::time::Duration;

/// Broad category of a [`RestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Keypair missing or malformed
    Credential,
    /// Currency, market or amount rejected before sending
    InvalidInput,
    /// Connection, TLS or body read failure
    TransportFailure,
    /// HTTP 429
    RateLimited,
    /// HTTP 500 or 503
    RetryableServer,
    /// Any other HTTP status >= 400
    FatalClient,
    /// Success response did not match the expected shape
    Decode,
    /// Cancelled by token or overall deadline
    Cancelled,
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Credential could not be loaded or parsed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Currency or market unknown, or an amount could not be formatted
    #[error(transparent)]
    Types(#[from] TypesError),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// HTTP request failed before a status was received
    #[error("could not complete HTTP request: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 429 after the retry budget was spent
    #[error("too many requests, rate limit resets in {}s", reset_after.as_secs())]
    RateLimited {
        /// Server-given wait before the limit resets
        reset_after: Duration,
    },

    /// HTTP 429 without a usable `x-ratelimit-reset` header
    #[error("could not parse ratelimit reset header: {value:?}")]
    InvalidRateLimitReset {
        /// Raw header value, if present
        value: Option<String>,
    },

    /// HTTP 500/503 after the retry budget was spent
    #[error("a retryable HTTP error occurred: {status}")]
    Server {
        /// Status line (e.g. "503 Service Unavailable")
        status: String,
    },

    /// HTTP >= 400 with a structured error body
    #[error("{}", chain_api_errors(errors, status))]
    Api {
        /// Status line (e.g. "403 Forbidden")
        status: String,
        /// Entries of the `errors` array, in response order
        errors: Vec<ApiErrorDetail>,
    },

    /// HTTP >= 400 whose body is not the expected JSON
    #[error("got API error with bad JSON: {status}: {body}")]
    ApiRaw {
        /// Status line
        status: String,
        /// Body text, lossily decoded
        body: String,
    },

    /// Failed to parse a success response
    #[error("could not unmarshal request result: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request cancelled through the client's cancellation token
    #[error("request cancelled")]
    Cancelled,

    /// Overall deadline elapsed across all attempts
    #[error("request timed out after {}s", budget.as_secs_f64())]
    Timeout {
        /// Deadline that was exceeded
        budget: Duration,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Fold error entries around the status line, most recent wrap first
fn chain_api_errors(errors: &[ApiErrorDetail], status: &str) -> String {
    let mut message = String::new();
    for detail in errors.iter().rev() {
        message.push_str(&detail.code);
        message.push_str(": ");
        message.push_str(&detail.title);
        message.push_str(": ");
    }
    message.push_str("API response: ");
    message.push_str(status);
    message
}

impl RestError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) | Self::AuthRequired => ErrorKind::Credential,
            Self::Types(_) | Self::InvalidParameter(_) | Self::Config(_) => ErrorKind::InvalidInput,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Server { .. } => ErrorKind::RetryableServer,
            Self::Api { .. } | Self::ApiRaw { .. } | Self::InvalidRateLimitReset { .. } => {
                ErrorKind::FatalClient
            }
            Self::Decode(_) => ErrorKind::Decode,
            Self::Cancelled | Self::Timeout { .. } => ErrorKind::Cancelled,
        }
    }

    /// Check if repeating the same request could succeed
    ///
    /// Decided by [`ErrorKind`] alone. A [`RestError::Timeout`] is not
    /// retryable: the deadline already spanned every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::RetryableServer | ErrorKind::TransportFailure
        )
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.kind() == ErrorKind::RateLimited
    }

    /// Check if the exchange rejected the request itself
    pub fn is_fatal_client(&self) -> bool {
        self.kind() == ErrorKind::FatalClient
    }

    /// Structured error entries, if the exchange sent any
    pub fn api_errors(&self) -> &[ApiErrorDetail] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Server-given wait for rate-limit errors
    pub fn reset_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { reset_after } => Some(*reset_after),
            _ => None,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
