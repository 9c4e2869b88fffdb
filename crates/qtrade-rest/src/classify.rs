//! Response classification
//!
//! Maps an HTTP status, headers and body onto what the dispatcher should do
//! next. Pure: no I/O and no clock.

use qtrade_types::ErrorEnvelope;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;

use crate::error::RestError;

/// Header carrying the seconds until the rate limit resets
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Outcome of one response
#[derive(Debug)]
pub enum Classification {
    /// Status < 400; the body is the payload
    Success,
    /// HTTP 429; wait `reset_after` before retrying
    RateLimited { reset_after: Duration },
    /// HTTP 500 or 503; retry after the fixed backoff
    RetryableServer { status: String },
    /// Never retried
    Fatal(RestError),
}

/// `"<code> <canonical reason>"`, e.g. `"403 Forbidden"`
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Classify a complete response
pub fn classify(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Classification {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return match rate_limit_reset(headers) {
            Ok(reset_after) => Classification::RateLimited { reset_after },
            Err(err) => Classification::Fatal(err),
        };
    }

    if status == StatusCode::INTERNAL_SERVER_ERROR || status == StatusCode::SERVICE_UNAVAILABLE {
        return Classification::RetryableServer {
            status: status_line(status),
        };
    }

    if status.as_u16() >= 400 {
        let status = status_line(status);
        return Classification::Fatal(match ErrorEnvelope::parse(body) {
            Some(envelope) => RestError::Api {
                status,
                errors: envelope.errors,
            },
            None => RestError::ApiRaw {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            },
        });
    }

    Classification::Success
}

fn rate_limit_reset(headers: &HeaderMap) -> Result<Duration, RestError> {
    let raw = headers
        .get(RATE_LIMIT_RESET_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    raw.as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .ok_or(RestError::InvalidRateLimitReset { value: raw })
}
