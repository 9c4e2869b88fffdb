//! API endpoint implementations

pub mod market;
pub mod account;
pub mod trading;
pub mod funding;

pub use market::MarketEndpoints;
pub use account::AccountEndpoints;
pub use trading::TradingEndpoints;
pub use funding::FundingEndpoints;

use crate::error::{RestError, RestResult};

/// Reject caller-supplied path segments that would change the request path
pub(crate) fn path_segment(value: &str) -> RestResult<&str> {
    if value.is_empty() || value.contains(['/', '?', '#']) {
        return Err(RestError::InvalidParameter(format!(
            "invalid path segment: {value:?}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("BTC").unwrap(), "BTC");
        assert_eq!(path_segment("1:855e291e").unwrap(), "1:855e291e");
        assert!(path_segment("").is_err());
        assert!(path_segment("../me").is_err());
        assert!(path_segment("x?open=true").is_err());
    }
}
