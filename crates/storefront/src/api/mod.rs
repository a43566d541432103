//! Client for the mobiles REST API.
//!
//! # Architecture
//!
//! - The API is the source of truth for products and the cart - NO local
//!   persistence, direct API calls
//! - Every cart mutation returns the complete recomputed cart
//! - The catalog may be cached in memory via `moka` (configurable TTL)
//!
//! # Endpoints
//!
//! ```text
//! GET  /mobiles                          -> [Product]
//! GET  /cart                             -> [Product]
//! PUT  /cart?type=increment|decrement    body: Product   -> [Product]
//! POST /checkout                         body: [Product] -> [Product]
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mobile_store_storefront::api::MobileApiClient;
//!
//! let client = MobileApiClient::new(&config.api)?;
//! let catalog = client.list_mobiles().await?;
//! let cart = client.update_cart(&catalog[0], CartAction::Increment).await?;
//! ```

mod client;

pub use client::MobileApiClient;

use thiserror::Error;

/// Maximum number of response body characters kept in errors and logs.
pub(crate) const BODY_EXCERPT_CHARS: usize = 500;

/// Errors that can occur when talking to the mobiles API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// True if the API was reached and rejected the request.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }
}

/// Truncate a response body for logging and error messages.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 503,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 503: upstream down");
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_rejection() {
        let err = ApiError::Status {
            status: 422,
            body: String::new(),
        };
        assert!(err.is_rejection());
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "₹".repeat(BODY_EXCERPT_CHARS + 10);
        let short = excerpt(&body);
        assert_eq!(short.chars().count(), BODY_EXCERPT_CHARS);
    }
}
