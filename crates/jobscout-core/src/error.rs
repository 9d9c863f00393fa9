//! Error types for the job search scraper
//!
//! Upstream failures never surface as errors during a search; this type
//! covers setup problems and the internal parse failures that route
//! markup to the fallback tier.

use thiserror::Error;

/// Error type for jobscout operations
#[derive(Error, Debug)]
pub enum JobsError {
    /// HTTP client could not be built
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// A header value could not be encoded
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// Result type alias for jobscout operations
pub type Result<T> = std::result::Result<T, JobsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse_error() {
        let error = JobsError::ParseError("invalid selector".to_string());
        assert_eq!(error.to_string(), "Failed to parse HTML: invalid selector");
    }

    #[test]
    fn test_error_display_invalid_header() {
        let error = JobsError::InvalidHeader("Accept-Language".to_string());
        assert_eq!(error.to_string(), "Invalid header value: Accept-Language");
    }
}
