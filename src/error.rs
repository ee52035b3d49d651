//! Lookup error taxonomy.

use thiserror::Error;

/// Every way a lookup can fail. None of these are cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Missing, non-numeric or out-of-range coordinates
    #[error("Invalid lat or lng")]
    InvalidInput,

    /// No intersecting feature, or the feature has no resolvable HUC code
    #[error("No HUC found for point")]
    NotFound,

    /// Transport error, bad upstream status, or unusable geometry.
    /// The detail is for logs only.
    #[error("Lookup failed: {0}")]
    LookupFailed(String),
}

impl LookupError {
    /// Message safe to hand back to callers
    pub fn public_message(&self) -> &'static str {
        match self {
            LookupError::InvalidInput => "Invalid lat or lng",
            LookupError::NotFound => "No HUC found for point",
            LookupError::LookupFailed(_) => "Lookup failed",
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::LookupFailed("upstream request timed out".to_string())
        } else {
            // Strip the URL so a configured token never reaches logs
            LookupError::LookupFailed(e.without_url().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_detail() {
        let err = LookupError::LookupFailed("connection refused to 10.0.0.1".to_string());
        assert_eq!(err.public_message(), "Lookup failed");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_display_matches_public_message_for_client_errors() {
        assert_eq!(LookupError::InvalidInput.to_string(), "Invalid lat or lng");
        assert_eq!(LookupError::NotFound.to_string(), "No HUC found for point");
    }
}
