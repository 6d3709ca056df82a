//! Error types for bargain

use crate::types::Party;
use thiserror::Error;

/// Main error type for negotiation runs
#[derive(Error, Debug)]
pub enum NegotiationError {
    // Construction errors
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    // Policy errors
    #[error("Policy violation: {party} offered {price}, outside its bound {bound}")]
    PolicyViolation { party: Party, price: f64, bound: f64 },

    #[error("No progress: {party} repeated {price} while the counterpart stood still")]
    NoProgress { party: Party, price: f64 },

    // State machine errors
    #[error("Invalid negotiation state transition: {0}")]
    InvalidStateTransition(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for negotiation operations
pub type Result<T> = std::result::Result<T, NegotiationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = NegotiationError::InvalidProduct("base price must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid product: base price must be positive");
    }

    #[test]
    fn test_result_type() {
        fn sample_function() -> Result<u32> {
            Ok(42)
        }

        let result = sample_function();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_error_conversion() {
        fn io_error_function() -> Result<()> {
            std::fs::read_to_string("/nonexistent/file")?;
            Ok(())
        }

        let result = io_error_function();
        assert!(matches!(result.unwrap_err(), NegotiationError::Io(_)));
    }

    #[test]
    fn test_policy_violation_error() {
        let err = NegotiationError::PolicyViolation {
            party: Party::Buyer,
            price: 950.0,
            bound: 900.0,
        };
        assert_eq!(
            err.to_string(),
            "Policy violation: Buyer offered 950, outside its bound 900"
        );
    }

    #[test]
    fn test_no_progress_error() {
        let err = NegotiationError::NoProgress {
            party: Party::Seller,
            price: 700.0,
        };
        assert_eq!(
            err.to_string(),
            "No progress: Seller repeated 700 while the counterpart stood still"
        );
    }
}
