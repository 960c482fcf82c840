// src/error.rs
use thiserror::Error;

/// Errors raised by the barrier-mc pricing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdeError {
    /// A contract term is malformed or out of range
    #[error("Invalid contract field '{field}' = {value}: {constraint}")]
    InvalidContract {
        field: String,
        value: String,
        constraint: String,
    },

    /// The simulation grid cannot be sampled
    #[error("Invalid simulation grid '{field}': {reason}")]
    InvalidGrid { field: String, reason: String },

    /// The simulation produced a non-finite estimate
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for barrier-mc operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};

    fn invalid_contract(name: &str, value: f64, constraint: String) -> SdeError {
        SdeError::InvalidContract {
            field: name.to_string(),
            value: value.to_string(),
            constraint,
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(invalid_contract(
                name,
                value,
                "must be finite (not NaN or infinite)".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(invalid_contract(
                name,
                value,
                "must be positive (> 0)".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter lies in the closed range `[min, max]`
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> SdeResult<()> {
        validate_finite(name, value)?;
        if value < min || value > max {
            Err(invalid_contract(
                name,
                value,
                format!("must be in range [{}, {}]", min, max),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate a step or path count
    pub fn validate_count(name: &str, count: usize) -> SdeResult<()> {
        if count == 0 {
            Err(SdeError::InvalidGrid {
                field: name.to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
