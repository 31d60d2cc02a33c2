//! Error types shared by the regression and critical-value engines

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CalcError>;

/// Errors raised by input parsing and the statistical engines
///
/// Degenerate fits (zero variance in x or y) are not errors; they resolve
/// to a defined fallback and are flagged on the result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid data format at line {line}, column {column}: {reason}")]
    Parse {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Dataset is empty: at least one (x, y) pair is required")]
    EmptyDataset,

    #[error("Sample size must be at least 3 (got n = {n}, df = n - 2 must be positive)")]
    InsufficientSampleSize { n: usize },

    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl CalcError {
    pub(crate) fn invalid_parameter(
        name: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CalcError::Parse {
            line: 2,
            column: 7,
            reason: "expected a number".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("column 7"));
        assert!(msg.contains("expected a number"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = CalcError::invalid_parameter("alpha", 1.5, "must lie strictly within (0, 1)");
        let msg = err.to_string();
        assert!(msg.contains("alpha"));
        assert!(msg.contains("1.5"));
        assert!(msg.contains("(0, 1)"));
    }

    #[test]
    fn test_insufficient_sample_size_display() {
        let err = CalcError::InsufficientSampleSize { n: 2 };
        assert!(err.to_string().contains("n = 2"));
    }
}
