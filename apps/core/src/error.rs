use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The input document is missing or is not valid JSON.
    #[error("{0}")]
    Input(String),

    /// The input parsed but does not have the expected shape (e.g. a rating row of the wrong length).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An optional enhanced component could not be initialized.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// An available enhanced component failed on a single call.
    #[error("Component failure: {0}")]
    Component(String),

    /// Numerical failure inside the factor routine (singular matrix, non-convergence, NaN).
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            AppError::Validation(format!("JSON error: {}", err))
        } else {
            AppError::Input(format!("JSON error: {}", err))
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_is_input_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::Input(_)));
    }

    #[test]
    fn test_shape_error_is_validation_error() {
        let err = serde_json::from_str::<Vec<f64>>(r#"["a"]"#).unwrap_err();
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}
