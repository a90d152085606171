//! Error handling and error types for the rating dataset builder.
//!
//! Every fatal condition of a dataset build maps onto one variant of
//! [`RatingError`]. Diagnostics always name the table and the column or key
//! involved so a failed run can be traced back to the offending input.
//!
//! A lookup miss against the training statistics is *not* represented here:
//! unseen users and artists resolve to the sentinel value and are never a
//! failure.

use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum RatingError {
    /// A required column is absent from an ingested table
    #[error("Schema error: table '{table}' has no column '{column}'")]
    Schema {
        /// Table name
        table: String,
        /// Missing column name
        column: String,
    },

    /// A join key expected to be unique matched more than one row
    #[error("Join cardinality error: key {key} matches {matches} rows in table '{table}'")]
    JoinCardinality {
        /// Table holding the duplicated key
        table: String,
        /// Rendered key
        key: String,
        /// Number of rows sharing the key
        matches: usize,
    },

    /// A value expected to be numeric could not be coerced
    #[error("Data integrity error: table '{table}', column '{column}', row {row}: value '{value}' {reason}")]
    DataIntegrity {
        /// Table name
        table: String,
        /// Column name
        column: String,
        /// Zero-based row index
        row: usize,
        /// Offending raw value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Data loading errors
    #[error("Data loading error: {message}")]
    DataLoading { message: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Prediction errors
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Results using RatingError
pub type Result<T> = std::result::Result<T, RatingError>;

impl RatingError {
    /// Create a schema error for a missing column
    pub fn schema<T: Into<String>, C: Into<String>>(table: T, column: C) -> Self {
        RatingError::Schema {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a join cardinality error
    pub fn join_cardinality<T: Into<String>, K: Into<String>>(
        table: T,
        key: K,
        matches: usize,
    ) -> Self {
        RatingError::JoinCardinality {
            table: table.into(),
            key: key.into(),
            matches,
        }
    }

    /// Create a data integrity error for a single cell
    pub fn data_integrity<T, C, V, R>(table: T, column: C, row: usize, value: V, reason: R) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        RatingError::DataIntegrity {
            table: table.into(),
            column: column.into(),
            row,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        RatingError::Config {
            message: message.into(),
        }
    }

    /// Create a data loading error
    pub fn data_loading<S: Into<String>>(message: S) -> Self {
        RatingError::DataLoading {
            message: message.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        RatingError::Training {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        RatingError::Prediction {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        RatingError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        RatingError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            RatingError::Schema { .. } => "schema",
            RatingError::JoinCardinality { .. } => "join_cardinality",
            RatingError::DataIntegrity { .. } => "data_integrity",
            RatingError::Config { .. } => "config",
            RatingError::DataLoading { .. } => "data_loading",
            RatingError::Training { .. } => "training",
            RatingError::Prediction { .. } => "prediction",
            RatingError::InvalidParameter { .. } => "invalid_parameter",
            RatingError::DimensionMismatch { .. } => "dimension_mismatch",
            RatingError::Io { .. } => "io",
            RatingError::Csv { .. } => "csv",
            RatingError::Json { .. } => "json",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::RatingError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::RatingError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_table_and_column() {
        let err = RatingError::schema("users", "RESPID");
        assert_eq!(err.category(), "schema");
        let message = err.to_string();
        assert!(message.contains("users"));
        assert!(message.contains("RESPID"));
    }

    #[test]
    fn test_join_cardinality_display() {
        let err = RatingError::join_cardinality("words", "(A1, U1)", 2);
        assert_eq!(err.category(), "join_cardinality");
        assert!(err.to_string().contains("(A1, U1)"));
        assert!(err.to_string().contains("2 rows"));
    }

    #[test]
    fn test_data_integrity_display() {
        let err = RatingError::data_integrity("users", "AGE", 3, "abc", "is not numeric");
        assert_eq!(err.category(), "data_integrity");
        let message = err.to_string();
        assert!(message.contains("AGE"));
        assert!(message.contains("row 3"));
        assert!(message.contains("'abc'"));
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("bad value {}", 42);
        assert!(matches!(err, RatingError::Config { .. }));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: RatingError = io_err.into();
        assert!(matches!(err, RatingError::Io { .. }));
        assert_eq!(err.category(), "io");
    }
}
