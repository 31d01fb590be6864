//! Error types for profile validation, assumption loading and engine calls

use thiserror::Error;

/// A single rejected profile field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be a non-negative amount (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be one of {allowed} (got '{value}')")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field, as it appears on the wire
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NegativeAmount { field, .. }
            | ValidationError::InvalidChoice { field, .. } => field,
        }
    }
}

/// Every violation found in one profile
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid profile: {}", summarize(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(violations: Vec<ValidationError>) -> Self {
        Self { violations }
    }

    /// Ok when nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

fn summarize(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Problems with assumption tables or settings, detected at load time
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("table {table} has no entry for {key}")]
    MissingTableEntry { table: &'static str, key: String },

    #[error("table {table} row {row}: {reason}")]
    MalformedRow {
        table: &'static str,
        row: usize,
        reason: String,
    },

    #[error("table {table}: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    #[error("setting {name}='{value}' is invalid: {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the calculation engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_lists_every_field() {
        let errors = ValidationErrors::new(vec![
            ValidationError::OutOfRange { field: "age", value: 12, min: 18, max: 80 },
            ValidationError::Missing { field: "gender" },
        ]);

        let message = errors.to_string();
        assert!(message.contains("age must be between 18 and 80 (got 12)"));
        assert!(message.contains("gender is required"));
        assert!(errors.contains_field("age"));
        assert!(!errors.contains_field("smoking"));
    }

    #[test]
    fn test_empty_errors_into_ok() {
        assert!(ValidationErrors::new(Vec::new()).into_result().is_ok());
    }
}
