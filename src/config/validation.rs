//! Configuration validation for cdx-combine.

use super::defaults::RESERVED_DELIMITERS;
use super::types::{AppConfig, MergeConfig, OutputConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.merge.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for MergeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let delimiter = self.ref_delimiter;
        if delimiter.is_whitespace() || delimiter.is_control() {
            errors.push(ConfigError::new(
                "merge.ref_delimiter",
                "Delimiter must be a visible character",
            ));
        } else if RESERVED_DELIMITERS.contains(&delimiter) {
            errors.push(ConfigError::new(
                "merge.ref_delimiter",
                format!("'{delimiter}' is part of derived references and cannot be a delimiter"),
            ));
        }

        if let Some(prefix) = &self.ref_prefix {
            if prefix.chars().any(char::is_whitespace) {
                errors.push(ConfigError::new(
                    "merge.ref_prefix",
                    format!("Prefix '{prefix}' must not contain whitespace"),
                ));
            }
            if prefix.contains(delimiter) {
                errors.push(ConfigError::new(
                    "merge.ref_prefix",
                    format!("Prefix '{prefix}' contains the ref delimiter '{delimiter}'"),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.is_stdout() {
            return errors;
        }
        if let Some(file_path) = &self.file {
            if file_path.as_os_str().is_empty() {
                errors.push(ConfigError::new("output.file", "Output path must not be empty"));
            } else if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }
        errors
    }
}
