//! Schema validation of CycloneDX JSON documents.
//!
//! The strict validator lives behind the `validation` feature (on by
//! default). Without it, [`validate_available`] reports
//! [`ValidationOutcome::Unavailable`] and callers skip validation.

#[cfg(feature = "validation")]
mod strict;

#[cfg(feature = "validation")]
pub use strict::StrictValidator;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// CycloneDX schema versions the validator knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchemaVersion {
    #[serde(rename = "1.4")]
    V1_4,
    #[serde(rename = "1.5")]
    V1_5,
    #[serde(rename = "1.6")]
    V1_6,
}

impl SchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.4" => Ok(Self::V1_4),
            "1.5" => Ok(Self::V1_5),
            "1.6" => Ok(Self::V1_6),
            other => Err(ValidatorError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// A single schema violation, located by a JSON path such as
/// `components[2].purl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Failures that prevent validation from running at all.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(String),

    #[cfg(feature = "validation")]
    #[error("invalid validator pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result of validating a document when the validator may be compiled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(Vec<ValidationError>),
    /// The strict validator is not part of this build
    Unavailable,
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validate `json` against `version` if the strict validator is available.
#[cfg(feature = "validation")]
pub fn validate_available(
    version: SchemaVersion,
    json: &str,
) -> Result<ValidationOutcome, ValidatorError> {
    let errors = StrictValidator::new(version)?.validate_str(json)?;
    if errors.is_empty() {
        Ok(ValidationOutcome::Valid)
    } else {
        Ok(ValidationOutcome::Invalid(errors))
    }
}

/// Validate `json` against `version` if the strict validator is available.
#[cfg(not(feature = "validation"))]
pub fn validate_available(
    _version: SchemaVersion,
    _json: &str,
) -> Result<ValidationOutcome, ValidatorError> {
    Ok(ValidationOutcome::Unavailable)
}
