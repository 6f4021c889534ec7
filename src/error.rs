//! Unified error types for cdx-combine.
//!
//! Only conditions that stop a whole run live here. Problems confined to one
//! document or one dependency edge are reported as
//! [`MergeDiagnostic`](crate::merge::MergeDiagnostic)s instead.

use crate::parsers::ParseError;
use thiserror::Error;

/// Main error type for cdx-combine operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CombineError {
    /// Errors while reading a CycloneDX document
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Invalid invocation (no inputs, empty root name, ...)
    #[error("Usage error: {0}")]
    Usage(String),

    /// Errors while writing the merged document
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Convenient Result type for cdx-combine operations
pub type Result<T> = std::result::Result<T, CombineError>;

impl CombineError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

impl From<ParseError> for CombineError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::SerializationError(message) => Self::Serialization(message),
            other => Self::parse(String::new(), other),
        }
    }
}

impl From<serde_json::Error> for CombineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to any existing context, so a chain like
/// `"loading inputs: reading a.json: ..."` shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CombineError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: CombineError, new_ctx: &str) -> CombineError {
    match err {
        CombineError::Parse {
            context: existing,
            source,
        } => CombineError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CombineError::Usage(msg) => CombineError::Usage(chain_context(new_ctx, &msg)),
        CombineError::Serialization(msg) => {
            CombineError::Serialization(chain_context(new_ctx, &msg))
        }
    }
}

/// Returns "`new`: `existing`", or just `new` when there is no existing context.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
