//! Pipeline stages for a combine run.
//!
//! discover inputs → load documents → merge → render → validate → write.
//! Each stage logs its own progress; only writing the output can fail the run.

mod discover;
mod load;
mod output;

pub use discover::discover_inputs;
pub use load::{load_documents, load_documents_with, LoadOutcome};
pub use output::{render_output, run_validation, write_output, OutputTarget, RenderedOutput};

use crate::parsers::ParseError;
use std::path::PathBuf;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse an input document
    #[error("Failed to load {}: {source}", path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Failed to write the merged document
    #[error("Failed to write output to {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Process exit codes
pub mod exit_codes {
    /// Merged document written
    pub const SUCCESS: i32 = 0;
    /// Invalid invocation, e.g. no input files
    pub const USAGE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::USAGE, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_load_failed_display() {
        let err = PipelineError::LoadFailed {
            path: PathBuf::from("a.json"),
            source: ParseError::MissingField("bomFormat".into()),
        };
        assert!(err.to_string().starts_with("Failed to load a.json"));
    }
}
