//! Rendering, validation and writing of the merged document.

use super::PipelineError;
use crate::config::STDOUT_PATH;
use crate::error::{ErrorContext, Result};
use crate::merge::{MergedBom, OutputOptions};
use crate::model::Bom;
use crate::parsers::CycloneDxCodec;
use crate::validation::{validate_available, SchemaVersion, ValidationOutcome};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// `-` selects stdout, anything else is a file path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == STDOUT_PATH {
            Self::Stdout
        } else {
            Self::File(path)
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "<stdout>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// A merged document and its serialized form
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub bom: Bom,
    /// Pretty-printed JSON, 2-space indented
    pub json: String,
}

/// Convert a merge result into a CycloneDX document and serialize it.
pub fn render_output(merged: &MergedBom, options: &OutputOptions) -> Result<RenderedOutput> {
    let bom = merged.to_bom(options).context("building output document")?;
    let json = CycloneDxCodec::new()
        .to_json_string(&bom)
        .context("serializing output document")?;
    Ok(RenderedOutput { bom, json })
}

/// Validate rendered JSON against the schema of its spec version.
///
/// Advisory only: violations are logged as warnings and returned, never
/// turned into an error.
#[must_use]
pub fn run_validation(json: &str, spec_version: &str) -> ValidationOutcome {
    let version = match spec_version.parse::<SchemaVersion>() {
        Ok(version) => version,
        Err(e) => {
            tracing::warn!("Skipping validation: {e}");
            return ValidationOutcome::Unavailable;
        }
    };

    match validate_available(version, json) {
        Ok(ValidationOutcome::Valid) => {
            tracing::info!("Output validated against CycloneDX {version}");
            ValidationOutcome::Valid
        }
        Ok(ValidationOutcome::Invalid(errors)) => {
            tracing::warn!(
                "Output does not validate against CycloneDX {version} ({} violations)",
                errors.len()
            );
            for error in &errors {
                tracing::warn!("  {error}");
            }
            ValidationOutcome::Invalid(errors)
        }
        Ok(ValidationOutcome::Unavailable) => {
            tracing::info!("Schema validation not available in this build, skipping");
            ValidationOutcome::Unavailable
        }
        Err(e) => {
            tracing::warn!("Validation could not run: {e}");
            ValidationOutcome::Unavailable
        }
    }
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget) -> std::result::Result<(), PipelineError> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")
                .and_then(|()| stdout.flush())
                .map_err(|source| PipelineError::WriteFailed {
                    path: PathBuf::from(STDOUT_PATH),
                    source,
                })
        }
        OutputTarget::File(path) => write_file(path, content),
    }
}

fn write_file(path: &Path, content: &str) -> std::result::Result<(), PipelineError> {
    std::fs::write(path, content).map_err(|source| PipelineError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
