//! Loading of input documents.

use super::PipelineError;
use crate::merge::SourceBom;
use crate::parsers::CycloneDxCodec;
use std::path::PathBuf;

/// Documents that parsed, and the files that did not.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Parsed documents labelled with their path, in input order
    pub documents: Vec<SourceBom>,
    pub failures: Vec<PipelineError>,
}

impl LoadOutcome {
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Read and parse each file in order with the lenient codec.
#[must_use]
pub fn load_documents(paths: &[PathBuf]) -> LoadOutcome {
    load_documents_with(&CycloneDxCodec::new(), paths)
}

/// Read and parse each file in order.
///
/// A file that cannot be read or parsed is logged and recorded; the
/// remaining files are still loaded.
#[must_use]
pub fn load_documents_with(codec: &CycloneDxCodec, paths: &[PathBuf]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for path in paths {
        tracing::info!("Loading {}...", path.display());
        match codec.parse_file(path) {
            Ok(bom) => {
                tracing::debug!(
                    path = %path.display(),
                    spec_version = %bom.spec_version,
                    components = bom.component_count(),
                    "Parsed document"
                );
                outcome
                    .documents
                    .push(SourceBom::new(path.display().to_string(), bom));
            }
            Err(source) => {
                let failure = PipelineError::LoadFailed {
                    path: path.clone(),
                    source,
                };
                tracing::error!("{failure}");
                outcome.failures.push(failure);
            }
        }
    }
    outcome
}
