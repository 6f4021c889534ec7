//! Merging of CycloneDX documents.
//!
//! [`MergeEngine`] folds any number of parsed documents into a single graph
//! under a synthetic root application. Components are deduplicated by their
//! `group/name@version` identity and every document's dependency edges are
//! rewritten onto those identities.

mod diagnostics;
mod engine;
mod result;

pub use diagnostics::{DiagnosticSeverity, MergeDiagnostic};
pub use engine::{merge, MergeEngine, RootComponent, SourceBom};
pub use result::{DocumentReport, DocumentStatus, MergedBom, OutputOptions, OUTPUT_SPEC_VERSION};
