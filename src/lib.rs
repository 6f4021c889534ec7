//! **Merge CycloneDX SBOMs into a single document.**
//!
//! `cdx-combine` takes the SBOMs of an application's parts (services,
//! containers, libraries) and produces one CycloneDX 1.5 document describing
//! the whole application. A synthetic root component depends on each input's
//! own root. Components are deduplicated across documents by their
//! `group/name@version` identity, and every document's dependency graph is
//! rewritten onto those identities.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the typed CycloneDX document ([`Bom`], [`Component`],
//!   [`Dependency`]) and the identity rules ([`GlobalRef`], [`simplify_ref`]).
//! - **[`merge`]**: the [`MergeEngine`], which folds documents into a
//!   [`MergedBom`] and records recoverable problems as [`MergeDiagnostic`]s.
//! - **[`parsers`]**: reading and writing CycloneDX JSON.
//! - **[`validation`]**: strict schema checks of the output (feature
//!   `validation`, on by default).
//! - **[`pipeline`]**: the stages of a command line run, from input discovery
//!   to writing the output.
//! - **[`config`]**: `.cdx-combine.yaml` loading and layering.
//!
//! ## Merging documents
//!
//! ```no_run
//! use std::path::Path;
//! use cdx_combine::{parse_bom, MergeEngine, OutputOptions, RootComponent, SourceBom};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let documents = vec![
//!         SourceBom::new("frontend", parse_bom(Path::new("frontend.cdx.json"))?),
//!         SourceBom::new("backend", parse_bom(Path::new("backend.cdx.json"))?),
//!     ];
//!
//!     let root = RootComponent::new("My Suite", "1.0")?;
//!     let merged = MergeEngine::new().merge(&root, &documents);
//!     for diagnostic in &merged.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!
//!     let bom = merged.to_bom(&OutputOptions::default())?;
//!     println!("{}", serde_json::to_string_pretty(&bom)?);
//!     Ok(())
//! }
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod utils;
pub mod validation;

pub use config::{
    AppConfig, AppConfigBuilder, BehaviorConfig, InputConfig, MergeConfig, OutputConfig,
};
pub use config::{CombineConfig, ConfigError, Validatable};
pub use error::{CombineError, ErrorContext, Result};
pub use merge::{
    merge, DocumentReport, MergeDiagnostic, MergeEngine, MergedBom, OutputOptions, RootComponent,
    SourceBom,
};
pub use model::{simplify_ref, Bom, Component, ComponentType, Dependency, GlobalRef};
pub use parsers::{parse_bom, parse_bom_str, CycloneDxCodec, ParseError};
pub use validation::{validate_available, SchemaVersion, ValidationError, ValidationOutcome};
