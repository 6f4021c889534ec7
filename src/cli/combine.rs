//! Combine command handler.
//!
//! Runs the whole pipeline for one invocation: discover and load the input
//! documents, merge them under the root application, render, validate and
//! write the result.

use crate::config::{CombineConfig, Validatable};
use crate::pipeline::{
    discover_inputs, exit_codes, load_documents_with, render_output, run_validation, write_output,
    OutputTarget,
};
use anyhow::{Context, Result};

/// Run a combine, returning the desired exit code.
///
/// Per-file and per-edge problems are logged and do not change the exit code.
/// Only an invalid invocation (no inputs, invalid settings) returns a
/// non-zero code; failing to write the output is returned as an error.
#[allow(clippy::needless_pass_by_value)]
pub fn run_combine(config: CombineConfig) -> Result<i32> {
    if config.inputs.is_empty() {
        tracing::error!("At least one input file required!");
        return Ok(exit_codes::USAGE);
    }

    let config_errors: Vec<_> = config
        .merge
        .validate()
        .into_iter()
        .chain(config.output.validate())
        .collect();
    if !config_errors.is_empty() {
        for error in &config_errors {
            tracing::error!("Invalid configuration: {error}");
        }
        return Ok(exit_codes::USAGE);
    }

    let root = &config.root;
    tracing::info!(
        "Generating SBOM for {} {} from {}...",
        root.name(),
        root.version(),
        config.inputs.join(", ")
    );

    let paths = discover_inputs(&config.inputs);
    let loaded = load_documents_with(&config.input.to_codec(), &paths);
    if loaded.has_failures() {
        tracing::warn!(
            "{} of {} input files could not be loaded",
            loaded.failures.len(),
            paths.len()
        );
    }

    let merged = config.merge.to_engine().merge(root, &loaded.documents);
    let target = OutputTarget::from_path(config.output.path());
    tracing::info!(
        "New SBOM {} contains {} components",
        target.describe(),
        merged.component_count()
    );
    tracing::debug!("{}", merged.summary());

    let rendered = render_output(&merged, &config.output.to_options())
        .context("Failed to render the merged SBOM")?;

    if config.output.validate {
        let outcome = run_validation(&rendered.json, &rendered.bom.spec_version);
        tracing::debug!(valid = outcome.is_valid(), "Validation finished");
    } else {
        tracing::debug!("Validation disabled");
    }

    write_output(&rendered.json, &target)?;
    if let OutputTarget::File(path) = &target {
        tracing::info!("SBOM written to {}", path.display());
    }

    Ok(exit_codes::SUCCESS)
}
