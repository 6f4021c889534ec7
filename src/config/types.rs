//! Configuration types for cdx-combine.

use super::defaults::{DEFAULT_OUTPUT_FILE, DEFAULT_REF_DELIMITER, DEFAULT_VALIDATE, STDOUT_PATH};
use crate::merge::{MergeEngine, OutputOptions, RootComponent};
use crate::parsers::CycloneDxCodec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Settings that can come from a `.cdx-combine.yaml` file and/or the command
/// line, with the command line taking precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// How input documents are read
    pub input: InputConfig,
    /// How documents are merged
    pub merge: MergeConfig,
    /// Where and how the merged document is written
    pub output: OutputConfig,
    /// Logging behavior
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Reject inputs with an unsupported `specVersion` instead of warning.
    pub const fn strict_input(mut self, strict: bool) -> Self {
        self.config.input.strict = strict;
        self
    }

    /// Prefix prepended to every derived component reference.
    pub fn ref_prefix(mut self, prefix: Option<String>) -> Self {
        self.config.merge.ref_prefix = prefix;
        self
    }

    /// Delimiter of composite local references.
    pub const fn ref_delimiter(mut self, delimiter: char) -> Self {
        self.config.merge.ref_delimiter = delimiter;
        self
    }

    /// Output file; `-` writes to stdout.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn include_timestamp(mut self, include: bool) -> Self {
        self.config.output.include_timestamp = include;
        self
    }

    pub const fn validate(mut self, validate: bool) -> Self {
        self.config.output.validate = validate;
        self
    }

    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.behavior.verbose = verbose;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Input-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InputConfig {
    /// Skip documents whose specVersion is not a supported CycloneDX version
    pub strict: bool,
}

impl InputConfig {
    /// Codec that reads input documents under these settings
    #[must_use]
    pub fn to_codec(&self) -> CycloneDxCodec {
        if self.strict {
            CycloneDxCodec::strict()
        } else {
            CycloneDxCodec::new()
        }
    }
}

/// Merge-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MergeConfig {
    /// Prefix for derived component references (e.g. "cdxc:")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_prefix: Option<String>,
    /// Delimiter of composite local references; only the last segment is kept
    pub ref_delimiter: char,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            ref_prefix: None,
            ref_delimiter: DEFAULT_REF_DELIMITER,
        }
    }
}

impl MergeConfig {
    /// Engine configured from these settings
    #[must_use]
    pub fn to_engine(&self) -> MergeEngine {
        MergeEngine::new()
            .with_ref_prefix(self.ref_prefix.clone())
            .with_composite_delimiter(self.ref_delimiter)
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path ("-" for stdout, default cyclonedx.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Record the generation time in metadata.timestamp
    pub include_timestamp: bool,
    /// Validate the merged document against the CycloneDX schema
    pub validate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: None,
            include_timestamp: false,
            validate: DEFAULT_VALIDATE,
        }
    }
}

impl OutputConfig {
    /// Output path with the default applied
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE))
    }

    /// Whether output goes to stdout rather than a file
    #[must_use]
    pub fn is_stdout(&self) -> bool {
        self.file
            .as_deref()
            .is_some_and(|p| p.as_os_str() == STDOUT_PATH)
    }

    #[must_use]
    pub fn to_options(&self) -> OutputOptions {
        OutputOptions {
            include_timestamp: self.include_timestamp,
            ..OutputOptions::default()
        }
    }
}

/// Logging behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Log per-component and per-edge detail
    pub verbose: bool,
    /// Only log warnings and errors
    pub quiet: bool,
}

// ============================================================================
// Runtime configuration for a combine run
// ============================================================================

/// Everything a single combine run needs, resolved from CLI and config file.
#[derive(Debug, Clone)]
pub struct CombineConfig {
    /// Input paths or glob patterns, in argument order
    pub inputs: Vec<String>,
    /// The synthetic root application
    pub root: RootComponent,
    pub input: InputConfig,
    pub merge: MergeConfig,
    pub output: OutputConfig,
    pub behavior: BehaviorConfig,
}

/// Builder for `CombineConfig`
#[derive(Debug, Default)]
pub struct CombineConfigBuilder {
    inputs: Vec<String>,
    name: Option<String>,
    version: Option<String>,
    app: AppConfig,
}

impl CombineConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inputs(mut self, inputs: Vec<String>) -> Self {
        self.inputs = inputs;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Layered file and command line settings
    #[must_use]
    pub fn app_config(mut self, app: AppConfig) -> Self {
        self.app = app;
        self
    }

    pub fn build(self) -> anyhow::Result<CombineConfig> {
        let name = self
            .name
            .ok_or_else(|| anyhow::anyhow!("application name is required"))?;
        let version = self
            .version
            .ok_or_else(|| anyhow::anyhow!("application version is required"))?;
        let root = RootComponent::new(name, version)?;

        Ok(CombineConfig {
            inputs: self.inputs,
            root,
            input: self.app.input,
            merge: self.app.merge,
            output: self.app.output,
            behavior: self.app.behavior,
        })
    }
}
