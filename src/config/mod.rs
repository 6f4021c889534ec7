//! Configuration for cdx-combine.
//!
//! Settings come from an optional `.cdx-combine.yaml` file layered under the
//! command line:
//!
//! ```yaml
//! input:
//!   strict: false
//! merge:
//!   ref_prefix: "cdxc:"
//!   ref_delimiter: "|"
//! output:
//!   file: cyclonedx.json
//!   include_timestamp: false
//!   validate: true
//! behavior:
//!   verbose: false
//!   quiet: false
//! ```
//!
//! ```rust,ignore
//! use cdx_combine::config::{AppConfig, file::load_or_default};
//!
//! let (mut config, loaded_from) = load_or_default(None);
//! config.merge(&AppConfig::builder().quiet(true).build());
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_OUTPUT_FILE, DEFAULT_REF_DELIMITER, DEFAULT_VALIDATE, STDOUT_PATH};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CombineConfig, CombineConfigBuilder,
    InputConfig, MergeConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.cdx-combine.yaml` files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
