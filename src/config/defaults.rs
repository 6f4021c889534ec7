//! Default values for cdx-combine configuration.

/// Output file written when neither the command line nor a config file names one
pub const DEFAULT_OUTPUT_FILE: &str = "cyclonedx.json";

/// Output path that selects standard output instead of a file
pub const STDOUT_PATH: &str = "-";

/// Composite local refs are split on this character
pub const DEFAULT_REF_DELIMITER: char = crate::model::DEFAULT_COMPOSITE_DELIMITER;

/// Validation of the merged document is advisory and on unless disabled
pub const DEFAULT_VALIDATE: bool = true;

/// Characters that may not be used as a composite ref delimiter
pub(crate) const RESERVED_DELIMITERS: &[char] = &['@', '/'];
