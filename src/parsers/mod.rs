//! CycloneDX document codec.
//!
//! ## Usage
//!
//! ```no_run
//! use cdx_combine::parsers::{parse_bom, CycloneDxCodec};
//! use std::path::Path;
//!
//! let bom = parse_bom(Path::new("sbom.cdx.json")).unwrap();
//! let json = CycloneDxCodec::new().to_json_string(&bom).unwrap();
//! ```

mod cyclonedx;
mod traits;

pub use cyclonedx::{CycloneDxCodec, SUPPORTED_SPEC_VERSIONS};
pub use traits::{FormatConfidence, FormatDetection, ParseError};

use crate::model::Bom;
use std::path::Path;

/// Parse a CycloneDX JSON file with the default (lenient) codec
pub fn parse_bom(path: &Path) -> Result<Bom, ParseError> {
    CycloneDxCodec::new().parse_file(path)
}

/// Parse CycloneDX JSON content with the default (lenient) codec
pub fn parse_bom_str(content: &str) -> Result<Bom, ParseError> {
    CycloneDxCodec::new().parse_str(content)
}
