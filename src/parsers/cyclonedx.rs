//! CycloneDX JSON codec.
//!
//! Reads CycloneDX 1.2 through 1.6 JSON documents into the typed [`Bom`]
//! model and writes documents back out as 2-space indented JSON.

use crate::model::{Bom, BOM_FORMAT};
use crate::parsers::traits::{FormatConfidence, FormatDetection, ParseError};
use std::path::Path;

/// Spec versions the codec accepts on input.
pub const SUPPORTED_SPEC_VERSIONS: &[&str] = &["1.2", "1.3", "1.4", "1.5", "1.6"];

/// Maximum SBOM file size (512 MB).
const MAX_SBOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Reader/writer for CycloneDX JSON documents
#[derive(Debug, Clone, Default)]
pub struct CycloneDxCodec {
    /// Reject unsupported spec versions instead of warning
    strict: bool,
}

impl CycloneDxCodec {
    /// Create a lenient codec
    #[must_use]
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Create a codec that rejects unsupported spec versions
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parse a document from a file, refusing files over 512 MB
    pub fn parse_file(&self, path: &Path) -> Result<Bom, ParseError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_SBOM_FILE_SIZE {
            return Err(ParseError::IoError(format!(
                "SBOM file is {} MB, exceeding the {} MB limit",
                metadata.len() / (1024 * 1024),
                MAX_SBOM_FILE_SIZE / (1024 * 1024),
            )));
        }
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parse a document from string content
    pub fn parse_str(&self, content: &str) -> Result<Bom, ParseError> {
        if !content.trim_start().starts_with('{') {
            return Err(ParseError::UnknownFormat(
                "Expected a CycloneDX JSON object".to_string(),
            ));
        }
        match serde_json::from_str::<Bom>(content) {
            Ok(bom) => self.check_header(bom),
            Err(e) => {
                let detection = self.detect(content);
                if !detection.confidence.can_parse() {
                    return Err(ParseError::UnknownFormat(
                        "Content does not look like a CycloneDX document".to_string(),
                    ));
                }
                for warning in &detection.warnings {
                    tracing::debug!("{warning}");
                }
                Err(e.into())
            }
        }
    }

    /// Parse a document from a reader without buffering it first
    pub fn parse_reader<R: std::io::Read>(&self, reader: R) -> Result<Bom, ParseError> {
        let bom: Bom = serde_json::from_reader(reader)?;
        self.check_header(bom)
    }

    /// Serialize a document as 2-space indented JSON
    pub fn to_json_string(&self, bom: &Bom) -> Result<String, ParseError> {
        serde_json::to_string_pretty(bom)
            .map_err(|e| ParseError::SerializationError(e.to_string()))
    }

    fn check_header(&self, bom: Bom) -> Result<Bom, ParseError> {
        if bom.bom_format.is_empty() {
            return Err(ParseError::MissingField("bomFormat".to_string()));
        }
        if bom.bom_format != BOM_FORMAT {
            return Err(ParseError::UnknownFormat(format!(
                "bomFormat is '{}', expected '{BOM_FORMAT}'",
                bom.bom_format
            )));
        }
        if !SUPPORTED_SPEC_VERSIONS.contains(&bom.spec_version.as_str()) {
            if self.strict {
                return Err(ParseError::UnsupportedVersion(format!(
                    "{} (supported: {})",
                    bom.spec_version,
                    SUPPORTED_SPEC_VERSIONS.join(", ")
                )));
            }
            tracing::warn!(
                spec_version = %bom.spec_version,
                "Unrecognized CycloneDX spec version, reading on a best-effort basis"
            );
        }
        Ok(bom)
    }

    /// Cheap check whether content looks like CycloneDX JSON, without parsing it
    #[must_use]
    pub fn detect(&self, content: &str) -> FormatDetection {
        if !content.trim_start().starts_with('{') {
            return FormatDetection::no_match();
        }

        let has_bom_format = content.contains("\"bomFormat\"");
        let has_cyclonedx = content.contains("CycloneDX") || content.contains("cyclonedx");
        let has_spec_version = content.contains("\"specVersion\"");

        let mut detection = if has_bom_format && has_cyclonedx {
            FormatDetection::with_confidence(FormatConfidence::CERTAIN)
        } else if has_bom_format {
            FormatDetection::with_confidence(FormatConfidence::HIGH)
        } else if has_spec_version && content.contains("\"components\"") {
            FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                .warning("Missing bomFormat field - might not be CycloneDX")
        } else {
            return FormatDetection::no_match();
        };

        if let Some(version) = Self::extract_json_version(content) {
            detection = detection.version(&version);
        }
        detection
    }

    /// Extract `specVersion` from JSON content (quick heuristic, not full parse)
    fn extract_json_version(content: &str) -> Option<String> {
        let idx = content.find("\"specVersion\"")?;
        let after = &content[idx + "\"specVersion\"".len()..];
        let value_part = &after[after.find(':')? + 1..];
        let after_quote = &value_part[value_part.find('"')? + 1..];
        let end = after_quote.find('"')?;
        Some(after_quote[..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentType;

    const MINIMAL: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "version": 1,
        "metadata": {
            "component": {"type": "application", "bom-ref": "app", "name": "app", "version": "1.0"}
        },
        "components": [
            {"type": "library", "bom-ref": "lib", "name": "lib", "version": "2.0"}
        ],
        "dependencies": [
            {"ref": "app", "dependsOn": ["lib"]},
            {"ref": "lib"}
        ]
    }"#;

    #[test]
    fn test_parse_minimal() {
        let bom = CycloneDxCodec::new().parse_str(MINIMAL).unwrap();
        assert_eq!(bom.spec_version, "1.5");
        assert_eq!(
            bom.metadata_component().map(|c| c.component_type.clone()),
            Some(ComponentType::Application)
        );
        assert_eq!(bom.components.len(), 1);
        assert_eq!(bom.dependencies[0].depends_on, vec!["lib".to_string()]);
        assert!(bom.dependencies[1].depends_on.is_empty());
    }

    #[test]
    fn test_parse_reader_matches_parse_str() {
        let codec = CycloneDxCodec::new();
        let from_str = codec.parse_str(MINIMAL).unwrap();
        let from_reader = codec.parse_reader(MINIMAL.as_bytes()).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_rejects_wrong_bom_format() {
        let err = CycloneDxCodec::new()
            .parse_str(r#"{"bomFormat":"SPDX","specVersion":"1.5"}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat(_)));
    }

    #[test]
    fn test_rejects_missing_bom_format() {
        let err = CycloneDxCodec::new()
            .parse_str(r#"{"specVersion":"1.5"}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_malformed_cyclonedx_is_a_json_error() {
        let err = CycloneDxCodec::new()
            .parse_str(r#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{"name":}]}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::JsonError(_)));
    }

    #[test]
    fn test_unrelated_json_is_unknown_format() {
        let err = CycloneDxCodec::new()
            .parse_str(r#"{"spdxVersion":"SPDX-2.3","packages":[{"name":1}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat(_)));
    }

    #[test]
    fn test_rejects_non_json() {
        let err = CycloneDxCodec::new().parse_str("<bom/>").unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat(_)));
    }

    #[test]
    fn test_strict_rejects_unknown_version() {
        let content = r#"{"bomFormat":"CycloneDX","specVersion":"9.9"}"#;
        assert!(CycloneDxCodec::new().parse_str(content).is_ok());
        assert!(matches!(
            CycloneDxCodec::strict().parse_str(content),
            Err(ParseError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_to_json_string_uses_two_space_indent() {
        let codec = CycloneDxCodec::new();
        let bom = codec.parse_str(MINIMAL).unwrap();
        let json = codec.to_json_string(&bom).unwrap();
        assert!(json.starts_with("{\n  \"bomFormat\": \"CycloneDX\""));
        assert_eq!(codec.parse_str(&json).unwrap(), bom);
    }

    #[test]
    fn test_detect() {
        let codec = CycloneDxCodec::new();
        let detection = codec.detect(MINIMAL);
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("1.5"));

        assert!(!codec.detect("not json").confidence.can_parse());
        assert!(!codec.detect(r#"{"spdxVersion":"SPDX-2.3"}"#).confidence.can_parse());
    }
}
