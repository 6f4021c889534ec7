//! Typed CycloneDX document model.
//!
//! Covers the parts of the CycloneDX JSON schema that the merge engine reads or
//! writes. Attributes that are only carried through (SWID tags, pedigree,
//! evidence, release notes) are kept as raw JSON so they survive a round trip
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The only `bomFormat` value CycloneDX defines.
pub const BOM_FORMAT: &str = "CycloneDX";

fn default_bom_version() -> u32 {
    1
}

/// A CycloneDX BOM document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    #[serde(default)]
    pub bom_format: String,
    pub spec_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default = "default_bom_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl Bom {
    /// Create an empty document for the given spec version.
    #[must_use]
    pub fn new(spec_version: impl Into<String>) -> Self {
        Self {
            bom_format: BOM_FORMAT.to_string(),
            spec_version: spec_version.into(),
            serial_number: None,
            version: default_bom_version(),
            metadata: None,
            components: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// The component this document describes (`metadata.component`).
    #[must_use]
    pub fn metadata_component(&self) -> Option<&Component> {
        self.metadata.as_ref().and_then(|m| m.component.as_ref())
    }

    /// Number of components including nested sub-components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Component> = self.components.iter().collect();
        while let Some(component) = stack.pop() {
            count += 1;
            stack.extend(component.components.iter());
        }
        count
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Array form (1.4) or object form with components/services (1.5+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<OrganizationalEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// A software component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(rename = "mime-type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "bom-ref", default, skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<OrganizationalEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ComponentScope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<Hash>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swid: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedigree: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<ExternalReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<Value>,
}

impl Component {
    /// Create a component with only a type and a name set.
    #[must_use]
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Self {
        Self {
            component_type,
            mime_type: None,
            bom_ref: None,
            supplier: None,
            author: None,
            publisher: None,
            group: None,
            name: name.into(),
            version: None,
            description: None,
            scope: None,
            hashes: Vec::new(),
            licenses: Vec::new(),
            copyright: None,
            cpe: None,
            purl: None,
            swid: None,
            pedigree: None,
            external_references: Vec::new(),
            properties: Vec::new(),
            components: Vec::new(),
            evidence: None,
            release_notes: None,
        }
    }

    /// Builder: set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Builder: set the group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Builder: set the document-local reference.
    #[must_use]
    pub fn with_bom_ref(mut self, bom_ref: impl Into<String>) -> Self {
        self.bom_ref = Some(bom_ref.into());
        self
    }

    /// Builder: append a nested sub-component.
    #[must_use]
    pub fn with_component(mut self, component: Self) -> Self {
        self.components.push(component);
        self
    }
}

/// CycloneDX component classification.
///
/// Unknown values are preserved verbatim so documents written against newer
/// schema versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Application,
    Framework,
    Library,
    Container,
    Platform,
    OperatingSystem,
    Device,
    DeviceDriver,
    Firmware,
    File,
    MachineLearningModel,
    Data,
    Other(String),
}

impl ComponentType {
    /// The schema string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Application => "application",
            Self::Framework => "framework",
            Self::Library => "library",
            Self::Container => "container",
            Self::Platform => "platform",
            Self::OperatingSystem => "operating-system",
            Self::Device => "device",
            Self::DeviceDriver => "device-driver",
            Self::Firmware => "firmware",
            Self::File => "file",
            Self::MachineLearningModel => "machine-learning-model",
            Self::Data => "data",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "application" => Self::Application,
            "framework" => Self::Framework,
            "library" => Self::Library,
            "container" => Self::Container,
            "platform" => Self::Platform,
            "operating-system" => Self::OperatingSystem,
            "device" => Self::Device,
            "device-driver" => Self::DeviceDriver,
            "firmware" => Self::Firmware,
            "file" => Self::File,
            "machine-learning-model" => Self::MachineLearningModel,
            "data" => Self::Data,
            _ => Self::Other(value),
        }
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component is required at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentScope {
    Required,
    Optional,
    Excluded,
}

/// Organization or individual supplying a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationalEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<OrganizationalContact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationalContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A license entry: either a single license or an SPDX expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl LicenseChoice {
    /// A choice naming a single SPDX license id.
    #[must_use]
    pub fn spdx_id(id: impl Into<String>) -> Self {
        Self {
            license: Some(License {
                id: Some(id.into()),
                ..License::default()
            }),
            expression: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    pub alg: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub ref_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<Hash>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One entry of the dependency graph: `dependency_ref` depends on every ref
/// listed in `depends_on`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "ref")]
    pub dependency_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Dependency {
    #[must_use]
    pub fn new(dependency_ref: impl Into<String>, depends_on: Vec<String>) -> Self {
        Self {
            dependency_ref: dependency_ref.into(),
            depends_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_roundtrip_known_and_unknown() {
        let known: ComponentType = serde_json::from_str("\"operating-system\"").unwrap();
        assert_eq!(known, ComponentType::OperatingSystem);
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"operating-system\"");

        let unknown: ComponentType = serde_json::from_str("\"cryptographic-asset\"").unwrap();
        assert_eq!(
            unknown,
            ComponentType::Other("cryptographic-asset".to_string())
        );
        assert_eq!(
            serde_json::to_string(&unknown).unwrap(),
            "\"cryptographic-asset\""
        );
    }

    #[test]
    fn test_component_deserialize_bom_ref_and_nested() {
        let json = r#"{
            "type": "library",
            "bom-ref": "pkg:npm/wrapper@1.0",
            "name": "wrapper",
            "version": "1.0",
            "components": [
                {"type": "library", "bom-ref": "lib", "name": "lib", "version": "2.0"}
            ]
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.bom_ref.as_deref(), Some("pkg:npm/wrapper@1.0"));
        assert_eq!(component.components.len(), 1);
        assert_eq!(component.components[0].name, "lib");
    }

    #[test]
    fn test_opaque_attributes_survive_roundtrip() {
        let json = r#"{
            "type": "library",
            "name": "zlib",
            "pedigree": {"notes": "patched", "patches": [{"type": "backport"}]},
            "evidence": {"identity": {"field": "purl", "confidence": 1}}
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&component).unwrap();
        assert_eq!(back["pedigree"]["notes"], "patched");
        assert_eq!(back["evidence"]["identity"]["field"], "purl");
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let component = Component::new(ComponentType::Library, "x");
        let value = serde_json::to_value(&component).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("licenses"));
        assert!(!object.contains_key("components"));
        assert!(!object.contains_key("bom-ref"));
    }

    #[test]
    fn test_component_count_includes_nested() {
        let mut bom = Bom::new("1.5");
        bom.components.push(
            Component::new(ComponentType::Library, "a")
                .with_component(Component::new(ComponentType::Library, "b")
                    .with_component(Component::new(ComponentType::Library, "c"))),
        );
        bom.components.push(Component::new(ComponentType::Library, "d"));
        assert_eq!(bom.component_count(), 4);
    }

    #[test]
    fn test_bom_version_defaults_to_one() {
        let bom: Bom =
            serde_json::from_str(r#"{"bomFormat":"CycloneDX","specVersion":"1.5"}"#).unwrap();
        assert_eq!(bom.version, 1);
        assert!(bom.metadata_component().is_none());
    }
}
