//! Strict CycloneDX JSON schema checks.
//!
//! Works on the raw JSON value rather than the typed model so that members
//! the model does not know about are still seen, and rejected.

use super::{SchemaVersion, ValidationError, ValidatorError};
use packageurl::PackageUrl;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;

const SERIAL_NUMBER_PATTERN: &str =
    r"^urn:uuid:[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$";

const HASH_CONTENT_PATTERN: &str = r"^([a-fA-F0-9]{32}|[a-fA-F0-9]{40}|[a-fA-F0-9]{64}|[a-fA-F0-9]{96}|[a-fA-F0-9]{128})$";

const BOM_KEYS: &[&str] = &[
    "$schema",
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "metadata",
    "components",
    "services",
    "externalReferences",
    "dependencies",
    "compositions",
    "vulnerabilities",
    "signature",
];
const BOM_KEYS_1_5: &[&str] = &["properties", "annotations", "formulation"];
const BOM_KEYS_1_6: &[&str] = &["declarations", "definitions"];

const METADATA_KEYS: &[&str] = &[
    "timestamp",
    "tools",
    "authors",
    "component",
    "manufacture",
    "supplier",
    "licenses",
    "properties",
];
const METADATA_KEYS_1_5: &[&str] = &["lifecycles"];
const METADATA_KEYS_1_6: &[&str] = &["manufacturer"];

const COMPONENT_KEYS: &[&str] = &[
    "type",
    "mime-type",
    "bom-ref",
    "supplier",
    "author",
    "publisher",
    "group",
    "name",
    "version",
    "description",
    "scope",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "swid",
    "modified",
    "pedigree",
    "externalReferences",
    "properties",
    "components",
    "evidence",
    "releaseNotes",
    "signature",
];
const COMPONENT_KEYS_1_5: &[&str] = &["modelCard", "data"];
const COMPONENT_KEYS_1_6: &[&str] = &[
    "manufacturer",
    "authors",
    "omniborId",
    "swhid",
    "cryptoProperties",
    "tags",
];

const DEPENDENCY_KEYS: &[&str] = &["ref", "dependsOn"];
const DEPENDENCY_KEYS_1_6: &[&str] = &["provides"];

const COMPONENT_TYPES: &[&str] = &[
    "application",
    "framework",
    "library",
    "container",
    "operating-system",
    "device",
    "firmware",
    "file",
];
const COMPONENT_TYPES_1_5: &[&str] = &["platform", "device-driver", "machine-learning-model", "data"];
const COMPONENT_TYPES_1_6: &[&str] = &["cryptographic-asset"];

const SCOPES: &[&str] = &["required", "optional", "excluded"];

const HASH_ALGORITHMS: &[&str] = &[
    "MD5",
    "SHA-1",
    "SHA-256",
    "SHA-384",
    "SHA-512",
    "SHA3-256",
    "SHA3-384",
    "SHA3-512",
    "BLAKE2b-256",
    "BLAKE2b-384",
    "BLAKE2b-512",
    "BLAKE3",
];

const EXTERNAL_REFERENCE_TYPES: &[&str] = &[
    "vcs",
    "issue-tracker",
    "website",
    "advisories",
    "bom",
    "mailing-list",
    "social",
    "chat",
    "documentation",
    "support",
    "distribution",
    "license",
    "build-meta",
    "build-system",
    "release-notes",
    "other",
];
const EXTERNAL_REFERENCE_TYPES_1_5: &[&str] = &[
    "distribution-intake",
    "security-contact",
    "model-card",
    "log",
    "configuration",
    "evidence",
    "formulation",
    "attestation",
    "threat-model",
    "adversary-model",
    "risk-assessment",
    "vulnerability-assertion",
    "exploitability-statement",
    "pentest-report",
    "static-analysis-report",
    "dynamic-analysis-report",
    "runtime-analysis-report",
    "component-analysis-report",
    "maturity-report",
    "certification-report",
    "codified-infrastructure",
    "quality-metrics",
    "poam",
];
const EXTERNAL_REFERENCE_TYPES_1_6: &[&str] = &[
    "source-distribution",
    "electronic-signature",
    "digital-signature",
    "rfc-9116",
];

/// Vocabulary of one schema version
struct Vocabulary {
    bom_keys: HashSet<&'static str>,
    metadata_keys: HashSet<&'static str>,
    component_keys: HashSet<&'static str>,
    dependency_keys: HashSet<&'static str>,
    component_types: HashSet<&'static str>,
    external_reference_types: HashSet<&'static str>,
}

impl Vocabulary {
    fn for_version(version: SchemaVersion) -> Self {
        let since = |base: &[&'static str], v1_5: &[&'static str], v1_6: &[&'static str]| {
            let mut set: HashSet<&'static str> = base.iter().copied().collect();
            if version >= SchemaVersion::V1_5 {
                set.extend(v1_5.iter().copied());
            }
            if version >= SchemaVersion::V1_6 {
                set.extend(v1_6.iter().copied());
            }
            set
        };
        Self {
            bom_keys: since(BOM_KEYS, BOM_KEYS_1_5, BOM_KEYS_1_6),
            metadata_keys: since(METADATA_KEYS, METADATA_KEYS_1_5, METADATA_KEYS_1_6),
            component_keys: since(COMPONENT_KEYS, COMPONENT_KEYS_1_5, COMPONENT_KEYS_1_6),
            dependency_keys: since(DEPENDENCY_KEYS, &[], DEPENDENCY_KEYS_1_6),
            component_types: since(COMPONENT_TYPES, COMPONENT_TYPES_1_5, COMPONENT_TYPES_1_6),
            external_reference_types: since(
                EXTERNAL_REFERENCE_TYPES,
                EXTERNAL_REFERENCE_TYPES_1_5,
                EXTERNAL_REFERENCE_TYPES_1_6,
            ),
        }
    }
}

/// Validator that checks a document against one CycloneDX schema version,
/// rejecting members the schema does not define.
pub struct StrictValidator {
    version: SchemaVersion,
    vocabulary: Vocabulary,
    serial_number: Regex,
    hash_content: Regex,
}

impl StrictValidator {
    pub fn new(version: SchemaVersion) -> Result<Self, ValidatorError> {
        Ok(Self {
            version,
            vocabulary: Vocabulary::for_version(version),
            serial_number: Regex::new(SERIAL_NUMBER_PATTERN)?,
            hash_content: Regex::new(HASH_CONTENT_PATTERN)?,
        })
    }

    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Validate a JSON document. Fails only if the input is not JSON; schema
    /// violations are returned as a (possibly empty) list.
    pub fn validate_str(&self, json: &str) -> Result<Vec<ValidationError>, ValidatorError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.validate_value(&value))
    }

    #[must_use]
    pub fn validate_value(&self, value: &Value) -> Vec<ValidationError> {
        let mut run = Run {
            validator: self,
            errors: Vec::new(),
            bom_refs: HashSet::new(),
        };
        run.bom(value);
        run.errors
    }
}

/// State of a single validation pass
struct Run<'v, 'j> {
    validator: &'v StrictValidator,
    errors: Vec<ValidationError>,
    bom_refs: HashSet<&'j str>,
}

impl<'j> Run<'_, 'j> {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, message));
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.fail(path, "expected an object");
        }
        object
    }

    fn array<'a>(&mut self, value: &'a Value, path: &str) -> &'a [Value] {
        match value.as_array() {
            Some(items) => items,
            None => {
                self.fail(path, "expected an array");
                &[]
            }
        }
    }

    fn unknown_keys(&mut self, object: &Map<String, Value>, allowed: &HashSet<&str>, path: &str) {
        for key in object.keys() {
            if !allowed.contains(key.as_str()) {
                self.fail(path, format!("unknown member \"{key}\""));
            }
        }
    }

    fn string<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a str> {
        let text = value.as_str();
        if text.is_none() {
            self.fail(path, "expected a string");
        }
        text
    }

    fn bom(&mut self, value: &'j Value) {
        let validator = self.validator;
        let Some(bom) = self.object(value, "$") else {
            return;
        };
        self.unknown_keys(bom, &validator.vocabulary.bom_keys, "$");

        match bom.get("bomFormat") {
            None => self.fail("bomFormat", "required member missing"),
            Some(format) => {
                if format.as_str() != Some(crate::model::BOM_FORMAT) {
                    self.fail("bomFormat", "must be \"CycloneDX\"");
                }
            }
        }
        match bom.get("specVersion") {
            None => self.fail("specVersion", "required member missing"),
            Some(spec) => {
                if spec.as_str() != Some(validator.version.as_str()) {
                    self.fail(
                        "specVersion",
                        format!("expected \"{}\", found {spec}", validator.version),
                    );
                }
            }
        }
        if let Some(serial) = bom.get("serialNumber") {
            if let Some(serial) = self.string(serial, "serialNumber") {
                if !validator.serial_number.is_match(serial) {
                    self.fail("serialNumber", "does not match the urn:uuid pattern");
                }
            }
        }
        if let Some(version) = bom.get("version") {
            if !version.as_i64().is_some_and(|v| v >= 1) {
                self.fail("version", "must be an integer >= 1");
            }
        }

        if let Some(metadata) = bom.get("metadata") {
            self.metadata(metadata);
        }
        if let Some(components) = bom.get("components") {
            for (i, component) in self.array(components, "components").iter().enumerate() {
                self.component(component, &format!("components[{i}]"));
            }
        }
        if let Some(dependencies) = bom.get("dependencies") {
            self.dependencies(dependencies);
        }
    }

    fn metadata(&mut self, value: &'j Value) {
        let validator = self.validator;
        let Some(metadata) = self.object(value, "metadata") else {
            return;
        };
        self.unknown_keys(metadata, &validator.vocabulary.metadata_keys, "metadata");
        if let Some(component) = metadata.get("component") {
            self.component(component, "metadata.component");
        }
        if let Some(licenses) = metadata.get("licenses") {
            self.licenses(licenses, "metadata.licenses");
        }
    }

    fn component(&mut self, value: &'j Value, path: &str) {
        let validator = self.validator;
        let Some(component) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(component, &validator.vocabulary.component_keys, path);

        match component.get("type").and_then(Value::as_str) {
            None => self.fail(&format!("{path}.type"), "required string member missing"),
            Some(kind) => {
                if !validator.vocabulary.component_types.contains(kind) {
                    self.fail(&format!("{path}.type"), format!("unknown component type \"{kind}\""));
                }
            }
        }
        match component.get("name").and_then(Value::as_str) {
            None => self.fail(&format!("{path}.name"), "required string member missing"),
            Some(name) if name.is_empty() => self.fail(&format!("{path}.name"), "must not be empty"),
            Some(_) => {}
        }
        if let Some(scope) = component.get("scope") {
            if !scope.as_str().is_some_and(|s| SCOPES.contains(&s)) {
                self.fail(&format!("{path}.scope"), format!("unknown scope {scope}"));
            }
        }
        if let Some(bom_ref) = component.get("bom-ref") {
            if let Some(bom_ref) = self.string(bom_ref, &format!("{path}.bom-ref")) {
                if !self.bom_refs.insert(bom_ref) {
                    self.fail(&format!("{path}.bom-ref"), format!("duplicate bom-ref \"{bom_ref}\""));
                }
            }
        }
        if let Some(purl) = component.get("purl") {
            let purl_path = format!("{path}.purl");
            if let Some(purl) = self.string(purl, &purl_path) {
                if let Err(err) = PackageUrl::from_str(purl) {
                    self.fail(&purl_path, format!("invalid package URL: {err}"));
                }
            }
        }
        if let Some(hashes) = component.get("hashes") {
            self.hashes(hashes, &format!("{path}.hashes"));
        }
        if let Some(licenses) = component.get("licenses") {
            self.licenses(licenses, &format!("{path}.licenses"));
        }
        if let Some(references) = component.get("externalReferences") {
            self.external_references(references, &format!("{path}.externalReferences"));
        }
        if let Some(children) = component.get("components") {
            let children_path = format!("{path}.components");
            for (i, child) in self.array(children, &children_path).iter().enumerate() {
                self.component(child, &format!("{children_path}[{i}]"));
            }
        }
    }

    fn hashes(&mut self, value: &Value, path: &str) {
        let validator = self.validator;
        for (i, hash) in self.array(value, path).iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let Some(hash) = self.object(hash, &item_path) else {
                continue;
            };
            if !hash
                .get("alg")
                .and_then(Value::as_str)
                .is_some_and(|alg| HASH_ALGORITHMS.contains(&alg))
            {
                self.fail(&format!("{item_path}.alg"), "unknown or missing hash algorithm");
            }
            if !hash
                .get("content")
                .and_then(Value::as_str)
                .is_some_and(|content| validator.hash_content.is_match(content))
            {
                self.fail(&format!("{item_path}.content"), "hash content is not a hex digest");
            }
        }
    }

    fn licenses(&mut self, value: &Value, path: &str) {
        for (i, choice) in self.array(value, path).iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let Some(choice) = self.object(choice, &item_path) else {
                continue;
            };
            match (choice.get("license"), choice.get("expression")) {
                (Some(license), None) => self.license(license, &format!("{item_path}.license")),
                (None, Some(expression)) => {
                    let expression_path = format!("{item_path}.expression");
                    if let Some(expression) = self.string(expression, &expression_path) {
                        if let Err(err) = spdx::Expression::parse(expression) {
                            self.fail(&expression_path, format!("invalid SPDX expression: {err}"));
                        }
                    }
                }
                _ => self.fail(&item_path, "must contain exactly one of license or expression"),
            }
        }
    }

    fn license(&mut self, value: &Value, path: &str) {
        let Some(license) = self.object(value, path) else {
            return;
        };
        match (license.get("id"), license.get("name")) {
            (Some(id), None) => {
                if let Some(id) = self.string(id, &format!("{path}.id")) {
                    if spdx::license_id(id).is_none() {
                        self.fail(&format!("{path}.id"), format!("unknown SPDX license id \"{id}\""));
                    }
                }
            }
            (None, Some(name)) => {
                self.string(name, &format!("{path}.name"));
            }
            _ => self.fail(path, "must contain exactly one of id or name"),
        }
    }

    fn external_references(&mut self, value: &Value, path: &str) {
        let validator = self.validator;
        for (i, reference) in self.array(value, path).iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let Some(reference) = self.object(reference, &item_path) else {
                continue;
            };
            match reference.get("type").and_then(Value::as_str) {
                Some(kind) if validator.vocabulary.external_reference_types.contains(kind) => {}
                Some(kind) => self.fail(
                    &format!("{item_path}.type"),
                    format!("unknown external reference type \"{kind}\""),
                ),
                None => self.fail(&format!("{item_path}.type"), "required string member missing"),
            }
            if !reference
                .get("url")
                .and_then(Value::as_str)
                .is_some_and(|url| !url.is_empty())
            {
                self.fail(&format!("{item_path}.url"), "must be a non-empty string");
            }
        }
    }

    /// Runs after all components were visited, so every bom-ref is known.
    fn dependencies(&mut self, value: &Value) {
        let validator = self.validator;
        let mut seen_refs: HashSet<&str> = HashSet::new();
        for (i, dependency) in self.array(value, "dependencies").iter().enumerate() {
            let path = format!("dependencies[{i}]");
            let Some(dependency) = self.object(dependency, &path) else {
                continue;
            };
            self.unknown_keys(dependency, &validator.vocabulary.dependency_keys, &path);

            match dependency.get("ref").and_then(Value::as_str) {
                None => self.fail(&format!("{path}.ref"), "required string member missing"),
                Some(from) => {
                    if !seen_refs.insert(from) {
                        self.fail(&format!("{path}.ref"), format!("duplicate dependency entry \"{from}\""));
                    }
                    if !self.bom_refs.contains(from) {
                        self.fail(&format!("{path}.ref"), format!("\"{from}\" is not a declared bom-ref"));
                    }
                }
            }

            let Some(targets) = dependency.get("dependsOn") else {
                continue;
            };
            let targets_path = format!("{path}.dependsOn");
            let mut seen_targets: HashSet<&str> = HashSet::new();
            for (j, target) in self.array(targets, &targets_path).iter().enumerate() {
                let target_path = format!("{targets_path}[{j}]");
                let Some(target) = self.string(target, &target_path) else {
                    continue;
                };
                if !seen_targets.insert(target) {
                    self.fail(&target_path, format!("duplicate dependsOn entry \"{target}\""));
                }
                if !self.bom_refs.contains(target) {
                    self.fail(&target_path, format!("\"{target}\" is not a declared bom-ref"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> StrictValidator {
        StrictValidator::new(SchemaVersion::V1_5).unwrap()
    }

    fn minimal() -> Value {
        json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
            "version": 1,
            "metadata": {
                "component": {"type": "application", "name": "app", "version": "1.0", "bom-ref": "app"}
            },
            "components": [
                {
                    "type": "library",
                    "name": "lodash",
                    "version": "4.17.21",
                    "bom-ref": "lodash@4.17.21",
                    "purl": "pkg:npm/lodash@4.17.21",
                    "licenses": [{"license": {"id": "MIT"}}],
                    "hashes": [{"alg": "SHA-1", "content": "da39a3ee5e6b4b0d3255bfef95601890afd80709"}]
                }
            ],
            "dependencies": [
                {"ref": "app", "dependsOn": ["lodash@4.17.21"]},
                {"ref": "lodash@4.17.21"}
            ]
        })
    }

    fn messages(value: &Value) -> Vec<String> {
        validator()
            .validate_value(value)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_valid_document() {
        assert!(messages(&minimal()).is_empty(), "{:?}", messages(&minimal()));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            validator().validate_str("{not json"),
            Err(ValidatorError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_header_checks() {
        let mut doc = minimal();
        doc["specVersion"] = json!("1.4");
        doc["serialNumber"] = json!("urn:uuid:not-a-uuid");
        doc["version"] = json!(0);
        doc.as_object_mut().unwrap().remove("bomFormat");
        let errors = messages(&doc);
        assert!(errors.iter().any(|e| e.starts_with("bomFormat")));
        assert!(errors.iter().any(|e| e.starts_with("specVersion")));
        assert!(errors.iter().any(|e| e.starts_with("serialNumber")));
        assert!(errors.iter().any(|e| e.starts_with("version")));
    }

    #[test]
    fn test_unknown_members_rejected() {
        let mut doc = minimal();
        doc["extra"] = json!(true);
        doc["components"][0]["flavour"] = json!("vanilla");
        doc["dependencies"][0]["weight"] = json!(3);
        let errors = messages(&doc);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("\"flavour\"")));
    }

    #[test]
    fn test_version_specific_vocabulary() {
        let mut doc = minimal();
        doc["components"][0]["type"] = json!("machine-learning-model");
        assert!(messages(&doc).is_empty());

        doc["specVersion"] = json!("1.4");
        let errors = StrictValidator::new(SchemaVersion::V1_4)
            .unwrap()
            .validate_value(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "components[0].type");
    }

    #[test]
    fn test_component_checks() {
        let mut doc = minimal();
        doc["components"][0]["name"] = json!("");
        doc["components"][0]["scope"] = json!("sometimes");
        doc["components"][0]["purl"] = json!("not a purl");
        doc["components"][0]["hashes"] = json!([{"alg": "CRC32", "content": "xyz"}]);
        let errors = messages(&doc);
        for path in ["name", "scope", "purl", "hashes[0].alg", "hashes[0].content"] {
            assert!(
                errors.iter().any(|e| e.starts_with(&format!("components[0].{path}"))),
                "missing {path} in {errors:?}"
            );
        }
    }

    #[test]
    fn test_license_checks() {
        let mut doc = minimal();
        doc["components"][0]["licenses"] = json!([
            {"license": {"id": "NOT-A-LICENSE"}},
            {"expression": "MIT AND ("},
            {"license": {"name": "Custom"}, "expression": "MIT"},
            {"expression": "Apache-2.0 OR MIT"}
        ]);
        let errors = messages(&doc);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].contains("NOT-A-LICENSE"));
    }

    #[test]
    fn test_external_reference_checks() {
        let mut doc = minimal();
        doc["components"][0]["externalReferences"] = json!([
            {"type": "website", "url": "https://lodash.com"},
            {"type": "homepage", "url": ""}
        ]);
        let errors = messages(&doc);
        assert_eq!(errors.len(), 2, "{errors:?}");
    }

    #[test]
    fn test_reference_integrity() {
        let mut doc = minimal();
        doc["components"]
            .as_array_mut()
            .unwrap()
            .push(json!({"type": "library", "name": "dup", "bom-ref": "lodash@4.17.21"}));
        doc["dependencies"] = json!([
            {"ref": "app", "dependsOn": ["lodash@4.17.21", "lodash@4.17.21", "ghost"]},
            {"ref": "app"}
        ]);
        let errors = messages(&doc);
        assert!(errors.iter().any(|e| e.contains("duplicate bom-ref")));
        assert!(errors.iter().any(|e| e.contains("duplicate dependsOn")));
        assert!(errors.iter().any(|e| e.contains("\"ghost\" is not a declared bom-ref")));
        assert!(errors.iter().any(|e| e.contains("duplicate dependency entry")));
    }

    #[test]
    fn test_nested_components_checked() {
        let mut doc = minimal();
        doc["components"][0]["components"] = json!([{"type": "library", "name": "inner", "bogus": 1}]);
        let errors = messages(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], "components[0].components[0]: unknown member \"bogus\"");
    }
}
