//! Merge results and conversion to an output document.

use super::MergeDiagnostic;
use crate::error::Result;
use crate::model::{Bom, Component, Dependency, GlobalRef, Metadata};
use crate::utils::content_serial_number;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Spec version of the documents this tool writes
pub const OUTPUT_SPEC_VERSION: &str = "1.5";

/// Outcome of merging one input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Merged,
    Skipped { reason: String },
}

/// Per-document record of what the merge did.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Label of the document, usually its file path
    pub label: String,
    pub status: DocumentStatus,
    /// Global ref of the document's metadata component
    pub metadata_ref: Option<GlobalRef>,
    /// Simplified local ref to global ref, for every component the document declared
    pub ref_map: IndexMap<String, GlobalRef>,
    /// Components visited, including the metadata component and nested ones
    pub components_seen: usize,
    /// Components that were new to the merged collection
    pub components_added: usize,
    /// Dependency edges that were new to the merged graph
    pub edges_added: usize,
}

impl DocumentReport {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: DocumentStatus::Merged,
            metadata_ref: None,
            ref_map: IndexMap::new(),
            components_seen: 0,
            components_added: 0,
            edges_added: 0,
        }
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.status == DocumentStatus::Merged
    }

    /// Look up the global ref a local ref of this document was mapped to
    #[must_use]
    pub fn resolve(&self, local_ref: &str) -> Option<&GlobalRef> {
        self.ref_map.get(local_ref)
    }
}

/// The merged SBOM: synthetic root, deduplicated components and rewritten
/// dependency graph.
#[derive(Debug, Clone)]
pub struct MergedBom {
    /// Synthetic root application component
    pub root: Component,
    /// Merged components in first-seen order
    pub components: IndexMap<GlobalRef, Component>,
    /// Dependency graph over global refs, root entry first
    pub dependencies: IndexMap<GlobalRef, IndexSet<GlobalRef>>,
    /// One report per input document, in input order
    pub documents: Vec<DocumentReport>,
    /// Recoverable problems encountered while merging
    pub diagnostics: Vec<MergeDiagnostic>,
}

/// Options controlling how a [`MergedBom`] is rendered as a CycloneDX document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub spec_version: String,
    /// Adds `metadata.timestamp`; output is no longer byte-stable across runs
    pub include_timestamp: bool,
    /// Adds `metadata.tools` naming this tool
    pub include_tool: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            spec_version: OUTPUT_SPEC_VERSION.to_string(),
            include_timestamp: false,
            include_tool: true,
        }
    }
}

impl MergedBom {
    /// Reference of the synthetic root
    #[must_use]
    pub fn root_ref(&self) -> GlobalRef {
        GlobalRef::new(self.root.bom_ref.clone().unwrap_or_default())
    }

    /// Number of merged components, excluding the root
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn component(&self, global_ref: &str) -> Option<&Component> {
        self.components.get(global_ref)
    }

    /// Direct dependencies of a component (or the root)
    #[must_use]
    pub fn depends_on(&self, global_ref: &str) -> Option<&IndexSet<GlobalRef>> {
        self.dependencies.get(global_ref)
    }

    /// Whether `from -> to` is an edge of the merged graph
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.depends_on(from).is_some_and(|targets| targets.contains(to))
    }

    /// Total number of edges in the merged graph
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(IndexSet::len).sum()
    }

    /// Documents that were merged (not skipped)
    pub fn merged_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| d.is_merged())
    }

    /// One-line summary suitable for logging
    #[must_use]
    pub fn summary(&self) -> String {
        let merged = self.merged_documents().count();
        format!(
            "{} components, {} dependency edges from {merged}/{} documents ({} diagnostics)",
            self.component_count(),
            self.edge_count(),
            self.documents.len(),
            self.diagnostics.len()
        )
    }

    /// Dependency entries for the output document: the root first, then one
    /// entry per component in merged order, including components without
    /// dependencies.
    #[must_use]
    pub fn dependency_entries(&self) -> Vec<Dependency> {
        let root_ref = self.root_ref();
        std::iter::once(&root_ref)
            .chain(self.components.keys())
            .map(|from| {
                let targets: Vec<String> = self
                    .dependencies
                    .get(from)
                    .map(|set| set.iter().map(|t| t.as_str().to_string()).collect())
                    .unwrap_or_default();
                Dependency::new(from.as_str(), targets)
            })
            .collect()
    }

    /// Render the merge result as a CycloneDX document.
    ///
    /// The serial number is derived from the document content, so the same
    /// inputs always produce the same bytes unless a timestamp is requested.
    pub fn to_bom(&self, options: &OutputOptions) -> Result<Bom> {
        let mut bom = Bom::new(options.spec_version.clone());
        bom.metadata = Some(Metadata {
            component: Some(self.root.clone()),
            tools: options.include_tool.then(tool_metadata),
            ..Metadata::default()
        });
        bom.components = self.components.values().cloned().collect();
        bom.dependencies = self.dependency_entries();

        let fingerprint = serde_json::to_vec(&bom)?;
        bom.serial_number = Some(content_serial_number(&fingerprint));

        if options.include_timestamp {
            if let Some(metadata) = bom.metadata.as_mut() {
                metadata.timestamp = Some(
                    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                );
            }
        }
        Ok(bom)
    }
}

/// `metadata.tools` in the 1.5 object form
fn tool_metadata() -> serde_json::Value {
    serde_json::json!({
        "components": [{
            "type": "application",
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }]
    })
}
