//! Merge engine implementation.
//!
//! Documents are merged strictly in input order. The first document to
//! introduce an identity supplies that component's attributes for good; later
//! copies only contribute their local ref mapping, and through it their
//! dependency edges.

use super::result::{DocumentReport, DocumentStatus, MergedBom};
use super::MergeDiagnostic;
use crate::error::{CombineError, Result};
use crate::model::{
    simplify_ref, Bom, Component, ComponentIdentity, ComponentType, Dependency, GlobalRef,
    DEFAULT_COMPOSITE_DELIMITER,
};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// The synthetic top-level application the merged SBOM describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootComponent {
    name: String,
    version: String,
}

impl RootComponent {
    /// Both name and version must be non-empty.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        if name.trim().is_empty() {
            return Err(CombineError::usage("application name must not be empty"));
        }
        if version.trim().is_empty() {
            return Err(CombineError::usage("application version must not be empty"));
        }
        Ok(Self { name, version })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `lowercase(name)` with spaces replaced by `_`
    #[must_use]
    pub fn global_ref(&self) -> GlobalRef {
        GlobalRef::root(&self.name)
    }

    /// The root as a CycloneDX application component without licenses.
    #[must_use]
    pub fn to_component(&self) -> Component {
        Component::new(ComponentType::Application, self.name.clone())
            .with_version(self.version.clone())
            .with_bom_ref(self.global_ref().into_string())
    }
}

/// A parsed input document together with a label used in diagnostics.
#[derive(Debug, Clone)]
pub struct SourceBom {
    pub label: String,
    pub bom: Bom,
}

impl SourceBom {
    pub fn new(label: impl Into<String>, bom: Bom) -> Self {
        Self {
            label: label.into(),
            bom,
        }
    }
}

/// Merges CycloneDX documents into one graph rooted at a synthetic application.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    ref_prefix: Option<String>,
    composite_delimiter: char,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeEngine {
    /// Engine with no ref prefix and `'|'` as composite ref delimiter
    #[must_use]
    pub fn new() -> Self {
        Self {
            ref_prefix: None,
            composite_delimiter: DEFAULT_COMPOSITE_DELIMITER,
        }
    }

    /// Prefix prepended to every derived global ref (e.g. `cdxc:`)
    #[must_use]
    pub fn with_ref_prefix(mut self, prefix: Option<String>) -> Self {
        self.ref_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Delimiter of composite local refs; only the trailing segment is kept
    #[must_use]
    pub fn with_composite_delimiter(mut self, delimiter: char) -> Self {
        self.composite_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn ref_prefix(&self) -> Option<&str> {
        self.ref_prefix.as_deref()
    }

    #[must_use]
    pub fn composite_delimiter(&self) -> char {
        self.composite_delimiter
    }

    /// Global ref this engine derives for a component
    #[must_use]
    pub fn global_ref_of(&self, component: &Component) -> GlobalRef {
        ComponentIdentity::of(component).global_ref(self.ref_prefix.as_deref())
    }

    /// Merge labelled documents in the order given.
    ///
    /// Never fails: problems with individual documents, components or edges
    /// are recorded as diagnostics on the result.
    #[must_use]
    pub fn merge(&self, root: &RootComponent, documents: &[SourceBom]) -> MergedBom {
        self.merge_labeled(
            root,
            documents.iter().map(|d| (d.label.clone(), &d.bom)),
        )
    }

    /// Merge unlabelled documents; they are labelled `document #1`, `#2`, ...
    #[must_use]
    pub fn merge_boms(&self, root: &RootComponent, documents: &[Bom]) -> MergedBom {
        self.merge_labeled(
            root,
            documents
                .iter()
                .enumerate()
                .map(|(i, bom)| (format!("document #{}", i + 1), bom)),
        )
    }

    fn merge_labeled<'a, I>(&self, root: &RootComponent, documents: I) -> MergedBom
    where
        I: IntoIterator<Item = (String, &'a Bom)>,
    {
        let mut state = MergeState::new(root.global_ref());
        let reports = documents
            .into_iter()
            .map(|(label, bom)| self.merge_document(&mut state, label, bom))
            .collect();

        MergedBom {
            root: root.to_component(),
            components: state.components,
            dependencies: state.dependencies,
            documents: reports,
            diagnostics: state.diagnostics,
        }
    }

    fn merge_document(&self, state: &mut MergeState, label: String, bom: &Bom) -> DocumentReport {
        let mut report = DocumentReport::new(label);

        let Some(metadata_component) = bom.metadata_component() else {
            state.diagnose(MergeDiagnostic::MissingMetadataComponent {
                document: report.label.clone(),
            });
            report.status = DocumentStatus::Skipped {
                reason: "document has no metadata component".to_string(),
            };
            return report;
        };

        tracing::info!(
            document = %report.label,
            "Processing {}...",
            metadata_component
                .bom_ref
                .as_deref()
                .unwrap_or(&metadata_component.name)
        );

        let metadata_ref = self.register_component(state, &mut report, metadata_component);

        // Pre-order: a component before its children, siblings in document order
        let mut stack: Vec<&Component> = bom.components.iter().rev().collect();
        while let Some(component) = stack.pop() {
            self.register_component(state, &mut report, component);
            stack.extend(component.components.iter().rev());
        }

        self.mirror_dependencies(state, &mut report, &bom.dependencies);

        state.add_root_edge(&metadata_ref);
        report.metadata_ref = Some(metadata_ref);

        tracing::debug!(
            document = %report.label,
            seen = report.components_seen,
            added = report.components_added,
            edges = report.edges_added,
            "Document merged"
        );
        report
    }

    /// Map a component onto its global ref, inserting a clone if the identity
    /// is new. The local ref is recorded either way.
    fn register_component(
        &self,
        state: &mut MergeState,
        report: &mut DocumentReport,
        component: &Component,
    ) -> GlobalRef {
        report.components_seen += 1;
        let global_ref = self.global_ref_of(component);
        let local_ref = component
            .bom_ref
            .as_deref()
            .map(|r| simplify_ref(r, self.composite_delimiter));

        if global_ref == state.root_ref {
            state.diagnose(MergeDiagnostic::RootRefCollision {
                document: report.label.clone(),
                local_ref: local_ref.unwrap_or(&component.name).to_string(),
            });
        } else if state.components.contains_key(&global_ref) {
            tracing::debug!("Component {global_ref} already merged, keeping first copy");
        } else {
            tracing::debug!("Adding component {global_ref}");
            state
                .components
                .insert(global_ref.clone(), clone_for_merge(component, &global_ref));
            report.components_added += 1;
        }

        if let Some(local_ref) = local_ref {
            if let Some(previous) = report
                .ref_map
                .insert(local_ref.to_string(), global_ref.clone())
            {
                if previous != global_ref {
                    tracing::warn!(
                        document = %report.label,
                        "BOM reference {local_ref} declared twice, now mapped to {global_ref} instead of {previous}"
                    );
                }
            }
        }
        global_ref
    }

    /// Rewrite the document's dependency graph onto global refs.
    ///
    /// Walks from every declared entry with an explicit worklist, following
    /// resolved targets into their own entries, so the reachable subgraph is
    /// mirrored once even when it contains cycles.
    fn mirror_dependencies(
        &self,
        state: &mut MergeState,
        report: &mut DocumentReport,
        dependencies: &[Dependency],
    ) {
        let delimiter = self.composite_delimiter;
        let mut declared: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for dependency in dependencies {
            declared
                .entry(simplify_ref(&dependency.dependency_ref, delimiter))
                .or_default()
                .extend(
                    dependency
                        .depends_on
                        .iter()
                        .map(|target| simplify_ref(target, delimiter)),
                );
        }

        let mut visited: HashSet<&str> = HashSet::new();
        for &start in declared.keys() {
            let mut worklist = vec![start];
            while let Some(local_ref) = worklist.pop() {
                if !visited.insert(local_ref) {
                    continue;
                }
                let Some(targets) = declared.get(local_ref) else {
                    continue;
                };
                tracing::debug!("Processing dependency {local_ref}");

                let Some(source) = report.ref_map.get(local_ref).cloned() else {
                    state.diagnose(MergeDiagnostic::UnresolvedSource {
                        document: report.label.clone(),
                        local_ref: local_ref.to_string(),
                    });
                    continue;
                };

                let pending = worklist.len();
                for &target_local in targets {
                    match report.ref_map.get(target_local) {
                        Some(target) => {
                            if state.add_edge(&source, target) {
                                report.edges_added += 1;
                            }
                            worklist.push(target_local);
                        }
                        None => state.diagnose(MergeDiagnostic::UnresolvedTarget {
                            document: report.label.clone(),
                            source: source.clone(),
                            local_ref: target_local.to_string(),
                        }),
                    }
                }
                // Visit targets in declaration order
                worklist[pending..].reverse();
            }
        }
    }
}

/// Mutable state owned by a single `merge` call.
struct MergeState {
    root_ref: GlobalRef,
    components: IndexMap<GlobalRef, Component>,
    dependencies: IndexMap<GlobalRef, IndexSet<GlobalRef>>,
    diagnostics: Vec<MergeDiagnostic>,
}

impl MergeState {
    fn new(root_ref: GlobalRef) -> Self {
        let mut dependencies = IndexMap::new();
        dependencies.insert(root_ref.clone(), IndexSet::new());
        Self {
            root_ref,
            components: IndexMap::new(),
            dependencies,
            diagnostics: Vec::new(),
        }
    }

    fn diagnose(&mut self, diagnostic: MergeDiagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if the edge is new. Self-edges are dropped.
    fn add_edge(&mut self, from: &GlobalRef, to: &GlobalRef) -> bool {
        if from == to {
            tracing::debug!("Dropping self-dependency of {from}");
            return false;
        }
        self.dependencies
            .entry(from.clone())
            .or_default()
            .insert(to.clone())
    }

    fn add_root_edge(&mut self, to: &GlobalRef) {
        let root_ref = self.root_ref.clone();
        self.add_edge(&root_ref, to);
    }
}

/// Copy a component's attributes under its global ref. Nested components are
/// not carried over; they are merged as top-level components of their own.
fn clone_for_merge(component: &Component, global_ref: &GlobalRef) -> Component {
    Component {
        component_type: component.component_type.clone(),
        mime_type: component.mime_type.clone(),
        bom_ref: Some(global_ref.as_str().to_string()),
        supplier: component.supplier.clone(),
        author: component.author.clone(),
        publisher: component.publisher.clone(),
        group: component.group.clone(),
        name: component.name.clone(),
        version: component.version.clone(),
        description: component.description.clone(),
        scope: component.scope,
        hashes: component.hashes.clone(),
        licenses: component.licenses.clone(),
        copyright: component.copyright.clone(),
        cpe: component.cpe.clone(),
        purl: component.purl.clone(),
        swid: component.swid.clone(),
        pedigree: component.pedigree.clone(),
        external_references: component.external_references.clone(),
        properties: component.properties.clone(),
        components: Vec::new(),
        evidence: component.evidence.clone(),
        release_notes: component.release_notes.clone(),
    }
}

/// Merge documents with a default engine.
///
/// Convenience for library callers: validates the root, labels documents by
/// position and merges them in order.
pub fn merge(root_name: &str, root_version: &str, documents: &[Bom]) -> Result<MergedBom> {
    let root = RootComponent::new(root_name, root_version)?;
    Ok(MergeEngine::new().merge_boms(&root, documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::OutputOptions;
    use crate::model::Metadata;

    fn lib(name: &str, version: &str, bom_ref: &str) -> Component {
        Component::new(ComponentType::Library, name)
            .with_version(version)
            .with_bom_ref(bom_ref)
    }

    fn document(metadata: Component, components: Vec<Component>, deps: &[(&str, &[&str])]) -> Bom {
        let mut bom = Bom::new("1.4");
        bom.metadata = Some(Metadata {
            component: Some(metadata),
            ..Metadata::default()
        });
        bom.components = components;
        bom.dependencies = deps
            .iter()
            .map(|(from, to)| Dependency::new(*from, to.iter().map(|t| (*t).to_string()).collect()))
            .collect();
        bom
    }

    fn root() -> RootComponent {
        RootComponent::new("My App", "1.0").unwrap()
    }

    #[test]
    fn test_root_component() {
        let root = root();
        assert_eq!(root.global_ref().as_str(), "my_app");
        let component = root.to_component();
        assert_eq!(component.bom_ref.as_deref(), Some("my_app"));
        assert_eq!(component.component_type, ComponentType::Application);
        assert!(component.licenses.is_empty());

        assert!(matches!(RootComponent::new("", "1.0"), Err(CombineError::Usage(_))));
        assert!(matches!(RootComponent::new("app", " "), Err(CombineError::Usage(_))));
    }

    #[test]
    fn test_single_document() {
        let doc = document(
            Component::new(ComponentType::Application, "svc")
                .with_version("2.0")
                .with_bom_ref("svc-ref"),
            vec![lib("lodash", "4.17.21", "pkg:npm/lodash@4.17.21")],
            &[("svc-ref", &["pkg:npm/lodash@4.17.21"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);

        let keys: Vec<&str> = merged.components.keys().map(GlobalRef::as_str).collect();
        assert_eq!(keys, vec!["svc@2.0", "lodash@4.17.21"]);
        assert!(merged.has_edge("my_app", "svc@2.0"));
        assert!(merged.has_edge("svc@2.0", "lodash@4.17.21"));
        assert_eq!(merged.edge_count(), 2);
        assert!(merged.diagnostics.is_empty());

        let report = &merged.documents[0];
        assert!(report.is_merged());
        assert_eq!(report.resolve("svc-ref").map(GlobalRef::as_str), Some("svc@2.0"));
        assert_eq!(report.components_seen, 2);
        assert_eq!(report.components_added, 2);
        assert_eq!(report.edges_added, 1);
    }

    #[test]
    fn test_shared_component_first_writer_wins() {
        let mut first_copy = lib("log", "0.4.20", "a-log");
        first_copy.description = Some("from first".into());
        let mut second_copy = lib("log", "0.4.20", "b-log");
        second_copy.description = Some("from second".into());

        let first = document(
            Component::new(ComponentType::Application, "a").with_version("1").with_bom_ref("a"),
            vec![first_copy],
            &[("a", &["a-log"])],
        );
        let second = document(
            Component::new(ComponentType::Application, "b").with_version("1").with_bom_ref("b"),
            vec![second_copy],
            &[("b", &["b-log"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[first, second]);

        assert_eq!(merged.component_count(), 3);
        let log = merged.component("log@0.4.20").unwrap();
        assert_eq!(log.description.as_deref(), Some("from first"));
        assert_eq!(log.bom_ref.as_deref(), Some("log@0.4.20"));
        // The second document's local ref still resolves to the shared identity
        assert!(merged.has_edge("b@1", "log@0.4.20"));
        assert!(merged.has_edge("a@1", "log@0.4.20"));
        assert_eq!(merged.documents[1].components_added, 1);
    }

    #[test]
    fn test_later_document_adds_edges_to_existing_component() {
        let first = document(
            Component::new(ComponentType::Application, "a").with_version("1").with_bom_ref("a"),
            vec![lib("x", "1", "x"), lib("y", "1", "y")],
            &[("a", &["x"])],
        );
        let second = document(
            Component::new(ComponentType::Application, "b").with_version("1").with_bom_ref("b"),
            vec![lib("x", "1", "x2"), lib("y", "1", "y2")],
            &[("x2", &["y2"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[first, second]);
        assert!(merged.has_edge("x@1", "y@1"));
        assert_eq!(merged.depends_on("x@1").map(IndexSet::len), Some(1));
    }

    #[test]
    fn test_group_and_missing_version() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_bom_ref("svc"),
            vec![lib("core", "5.3", "core").with_group("org.springframework")],
            &[("svc", &["core"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        assert!(merged.component("svc@").is_some());
        assert!(merged.component("org.springframework/core@5.3").is_some());
        assert!(merged.has_edge("svc@", "org.springframework/core@5.3"));
    }

    #[test]
    fn test_composite_refs_are_simplified() {
        let doc = document(
            Component::new(ComponentType::Application, "svc")
                .with_version("1")
                .with_bom_ref("svc"),
            vec![lib("pkg", "2", "pkg-2")],
            &[("scope|svc", &["outer|inner|pkg-2"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        assert!(merged.has_edge("svc@1", "pkg@2"));
        assert!(merged.diagnostics.is_empty());
    }

    #[test]
    fn test_custom_delimiter_and_prefix() {
        let doc = document(
            Component::new(ComponentType::Application, "svc")
                .with_version("1")
                .with_bom_ref("svc"),
            vec![lib("pkg", "2", "pkg")],
            &[("svc", &["x#pkg"])],
        );
        let engine = MergeEngine::new()
            .with_ref_prefix(Some("cdxc:".into()))
            .with_composite_delimiter('#');
        let merged = engine.merge_boms(&root(), &[doc]);
        assert!(merged.has_edge("my_app", "cdxc:svc@1"));
        assert!(merged.has_edge("cdxc:svc@1", "cdxc:pkg@2"));
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        let engine = MergeEngine::new().with_ref_prefix(Some(String::new()));
        assert_eq!(engine.ref_prefix(), None);
    }

    #[test]
    fn test_missing_metadata_component_skips_document() {
        let mut orphan = Bom::new("1.4");
        orphan.components = vec![lib("ghost", "1", "ghost")];
        let good = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![],
            &[],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[orphan, good]);

        assert!(merged.component("ghost@1").is_none());
        assert!(merged.component("svc@1").is_some());
        assert!(!merged.documents[0].is_merged());
        assert!(merged.documents[1].is_merged());
        assert!(matches!(
            merged.diagnostics.as_slice(),
            [MergeDiagnostic::MissingMetadataComponent { document }] if document == "document #1"
        ));
    }

    #[test]
    fn test_unresolved_source_drops_entry() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![lib("a", "1", "a")],
            &[("nobody", &["a"]), ("svc", &["a"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        assert!(merged.has_edge("svc@1", "a@1"));
        assert_eq!(merged.depends_on("a@1").map(IndexSet::len).unwrap_or(0), 0);
        assert!(matches!(
            merged.diagnostics.as_slice(),
            [MergeDiagnostic::UnresolvedSource { local_ref, .. }] if local_ref == "nobody"
        ));
    }

    #[test]
    fn test_unresolved_target_drops_only_that_target() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![lib("a", "1", "a"), lib("b", "1", "b")],
            &[("svc", &["a", "ghost", "b"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        let targets: Vec<&str> = merged
            .depends_on("svc@1")
            .unwrap()
            .iter()
            .map(GlobalRef::as_str)
            .collect();
        assert_eq!(targets, vec!["a@1", "b@1"]);
        assert_eq!(merged.diagnostics.len(), 1);
        match &merged.diagnostics[0] {
            MergeDiagnostic::UnresolvedTarget {
                source, local_ref, ..
            } => {
                assert_eq!(source.as_str(), "svc@1");
                assert_eq!(local_ref, "ghost");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
    }

    #[test]
    fn test_cycles_terminate() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![lib("a", "1", "a"), lib("b", "1", "b")],
            &[("svc", &["a"]), ("a", &["b"]), ("b", &["a", "b"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        assert!(merged.has_edge("a@1", "b@1"));
        assert!(merged.has_edge("b@1", "a@1"));
        // b -> b collapses to a self-edge and is dropped
        assert!(!merged.has_edge("b@1", "b@1"));
        assert!(merged.diagnostics.is_empty());
    }

    #[test]
    fn test_nested_components_flattened_in_preorder() {
        let nested = lib("outer", "1", "outer")
            .with_component(lib("inner", "1", "inner").with_component(lib("leaf", "1", "leaf")));
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![nested, lib("sibling", "1", "sibling")],
            &[("inner", &["leaf"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);

        let keys: Vec<&str> = merged.components.keys().map(GlobalRef::as_str).collect();
        assert_eq!(keys, vec!["svc@1", "outer@1", "inner@1", "leaf@1", "sibling@1"]);
        assert!(merged.components.values().all(|c| c.components.is_empty()));
        assert!(merged.has_edge("inner@1", "leaf@1"));
    }

    #[test]
    fn test_versionless_component_named_like_root_is_kept() {
        let root = RootComponent::new("OpenSSL", "3.0").unwrap();
        let mut openssl = lib("openssl", "", "openssl");
        openssl.version = None;
        openssl.description = Some("vendored copy".into());
        let doc = document(
            Component::new(ComponentType::Application, "svc")
                .with_version("1")
                .with_bom_ref("svc"),
            vec![openssl],
            &[("svc", &["openssl"])],
        );
        let merged = MergeEngine::new().merge_boms(&root, &[doc]);
        assert_eq!(merged.root_ref().as_str(), "openssl");
        let kept = merged.component("openssl@").unwrap();
        assert_eq!(kept.description.as_deref(), Some("vendored copy"));
        assert!(merged.has_edge("svc@1", "openssl@"));
        assert!(merged.diagnostics.is_empty());
    }

    #[test]
    fn test_root_ref_collision_folds_into_root() {
        let root = RootComponent::new("gateway@2", "1.0").unwrap();
        let doc = document(
            Component::new(ComponentType::Application, "gateway")
                .with_version("2")
                .with_bom_ref("self"),
            vec![lib("a", "1", "a")],
            &[("self", &["a"])],
        );
        let merged = MergeEngine::new().merge_boms(&root, &[doc]);
        assert!(merged.component("gateway@2").is_none());
        assert!(merged.has_edge("gateway@2", "a@1"));
        assert!(!merged.has_edge("gateway@2", "gateway@2"));
        assert!(matches!(
            merged.diagnostics.as_slice(),
            [MergeDiagnostic::RootRefCollision { .. }]
        ));
    }

    #[test]
    fn test_every_edge_endpoint_is_declared() {
        let first = document(
            Component::new(ComponentType::Application, "a").with_version("1").with_bom_ref("a"),
            vec![lib("x", "1", "x")],
            &[("a", &["x", "missing"])],
        );
        let second = document(
            Component::new(ComponentType::Application, "b").with_version("1").with_bom_ref("b"),
            vec![lib("x", "1", "x")],
            &[("b", &["x"]), ("gone", &["x"])],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[first, second]);
        let root_ref = merged.root_ref();
        for (from, targets) in &merged.dependencies {
            assert!(*from == root_ref || merged.components.contains_key(from));
            for target in targets {
                assert!(merged.components.contains_key(target));
            }
        }
        assert_eq!(merged.diagnostics.len(), 2);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let make = || {
            vec![
                document(
                    Component::new(ComponentType::Application, "a").with_version("1").with_bom_ref("a"),
                    vec![lib("x", "1", "x"), lib("y", "2", "y")],
                    &[("a", &["y", "x"]), ("y", &["x"])],
                ),
                document(
                    Component::new(ComponentType::Application, "b").with_version("1").with_bom_ref("b"),
                    vec![lib("y", "2", "why")],
                    &[("b", &["why"])],
                ),
            ]
        };
        let engine = MergeEngine::new();
        let one = engine.merge_boms(&root(), &make());
        let two = engine.merge_boms(&root(), &make());
        assert_eq!(one.dependency_entries(), two.dependency_entries());
        assert_eq!(
            one.components.keys().collect::<Vec<_>>(),
            two.components.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_free_merge_function() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![],
            &[],
        );
        let merged = merge("Suite", "3.0", &[doc]).unwrap();
        assert_eq!(merged.root_ref().as_str(), "suite");
        assert_eq!(merged.documents[0].label, "document #1");
        assert!(merge("", "3.0", &[]).is_err());
    }

    #[test]
    fn test_to_bom_output() {
        let doc = document(
            Component::new(ComponentType::Application, "svc").with_version("1").with_bom_ref("svc"),
            vec![lib("a", "1", "a")],
            &[],
        );
        let merged = MergeEngine::new().merge_boms(&root(), &[doc]);
        let bom = merged.to_bom(&OutputOptions::default()).unwrap();

        assert_eq!(bom.spec_version, "1.5");
        assert_eq!(bom.version, 1);
        assert!(bom.metadata.as_ref().unwrap().timestamp.is_none());
        assert_eq!(
            bom.metadata_component().and_then(|c| c.bom_ref.as_deref()),
            Some("my_app")
        );
        let refs: Vec<&str> = bom
            .dependencies
            .iter()
            .map(|d| d.dependency_ref.as_str())
            .collect();
        assert_eq!(refs, vec!["my_app", "svc@1", "a@1"]);
        assert!(bom.dependencies[2].depends_on.is_empty());

        let serial = bom.serial_number.clone().unwrap();
        assert!(serial.starts_with("urn:uuid:"));
        let again = merged.to_bom(&OutputOptions::default()).unwrap();
        assert_eq!(again.serial_number.as_deref(), Some(serial.as_str()));

        let stamped = merged
            .to_bom(&OutputOptions {
                include_timestamp: true,
                ..OutputOptions::default()
            })
            .unwrap();
        assert!(stamped.metadata.unwrap().timestamp.is_some());
    }
}
