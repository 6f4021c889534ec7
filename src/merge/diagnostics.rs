//! Recoverable problems found while merging.
//!
//! None of these abort a merge. Each one is logged when raised and kept on
//! the [`MergedBom`](super::MergedBom) so callers and tests can inspect them.

use crate::model::GlobalRef;
use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

/// A problem confined to a single document, component or dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeDiagnostic {
    /// The document has no `metadata.component`; it was skipped entirely.
    MissingMetadataComponent { document: String },

    /// A dependency entry's `ref` is not declared in its document; the whole
    /// entry was dropped.
    UnresolvedSource { document: String, local_ref: String },

    /// One `dependsOn` target is not declared in its document; only that
    /// target was dropped.
    UnresolvedTarget {
        document: String,
        source: GlobalRef,
        local_ref: String,
    },

    /// A component's identity produced the root's reference; it was folded
    /// into the root instead of being added as a separate component.
    RootRefCollision { document: String, local_ref: String },
}

impl MergeDiagnostic {
    #[must_use]
    pub const fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::MissingMetadataComponent { .. }
            | Self::UnresolvedSource { .. }
            | Self::UnresolvedTarget { .. } => DiagnosticSeverity::Error,
            Self::RootRefCollision { .. } => DiagnosticSeverity::Warning,
        }
    }

    /// Label of the document the diagnostic belongs to
    #[must_use]
    pub fn document(&self) -> &str {
        match self {
            Self::MissingMetadataComponent { document }
            | Self::UnresolvedSource { document, .. }
            | Self::UnresolvedTarget { document, .. }
            | Self::RootRefCollision { document, .. } => document,
        }
    }

    /// Emit the diagnostic through `tracing` at its severity
    pub(crate) fn log(&self) {
        match self.severity() {
            DiagnosticSeverity::Error => tracing::error!(document = self.document(), "{}", self),
            DiagnosticSeverity::Warning => tracing::warn!(document = self.document(), "{}", self),
        }
    }
}

impl fmt::Display for MergeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMetadataComponent { document } => {
                write!(f, "{document} has no metadata component, skipping document")
            }
            Self::UnresolvedSource { local_ref, .. } => {
                write!(f, "BOM reference {local_ref} unknown, dropping its dependencies")
            }
            Self::UnresolvedTarget {
                source, local_ref, ..
            } => write!(
                f,
                "BOM reference {local_ref} unknown, dropping it from the dependencies of {source}"
            ),
            Self::RootRefCollision { local_ref, .. } => write!(
                f,
                "Component {local_ref} has the same reference as the root component, merging it into the root"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        let missing = MergeDiagnostic::MissingMetadataComponent {
            document: "a.json".into(),
        };
        assert_eq!(missing.severity(), DiagnosticSeverity::Error);

        let collision = MergeDiagnostic::RootRefCollision {
            document: "a.json".into(),
            local_ref: "app".into(),
        };
        assert_eq!(collision.severity(), DiagnosticSeverity::Warning);
        assert!(DiagnosticSeverity::Error > DiagnosticSeverity::Warning);
    }

    #[test]
    fn test_display_names_the_ref() {
        let diag = MergeDiagnostic::UnresolvedTarget {
            document: "b.json".into(),
            source: GlobalRef::new("wrapper@1.0"),
            local_ref: "ghost".into(),
        };
        let text = diag.to_string();
        assert!(text.contains("ghost"));
        assert!(text.contains("wrapper@1.0"));
        assert_eq!(diag.document(), "b.json");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diag = MergeDiagnostic::UnresolvedSource {
            document: "c.json".into(),
            local_ref: "x".into(),
        };
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["kind"], "unresolved_source");
        assert_eq!(value["local_ref"], "x");
    }
}
