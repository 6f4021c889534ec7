//! Component identity and reference tokens.
//!
//! A `bom-ref` is only unique inside the document that declared it. To merge
//! documents, every component is re-keyed on a [`GlobalRef`] derived from its
//! identity (`group`, `name`, `version`), so the same logical component gets
//! the same key no matter which document it came from.

use super::Component;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Delimiter some producers use to build composite local refs (`a|b|c`).
pub const DEFAULT_COMPOSITE_DELIMITER: char = '|';

/// Identity of a component as used for deduplication.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentIdentity<'a> {
    pub group: Option<&'a str>,
    pub name: &'a str,
    pub version: Option<&'a str>,
}

impl<'a> ComponentIdentity<'a> {
    #[must_use]
    pub fn of(component: &'a Component) -> Self {
        Self {
            group: component.group.as_deref().filter(|g| !g.is_empty()),
            name: &component.name,
            version: component.version.as_deref().filter(|v| !v.is_empty()),
        }
    }

    /// Derive the global reference token, optionally prefixed.
    #[must_use]
    pub fn global_ref(&self, prefix: Option<&str>) -> GlobalRef {
        GlobalRef(format!("{}{self}", prefix.unwrap_or_default()))
    }
}

impl fmt::Display for ComponentIdentity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = self.group {
            write!(f, "{group}/")?;
        }
        // Versionless components keep the separator: `name@`
        write!(f, "{}@{}", self.name, self.version.unwrap_or_default())
    }
}

/// Document-independent reference token of a merged component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalRef(String);

impl GlobalRef {
    /// Wrap an already-derived token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reference for the synthetic root component.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(slugify(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GlobalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GlobalRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlobalRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Reduce a composite local ref to its trailing segment.
///
/// `simplify_ref("a|b|c", '|')` is `"c"`; refs without the delimiter are
/// returned unchanged.
#[must_use]
pub fn simplify_ref(local_ref: &str, delimiter: char) -> &str {
    match local_ref.rfind(delimiter) {
        Some(idx) => &local_ref[idx + delimiter.len_utf8()..],
        None => local_ref,
    }
}

/// Lowercase the name and replace spaces with underscores.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
