//! CycloneDX document model and component identity.
//!
//! [`Bom`] and friends mirror the CycloneDX JSON schema closely enough to read
//! documents from any mainstream producer and write a 1.5 document back out.
//! The [`refs`] helpers turn a component's identity into the global
//! reference token used to merge documents.

mod bom;
pub mod refs;

pub use bom::*;
pub use refs::{simplify_ref, slugify, ComponentIdentity, GlobalRef, DEFAULT_COMPOSITE_DELIMITER};
