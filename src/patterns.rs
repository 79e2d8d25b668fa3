//! Translation from declared skills to sparse-checkout patterns.
//!
//! Cone-mode patterns are directory paths, not globs, so the translation is
//! just the `path` of every resolvable manifest entry plus the constant
//! `catalog` directory (the catalog file itself must stay materialized or
//! the next invocation cannot resolve anything).

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::manifest::Manifest;

/// Directory inside the skills repository that is always checked out.
pub const CATALOG_DIR: &str = "catalog";

/// Result of translating a manifest against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Cone-mode directory patterns, sorted and deduplicated.
    pub patterns: BTreeSet<String>,
    /// Manifest IDs with no catalog entry, in manifest order. The caller
    /// decides whether these are warnings or fatal.
    pub unresolved: Vec<String>,
}

/// Pure function: `patterns = f(manifest, catalog)`.
pub fn to_patterns(manifest: &Manifest, catalog: &Catalog) -> Translation {
    let mut patterns = BTreeSet::new();
    patterns.insert(CATALOG_DIR.to_string());

    let mut unresolved = Vec::new();
    for id in manifest.ids() {
        match catalog.lookup(id) {
            Some(skill) => {
                patterns.insert(skill.path.clone());
            }
            None => unresolved.push(id.clone()),
        }
    }

    Translation { patterns, unresolved }
}
