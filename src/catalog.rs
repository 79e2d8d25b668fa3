//! The skills catalog.
//!
//! Loaded once per invocation from `<skills_dir>/catalog/skills.json` in the
//! shared repository, read-only afterwards. Entry order is file order and is
//! significant for deterministic search tie-breaking.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillsError};

/// One skill as described by the shared repository's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Repository-relative directory holding the skill's files. Used as the
    /// cone-mode sparse-checkout pattern verbatim.
    pub path: String,
    /// Alternate names that match like `id` during search.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SkillEntry {
    /// First line of the description, for one-line summaries.
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }
}

/// Ordered, validated collection of skill entries.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<SkillEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Load and validate the catalog file.
    ///
    /// Fails with `CatalogUnavailable` when the file is missing, is not
    /// valid JSON, or violates the schema (empty `id` or `path`, duplicate
    /// `id`).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SkillsError::CatalogUnavailable(format!(
                "catalog file not found: {} (run `skillsctl sync` first)",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            SkillsError::CatalogUnavailable(format!("read {}: {err}", path.display()))
        })?;
        let entries: Vec<SkillEntry> = serde_json::from_str(&raw).map_err(|err| {
            SkillsError::CatalogUnavailable(format!("parse {}: {err}", path.display()))
        })?;

        Self::from_entries(entries)
    }

    /// Validate a pre-built entry list. Exposed for tests and fixtures.
    pub fn from_entries(entries: Vec<SkillEntry>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(SkillsError::CatalogUnavailable(format!(
                    "catalog entry #{idx} has an empty id"
                )));
            }
            if entry.path.trim().is_empty() {
                return Err(SkillsError::CatalogUnavailable(format!(
                    "catalog entry '{}' has an empty path",
                    entry.id
                )));
            }
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(SkillsError::CatalogUnavailable(format!(
                    "duplicate skill id '{}' in catalog",
                    entry.id
                )));
            }
        }
        Ok(Self { entries, by_id })
    }

    pub fn lookup(&self, id: &str) -> Option<&SkillEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Entries in catalog (file) order.
    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
