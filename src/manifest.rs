//! The skills manifest: the sole durable record of declared intent.
//!
//! Stored at `.claude/skills.manifest` as one skill ID per line. Lines
//! starting with `#` and blank lines are ignored on load; a header comment is
//! written on save. IDs are kept in first-seen order and deduplicated, so
//! `save(load(p))` preserves order and membership.

use std::path::Path;

use itertools::Itertools;

use crate::error::{Result, SkillsError};
use crate::utils::fs::{atomic_write, ensure_dir};

const HEADER: &str = "# Skills manifest - managed by skillsctl\n# Do not edit manually\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    ids: Vec<String>,
}

impl Manifest {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            ids: ids.into_iter().unique().collect(),
        }
    }

    /// Load the manifest. A missing file is an empty manifest, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let ids = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .unique()
            .collect();
        Ok(Self { ids })
    }

    /// Persist the manifest atomically (temp file in the same directory,
    /// then rename) so a crash mid-write never corrupts the previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        let mut body = String::from(HEADER);
        for id in &self.ids {
            body.push_str(id);
            body.push('\n');
        }

        atomic_write(path, body.as_bytes())
            .map_err(|err| SkillsError::Persistence(format!("write {}: {err}", path.display())))
    }

    /// IDs in first-seen order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Append `id` if absent. Returns true when the manifest changed.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Drop `id` if present. Returns true when the manifest changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Replace the declared set wholesale, keeping the given order.
    pub fn set(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids = ids.into_iter().unique().collect();
    }
}
