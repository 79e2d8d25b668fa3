//! Working-tree inspection: ground truth for reconciliation.
//!
//! One snapshot per invocation. Drift detection is a pure diff between this
//! snapshot, the manifest, and the translated pattern set, so nothing here
//! mutates anything.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SkillsError};
use crate::vcs::{self, Vcs};

/// Transient snapshot of the skills submodule's working tree.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingTreeState {
    pub submodule_present: bool,
    pub sparse_enabled: bool,
    /// Uncommitted changes inside the skills directory.
    pub dirty: bool,
    /// Patterns as reported by the tool; empty when the submodule is absent
    /// or sparse-checkout is off.
    pub current_patterns: BTreeSet<String>,
}

impl WorkingTreeState {
    /// A state for a submodule that has never been set up.
    pub fn absent() -> Self {
        Self {
            submodule_present: false,
            sparse_enabled: false,
            dirty: false,
            current_patterns: BTreeSet::new(),
        }
    }
}

/// Snapshot the skills working tree.
///
/// A missing submodule is a valid state here (`submodule_present = false`);
/// operations that require it raise `SubmoduleMissing` themselves. Fails
/// with `VcsUnavailable` when git cannot be invoked or is older than the
/// cone-mode minimum.
pub fn inspect(vcs: &dyn Vcs, submodule_path: &Path) -> Result<WorkingTreeState> {
    let version = vcs.version()?;
    if !vcs::supports_cone_mode(version) {
        return Err(SkillsError::VcsUnavailable(format!(
            "git {}.{} is too old; cone-mode sparse-checkout needs {}.{}+",
            version.0,
            version.1,
            vcs::MIN_GIT_VERSION.0,
            vcs::MIN_GIT_VERSION.1
        )));
    }

    if !vcs.submodule_present(submodule_path) {
        return Ok(WorkingTreeState::absent());
    }

    let sparse_enabled = vcs.sparse_enabled(submodule_path);
    let current_patterns = if sparse_enabled {
        vcs.list_patterns(submodule_path)?
    } else {
        BTreeSet::new()
    };

    Ok(WorkingTreeState {
        submodule_present: true,
        sparse_enabled,
        dirty: vcs.is_dirty(submodule_path)?,
        current_patterns,
    })
}
