//! The reconciliation engine.
//!
//! Every operation works over three independent snapshots: the manifest
//! (declared intent), the translated pattern set (target materialized
//! state), and the working tree as reported by git (ground truth). Mutating
//! operations share one transition order:
//!
//! validate -> check-dirty -> compute-diff -> apply-pattern-change ->
//! persist-manifest
//!
//! Only the last two steps mutate anything, and the manifest is persisted
//! only after pattern application succeeds, so declared state never runs
//! ahead of materialized state. The window between the dirty check and the
//! apply step is check-then-act: git offers no lock we control, and two
//! concurrent invocations can race there. `status` and `sync` detect the
//! resulting drift instead.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Result, SkillsError};
use crate::manifest::Manifest;
use crate::patterns::{self, CATALOG_DIR};
use crate::vcs::{self, Vcs};
use crate::worktree::{self, WorkingTreeState};

/// Boundary-supplied knobs for mutating operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Proceed even when the skills working tree has uncommitted changes.
    pub allow_dirty: bool,
    /// Stage the touched paths in the parent repository after applying.
    pub stage: bool,
}

/// Structured result of a mutating operation.
#[derive(Debug, Default, Serialize)]
pub struct ApplyOutcome {
    /// IDs newly added to the manifest.
    pub added: Vec<String>,
    /// IDs removed from the manifest.
    pub removed: Vec<String>,
    /// Manifest IDs with no catalog entry (reported, not silently dropped).
    pub unresolved: Vec<String>,
    pub warnings: Vec<String>,
    /// Pattern set now materialized in the working tree.
    pub patterns: BTreeSet<String>,
    /// Whether any working-tree or manifest mutation happened.
    pub changed: bool,
}

/// Read-only snapshot produced by `status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub installed: Vec<String>,
    pub worktree: WorkingTreeState,
    /// Patterns the manifest implies but the working tree lacks.
    pub missing_patterns: Vec<String>,
    /// Working-tree patterns no manifest entry accounts for.
    pub orphaned_patterns: Vec<String>,
    /// Manifest IDs absent from the catalog.
    pub dangling_ids: Vec<String>,
    pub warnings: Vec<String>,
}

impl StatusReport {
    pub fn has_drift(&self) -> bool {
        !self.missing_patterns.is_empty()
            || !self.orphaned_patterns.is_empty()
            || !self.dangling_ids.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn ok(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

/// Orchestrates one command against one project root.
pub struct Reconciler<'a> {
    project_root: &'a Path,
    config: &'a Config,
    vcs: &'a dyn Vcs,
}

impl<'a> Reconciler<'a> {
    pub fn new(project_root: &'a Path, config: &'a Config, vcs: &'a dyn Vcs) -> Self {
        Self {
            project_root,
            config,
            vcs,
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.config.manifest_path)
    }

    fn load_catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.config.catalog_path(self.project_root))
    }

    /// `install(ids)`: desired = manifest ∪ ids.
    pub fn install(&self, ids: &[String], opts: ApplyOptions) -> Result<ApplyOutcome> {
        let mut state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        if !state.submodule_present {
            self.bootstrap_submodule()?;
            state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        }

        let catalog = self.load_catalog()?;

        // validate: all-or-nothing, before any mutation
        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SkillsError::UnknownSkill(unknown));
        }

        self.check_dirty(&state, opts)?;

        let mut manifest = Manifest::load(&self.manifest_path())?;
        let mut outcome = ApplyOutcome::default();
        for id in ids {
            if manifest.add(id) {
                outcome.added.push(id.clone());
            } else {
                outcome
                    .warnings
                    .push(format!("'{id}' is already installed"));
            }
        }

        if outcome.added.is_empty() {
            debug!(target: "reconciler", "install: nothing to do");
            outcome.patterns = state.current_patterns;
            return Ok(outcome);
        }

        self.apply(&manifest, &catalog, &state, &mut outcome)?;
        manifest.save(&self.manifest_path())?;
        outcome.changed = true;
        info!(target: "reconciler", added = outcome.added.len(), "install applied");

        if opts.stage {
            self.stage_all()?;
        }
        Ok(outcome)
    }

    /// `remove(ids)`: desired = manifest − ids.
    pub fn remove(&self, ids: &[String], opts: ApplyOptions) -> Result<ApplyOutcome> {
        let state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        if !state.submodule_present {
            return Err(SkillsError::SubmoduleMissing(
                self.config.skills_dir.display().to_string(),
            ));
        }
        let catalog = self.load_catalog()?;

        self.check_dirty(&state, opts)?;

        let mut manifest = Manifest::load(&self.manifest_path())?;
        let mut outcome = ApplyOutcome::default();
        for id in ids {
            if manifest.remove(id) {
                outcome.removed.push(id.clone());
            } else {
                outcome.warnings.push(format!("'{id}' is not installed"));
            }
        }

        if outcome.removed.is_empty() {
            debug!(target: "reconciler", "remove: nothing to do");
            outcome.patterns = state.current_patterns;
            return Ok(outcome);
        }

        self.apply(&manifest, &catalog, &state, &mut outcome)?;
        manifest.save(&self.manifest_path())?;
        outcome.changed = true;
        info!(target: "reconciler", removed = outcome.removed.len(), "remove applied");

        if opts.stage {
            self.stage_manifest_and_tree()?;
        }
        Ok(outcome)
    }

    /// `set(ids)`: desired = exactly `ids`; can both add and remove.
    pub fn set(&self, ids: &[String], opts: ApplyOptions) -> Result<ApplyOutcome> {
        let mut state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        if !state.submodule_present {
            self.bootstrap_submodule()?;
            state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        }
        let catalog = self.load_catalog()?;

        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SkillsError::UnknownSkill(unknown));
        }

        self.check_dirty(&state, opts)?;

        let mut manifest = Manifest::load(&self.manifest_path())?;
        let desired = Manifest::new(ids.iter().cloned());

        let mut outcome = ApplyOutcome::default();
        outcome.added = desired
            .ids()
            .iter()
            .filter(|id| !manifest.contains(id))
            .cloned()
            .collect();
        outcome.removed = manifest
            .ids()
            .iter()
            .filter(|id| !desired.contains(id))
            .cloned()
            .collect();

        if outcome.added.is_empty() && outcome.removed.is_empty() {
            debug!(target: "reconciler", "set: already at desired state");
            outcome.patterns = state.current_patterns;
            return Ok(outcome);
        }

        manifest.set(desired.ids().iter().cloned());
        self.apply(&manifest, &catalog, &state, &mut outcome)?;
        manifest.save(&self.manifest_path())?;
        outcome.changed = true;
        info!(
            target: "reconciler",
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            "set applied"
        );

        if opts.stage {
            self.stage_all()?;
        }
        Ok(outcome)
    }

    /// `sync()`: reapply the existing manifest; the recovery path after a
    /// fresh checkout. Idempotent: a second run with no intervening change
    /// performs no working-tree mutation.
    pub fn sync(&self, opts: ApplyOptions) -> Result<ApplyOutcome> {
        let state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        if !state.submodule_present {
            self.bootstrap_submodule()?;
        } else {
            // `submodule update --init` also recovers a registered-but-
            // uninitialized submodule after a fresh clone.
            self.vcs.init_submodule(&self.config.skills_dir)?;
            if !state.sparse_enabled {
                self.vcs.sparse_init(&self.config.skills_dir)?;
            }
        }
        let state = worktree::inspect(self.vcs, &self.config.skills_dir)?;

        let catalog = self.load_catalog()?;
        let manifest = Manifest::load(&self.manifest_path())?;
        let translation = patterns::to_patterns(&manifest, &catalog);

        let mut outcome = ApplyOutcome {
            unresolved: translation.unresolved.clone(),
            patterns: translation.patterns.clone(),
            ..ApplyOutcome::default()
        };
        for id in &translation.unresolved {
            outcome
                .warnings
                .push(format!("'{id}' is declared but missing from the catalog"));
            warn!(target: "reconciler", id = %id, "dangling manifest entry");
        }

        if state.current_patterns == translation.patterns {
            debug!(target: "reconciler", "sync: working tree already matches manifest");
            return Ok(outcome);
        }

        self.vcs
            .set_patterns(&self.config.skills_dir, &translation.patterns)?;
        outcome.changed = true;
        info!(
            target: "reconciler",
            patterns = translation.patterns.len(),
            "sync applied"
        );

        if opts.stage {
            self.vcs.stage(&[self.config.skills_dir.clone()])?;
        }
        Ok(outcome)
    }

    /// `status()`: read-only drift report over the three snapshots.
    pub fn status(&self) -> Result<StatusReport> {
        let state = worktree::inspect(self.vcs, &self.config.skills_dir)?;
        let manifest = Manifest::load(&self.manifest_path())?;

        let mut report = StatusReport {
            installed: manifest.ids().to_vec(),
            worktree: state,
            missing_patterns: Vec::new(),
            orphaned_patterns: Vec::new(),
            dangling_ids: Vec::new(),
            warnings: Vec::new(),
        };

        match self.load_catalog() {
            Ok(catalog) => {
                let translation = patterns::to_patterns(&manifest, &catalog);
                report.dangling_ids = translation.unresolved;

                report.missing_patterns = translation
                    .patterns
                    .iter()
                    .filter(|p| !report.worktree.current_patterns.contains(*p))
                    .cloned()
                    .collect();
                report.orphaned_patterns = report
                    .worktree
                    .current_patterns
                    .iter()
                    .filter(|p| p.as_str() != CATALOG_DIR && !translation.patterns.contains(*p))
                    .cloned()
                    .collect();
            }
            Err(err) => {
                // Dangling references are reported, not fatal, for status.
                report
                    .warnings
                    .push(format!("drift not computed: {err}"));
            }
        }

        Ok(report)
    }

    /// `doctor()`: environment and state health checks, read-only.
    pub fn doctor(&self) -> DoctorReport {
        let mut checks = Vec::new();

        let git_found = which::which("git").is_ok();
        checks.push(DoctorCheck {
            name: "git installed",
            passed: git_found,
            detail: if git_found {
                "git binary found".to_string()
            } else {
                "git not found on PATH".to_string()
            },
        });

        match self.vcs.version() {
            Ok(version) => checks.push(DoctorCheck {
                name: "git version",
                passed: vcs::supports_cone_mode(version),
                detail: format!(
                    "git {}.{} (need {}.{}+ for cone-mode sparse-checkout)",
                    version.0,
                    version.1,
                    vcs::MIN_GIT_VERSION.0,
                    vcs::MIN_GIT_VERSION.1
                ),
            }),
            Err(err) => checks.push(DoctorCheck {
                name: "git version",
                passed: false,
                detail: err.to_string(),
            }),
        }

        let is_repo = self.vcs.is_repo();
        checks.push(DoctorCheck {
            name: "git repository",
            passed: is_repo,
            detail: if is_repo {
                format!("{} is a git repository", self.project_root.display())
            } else {
                format!("{} is not a git repository", self.project_root.display())
            },
        });

        let submodule = self.vcs.submodule_present(&self.config.skills_dir);
        checks.push(DoctorCheck {
            name: "skills submodule",
            passed: submodule,
            detail: if submodule {
                format!("registered at {}", self.config.skills_dir.display())
            } else {
                format!(
                    "not registered at {} (run `skillsctl install` or `skillsctl sync`)",
                    self.config.skills_dir.display()
                )
            },
        });

        let sparse = self.vcs.sparse_enabled(&self.config.skills_dir);
        checks.push(DoctorCheck {
            name: "sparse-checkout",
            passed: sparse,
            detail: if sparse {
                "cone-mode sparse-checkout active".to_string()
            } else {
                "sparse-checkout not initialized".to_string()
            },
        });

        match self.load_catalog() {
            Ok(catalog) => checks.push(DoctorCheck {
                name: "catalog",
                passed: true,
                detail: format!("{} skill(s) available", catalog.len()),
            }),
            Err(err) => checks.push(DoctorCheck {
                name: "catalog",
                passed: false,
                detail: err.to_string(),
            }),
        }

        match Manifest::load(&self.manifest_path()) {
            Ok(manifest) => checks.push(DoctorCheck {
                name: "manifest",
                passed: true,
                detail: format!("{} skill(s) declared", manifest.len()),
            }),
            Err(err) => checks.push(DoctorCheck {
                name: "manifest",
                passed: false,
                detail: err.to_string(),
            }),
        }

        DoctorReport { checks }
    }

    /// apply-pattern-change: replace the working tree's pattern list with
    /// the one the manifest implies. On failure the caller must not persist
    /// the manifest.
    fn apply(
        &self,
        manifest: &Manifest,
        catalog: &Catalog,
        state: &WorkingTreeState,
        outcome: &mut ApplyOutcome,
    ) -> Result<()> {
        let translation = patterns::to_patterns(manifest, catalog);
        outcome.unresolved = translation.unresolved.clone();
        for id in &translation.unresolved {
            outcome
                .warnings
                .push(format!("'{id}' is declared but missing from the catalog"));
        }

        if state.current_patterns != translation.patterns {
            self.vcs
                .set_patterns(&self.config.skills_dir, &translation.patterns)?;
        }
        outcome.patterns = translation.patterns;
        Ok(())
    }

    fn check_dirty(&self, state: &WorkingTreeState, opts: ApplyOptions) -> Result<()> {
        if !state.dirty {
            return Ok(());
        }
        if opts.allow_dirty {
            warn!(target: "reconciler", "proceeding despite dirty working tree");
            return Ok(());
        }
        Err(SkillsError::DirtyWorkingTree(
            self.config.skills_dir.display().to_string(),
        ))
    }

    fn bootstrap_submodule(&self) -> Result<()> {
        info!(
            target: "reconciler",
            url = %self.config.repo_url,
            path = %self.config.skills_dir.display(),
            "setting up skills submodule"
        );
        self.vcs.add_submodule(
            &self.config.repo_url,
            &self.config.branch,
            &self.config.skills_dir,
        )?;
        self.vcs.init_submodule(&self.config.skills_dir)?;
        self.vcs.sparse_init(&self.config.skills_dir)?;
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.vcs.stage(&[
            PathBuf::from(".gitmodules"),
            self.config.skills_dir.clone(),
            self.config.manifest_path.clone(),
        ])
    }

    fn stage_manifest_and_tree(&self) -> Result<()> {
        self.vcs.stage(&[
            self.config.skills_dir.clone(),
            self.config.manifest_path.clone(),
        ])
    }
}
