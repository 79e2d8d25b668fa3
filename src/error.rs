//! Error taxonomy for skillsctl.
//!
//! Every failure names the skill IDs or the check that caused it; nothing is
//! collapsed into a generic error. Validation errors abort before any
//! mutation, so callers can rely on the working tree and manifest being
//! untouched when one of these surfaces.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkillsError>;

#[derive(Debug, Error)]
pub enum SkillsError {
    /// No skills repository URL could be resolved from the environment or
    /// the project config file.
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog file is missing, unreadable, or fails schema validation.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// One or more requested skill IDs do not exist in the catalog.
    #[error("unknown skill id(s): {}", .0.join(", "))]
    UnknownSkill(Vec<String>),

    /// The skills working tree has uncommitted changes.
    #[error("skills working tree at {0} has uncommitted changes; commit or discard them, or pass --allow-dirty")]
    DirtyWorkingTree(String),

    /// The skills submodule has never been initialized.
    #[error("skills submodule at {0} is not initialized; run `skillsctl sync` or `skillsctl install`")]
    SubmoduleMissing(String),

    /// Git is missing, cannot be invoked, or is too old for cone-mode
    /// sparse-checkout.
    #[error("git unavailable: {0}")]
    VcsUnavailable(String),

    /// A git command ran but failed.
    #[error("git {command} failed: {stderr}")]
    VcsCommand { command: String, stderr: String },

    /// Writing the manifest (or other durable state) failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillsError {
    /// Stable machine-readable code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration_error",
            Self::CatalogUnavailable(_) => "catalog_unavailable",
            Self::UnknownSkill(_) => "unknown_skill",
            Self::DirtyWorkingTree(_) => "dirty_working_tree",
            Self::SubmoduleMissing(_) => "submodule_missing",
            Self::VcsUnavailable(_) => "vcs_unavailable",
            Self::VcsCommand { .. } => "vcs_command_failed",
            Self::Persistence(_) => "persistence_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}
