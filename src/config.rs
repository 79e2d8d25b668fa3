//! Configuration resolution.
//!
//! Resolved once at process start and passed into the reconciler as a value;
//! nothing below the CLI boundary reads the environment. Priority: env vars
//! (`SKILLS_REPO_URL`, `SKILLS_REPO_BRANCH`) over the project config file
//! `.claude/skills.config.json`, over defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillsError};
use crate::utils::fs::{atomic_write, ensure_dir};

pub const ENV_REPO_URL: &str = "SKILLS_REPO_URL";
pub const ENV_REPO_BRANCH: &str = "SKILLS_REPO_BRANCH";

const CONFIG_FILE: &str = ".claude/skills.config.json";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_SKILLS_DIR: &str = ".claude/skills";
const DEFAULT_MANIFEST: &str = ".claude/skills.manifest";

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// URL of the shared skills repository. The only setting with no
    /// default; required for submodule bootstrap.
    pub repo_url: String,
    pub branch: String,
    /// Submodule path, relative to the project root.
    pub skills_dir: PathBuf,
    /// Manifest path, relative to the project root.
    pub manifest_path: PathBuf,
}

/// On-disk shape of the project config file. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default)]
    repo_url: Option<String>,
    #[serde(default)]
    branch: Option<String>,
}

impl Config {
    /// Resolve configuration for `project_root`.
    ///
    /// Fails with `Config` when no repository URL can be found; a malformed
    /// config file is also fatal rather than silently skipped, so a typo
    /// does not masquerade as "not configured".
    pub fn load(project_root: &Path) -> Result<Self> {
        let file = Self::load_file(&project_root.join(CONFIG_FILE))?;

        let repo_url = std::env::var(ENV_REPO_URL)
            .ok()
            .filter(|url| !url.is_empty())
            .or(file.repo_url)
            .ok_or_else(|| {
                SkillsError::Config(format!(
                    "no skills repository URL configured; set {ENV_REPO_URL} or add \
                     \"repo_url\" to {CONFIG_FILE}"
                ))
            })?;

        let branch = std::env::var(ENV_REPO_BRANCH)
            .ok()
            .filter(|branch| !branch.is_empty())
            .or(file.branch)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        Ok(Self {
            repo_url,
            branch,
            skills_dir: PathBuf::from(DEFAULT_SKILLS_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
        })
    }

    /// Like `load`, but an unresolvable URL yields `None` instead of an
    /// error. Read-only commands (status, doctor) use this.
    pub fn try_load(project_root: &Path) -> Result<Option<Self>> {
        match Self::load(project_root) {
            Ok(config) => Ok(Some(config)),
            Err(SkillsError::Config(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|err| SkillsError::Config(format!("read {}: {err}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|err| SkillsError::Config(format!("parse {}: {err}", path.display())))
    }

    /// Write the project config file (used by setup tooling, not by the
    /// reconciler itself).
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = project_root.join(CONFIG_FILE);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let file = ConfigFile {
            repo_url: Some(self.repo_url.clone()),
            branch: Some(self.branch.clone()),
        };
        let mut body = serde_json::to_string_pretty(&file)?;
        body.push('\n');
        atomic_write(&path, body.as_bytes())
            .map_err(|err| SkillsError::Persistence(format!("write {}: {err}", path.display())))
    }

    /// Catalog file location inside the checked-out skills repository.
    pub fn catalog_path(&self, project_root: &Path) -> PathBuf {
        project_root
            .join(&self.skills_dir)
            .join("catalog/skills.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var handling is covered by the CLI integration tests, which run
    // the binary with a controlled environment; in-process env mutation is
    // not safe under the parallel test runner.

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            repo_url: "https://example.com/skills.git".to_string(),
            branch: "stable".to_string(),
            skills_dir: PathBuf::from(DEFAULT_SKILLS_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
        };
        config.save(dir.path()).unwrap();

        let file = Config::load_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(
            file.repo_url.as_deref(),
            Some("https://example.com/skills.git")
        );
        assert_eq!(file.branch.as_deref(), Some("stable"));
    }

    #[test]
    fn malformed_file_is_an_error_not_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(matches!(err, SkillsError::Config(_)));
    }

    #[test]
    fn catalog_path_under_skills_dir() {
        let config = Config {
            repo_url: "u".to_string(),
            branch: "main".to_string(),
            skills_dir: PathBuf::from(DEFAULT_SKILLS_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
        };
        let path = config.catalog_path(Path::new("/proj"));
        assert_eq!(path, Path::new("/proj/.claude/skills/catalog/skills.json"));
    }
}
