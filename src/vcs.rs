//! The version-control collaborator.
//!
//! skillsctl never re-implements version control; everything goes through
//! this narrow capability trait so the reconciler (and its tests) can swap
//! in a fake. `GitCli` is the real implementation: synchronous `git`
//! subprocess calls, no timeouts (a hang in a local cooperative subprocess
//! hangs the command, which is acceptable for a short-lived CLI).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, SkillsError};

/// Minimum git version with usable cone-mode sparse-checkout.
pub const MIN_GIT_VERSION: (u32, u32) = (2, 25);

/// Capabilities the reconciler consumes, nothing more.
pub trait Vcs {
    /// `(major, minor)` of the underlying tool. `VcsUnavailable` when the
    /// binary cannot be invoked.
    fn version(&self) -> Result<(u32, u32)>;

    /// Whether the project root is inside a repository.
    fn is_repo(&self) -> bool;

    /// Whether a submodule is registered at `path` (in `.gitmodules`).
    fn submodule_present(&self, path: &Path) -> bool;

    /// Register a new submodule tracking `branch` of `url` at `path`.
    fn add_submodule(&self, url: &str, branch: &str, path: &Path) -> Result<()>;

    /// Initialize/update the submodule working tree (shallow).
    fn init_submodule(&self, path: &Path) -> Result<()>;

    /// Enable cone-mode sparse-checkout inside the submodule.
    fn sparse_init(&self, path: &Path) -> Result<()>;

    /// Replace (not append) the full sparse-checkout pattern list.
    fn set_patterns(&self, path: &Path, patterns: &BTreeSet<String>) -> Result<()>;

    /// Current sparse-checkout patterns, empty when sparse-checkout is off.
    fn list_patterns(&self, path: &Path) -> Result<BTreeSet<String>>;

    /// Whether sparse-checkout is active inside the submodule.
    fn sparse_enabled(&self, path: &Path) -> bool;

    /// Porcelain-style dirty check scoped to the submodule working tree.
    fn is_dirty(&self, path: &Path) -> Result<bool>;

    /// Stage paths in the parent repository.
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;
}

/// Real implementation over the `git` binary.
pub struct GitCli {
    project_root: PathBuf,
}

impl GitCli {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    fn run(&self, args: &[&str], cwd: &Path) -> Result<String> {
        debug!(target: "vcs", cwd = %cwd.display(), "git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|err| SkillsError::VcsUnavailable(format!("cannot invoke git: {err}")))?;

        if !output.status.success() {
            return Err(SkillsError::VcsCommand {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_root(&self, args: &[&str]) -> Result<String> {
        self.run(args, &self.project_root)
    }

    fn submodule_dir(&self, path: &Path) -> PathBuf {
        self.project_root.join(path)
    }
}

impl Vcs for GitCli {
    fn version(&self) -> Result<(u32, u32)> {
        let stdout = self.run_root(&["--version"])?;
        parse_git_version(&stdout).ok_or_else(|| {
            SkillsError::VcsUnavailable(format!("unparseable git version: {}", stdout.trim()))
        })
    }

    fn is_repo(&self) -> bool {
        self.run_root(&["rev-parse", "--git-dir"]).is_ok()
    }

    fn submodule_present(&self, path: &Path) -> bool {
        let gitmodules = self.project_root.join(".gitmodules");
        let Ok(content) = std::fs::read_to_string(gitmodules) else {
            return false;
        };
        content.contains(&format!("path = {}", path.display()))
    }

    fn add_submodule(&self, url: &str, branch: &str, path: &Path) -> Result<()> {
        let path = path.display().to_string();
        self.run_root(&["submodule", "add", "-b", branch, url, &path])?;
        Ok(())
    }

    fn init_submodule(&self, path: &Path) -> Result<()> {
        let path = path.display().to_string();
        // Shallow: the skills repo may be large, history is not needed.
        self.run_root(&["submodule", "update", "--init", "--depth=1", "--", &path])?;
        Ok(())
    }

    fn sparse_init(&self, path: &Path) -> Result<()> {
        self.run(&["sparse-checkout", "init", "--cone"], &self.submodule_dir(path))?;
        Ok(())
    }

    fn set_patterns(&self, path: &Path, patterns: &BTreeSet<String>) -> Result<()> {
        let mut args = vec!["sparse-checkout", "set"];
        args.extend(patterns.iter().map(String::as_str));
        self.run(&args, &self.submodule_dir(path))?;
        Ok(())
    }

    fn list_patterns(&self, path: &Path) -> Result<BTreeSet<String>> {
        let stdout = self.run(&["sparse-checkout", "list"], &self.submodule_dir(path))?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn sparse_enabled(&self, path: &Path) -> bool {
        self.run(&["sparse-checkout", "list"], &self.submodule_dir(path))
            .is_ok()
    }

    fn is_dirty(&self, path: &Path) -> Result<bool> {
        let dir = self.submodule_dir(path);
        if !dir.exists() {
            return Ok(false);
        }
        let stdout = self.run(&["status", "--porcelain"], &dir)?;
        Ok(!stdout.trim().is_empty())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut args = vec!["add".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|p| p.display().to_string()));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_root(&args)?;
        Ok(())
    }
}

/// Parse `git version X.Y.Z ...` into `(X, Y)`.
pub fn parse_git_version(stdout: &str) -> Option<(u32, u32)> {
    let version = stdout.split_whitespace().nth(2)?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

/// Whether a parsed version supports cone-mode sparse-checkout.
pub fn supports_cone_mode(version: (u32, u32)) -> bool {
    version >= MIN_GIT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_line() {
        assert_eq!(parse_git_version("git version 2.39.2\n"), Some((2, 39)));
        assert_eq!(
            parse_git_version("git version 2.49.0.windows.1"),
            Some((2, 49))
        );
        assert_eq!(parse_git_version("nonsense"), None);
    }

    #[test]
    fn cone_mode_floor() {
        assert!(supports_cone_mode((2, 25)));
        assert!(supports_cone_mode((3, 0)));
        assert!(!supports_cone_mode((2, 24)));
        assert!(!supports_cone_mode((1, 9)));
    }
}
