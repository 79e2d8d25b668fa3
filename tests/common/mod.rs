//! Common test utilities shared across integration tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use skillsctl::config::Config;
use skillsctl::error::{Result, SkillsError};
use skillsctl::vcs::Vcs;

/// Mutable state behind the fake collaborator.
#[derive(Debug, Default)]
pub struct FakeState {
    pub registered: bool,
    pub sparse: bool,
    pub dirty: bool,
    pub patterns: BTreeSet<String>,
    pub staged: Vec<PathBuf>,
    pub set_pattern_calls: usize,
    pub fail_set_patterns: bool,
}

/// In-memory stand-in for the git collaborator. Records every state change
/// so tests can assert on exactly what the reconciler did.
pub struct FakeVcs {
    pub state: RefCell<FakeState>,
    pub version: (u32, u32),
}

impl FakeVcs {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(FakeState::default()),
            version: (2, 39),
        }
    }

    /// A fake with the submodule already set up and clean.
    pub fn initialized() -> Self {
        let fake = Self::new();
        {
            let mut state = fake.state.borrow_mut();
            state.registered = true;
            state.sparse = true;
            state.patterns.insert("catalog".to_string());
        }
        fake
    }
}

impl Vcs for FakeVcs {
    fn version(&self) -> Result<(u32, u32)> {
        Ok(self.version)
    }

    fn is_repo(&self) -> bool {
        true
    }

    fn submodule_present(&self, _path: &Path) -> bool {
        self.state.borrow().registered
    }

    fn add_submodule(&self, _url: &str, _branch: &str, _path: &Path) -> Result<()> {
        self.state.borrow_mut().registered = true;
        Ok(())
    }

    fn init_submodule(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn sparse_init(&self, _path: &Path) -> Result<()> {
        self.state.borrow_mut().sparse = true;
        Ok(())
    }

    fn set_patterns(&self, _path: &Path, patterns: &BTreeSet<String>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.set_pattern_calls += 1;
        if state.fail_set_patterns {
            return Err(SkillsError::VcsCommand {
                command: "sparse-checkout set".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }
        state.patterns = patterns.clone();
        Ok(())
    }

    fn list_patterns(&self, _path: &Path) -> Result<BTreeSet<String>> {
        Ok(self.state.borrow().patterns.clone())
    }

    fn sparse_enabled(&self, _path: &Path) -> bool {
        self.state.borrow().sparse
    }

    fn is_dirty(&self, _path: &Path) -> Result<bool> {
        Ok(self.state.borrow().dirty)
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.state.borrow_mut().staged.extend(paths.iter().cloned());
        Ok(())
    }
}

/// Test config pointing at the default in-project locations.
pub fn test_config() -> Config {
    Config {
        repo_url: "https://example.com/skills.git".to_string(),
        branch: "main".to_string(),
        skills_dir: PathBuf::from(".claude/skills"),
        manifest_path: PathBuf::from(".claude/skills.manifest"),
    }
}

pub const CATALOG_JSON: &str = r#"[
  {
    "id": "pdf-tools",
    "title": "PDF Tools",
    "description": "Work with PDF files",
    "tags": ["pdf", "doc"],
    "path": "skills/pdf-tools"
  },
  {
    "id": "markdown-helper",
    "title": "Markdown Helper",
    "description": "Edit markdown",
    "tags": ["md"],
    "path": "skills/markdown-helper"
  }
]
"#;

/// Lay the catalog file down where a checked-out submodule would have it.
pub fn write_catalog(project_root: &Path) {
    let path = project_root.join(".claude/skills/catalog/skills.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, CATALOG_JSON).unwrap();
}
