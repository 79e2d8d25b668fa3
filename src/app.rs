use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Result, SkillsError};
use crate::vcs::GitCli;

/// Per-invocation context shared by all commands.
///
/// Config resolution happens exactly once, here; commands that need a
/// repository URL call `require_config`, read-only commands tolerate its
/// absence.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: Option<Config>,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = match &cli.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let config = Config::try_load(&project_root)?;

        Ok(Self {
            project_root,
            config,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }

    pub fn require_config(&self) -> Result<&Config> {
        self.config.as_ref().ok_or_else(|| {
            SkillsError::Config(
                "no skills repository URL configured; set SKILLS_REPO_URL or add \
                 \"repo_url\" to .claude/skills.config.json"
                    .to_string(),
            )
        })
    }

    pub fn vcs(&self) -> GitCli {
        GitCli::new(&self.project_root)
    }
}
