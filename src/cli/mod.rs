//! Command-line interface.
//!
//! Flag parsing and output formatting live here; everything below this
//! boundary takes resolved values (config, options) rather than reading
//! flags or the environment.

pub mod commands;
pub mod output;

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub use commands::Commands;
pub use output::OutputFormat;

use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "skillsctl",
    version,
    about = "Declarative management of shared skills via a sparse-checkout submodule"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON on stdout (and JSON logs on stderr)
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root to operate in (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Interactive yes/no prompt. Returns false on anything but `y`/`yes`.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
