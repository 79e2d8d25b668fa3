//! skillsctl install - Add skills to the manifest and materialize them

use std::process::ExitCode;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::confirm;
use crate::cli::output::{self, OutputFormat};
use crate::error::Result;
use crate::reconciler::{ApplyOptions, Reconciler};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Skill IDs to install
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Stage .gitmodules, the skills directory, and the manifest afterwards
    #[arg(long)]
    pub stage: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Proceed even if the skills working tree has uncommitted changes
    #[arg(long)]
    pub allow_dirty: bool,
}

pub fn run(ctx: &AppContext, args: &InstallArgs) -> Result<ExitCode> {
    let config = ctx.require_config()?;

    if ctx.output_format == OutputFormat::Human && !args.yes {
        println!("Skills to install:");
        for id in &args.ids {
            println!("  + {id}");
        }
        if !confirm("\nProceed?")? {
            println!("Aborted.");
            return Ok(ExitCode::FAILURE);
        }
    }

    let vcs = ctx.vcs();
    let reconciler = Reconciler::new(&ctx.project_root, config, &vcs);
    let outcome = reconciler.install(
        &args.ids,
        ApplyOptions {
            allow_dirty: args.allow_dirty,
            stage: args.stage,
        },
    )?;

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&outcome, outcome.warnings.clone()),
        OutputFormat::Human => {
            for warning in &outcome.warnings {
                println!("{} {warning}", style("warning:").yellow());
            }
            if outcome.added.is_empty() {
                println!("Nothing to install.");
            } else {
                println!(
                    "{} Installed {} skill(s)",
                    style("✓").green(),
                    outcome.added.len()
                );
                for id in &outcome.added {
                    println!("  + {id}");
                }
            }
            if args.stage && outcome.changed {
                println!("{} Changes staged", style("✓").green());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
