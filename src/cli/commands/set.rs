//! skillsctl set - Replace the declared skill set wholesale

use std::process::ExitCode;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::confirm;
use crate::cli::output::{self, OutputFormat};
use crate::error::Result;
use crate::reconciler::{ApplyOptions, Reconciler};

#[derive(Args, Debug)]
pub struct SetArgs {
    /// The exact skill IDs the project should have
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

pub fn run(ctx: &AppContext, args: &SetArgs) -> Result<ExitCode> {
    let config = ctx.require_config()?;

    if ctx.output_format == OutputFormat::Human && !args.yes {
        println!("Declared skill set will become exactly:");
        for id in &args.ids {
            println!("  = {id}");
        }
        if !confirm("\nProceed?")? {
            println!("Aborted.");
            return Ok(ExitCode::FAILURE);
        }
    }

    let vcs = ctx.vcs();
    let reconciler = Reconciler::new(&ctx.project_root, config, &vcs);
    let outcome = reconciler.set(
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
            if !outcome.changed {
                println!("No changes needed.");
            } else {
                println!("{} Skill set updated", style("✓").green());
                for id in &outcome.added {
                    println!("  + {id}");
                }
                for id in &outcome.removed {
                    println!("  - {id}");
                }
            }
            if args.stage && outcome.changed {
                println!("{} Changes staged", style("✓").green());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
