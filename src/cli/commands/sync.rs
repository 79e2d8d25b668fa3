//! skillsctl sync - Reapply the manifest to the working tree

use std::process::ExitCode;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::{self, OutputFormat};
use crate::error::Result;
use crate::reconciler::{ApplyOptions, Reconciler};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Stage the skills directory afterwards
    #[arg(long)]
    pub stage: bool,
}

pub fn run(ctx: &AppContext, args: &SyncArgs) -> Result<ExitCode> {
    let config = ctx.require_config()?;

    let vcs = ctx.vcs();
    let reconciler = Reconciler::new(&ctx.project_root, config, &vcs);
    let outcome = reconciler.sync(ApplyOptions {
        allow_dirty: false,
        stage: args.stage,
    })?;

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&outcome, outcome.warnings.clone()),
        OutputFormat::Human => {
            for warning in &outcome.warnings {
                println!("{} {warning}", style("warning:").yellow());
            }
            if outcome.changed {
                println!(
                    "{} Synced working tree to {} pattern(s)",
                    style("✓").green(),
                    outcome.patterns.len()
                );
            } else {
                println!("Already in sync.");
            }
            if args.stage && outcome.changed {
                println!("{} Changes staged", style("✓").green());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
