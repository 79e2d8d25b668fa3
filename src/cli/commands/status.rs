//! skillsctl status - Declared state, working-tree state, and drift

use std::process::ExitCode;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::{self, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::reconciler::Reconciler;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn run(ctx: &AppContext, _args: &StatusArgs) -> Result<ExitCode> {
    // status stays usable without a repo URL: fall back to the default
    // locations so the manifest and working tree can still be inspected.
    let fallback;
    let config = match &ctx.config {
        Some(config) => config,
        None => {
            fallback = Config {
                repo_url: String::new(),
                branch: "main".to_string(),
                skills_dir: ".claude/skills".into(),
                manifest_path: ".claude/skills.manifest".into(),
            };
            &fallback
        }
    };

    let vcs = ctx.vcs();
    let reconciler = Reconciler::new(&ctx.project_root, config, &vcs);
    let report = reconciler.status()?;

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&report, report.warnings.clone()),
        OutputFormat::Human => {
            println!("Declared skills ({}):", report.installed.len());
            if report.installed.is_empty() {
                println!("  (none)");
            }
            for id in &report.installed {
                println!("  - {id}");
            }

            println!();
            println!(
                "Submodule present: {}",
                yes_no(report.worktree.submodule_present)
            );
            println!(
                "Sparse-checkout:   {}",
                yes_no(report.worktree.sparse_enabled)
            );
            println!("Working tree dirty: {}", yes_no(report.worktree.dirty));

            for warning in &report.warnings {
                println!("{} {warning}", style("warning:").yellow());
            }

            if report.has_drift() {
                println!();
                println!("{}", style("Drift detected:").red().bold());
                for pattern in &report.missing_patterns {
                    println!("  missing pattern: {pattern}");
                }
                for pattern in &report.orphaned_patterns {
                    println!("  orphaned pattern: {pattern}");
                }
                for id in &report.dangling_ids {
                    println!("  dangling manifest id: {id}");
                }
                println!();
                println!("Run `skillsctl sync` to reconcile.");
            } else if report.warnings.is_empty() {
                println!();
                println!("{} No drift", style("✓").green());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
