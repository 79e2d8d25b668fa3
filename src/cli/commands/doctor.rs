//! skillsctl doctor - Health checks

use std::process::ExitCode;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::{self, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::reconciler::Reconciler;

#[derive(Args, Debug)]
pub struct DoctorArgs {}

pub fn run(ctx: &AppContext, _args: &DoctorArgs) -> Result<ExitCode> {
    let fallback;
    let (config, config_detail) = match &ctx.config {
        Some(config) => (config, format!("repo: {} ({})", config.repo_url, config.branch)),
        None => {
            fallback = Config {
                repo_url: String::new(),
                branch: "main".to_string(),
                skills_dir: ".claude/skills".into(),
                manifest_path: ".claude/skills.manifest".into(),
            };
            (
                &fallback,
                "no repository URL configured (set SKILLS_REPO_URL or \
                 .claude/skills.config.json)"
                    .to_string(),
            )
        }
    };

    let vcs = ctx.vcs();
    let reconciler = Reconciler::new(&ctx.project_root, config, &vcs);
    let mut report = reconciler.doctor();
    report.checks.insert(
        0,
        crate::reconciler::DoctorCheck {
            name: "configuration",
            passed: ctx.config.is_some(),
            detail: config_detail,
        },
    );

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&report, vec![]),
        OutputFormat::Human => {
            println!("skillsctl doctor");
            for check in &report.checks {
                let mark = if check.passed {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                println!("  {mark} {:<16} {}", check.name, check.detail);
            }
            println!();
            if report.ok() {
                println!("{} All checks passed", style("✓").green());
            } else {
                println!("{} Some checks failed", style("✗").red());
            }
        }
    }

    Ok(if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
