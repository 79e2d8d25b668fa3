//! skillsctl catalog - List every skill in the catalog

use std::process::ExitCode;

use clap::Args;
use console::style;
use tracing::debug;

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::cli::output::{self, OutputFormat};
use crate::error::Result;
use crate::manifest::Manifest;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Only show skills matching this tag
    #[arg(long, short)]
    pub tag: Option<String>,
}

pub fn run(ctx: &AppContext, args: &CatalogArgs) -> Result<ExitCode> {
    let config = ctx.require_config()?;
    let catalog = Catalog::load(&config.catalog_path(&ctx.project_root))?;
    let manifest = Manifest::load(&ctx.project_root.join(&config.manifest_path))?;

    let entries: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|skill| {
            args.tag
                .as_ref()
                .is_none_or(|tag| skill.tags.iter().any(|t| t == tag))
        })
        .collect();

    debug!(target: "catalog", count = entries.len(), "listing catalog");

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&entries, vec![]),
        OutputFormat::Human => {
            if entries.is_empty() {
                println!("No skills in catalog");
                return Ok(ExitCode::SUCCESS);
            }
            println!("Available skills ({}):", entries.len());
            for skill in &entries {
                let installed = if manifest.contains(&skill.id) {
                    style(" [installed]").green().to_string()
                } else {
                    String::new()
                };
                println!();
                println!(
                    "{} — {}{installed}",
                    style(&skill.id).bold(),
                    skill.title
                );
                if !skill.tags.is_empty() {
                    println!("  tags: {}", skill.tags.join(", "));
                }
                if !skill.summary().is_empty() {
                    println!("  {}", skill.summary());
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
