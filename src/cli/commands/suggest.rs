//! skillsctl suggest - Ranked search over the catalog

use std::process::ExitCode;

use clap::Args;
use console::style;
use tracing::debug;

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::cli::output::{self, OutputFormat};
use crate::error::Result;
use crate::search::{self, DEFAULT_SUGGEST_LIMIT};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Free-text query
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = DEFAULT_SUGGEST_LIMIT)]
    pub limit: usize,
}

pub fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<ExitCode> {
    let config = ctx.require_config()?;
    let catalog = Catalog::load(&config.catalog_path(&ctx.project_root))?;

    let hits = search::search(&args.query, &catalog, args.limit);
    debug!(target: "suggest", query = %args.query, hits = hits.len(), "search complete");

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&hits, vec![]),
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("No skills found matching '{}'", args.query);
                return Ok(ExitCode::SUCCESS);
            }
            println!("Skills matching '{}' ({} result(s)):", args.query, hits.len());
            for hit in &hits {
                println!();
                println!(
                    "{} — {} {}",
                    style(&hit.skill.id).bold(),
                    hit.skill.title,
                    style(format!("(score: {})", hit.score)).dim()
                );
                if !hit.skill.tags.is_empty() {
                    println!("  tags: {}", hit.skill.tags.join(", "));
                }
                if !hit.skill.summary().is_empty() {
                    println!("  {}", hit.skill.summary());
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
