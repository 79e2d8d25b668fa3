//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use std::process::ExitCode;

use clap::Subcommand;

pub mod catalog;
pub mod doctor;
pub mod install;
pub mod remove;
pub mod set;
pub mod status;
pub mod suggest;
pub mod sync;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every skill available in the catalog
    Catalog(catalog::CatalogArgs),

    /// Rank catalog skills against a free-text query
    Suggest(suggest::SuggestArgs),

    /// Add skills to the manifest and materialize them
    Install(install::InstallArgs),

    /// Remove skills from the manifest and the working tree
    Remove(remove::RemoveArgs),

    /// Replace the declared skill set wholesale
    Set(set::SetArgs),

    /// Reapply the manifest to the working tree (recovery after checkout)
    Sync(sync::SyncArgs),

    /// Show declared state, working-tree state, and drift
    Status(status::StatusArgs),

    /// Health checks for git, config, catalog, and manifest
    Doctor(doctor::DoctorArgs),
}

/// Dispatch a command to its handler.
pub fn run(ctx: &AppContext, command: &Commands) -> Result<ExitCode> {
    match command {
        Commands::Catalog(args) => catalog::run(ctx, args),
        Commands::Suggest(args) => suggest::run(ctx, args),
        Commands::Install(args) => install::run(ctx, args),
        Commands::Remove(args) => remove::run(ctx, args),
        Commands::Set(args) => set::run(ctx, args),
        Commands::Sync(args) => sync::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
        Commands::Doctor(args) => doctor::run(ctx, args),
    }
}
