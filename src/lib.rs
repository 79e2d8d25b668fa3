//! skillsctl - declarative skills management over a sparse-checkout submodule.
//!
//! A project declares the skill IDs it wants in a manifest; skillsctl keeps a
//! thin, sparse-checked-out copy of the shared skills repository in sync with
//! that declaration. The reconciler works over three snapshots: the manifest
//! (declared intent), the sparse-checkout pattern set (materialized state),
//! and the live working tree (ground truth).

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod patterns;
pub mod reconciler;
pub mod search;
pub mod utils;
pub mod vcs;
pub mod worktree;

pub use error::{Result, SkillsError};
