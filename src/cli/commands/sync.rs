//! Sync command implementation
//!
//! Session-end mode: runs the full pipeline over the ordered target list
//! (workspace first, then the shared configuration repository).

use crate::cli::Output;
use crate::config::SyncConfig;
use crate::sync::run_targets;
use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

/// Execute the sync command
pub fn execute(workspace: Option<PathBuf>, output: &Output) -> Result<ExitCode> {
    let config = SyncConfig::load()?;
    let targets = config.targets(workspace);

    let outcomes = run_targets(&targets, &config, output);

    // Only a scanner block is a hard failure for the caller; everything else
    // degrades to a benign no-op or a partial success.
    if outcomes.iter().any(|outcome| outcome.status.is_blocked()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
