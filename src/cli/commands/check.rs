//! Check command implementation
//!
//! Pre-commit mode: the commit is already staged by the caller. Scan it and
//! exit non-zero on a match so the hook runner aborts the commit. Nothing is
//! staged or committed here.

use crate::cli::Output;
use crate::config::SyncConfig;
use crate::git::GitRepo;
use crate::scanner::SecretScanner;
use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

/// Execute the check command
pub fn execute(path: Option<PathBuf>, output: &Output) -> Result<ExitCode> {
    let repo = match &path {
        Some(path) => GitRepo::open_if_repo(path),
        None => GitRepo::discover(),
    };
    let Some(repo) = repo else {
        output.verbose("not inside a git repository, nothing to check");
        return Ok(ExitCode::SUCCESS);
    };

    let changes = repo.staged_changes()?;
    if changes.paths.is_empty() {
        output.verbose("nothing staged, nothing to check");
        return Ok(ExitCode::SUCCESS);
    }

    let config = SyncConfig::load()?;
    let scanner = SecretScanner::new(&config)?;
    let verdict = scanner.scan(&changes.scan_paths, &changes.added_lines);

    if verdict.blocked() {
        output.error(&format!(
            "commit blocked: {} potential secret(s) in staged changes",
            verdict.matches.len()
        ));
        for rule_match in &verdict.matches {
            output.indent(&rule_match.to_string());
        }
        return Ok(ExitCode::FAILURE);
    }

    output.success(&format!(
        "scanned {} staged file(s), no secrets found",
        changes.scan_paths.len()
    ));
    Ok(ExitCode::SUCCESS)
}
