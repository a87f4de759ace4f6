//! Multi-repository sync pipeline
//!
//! Drives change detection, scanning, commit, and push over an ordered list
//! of repository targets. Targets are processed strictly one after another,
//! and failures are isolated: a block or error in one target never prevents
//! processing of the next. The outcome list is the only state shared between
//! targets.

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::SyncConfig;
use crate::git::{GitRepo, PushOutcome, RepoState, synthesize_message};
use crate::scanner::{ScanVerdict, SecretScanner};

/// One version-controlled directory to process. Immutable for the lifetime
/// of an invocation.
#[derive(Debug, Clone)]
pub struct RepositoryTarget {
    pub path: PathBuf,
    pub label: String,
    /// Guarded targets always route through the secret scanner before a
    /// commit is created
    pub guarded: bool,
}

impl RepositoryTarget {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>, guarded: bool) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            guarded,
        }
    }
}

/// Why a target was skipped without a commit. All of these are benign and
/// reported only at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotARepo,
    Clean,
    /// Detached or unborn HEAD; automatic commits need a named branch
    NoBranch,
    /// Staging produced a tree identical to HEAD
    NothingStaged,
}

/// Why a commit stayed local
#[derive(Debug, Clone)]
pub enum LocalReason {
    NoRemote,
    PushFailed(String),
}

/// Terminal status of one target's pipeline run
#[derive(Debug)]
pub enum SyncStatus {
    /// Committed and pushed to the remote
    Pushed {
        branch: String,
        remote: String,
        files: usize,
    },
    /// Committed, but the commit stayed local
    LocalOnly { reason: LocalReason, files: usize },
    /// The scanner refused the commit; nothing was committed
    Blocked(ScanVerdict),
    /// Nothing to do for this target
    Skipped(SkipReason),
    /// The pipeline failed mid-flight; later targets are unaffected
    Error(String),
}

impl SyncStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SyncStatus::Blocked(_))
    }
}

/// Status plus the label it is reported under
#[derive(Debug)]
pub struct SyncOutcome {
    pub label: String,
    pub status: SyncStatus,
}

/// Process every target in order, capturing each target's failure into its
/// own outcome.
pub fn run_targets(
    targets: &[RepositoryTarget],
    config: &SyncConfig,
    output: &Output,
) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        tracing::debug!(
            path = %target.path.display(),
            guarded = target.guarded,
            "processing target"
        );
        let status = match run_one(target, config) {
            Ok(status) => status,
            Err(err) => SyncStatus::Error(format!("{err:#}")),
        };
        report(target, &status, output);
        outcomes.push(SyncOutcome {
            label: target.label.clone(),
            status,
        });
    }
    outcomes
}

/// One target's pipeline: detect, stage, scan if guarded, commit, push
fn run_one(target: &RepositoryTarget, config: &SyncConfig) -> Result<SyncStatus> {
    match GitRepo::state_of(&target.path) {
        RepoState::NotARepo => return Ok(SyncStatus::Skipped(SkipReason::NotARepo)),
        RepoState::Clean => return Ok(SyncStatus::Skipped(SkipReason::Clean)),
        RepoState::Dirty => {}
    }
    let Some(repo) = GitRepo::open_if_repo(&target.path) else {
        return Ok(SyncStatus::Skipped(SkipReason::NotARepo));
    };
    let Some(branch) = repo.current_branch() else {
        return Ok(SyncStatus::Skipped(SkipReason::NoBranch));
    };

    repo.stage_all()?;
    if repo.nothing_staged()? {
        return Ok(SyncStatus::Skipped(SkipReason::NothingStaged));
    }
    let changes = repo.staged_changes()?;

    // The verdict is never cached: staged content changes every call
    if target.guarded {
        let scanner = SecretScanner::new(config)?;
        let verdict = scanner.scan(&changes.scan_paths, &changes.added_lines);
        if verdict.blocked() {
            return Ok(SyncStatus::Blocked(verdict));
        }
    }

    let message = synthesize_message(&changes.paths);
    let record = repo.commit(&branch, &message, changes.paths)?;

    let status = match repo.push(&config.remote, &record.branch, config.push_timeout_secs)? {
        PushOutcome::Pushed => SyncStatus::Pushed {
            branch: record.branch,
            remote: config.remote.clone(),
            files: record.files.len(),
        },
        PushOutcome::NoRemote => SyncStatus::LocalOnly {
            reason: LocalReason::NoRemote,
            files: record.files.len(),
        },
        PushOutcome::Failed(why) => SyncStatus::LocalOnly {
            reason: LocalReason::PushFailed(why),
            files: record.files.len(),
        },
    };
    Ok(status)
}

/// Render one status line per non-silent outcome
fn report(target: &RepositoryTarget, status: &SyncStatus, output: &Output) {
    match status {
        SyncStatus::Pushed {
            branch,
            remote,
            files,
        } => {
            output.success(&format!(
                "{}: pushed {} file(s) to {}/{} (run 'git pull' in other checkouts)",
                target.label, files, remote, branch
            ));
        }
        SyncStatus::LocalOnly {
            reason: LocalReason::NoRemote,
            files,
        } => {
            output.info(&format!(
                "{}: committed {} file(s) locally (no remote configured)",
                target.label, files
            ));
        }
        SyncStatus::LocalOnly {
            reason: LocalReason::PushFailed(why),
            files,
        } => {
            output.warning(&format!(
                "{}: committed {} file(s) locally, push failed: {}",
                target.label, files, why
            ));
        }
        SyncStatus::Blocked(verdict) => {
            output.error(&format!(
                "{}: commit blocked, {} potential secret(s) staged",
                target.label,
                verdict.matches.len()
            ));
            for rule_match in &verdict.matches {
                output.indent(&rule_match.to_string());
            }
        }
        SyncStatus::Skipped(reason) => {
            tracing::debug!(label = %target.label, ?reason, "target skipped");
        }
        SyncStatus::Error(err) => {
            output.error(&format!("{}: sync failed: {}", target.label, err));
        }
    }
}
