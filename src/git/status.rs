//! Change detection and staged-diff extraction
//!
//! The change detector answers one question per repository path: is there
//! anything worth acting on. The staged-diff snapshot feeds both the scanner
//! (paths and added lines) and the commit message synthesis.

use anyhow::{Context, Result};
use git2::{Delta, DiffOptions, StatusOptions};

use super::GitRepo;
use std::path::Path;

/// Outcome of inspecting one repository path for pending work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    /// Not a git work tree; skip silently
    NotARepo,
    /// A repository with nothing staged, modified, or untracked
    Clean,
    /// A repository with at least one pending change
    Dirty,
}

/// One added line of the staged diff
#[derive(Debug, Clone)]
pub struct AddedLine {
    /// Path relative to the work tree root
    pub path: String,
    /// 1-based line number on the new side of the diff
    pub line_number: u32,
    /// Line content without the trailing newline
    pub content: String,
}

/// Snapshot of the staged diff, derived fresh on every run
#[derive(Debug, Default)]
pub struct StagedChanges {
    /// Every path touched by the staged diff, deletions included
    pub paths: Vec<String>,
    /// Paths that still exist on the index side (deletions excluded);
    /// removing a dangerous file must not block the commit doing the removal
    pub scan_paths: Vec<String>,
    /// Added lines only; context and removed lines never reach the scanner
    pub added_lines: Vec<AddedLine>,
}

impl GitRepo {
    /// Classify the repository at `path`. Read-only, and never an error: a
    /// missing or invalid path is a normal no-op.
    pub fn state_of<P: AsRef<Path>>(path: P) -> RepoState {
        let Some(repo) = Self::open_if_repo(path) else {
            return RepoState::NotARepo;
        };
        match repo.has_changes() {
            Ok(true) => RepoState::Dirty,
            Ok(false) => RepoState::Clean,
            Err(err) => {
                tracing::warn!("failed to read repository status: {err:#}");
                RepoState::Clean
            }
        }
    }

    /// Any staged, unstaged, or untracked modification worth acting on
    pub fn has_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("failed to get repository status")?;

        Ok(!statuses.is_empty())
    }

    /// Collect the staged diff: changed paths and added lines, relative to
    /// HEAD (or the empty tree on an unborn HEAD).
    pub fn staged_changes(&self) -> Result<StagedChanges> {
        let head_tree = self.repo.head().ok().and_then(|head| head.peel_to_tree().ok());
        let index = self.repo.index().context("failed to open the index")?;

        let mut opts = DiffOptions::new();
        // Added lines only; context lines must never trigger the scanner
        opts.context_lines(0);

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))
            .context("failed to diff HEAD against the index")?;

        let mut paths = Vec::new();
        let mut scan_paths = Vec::new();
        let mut added_lines = Vec::new();

        diff.foreach(
            &mut |delta, _progress| {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path());
                if let Some(path) = path {
                    let path = path.to_string_lossy().into_owned();
                    if delta.status() != Delta::Deleted {
                        scan_paths.push(path.clone());
                    }
                    paths.push(path);
                }
                true
            },
            None,
            None,
            Some(&mut |delta, _hunk, line| {
                if line.origin() == '+' {
                    if let Some(path) = delta.new_file().path() {
                        added_lines.push(AddedLine {
                            path: path.to_string_lossy().into_owned(),
                            line_number: line.new_lineno().unwrap_or(0),
                            content: String::from_utf8_lossy(line.content())
                                .trim_end()
                                .to_string(),
                        });
                    }
                }
                true
            }),
        )
        .context("failed to walk the staged diff")?;

        Ok(StagedChanges {
            paths,
            scan_paths,
            added_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn seed_commit(repo: &Repository) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "seed", &tree, &[]).unwrap();
    }

    #[test]
    fn missing_path_is_not_a_repo() {
        assert_eq!(
            GitRepo::state_of("/definitely/not/a/repo"),
            RepoState::NotARepo
        );
    }

    #[test]
    fn fresh_repo_is_clean_until_a_file_appears() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        assert_eq!(GitRepo::state_of(dir.path()), RepoState::Clean);

        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        assert_eq!(GitRepo::state_of(dir.path()), RepoState::Dirty);
    }

    #[test]
    fn committed_tree_is_clean_again() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        seed_commit(&raw);
        assert_eq!(GitRepo::state_of(dir.path()), RepoState::Clean);
    }

    #[test]
    fn staged_changes_reports_added_lines_only() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("config.txt"), "existing line\n").unwrap();
        seed_commit(&raw);

        // Only the appended line may surface as an addition
        fs::write(dir.path().join("config.txt"), "existing line\nnew line\n").unwrap();
        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        repo.stage_all().unwrap();

        let changes = repo.staged_changes().unwrap();
        assert_eq!(changes.paths, vec!["config.txt".to_string()]);
        assert_eq!(changes.scan_paths, vec!["config.txt".to_string()]);

        let lines: Vec<&str> = changes
            .added_lines
            .iter()
            .map(|line| line.content.as_str())
            .collect();
        assert_eq!(lines, vec!["new line"]);
    }

    #[test]
    fn staged_deletion_is_listed_but_not_scannable() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("old.txt"), "goodbye\n").unwrap();
        seed_commit(&raw);

        fs::remove_file(dir.path().join("old.txt")).unwrap();
        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        repo.stage_all().unwrap();

        let changes = repo.staged_changes().unwrap();
        assert_eq!(changes.paths, vec!["old.txt".to_string()]);
        assert!(changes.scan_paths.is_empty());
        assert!(changes.added_lines.is_empty());
    }

    #[test]
    fn unborn_head_diffs_against_the_empty_tree() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "first\n").unwrap();

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        repo.stage_all().unwrap();

        let changes = repo.staged_changes().unwrap();
        assert_eq!(changes.paths, vec!["a.txt".to_string()]);
        assert_eq!(changes.added_lines.len(), 1);
        assert_eq!(changes.added_lines[0].content, "first");
    }
}
