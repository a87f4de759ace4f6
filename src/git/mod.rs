//! Git integration layer for Syncguard
//!
//! This module wraps git2 for repository inspection and commit creation.
//! Pushing shells out to the git binary (see `push`) so existing credential
//! helpers keep working.

use anyhow::{Context, Result};
use git2::Repository;
use std::path::Path;

mod commit;
mod push;
mod status;

pub use commit::{CommitRecord, synthesize_message};
pub use push::PushOutcome;
pub use status::{AddedLine, RepoState, StagedChanges};

/// Handle on one opened repository work tree
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository at `path`, returning `None` for anything that is
    /// not a git work tree. Absence of a repository is a normal no-op for
    /// every caller, never an error.
    pub fn open_if_repo<P: AsRef<Path>>(path: P) -> Option<Self> {
        let repo = Repository::open(path).ok()?;
        if repo.is_bare() {
            return None;
        }
        Some(Self { repo })
    }

    /// Discover and open the repository containing the current directory
    pub fn discover() -> Option<Self> {
        let repo = Repository::discover(".").ok()?;
        if repo.is_bare() {
            return None;
        }
        Some(Self { repo })
    }

    /// Get the current branch name, or `None` on a detached or unborn HEAD.
    /// Automatic commits only make sense on a named branch.
    pub fn current_branch(&self) -> Option<String> {
        if self.repo.head_detached().unwrap_or(false) {
            return None;
        }
        let head = self.repo.head().ok()?;
        head.shorthand().map(str::to_owned)
    }

    /// Get the working directory path
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("repository has no working directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn open_if_repo_returns_none_for_plain_directory() {
        let dir = TempDir::new().unwrap();
        assert!(GitRepo::open_if_repo(dir.path()).is_none());
    }

    #[test]
    fn unborn_head_has_no_branch() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        assert!(repo.current_branch().is_none());
    }

    #[test]
    fn named_branch_resolves_after_first_commit() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        seed_commit(&raw);

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        assert!(repo.current_branch().is_some());
    }

    #[test]
    fn detached_head_has_no_branch() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        seed_commit(&raw);

        let head = raw.head().unwrap().peel_to_commit().unwrap().id();
        raw.set_head_detached(head).unwrap();

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        assert!(repo.current_branch().is_none());
    }
}
