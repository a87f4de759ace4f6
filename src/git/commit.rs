//! Staging and commit creation
//!
//! Commits go through git2 directly, which never executes filesystem commit
//! hooks; the guarded repository is protected by the in-process scanner
//! instead, and the workspace commits without any commit-time checks.

use anyhow::{Context, Result};
use git2::IndexAddOption;

use super::GitRepo;

/// Maximum number of paths spelled out in a synthesized commit message
const MESSAGE_PATH_CAP: usize = 10;

/// A commit created by the orchestrator. Durable history belongs to git once
/// this is handed to the reporter.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Branch the commit landed on
    pub branch: String,
    /// Synthesized commit message
    pub message: String,
    /// Paths included in the commit
    pub files: Vec<String>,
}

impl GitRepo {
    /// Stage every pending change: new, modified, and deleted paths alike.
    /// Ignored files are never picked up.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index().context("failed to open the index")?;
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .context("failed to stage untracked files")?;
        index
            .update_all(["*"], None)
            .context("failed to stage tracked changes")?;
        index.write().context("failed to write the index")?;
        Ok(())
    }

    /// True when the staged tree is identical to HEAD, i.e. a commit would be
    /// empty. Repeated invocations on an unchanged tree stop here.
    pub fn nothing_staged(&self) -> Result<bool> {
        let mut index = self.repo.index().context("failed to open the index")?;
        let staged = index
            .write_tree()
            .context("failed to write the staged tree")?;
        let head = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_tree().ok())
            .map(|tree| tree.id());
        Ok(head == Some(staged))
    }

    /// Create a commit of the staged tree on the current branch
    pub fn commit(&self, branch: &str, message: &str, files: Vec<String>) -> Result<CommitRecord> {
        // Fall back to a tool signature so automation never fails on a
        // missing user.name
        let sig = self
            .repo
            .signature()
            .or_else(|_| git2::Signature::now("syncguard", "syncguard@localhost"))
            .context("failed to build a commit signature")?;

        let mut index = self.repo.index().context("failed to open the index")?;
        let tree_id = index
            .write_tree()
            .context("failed to write the staged tree")?;
        let tree = self.repo.find_tree(tree_id).context("staged tree not found")?;

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        match &parent {
            Some(parent) => self
                .repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[parent]),
            None => self
                .repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[]),
        }
        .context("failed to create commit")?;

        Ok(CommitRecord {
            branch: branch.to_string(),
            message: message.to_string(),
            files,
        })
    }
}

/// Synthesize a commit message from the staged path list: first
/// `MESSAGE_PATH_CAP` paths comma-joined, with an explicit indicator when
/// truncated.
pub fn synthesize_message(paths: &[String]) -> String {
    if paths.is_empty() {
        return "chore: sync pending changes".to_string();
    }

    let shown: Vec<&str> = paths
        .iter()
        .take(MESSAGE_PATH_CAP)
        .map(String::as_str)
        .collect();
    let mut message = format!("chore: sync {}", shown.join(", "));

    let rest = paths.len().saturating_sub(MESSAGE_PATH_CAP);
    if rest > 0 {
        message.push_str(&format!(" (+{rest} more)"));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn message_lists_paths_comma_joined() {
        let paths = vec!["a.txt".to_string(), "src/b.rs".to_string()];
        assert_eq!(synthesize_message(&paths), "chore: sync a.txt, src/b.rs");
    }

    #[test]
    fn message_caps_path_list_with_indicator() {
        let paths: Vec<String> = (0..13).map(|i| format!("file{i}.txt")).collect();
        let message = synthesize_message(&paths);
        assert!(message.ends_with("(+3 more)"), "got: {message}");
        assert!(message.contains("file9.txt"));
        assert!(!message.contains("file10.txt"));
    }

    #[test]
    fn message_for_empty_list_is_still_valid() {
        assert_eq!(synthesize_message(&[]), "chore: sync pending changes");
    }

    #[test]
    fn commit_then_unchanged_tree_has_nothing_staged() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        repo.stage_all().unwrap();
        assert!(!repo.nothing_staged().unwrap());

        repo.commit("main", "chore: sync a.txt", vec!["a.txt".to_string()])
            .unwrap();
        assert!(repo.nothing_staged().unwrap());
    }

    #[test]
    fn second_stage_all_on_unchanged_tree_stays_empty() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        repo.stage_all().unwrap();
        repo.commit("main", "chore: sync a.txt", vec!["a.txt".to_string()])
            .unwrap();

        repo.stage_all().unwrap();
        assert!(repo.nothing_staged().unwrap());
    }
}
