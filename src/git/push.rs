//! Remote sync
//!
//! Pushing shells out to the git binary so the user's credential helpers and
//! askpass configuration keep working. A bounded timeout keeps a hung remote
//! from wedging the whole invocation; one attempt, no retries: a transient
//! failure degrades to a local-only commit.

use anyhow::Result;
use std::process::{Command, Output as ProcessOutput, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::GitRepo;

/// Terminal outcome of one push attempt
#[derive(Debug)]
pub enum PushOutcome {
    /// The remote accepted the branch
    Pushed,
    /// No remote of the configured name; nothing was attempted
    NoRemote,
    /// The push was attempted and failed or timed out
    Failed(String),
}

impl GitRepo {
    /// Whether a remote of this name is configured
    pub fn has_remote(&self, name: &str) -> bool {
        self.repo.find_remote(name).is_ok()
    }

    /// Push `branch` to `remote`, waiting at most `timeout_secs`
    pub fn push(&self, remote: &str, branch: &str, timeout_secs: u64) -> Result<PushOutcome> {
        if !self.has_remote(remote) {
            return Ok(PushOutcome::NoRemote);
        }

        let workdir = self.workdir()?.to_path_buf();
        let mut cmd = Command::new("git");
        cmd.args(["push", remote, branch])
            .current_dir(workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match run_with_timeout(cmd, timeout_secs) {
            Ok(out) if out.status.success() => Ok(PushOutcome::Pushed),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                Ok(PushOutcome::Failed(first_line(&stderr)))
            }
            Err(err) => Ok(PushOutcome::Failed(err.to_string())),
        }
    }
}

/// Run a command, giving up after `timeout_secs`. The child is waited on in a
/// helper thread so the timeout applies to the whole round trip.
fn run_with_timeout(mut cmd: Command, timeout_secs: u64) -> std::io::Result<ProcessOutput> {
    let child = cmd.spawn()?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });
    match rx.recv_timeout(Duration::from_secs(timeout_secs)) {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("push timed out after {timeout_secs}s"),
        )),
    }
}

/// First stderr line, enough for a one-line status report
fn first_line(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or("push failed")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use tempfile::TempDir;

    #[test]
    fn missing_remote_reports_no_remote_without_attempting() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();

        let repo = GitRepo::open_if_repo(dir.path()).unwrap();
        assert!(!repo.has_remote("origin"));
        assert!(matches!(
            repo.push("origin", "main", 5).unwrap(),
            PushOutcome::NoRemote
        ));
    }

    #[test]
    fn first_line_trims_and_falls_back() {
        assert_eq!(first_line("fatal: repository not found\nmore\n"), "fatal: repository not found");
        assert_eq!(first_line(""), "push failed");
    }
}
