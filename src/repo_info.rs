//! Best-effort branch and commit lookup through the `git` binary.

use std::{path::Path, time::Duration};

use tokio::{process::Command, time::timeout};
use tracing::debug;

/// Upper bound for a single `git` invocation.
const GIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Branch and short commit of the served repository. Empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoInfo {
    pub branch: String,
    pub commit: String,
}

impl RepoInfo {
    /// Queries `git` in `repo_root`. Any failure (no git, not a repository,
    /// timeout) leaves the corresponding field empty.
    pub async fn lookup(repo_root: &Path) -> Self {
        let (branch, commit) = tokio::join!(
            git_output(repo_root, &["rev-parse", "--abbrev-ref", "HEAD"]),
            git_output(repo_root, &["rev-parse", "--short", "HEAD"]),
        );
        Self {
            branch: branch.unwrap_or_default(),
            commit: commit.unwrap_or_default(),
        }
    }
}

async fn git_output(repo_root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .kill_on_drop(true)
        .output();

    let output = match timeout(GIT_TIMEOUT, output).await {
        Ok(Ok(output)) if output.status.success() => output,
        Ok(Ok(output)) => {
            debug!("git {:?} exited with {}", args, output.status);
            return None;
        }
        Ok(Err(e)) => {
            debug!("Failed to run git {:?}: {}", args, e);
            return None;
        }
        Err(_) => {
            debug!("git {:?} timed out", args);
            return None;
        }
    };

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
