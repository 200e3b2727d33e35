// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `GitCliService`: the real `GitService`, shelling out to the `git`
//! binary via `tokio::process::Command` (spec §4.A / §6).

use std::path::{Path, PathBuf};

use archon_core::config::{GIT_LOCAL_TIMEOUT, GIT_NETWORK_TIMEOUT};
use async_trait::async_trait;
use tokio::process::Command;

use crate::error::GitError;
use crate::service::{GitService, WorktreeInfo};
use crate::subprocess::run_with_timeout;

/// Shells out to `git`, scrubbing `GIT_DIR`/`GIT_WORK_TREE` from the
/// environment so `-C <repo>` always wins (mirrors the daemon's worktree
/// filesystem helper).
pub struct GitCliService;

impl GitCliService {
    pub fn new() -> Self {
        Self
    }

    fn git(repo: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(repo).env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
        cmd
    }

    /// Fork-PR-safe path: fetch the exact SHA via GitHub's `pull/<n>/head`
    /// ref (never an origin branch, which a fork PR wouldn't have), add a
    /// worktree at that SHA, then name the branch inside it.
    async fn create_pr_worktree_from_sha(
        &self,
        repo: &Path,
        n: &str,
        sha: &str,
        path: &Path,
    ) -> Result<PathBuf, GitError> {
        let mut fetch = Self::git(repo);
        fetch.args(["fetch", "origin", &format!("pull/{n}/head")]);
        let fetch_output = run_with_timeout(fetch, GIT_NETWORK_TIMEOUT, "git fetch pull ref").await?;
        if !fetch_output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git fetch pull ref".to_string(),
                stderr: String::from_utf8_lossy(&fetch_output.stderr).trim().to_string(),
            });
        }

        let mut add = Self::git(repo);
        add.args(["worktree", "add"]).arg(path).arg(sha);
        let add_output = run_with_timeout(add, GIT_NETWORK_TIMEOUT, "git worktree add").await?;
        if !add_output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git worktree add".to_string(),
                stderr: String::from_utf8_lossy(&add_output.stderr).trim().to_string(),
            });
        }

        let branch = format!("pr-{n}-review");
        let mut checkout = Self::git(path);
        checkout.args(["checkout", "-b", &branch]).arg(sha);
        let checkout_output = run_with_timeout(checkout, GIT_LOCAL_TIMEOUT, "git checkout -b").await?;
        if !checkout_output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git checkout -b".to_string(),
                stderr: String::from_utf8_lossy(&checkout_output.stderr).trim().to_string(),
            });
        }
        Ok(path.to_path_buf())
    }

    /// Same-repo-branch path (no SHA pinning): fetch straight into a local
    /// review branch, then worktree-add that branch.
    async fn create_pr_worktree_from_branch(
        &self,
        repo: &Path,
        n: &str,
        _pr_branch: &str,
        path: &Path,
    ) -> Result<PathBuf, GitError> {
        let review_branch = format!("pr-{n}-review");
        let mut fetch = Self::git(repo);
        fetch.args(["fetch", "origin", &format!("pull/{n}/head:{review_branch}")]);
        let fetch_output = run_with_timeout(fetch, GIT_NETWORK_TIMEOUT, "git fetch pull ref").await?;
        if !fetch_output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git fetch pull ref".to_string(),
                stderr: String::from_utf8_lossy(&fetch_output.stderr).trim().to_string(),
            });
        }

        let mut add = Self::git(repo);
        add.args(["worktree", "add"]).arg(path).arg(&review_branch);
        let add_output = run_with_timeout(add, GIT_NETWORK_TIMEOUT, "git worktree add").await?;
        if !add_output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git worktree add".to_string(),
                stderr: String::from_utf8_lossy(&add_output.stderr).trim().to_string(),
            });
        }
        Ok(path.to_path_buf())
    }

    async fn create_issue_worktree(&self, repo: &Path, n: &str, path: &Path) -> Result<PathBuf, GitError> {
        let branch = format!("issue-{n}");
        let mut cmd = Self::git(repo);
        cmd.args(["worktree", "add", "-b", &branch]).arg(path);
        let output = run_with_timeout(cmd, GIT_NETWORK_TIMEOUT, "git worktree add").await?;
        if output.status.success() {
            return Ok(path.to_path_buf());
        }

        // Branch already exists: retry without -b to reuse it.
        let mut retry = Self::git(repo);
        retry.args(["worktree", "add"]).arg(path).arg(&branch);
        let retry_output = run_with_timeout(retry, GIT_NETWORK_TIMEOUT, "git worktree add (reuse)").await?;
        if retry_output.status.success() {
            return Ok(path.to_path_buf());
        }
        Err(GitError::CommandFailed {
            label: "git worktree add".to_string(),
            stderr: String::from_utf8_lossy(&retry_output.stderr).trim().to_string(),
        })
    }
}

impl Default for GitCliService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitService for GitCliService {
    async fn worktree_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeInfo>, GitError> {
        let mut cmd = Self::git(repo);
        cmd.args(["worktree", "list", "--porcelain"]);
        let output = run_with_timeout(cmd, GIT_LOCAL_TIMEOUT, "git worktree list").await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git worktree list".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_worktree_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn find_worktree_by_branch(
        &self,
        repo: &Path,
        branch: &str,
    ) -> Result<Option<PathBuf>, GitError> {
        let worktrees = self.list_worktrees(repo).await?;
        Ok(worktrees.into_iter().find(|w| w.branch == branch).map(|w| w.path))
    }

    async fn create_worktree_for_issue(
        &self,
        repo: &Path,
        n: &str,
        is_pr: bool,
        pr_branch: Option<&str>,
        pr_sha: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf, GitError> {
        if is_pr {
            if let Some(sha) = pr_sha {
                return self.create_pr_worktree_from_sha(repo, n, sha, path).await;
            }
            if let Some(branch) = pr_branch {
                return self.create_pr_worktree_from_branch(repo, n, branch, path).await;
            }
        }
        self.create_issue_worktree(repo, n, path).await
    }

    async fn remove_worktree(&self, repo: &Path, path: &Path) -> Result<(), GitError> {
        let mut cmd = Self::git(repo);
        cmd.args(["worktree", "remove", "--force"]).arg(path);
        let output = run_with_timeout(cmd, GIT_NETWORK_TIMEOUT, "git worktree remove").await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                label: "git worktree remove".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn get_canonical_repo_path(&self, path: &Path) -> Option<PathBuf> {
        let dot_git = path.join(".git");
        let contents = std::fs::read_to_string(&dot_git).ok()?;
        let gitdir = contents.trim().strip_prefix("gitdir: ")?;
        // gitdir points at <repo>/.git/worktrees/<name>; strip that suffix.
        Path::new(gitdir).parent()?.parent()?.parent().map(Path::to_path_buf)
    }

    fn is_worktree_path(&self, path: &Path) -> bool {
        let dot_git = path.join(".git");
        std::fs::symlink_metadata(&dot_git).map(|m| m.is_file()).unwrap_or(false)
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> bool {
        let mut cmd = Self::git(path);
        cmd.args(["status", "--porcelain"]);
        match run_with_timeout(cmd, GIT_LOCAL_TIMEOUT, "git status").await {
            Ok(output) if output.status.success() => !output.stdout.is_empty(),
            Ok(_) => true,
            Err(GitError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => false,
            Err(_) => true,
        }
    }

    async fn commit_all_changes(&self, path: &Path, message: &str) -> bool {
        let mut add = Self::git(path);
        add.args(["add", "-A"]);
        let added = run_with_timeout(add, GIT_LOCAL_TIMEOUT, "git add")
            .await
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !added {
            return false;
        }

        let mut commit = Self::git(path);
        commit.args(["commit", "-m", message]);
        run_with_timeout(commit, GIT_LOCAL_TIMEOUT, "git commit")
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

fn parse_worktree_list(porcelain: &str) -> Vec<WorktreeInfo> {
    let mut out = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut branch: Option<String> = None;
    for line in porcelain.lines() {
        if let Some(p) = line.strip_prefix("worktree ") {
            if let (Some(path), Some(branch)) = (path.take(), branch.take()) {
                out.push(WorktreeInfo { path, branch });
            }
            path = Some(PathBuf::from(p));
        } else if let Some(b) = line.strip_prefix("branch ") {
            branch = Some(b.trim_start_matches("refs/heads/").to_string());
        } else if line.is_empty() {
            if let (Some(p), Some(b)) = (path.take(), branch.take()) {
                out.push(WorktreeInfo { path: p, branch: b });
            }
        }
    }
    if let (Some(p), Some(b)) = (path, branch) {
        out.push(WorktreeInfo { path: p, branch: b });
    }
    out
}

#[cfg(test)]
#[path = "cli_service_tests.rs"]
mod tests;
