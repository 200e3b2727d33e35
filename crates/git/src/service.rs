// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `GitService`: the collaborator contract the engine's `IsolationResolver`
//! and `ArtifactSync` are written against (spec §6). Method names mirror
//! the spec's interface list exactly so a reviewer can check this trait
//! off against it line by line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::GitError;

/// One entry from `GitService::list_worktrees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub branch: String,
}

#[async_trait]
pub trait GitService: Send + Sync {
    async fn worktree_exists(&self, path: &Path) -> bool;

    async fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeInfo>, GitError>;

    async fn find_worktree_by_branch(
        &self,
        repo: &Path,
        branch: &str,
    ) -> Result<Option<PathBuf>, GitError>;

    /// Create a worktree at `path` for workflow identifier `n` (spec §4.C
    /// PR-worktree creation semantics):
    ///
    /// - `pr_sha` given: `git fetch origin pull/<n>/head`, `git worktree add
    ///   <path> <sha>`, then `git checkout -b pr-<n>-review <sha>` inside
    ///   the worktree. Reproducible and handles fork PRs via GitHub's
    ///   `pull/<n>/head` ref.
    /// - only `pr_branch` given: `git fetch origin pull/<n>/head:pr-<n>-
    ///   review`, then `git worktree add <path> pr-<n>-review`.
    /// - neither given (issue-style workflow): `git worktree add <path> -b
    ///   issue-<n>`, retrying without `-b` to reuse the branch if it
    ///   already exists.
    async fn create_worktree_for_issue(
        &self,
        repo: &Path,
        n: &str,
        is_pr: bool,
        pr_branch: Option<&str>,
        pr_sha: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf, GitError>;

    async fn remove_worktree(&self, repo: &Path, path: &Path) -> Result<(), GitError>;

    /// Resolve the canonical repo root from a worktree path by parsing its
    /// `.git` file's `gitdir:` target and stripping the
    /// `/.git/worktrees/<name>` suffix. `None` if `path` isn't a worktree.
    fn get_canonical_repo_path(&self, path: &Path) -> Option<PathBuf>;

    /// True if `path`'s `.git` entry is a regular file starting with
    /// `gitdir:` (a worktree), as opposed to a `.git` directory (a
    /// canonical clone).
    fn is_worktree_path(&self, path: &Path) -> bool;

    /// Fail-safe: returns `true` on any unexpected error (permission
    /// denied, not a repo, …) so callers never mistake "couldn't tell" for
    /// "clean". Only a confirmed-missing path (`ENOENT`) returns `false`.
    async fn has_uncommitted_changes(&self, path: &Path) -> bool;

    async fn commit_all_changes(&self, path: &Path, message: &str) -> bool;
}
