// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `IsolationProvider` (spec §4.B/§4.C): turns a resolved request for an
//! isolated working copy into an actual worktree, via `GitService`.
//! Path policy (`<base>/<owner>/<repo>/<branch>`) and branch naming live
//! here; the git mechanics live in `GitService::create_worktree_for_issue`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::GitError;
use crate::service::GitService;

/// Everything `IsolationResolver` step 5 needs to hand over to create a
/// worktree.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub canonical_repo_path: PathBuf,
    pub repository_url: String,
    pub worktree_base: PathBuf,
    pub is_pr: bool,
    /// Opaque workflow identifier (issue number, PR number, thread id, …).
    pub identifier: String,
    pub pr_branch: Option<String>,
    pub pr_sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedWorktree {
    pub working_path: PathBuf,
    pub branch_name: String,
}

pub struct IsolationProvider {
    git: Arc<dyn GitService>,
}

impl IsolationProvider {
    pub fn new(git: Arc<dyn GitService>) -> Self {
        Self { git }
    }

    pub async fn create(&self, req: CreateRequest) -> Result<CreatedWorktree, GitError> {
        let branch_name = if req.is_pr {
            format!("pr-{}-review", req.identifier)
        } else {
            format!("issue-{}", req.identifier)
        };

        let (owner, repo_name) = parse_owner_repo(&req.repository_url)
            .unwrap_or_else(|| ("unknown-owner".to_string(), "unknown-repo".to_string()));
        let working_path = req.worktree_base.join(owner).join(repo_name).join(&branch_name);

        let created_path = self
            .git
            .create_worktree_for_issue(
                &req.canonical_repo_path,
                &req.identifier,
                req.is_pr,
                req.pr_branch.as_deref(),
                req.pr_sha.as_deref(),
                &working_path,
            )
            .await?;

        Ok(CreatedWorktree { working_path: created_path, branch_name })
    }
}

/// Extracts `(owner, repo)` from a GitHub-style remote URL, either
/// `https://github.com/<owner>/<repo>(.git)` or `git@github.com:<owner>/<repo>(.git)`.
fn parse_owner_repo(repository_url: &str) -> Option<(String, String)> {
    let without_suffix = repository_url.strip_suffix(".git").unwrap_or(repository_url);
    let path = without_suffix.rsplit_once("github.com").map(|(_, rest)| rest)?;
    let path = path.trim_start_matches(':').trim_start_matches('/');
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
#[path = "isolation_provider_tests.rs"]
mod tests;
