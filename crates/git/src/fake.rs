// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `FakeGitService`: an in-memory `GitService` for engine-crate tests that
//! never touches the filesystem or spawns a subprocess.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::GitError;
use crate::service::{GitService, WorktreeInfo};

#[derive(Default)]
struct State {
    worktrees: Vec<WorktreeInfo>,
    canonical_by_worktree: HashMap<PathBuf, PathBuf>,
    uncommitted: bool,
    commit_succeeds: bool,
    next_create_fails: bool,
}

#[derive(Default)]
pub struct FakeGitService {
    state: Mutex<State>,
}

impl FakeGitService {
    pub fn new() -> Self {
        Self { state: Mutex::new(State { commit_succeeds: true, ..State::default() }) }
    }

    /// Register `worktree` as already existing, tied to `canonical` and
    /// carrying `branch`.
    pub fn seed_worktree(&self, canonical: impl Into<PathBuf>, worktree: impl Into<PathBuf>, branch: impl Into<String>) {
        let worktree = worktree.into();
        let mut state = self.state.lock();
        state.worktrees.push(WorktreeInfo { path: worktree.clone(), branch: branch.into() });
        state.canonical_by_worktree.insert(worktree, canonical.into());
    }

    pub fn set_uncommitted(&self, value: bool) {
        self.state.lock().uncommitted = value;
    }

    pub fn set_commit_succeeds(&self, value: bool) {
        self.state.lock().commit_succeeds = value;
    }

    /// Make the next `create_worktree_for_issue` call fail, simulating a
    /// blocked isolation-creation error (spec §7).
    pub fn fail_next_create(&self) {
        self.state.lock().next_create_fails = true;
    }
}

#[async_trait]
impl GitService for FakeGitService {
    async fn worktree_exists(&self, path: &Path) -> bool {
        self.state.lock().worktrees.iter().any(|w| w.path == path)
    }

    async fn list_worktrees(&self, _repo: &Path) -> Result<Vec<WorktreeInfo>, GitError> {
        Ok(self.state.lock().worktrees.clone())
    }

    async fn find_worktree_by_branch(
        &self,
        _repo: &Path,
        branch: &str,
    ) -> Result<Option<PathBuf>, GitError> {
        Ok(self.state.lock().worktrees.iter().find(|w| w.branch == branch).map(|w| w.path.clone()))
    }

    async fn create_worktree_for_issue(
        &self,
        repo: &Path,
        n: &str,
        is_pr: bool,
        _pr_branch: Option<&str>,
        _pr_sha: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf, GitError> {
        let mut state = self.state.lock();
        if state.next_create_fails {
            state.next_create_fails = false;
            return Err(GitError::CommandFailed {
                label: "git worktree add".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }
        let branch = if is_pr { format!("pr-{n}-review") } else { format!("issue-{n}") };
        state.worktrees.push(WorktreeInfo { path: path.to_path_buf(), branch });
        state.canonical_by_worktree.insert(path.to_path_buf(), repo.to_path_buf());
        Ok(path.to_path_buf())
    }

    async fn remove_worktree(&self, _repo: &Path, path: &Path) -> Result<(), GitError> {
        let mut state = self.state.lock();
        state.worktrees.retain(|w| w.path != path);
        state.canonical_by_worktree.remove(path);
        Ok(())
    }

    fn get_canonical_repo_path(&self, path: &Path) -> Option<PathBuf> {
        self.state.lock().canonical_by_worktree.get(path).cloned()
    }

    fn is_worktree_path(&self, path: &Path) -> bool {
        self.state.lock().canonical_by_worktree.contains_key(path)
    }

    async fn has_uncommitted_changes(&self, _path: &Path) -> bool {
        self.state.lock().uncommitted
    }

    async fn commit_all_changes(&self, _path: &Path, _message: &str) -> bool {
        self.state.lock().commit_succeeds
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
