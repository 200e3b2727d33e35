// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `CleanupService`: finds and removes disposable isolation environments
//! to make room under `MAX_WORKTREES_PER_CODEBASE` (spec §4.C step 4).
//!
//! The spec's notion of "disposable" is "fully merged into the base branch
//! and with no uncommitted changes." `GitService` (spec §6) has no
//! merge-status query, only `has_uncommitted_changes`, so the reference
//! implementation here treats "no uncommitted changes" as the sole
//! enforceable disposability proxy and does not claim to check merge
//! status — a documented simplification, not a misreading of the spec.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use archon_core::{CodebaseId, IsolationEnvironment, IsolationEnvironmentId};
use archon_git::GitService;
use archon_storage::IsolationStore;

/// Per-codebase worktree counts used to build the limit-reached message
/// (spec §6 "Worktree limit user message").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorktreeBreakdown {
    pub total: usize,
    pub limit: usize,
    pub merged: usize,
    pub stale: usize,
    pub active: usize,
}

#[async_trait]
pub trait CleanupService: Send + Sync {
    /// Remove as many disposable environments for `codebase_id` as can be
    /// found, returning the ids actually removed.
    async fn cleanup_to_make_room(
        &self,
        codebase_id: CodebaseId,
        canonical_repo: &Path,
    ) -> Vec<IsolationEnvironmentId>;

    /// Build the status breakdown the limit-reached message reports.
    /// `stale_threshold_days`/`now_ms` classify "stale" (spec §5: no
    /// activity for `STALE_THRESHOLD_DAYS`); "merged" uses the same
    /// disposability proxy as `cleanup_to_make_room`; everything else
    /// counts as "active".
    async fn breakdown(
        &self,
        codebase_id: CodebaseId,
        limit: usize,
        stale_threshold_days: u64,
        now_ms: u64,
    ) -> WorktreeBreakdown;
}

/// Never finds anything disposable; used by the demo binary and tests that
/// want limit-enforcement to always fall through to "blocked".
pub struct NullCleanupService;

#[async_trait]
impl CleanupService for NullCleanupService {
    async fn cleanup_to_make_room(
        &self,
        _codebase_id: CodebaseId,
        _canonical_repo: &Path,
    ) -> Vec<IsolationEnvironmentId> {
        Vec::new()
    }

    async fn breakdown(
        &self,
        _codebase_id: CodebaseId,
        limit: usize,
        _stale_threshold_days: u64,
        _now_ms: u64,
    ) -> WorktreeBreakdown {
        WorktreeBreakdown { total: 0, limit, merged: 0, stale: 0, active: 0 }
    }
}

/// Reference `CleanupService`: disposable means "no uncommitted changes
/// and the worktree path still exists" — an environment whose worktree is
/// already gone is also removed (the record is stale, not disposable per
/// se, but leaving it around would keep counting against the limit
/// forever).
pub struct GitBackedCleanupService {
    git: Arc<dyn GitService>,
    isolation_store: Arc<dyn IsolationStore>,
}

impl GitBackedCleanupService {
    pub fn new(git: Arc<dyn GitService>, isolation_store: Arc<dyn IsolationStore>) -> Self {
        Self { git, isolation_store }
    }

    async fn is_disposable(&self, env: &IsolationEnvironment) -> bool {
        if !self.git.worktree_exists(&env.working_path).await {
            return true;
        }
        !self.git.has_uncommitted_changes(&env.working_path).await
    }

    fn is_stale(env: &IsolationEnvironment, stale_threshold_days: u64, now_ms: u64) -> bool {
        let threshold_ms = stale_threshold_days.saturating_mul(24 * 60 * 60 * 1000);
        now_ms.saturating_sub(env.created_at) >= threshold_ms
    }
}

#[async_trait]
impl CleanupService for GitBackedCleanupService {
    async fn cleanup_to_make_room(
        &self,
        codebase_id: CodebaseId,
        canonical_repo: &Path,
    ) -> Vec<IsolationEnvironmentId> {
        let Ok(envs) = self.isolation_store.list_for_codebase(&codebase_id) else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        for mut env in envs.into_iter().filter(IsolationEnvironment::is_active) {
            if self.is_disposable(&env).await {
                let _ = self.git.remove_worktree(canonical_repo, &env.working_path).await;
                env.destroy();
                if self.isolation_store.upsert(env.clone()).is_ok() {
                    removed.push(env.id);
                }
            }
        }
        removed
    }

    async fn breakdown(
        &self,
        codebase_id: CodebaseId,
        limit: usize,
        stale_threshold_days: u64,
        now_ms: u64,
    ) -> WorktreeBreakdown {
        let Ok(envs) = self.isolation_store.list_for_codebase(&codebase_id) else {
            return WorktreeBreakdown { total: 0, limit, merged: 0, stale: 0, active: 0 };
        };
        let active_envs: Vec<_> = envs.into_iter().filter(IsolationEnvironment::is_active).collect();
        let total = active_envs.len();
        let mut merged = 0;
        let mut stale = 0;
        for env in &active_envs {
            if self.is_disposable(env).await {
                merged += 1;
            } else if Self::is_stale(env, stale_threshold_days, now_ms) {
                stale += 1;
            }
        }
        WorktreeBreakdown { total, limit, merged, stale, active: total - merged - stale }
    }
}

/// Render the "Worktree limit reached" message (spec §6, byte-for-byte).
pub fn format_worktree_limit_message(
    codebase_name: &str,
    breakdown: WorktreeBreakdown,
    stale_threshold_days: u64,
) -> String {
    let mut msg = format!(
        "Worktree limit reached ({}/{}) for **{}**.\n\n\
         **Status:**\n\
         • {} merged (can auto-remove)\n\
         • {} stale (no activity in {}+ days)\n\
         • {} active\n\n\
         **Options:**\n",
        breakdown.total,
        breakdown.limit,
        codebase_name,
        breakdown.merged,
        breakdown.stale,
        stale_threshold_days,
        breakdown.active,
    );
    if breakdown.stale > 0 {
        msg.push_str("• `/worktree cleanup stale` - Remove stale worktrees\n");
    }
    msg.push_str(
        "• `/worktree list` - See all worktrees\n\
         • `/worktree remove <name>` - Remove specific worktree",
    );
    msg
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
