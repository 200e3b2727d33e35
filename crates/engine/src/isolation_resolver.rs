// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `IsolationResolver` (spec §4.C): produces the `IsolationEnvironment` the
//! orchestrator must use for a turn, or fails the request by messaging the
//! user and returning "blocked".
//!
//! The five-step algorithm stops at the first step that yields a result;
//! limit enforcement (step 4) runs `CleanupService` before re-checking the
//! count, and creation (step 5) persists a fresh record on success or
//! messages the user and blocks on failure.

use std::path::PathBuf;
use std::sync::Arc;

use archon_core::{
    classify_isolation_error, Clock, Codebase, IsolationEnvironment, IsolationEnvironmentId,
    IsolationHints, IsolationProviderKind, IsolationStatus, WorkflowType,
};
use archon_git::{CreateRequest, GitError, GitService, IsolationProvider};
use archon_storage::IsolationStore;

use crate::cleanup::{format_worktree_limit_message, CleanupService};
use crate::error::EngineError;

/// Resolution outcome: either a usable environment (new or reused) or a
/// silent "blocked" — the caller was already messaged and must stop.
pub enum Resolution {
    Ready { env: IsolationEnvironment, is_new: bool },
    Blocked,
}

pub struct IsolationResolver<Ck: Clock> {
    git: Arc<dyn GitService>,
    isolation_store: Arc<dyn IsolationStore>,
    isolation_provider: IsolationProvider,
    cleanup: Arc<dyn CleanupService>,
    clock: Ck,
    max_worktrees_per_codebase: usize,
    stale_threshold_days: u64,
}

impl<Ck: Clock> IsolationResolver<Ck> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        git: Arc<dyn GitService>,
        isolation_store: Arc<dyn IsolationStore>,
        cleanup: Arc<dyn CleanupService>,
        clock: Ck,
        max_worktrees_per_codebase: usize,
        stale_threshold_days: u64,
    ) -> Self {
        Self {
            isolation_provider: IsolationProvider::new(git.clone()),
            git,
            isolation_store,
            cleanup,
            clock,
            max_worktrees_per_codebase,
            stale_threshold_days,
        }
    }

    /// Resolve an environment for `(codebase, workflow_type, workflow_id)`,
    /// returning a user-facing message to send alongside the resolution
    /// where the spec requires one (reuse-via-link, limit-blocked,
    /// creation-error).
    pub async fn resolve(
        &self,
        codebase: &Codebase,
        workflow_type: WorkflowType,
        workflow_id: &str,
        hints: &IsolationHints,
        created_by_platform: &str,
    ) -> Result<(Resolution, Option<String>), EngineError> {
        let scope_key = archon_storage::scope_key_string(codebase.id, workflow_type.as_str(), workflow_id);

        // Step 1: reuse.
        if let Some(env) = self.isolation_store.find_by_scope(&scope_key)? {
            if env.is_active() && self.git.worktree_exists(&env.working_path).await {
                return Ok((Resolution::Ready { env, is_new: false }, None));
            }
        }

        // Step 2: link-based sharing.
        for issue_n in &hints.linked_issues {
            let link_key = archon_storage::scope_key_string(codebase.id, "issue", &issue_n.to_string());
            if let Some(env) = self.isolation_store.find_by_scope(&link_key)? {
                if env.is_active() && self.git.worktree_exists(&env.working_path).await {
                    let msg = format!("Reusing worktree from issue #{issue_n}");
                    return Ok((Resolution::Ready { env, is_new: false }, Some(msg)));
                }
            }
        }

        // Step 3: skill adoption.
        if let Some(pr_branch) = &hints.pr_branch {
            if let Some(path) = self.git.find_worktree_by_branch(&codebase.default_cwd, pr_branch).await? {
                if self.git.worktree_exists(&path).await {
                    let mut env = new_environment(
                        codebase,
                        &workflow_type,
                        workflow_id,
                        path,
                        pr_branch.clone(),
                        self.clock.epoch_ms(),
                        created_by_platform,
                    );
                    env.metadata.insert("adopted".to_string(), "true".to_string());
                    env.metadata.insert("adopted_from".to_string(), "skill".to_string());
                    self.isolation_store.upsert(env.clone())?;
                    return Ok((Resolution::Ready { env, is_new: false }, None));
                }
            }
        }

        // Step 4: limit enforcement.
        let active_count = self
            .isolation_store
            .list_for_codebase(&codebase.id)?
            .iter()
            .filter(|e| e.is_active())
            .count();
        if active_count >= self.max_worktrees_per_codebase {
            let removed = self.cleanup.cleanup_to_make_room(codebase.id, &codebase.default_cwd).await;
            let recount = self
                .isolation_store
                .list_for_codebase(&codebase.id)?
                .iter()
                .filter(|e| e.is_active())
                .count();
            if recount >= self.max_worktrees_per_codebase {
                let breakdown = self
                    .cleanup
                    .breakdown(codebase.id, self.max_worktrees_per_codebase, self.stale_threshold_days, self.clock.epoch_ms())
                    .await;
                let msg = format_worktree_limit_message(&codebase.name, breakdown, self.stale_threshold_days);
                return Ok((Resolution::Blocked, Some(msg)));
            }
            if !removed.is_empty() {
                tracing::info!(count = removed.len(), codebase = %codebase.name, "cleaned up worktrees to make room");
            }
        }

        // Step 5: create.
        let req = CreateRequest {
            canonical_repo_path: codebase.default_cwd.clone(),
            repository_url: codebase.repository_url.clone(),
            worktree_base: self.worktree_base(codebase),
            is_pr: matches!(workflow_type, WorkflowType::Pr),
            identifier: workflow_id.to_string(),
            pr_branch: hints.pr_branch.clone(),
            pr_sha: hints.pr_sha.clone(),
        };
        match self.isolation_provider.create(req).await {
            Ok(created) => {
                let mut env = new_environment(
                    codebase,
                    &workflow_type,
                    workflow_id,
                    created.working_path,
                    created.branch_name,
                    self.clock.epoch_ms(),
                    created_by_platform,
                );
                if !hints.linked_issues.is_empty() {
                    env.metadata.insert(
                        "related_issues".to_string(),
                        hints.linked_issues.iter().map(u64::to_string).collect::<Vec<_>>().join(","),
                    );
                }
                if !hints.linked_prs.is_empty() {
                    env.metadata.insert(
                        "related_prs".to_string(),
                        hints.linked_prs.iter().map(u64::to_string).collect::<Vec<_>>().join(","),
                    );
                }
                self.isolation_store.upsert(env.clone())?;
                Ok((Resolution::Ready { env, is_new: true }, None))
            }
            Err(err) => {
                let suffix = classify_isolation_error(&git_error_message(&err));
                Ok((Resolution::Blocked, Some(suffix)))
            }
        }
    }

    fn worktree_base(&self, codebase: &Codebase) -> PathBuf {
        codebase
            .default_cwd
            .parent()
            .map(|p| p.join(".worktrees"))
            .unwrap_or_else(|| PathBuf::from("/tmp/.worktrees"))
    }

    /// Stale-reference repair (spec §4.C, run before resolution). If
    /// `isolation_env_id` is set but the row or its path is gone, returns
    /// `true` and the caller must clear the conversation's reference;
    /// marks the stale row destroyed (best-effort).
    pub async fn repair_stale_reference(&self, isolation_env_id: &IsolationEnvironmentId) -> bool {
        let Ok(found) = self.isolation_store.get(isolation_env_id) else {
            return false;
        };
        let Some(mut env) = found else {
            return true;
        };
        if env.status == IsolationStatus::Active && self.git.worktree_exists(&env.working_path).await {
            return false;
        }
        env.destroy();
        let _ = self.isolation_store.upsert(env);
        true
    }
}

fn new_environment(
    codebase: &Codebase,
    workflow_type: &WorkflowType,
    workflow_id: &str,
    working_path: PathBuf,
    branch_name: impl Into<String>,
    now_ms: u64,
    created_by_platform: &str,
) -> IsolationEnvironment {
    IsolationEnvironment {
        id: IsolationEnvironmentId::new(),
        codebase_id: codebase.id,
        workflow_type: workflow_type.clone(),
        workflow_id: workflow_id.to_string(),
        provider: IsolationProviderKind::Worktree,
        working_path,
        branch_name: branch_name.into(),
        status: IsolationStatus::Active,
        created_by_platform: created_by_platform.to_string(),
        created_at: now_ms,
        metadata: Default::default(),
    }
}

fn git_error_message(err: &GitError) -> String {
    err.to_string()
}

#[cfg(test)]
#[path = "isolation_resolver_tests.rs"]
mod tests;
