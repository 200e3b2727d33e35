// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Transient, per-message context structs. Neither is persisted; both are
//! built fresh for a single `handle_message` call.

use serde::{Deserialize, Serialize};

/// Context fed into the workflow-aware router prompt (spec §4.I).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterContext {
    pub platform_type: Option<String>,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub is_pull_request: Option<bool>,
    pub workflow_type: Option<String>,
    pub thread_history: Option<String>,
}

/// Hints supplied by the platform adapter up front, consumed by the
/// `IsolationResolver` (spec §4.C).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IsolationHints {
    pub workflow_type: Option<String>,
    pub workflow_id: Option<String>,
    pub pr_branch: Option<String>,
    pub pr_sha: Option<String>,
    pub is_fork_pr: Option<bool>,
    pub linked_issues: Vec<u64>,
    pub linked_prs: Vec<u64>,
}

#[cfg(test)]
#[path = "router_context_tests.rs"]
mod tests;
