// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Isolation environment: a database-tracked git worktree paired with a
//! logical workflow identity.
//!
//! Invariants (spec §3):
//! - I1: `working_path` points to a directory that is a git worktree of the
//!   canonical repo.
//! - I2: at most one `active` environment per
//!   `(codebase_id, workflow_type, workflow_id)`.
//! - I3: destruction is monotonic — once `destroyed`, stays `destroyed`.

use crate::codebase::CodebaseId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

crate::define_id! {
    /// Identifier for an isolation environment (worktree) record.
    pub struct IsolationEnvironmentId("isol-");
}

/// The logical workflow identity an isolation environment is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Thread,
    Issue,
    Pr,
    Review,
    /// Forward-compatible escape hatch for the spec's "…" enumeration.
    Other(String),
}

impl WorkflowType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Thread => "thread",
            Self::Issue => "issue",
            Self::Pr => "pr",
            Self::Review => "review",
            Self::Other(s) => s.as_str(),
        }
    }
}

/// Which backing provider created the working copy. The spec only defines
/// `worktree`; the enum leaves room for future providers without an
/// associated workflow-identity regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationProviderKind {
    Worktree,
}

/// Lifecycle status of an isolation environment. Transitions only ever go
/// `Active -> Destroyed` (I3), never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationStatus {
    Active,
    Destroyed,
}

/// A git worktree tied to a logical workflow, tracked by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationEnvironment {
    pub id: IsolationEnvironmentId,
    pub codebase_id: CodebaseId,
    pub workflow_type: WorkflowType,
    /// Opaque stable string identifying the workflow instance (channel id,
    /// issue number, PR number, …).
    pub workflow_id: String,
    pub provider: IsolationProviderKind,
    pub working_path: PathBuf,
    pub branch_name: String,
    pub status: IsolationStatus,
    pub created_by_platform: String,
    pub created_at: u64,
    /// Free-form metadata: `adopted`, `adopted_from`, `related_issues`,
    /// `related_prs`, …
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl IsolationEnvironment {
    /// The `(codebase_id, workflow_type, workflow_id)` key used by the
    /// reuse lookup (spec §4.C step 1) and the I2 invariant.
    pub fn scope_key(&self) -> (CodebaseId, &str, &str) {
        (self.codebase_id, self.workflow_type.as_str(), self.workflow_id.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.status == IsolationStatus::Active
    }

    /// Mark destroyed. Monotonic: calling this on an already-destroyed
    /// environment is a no-op, never an error (I3).
    pub fn destroy(&mut self) {
        self.status = IsolationStatus::Destroyed;
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct IsolationEnvironmentBuilder => IsolationEnvironment {
        set {
            id: IsolationEnvironmentId = IsolationEnvironmentId::new(),
            codebase_id: CodebaseId = CodebaseId::new(),
            workflow_type: WorkflowType = WorkflowType::Thread,
            provider: IsolationProviderKind = IsolationProviderKind::Worktree,
            working_path: PathBuf = PathBuf::from("/workspace/demo-isolated"),
            status: IsolationStatus = IsolationStatus::Active,
            created_at: u64 = 0,
            metadata: HashMap<String, String> = HashMap::new(),
        }
        into {
            workflow_id: String = "123",
            branch_name: String = "issue-123",
            created_by_platform: String = "mock",
        }
    }
}

#[cfg(test)]
#[path = "isolation_tests.rs"]
mod tests;
