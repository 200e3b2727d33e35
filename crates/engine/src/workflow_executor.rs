// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `WorkflowExecutor`: the hand-off target for a workflow-invocation
//! directive detected in the assistant's reply (spec §4.I). The directive
//! only tells the orchestrator *which* workflow to run and the preamble
//! to show the user; everything else the executor needs is captured here
//! and the executor owns its own error messaging, per spec §4.I.

use std::sync::Arc;

use archon_core::{CodebaseId, ConversationId, WorkflowDefinition};
use async_trait::async_trait;

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct WorkflowExecutionContext {
    pub branch_name: String,
    pub is_pr_review: bool,
    pub pr_sha: Option<String>,
    pub pr_branch: Option<String>,
}

#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn execute_workflow(
        &self,
        platform: &str,
        conversation_id: &str,
        cwd: &str,
        workflow: &WorkflowDefinition,
        original_message: &str,
        conversation_db_id: ConversationId,
        codebase_id: CodebaseId,
        issue_context: Option<&str>,
        ctx: WorkflowExecutionContext,
    ) -> Result<(), EngineError>;
}

/// Records invocations instead of running anything. Used by the demo
/// binary and engine tests: workflow *step* execution is out of scope for
/// this crate (spec §4.K only specifies the hand-off contract).
#[derive(Default)]
pub struct NullWorkflowExecutor {
    invocations: parking_lot::Mutex<Vec<RecordedInvocation>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvocation {
    pub platform: String,
    pub conversation_id: String,
    pub workflow_name: String,
    pub original_message: String,
}

impl NullWorkflowExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl WorkflowExecutor for NullWorkflowExecutor {
    async fn execute_workflow(
        &self,
        platform: &str,
        conversation_id: &str,
        _cwd: &str,
        workflow: &WorkflowDefinition,
        original_message: &str,
        _conversation_db_id: ConversationId,
        _codebase_id: CodebaseId,
        _issue_context: Option<&str>,
        _ctx: WorkflowExecutionContext,
    ) -> Result<(), EngineError> {
        self.invocations.lock().push(RecordedInvocation {
            platform: platform.to_string(),
            conversation_id: conversation_id.to_string(),
            workflow_name: workflow.name.clone(),
            original_message: original_message.to_string(),
        });
        Ok(())
    }
}

pub type SharedWorkflowExecutor = Arc<dyn WorkflowExecutor>;

#[cfg(test)]
#[path = "workflow_executor_tests.rs"]
mod tests;
