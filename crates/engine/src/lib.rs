// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! archon-engine: the orchestration core (spec §4). Ties together storage,
//! git, adapter, and workflow collaborators behind `Orchestrator`, the
//! single entry point a platform adapter calls per incoming message.

pub mod artifact_sync;
pub mod cleanup;
pub mod command_router;
pub mod conversation_lock;
pub mod error;
pub mod isolation_resolver;
pub mod orchestrator;
pub mod workflow_executor;

pub use cleanup::{CleanupService, GitBackedCleanupService, NullCleanupService, WorktreeBreakdown};
pub use command_router::{CommandRouter, NullCommandRouter, RouterError, RouterOutcome};
pub use conversation_lock::{ConversationLock, HandlerError, LockStats};
pub use error::EngineError;
pub use isolation_resolver::{IsolationResolver, Resolution};
pub use orchestrator::Orchestrator;
pub use workflow_executor::{NullWorkflowExecutor, WorkflowExecutionContext, WorkflowExecutor};
