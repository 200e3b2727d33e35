// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Conversation identity and record.
//!
//! Identity is the `(platform_type, platform_conversation_id)` pair; `id` is
//! a synthetic handle used once the record exists. Created on first observed
//! message, never deleted by the core.

use crate::codebase::CodebaseId;
use crate::isolation::IsolationEnvironmentId;
use crate::platform::PlatformType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Synthetic identifier for a conversation record.
    pub struct ConversationId("conv-");
}

/// A logical conversation thread on some platform, tracking which codebase
/// and isolated working copy it is currently bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub platform_type: PlatformType,
    /// Platform-native conversation identifier (chat id, channel id, issue
    /// number, …). Combined with `platform_type` this is the record's
    /// natural identity key.
    pub platform_conversation_id: String,
    pub ai_assistant_type: String,
    pub codebase_id: Option<CodebaseId>,
    pub cwd: Option<PathBuf>,
    pub isolation_env_id: Option<IsolationEnvironmentId>,
    pub last_activity_at: u64,
    pub created_at: u64,
}

impl Conversation {
    /// Create a fresh conversation record for a newly observed
    /// `(platform_type, platform_conversation_id)` pair.
    pub fn new(
        platform_type: PlatformType,
        platform_conversation_id: impl Into<String>,
        ai_assistant_type: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            id: ConversationId::new(),
            platform_type,
            platform_conversation_id: platform_conversation_id.into(),
            ai_assistant_type: ai_assistant_type.into(),
            codebase_id: None,
            cwd: None,
            isolation_env_id: None,
            last_activity_at: now_ms,
            created_at: now_ms,
        }
    }

    /// The natural identity key: `(platform_type, platform_conversation_id)`.
    pub fn identity_key(&self) -> (PlatformType, &str) {
        (self.platform_type, self.platform_conversation_id.as_str())
    }

    /// Copy `codebase_id`/`cwd` from a parent conversation, but only if this
    /// conversation doesn't already have a codebase (spec §4.K step 1:
    /// parent-thread inheritance is best-effort and never overwrites).
    pub fn inherit_from_parent(&mut self, parent: &Conversation) {
        if self.codebase_id.is_none() {
            self.codebase_id = parent.codebase_id;
            self.cwd = parent.cwd.clone();
        }
    }

    /// Clear the isolation reference (stale-reference repair, spec §4.C).
    pub fn clear_isolation(&mut self) {
        self.isolation_env_id = None;
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct ConversationBuilder => Conversation {
        set {
            id: ConversationId = ConversationId::new(),
            platform_type: PlatformType = PlatformType::Mock,
            ai_assistant_type: String = "claude".to_string(),
            codebase_id: Option<CodebaseId> = None,
            cwd: Option<PathBuf> = None,
            isolation_env_id: Option<IsolationEnvironmentId> = None,
            last_activity_at: u64 = 0,
            created_at: u64 = 0,
        }
        into {
            platform_conversation_id: String = "chat-1",
        }
    }
}

#[cfg(test)]
#[path = "conversation_tests.rs"]
mod tests;
