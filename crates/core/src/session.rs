// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Session: an assistant conversation turn sequence.
//!
//! Invariant: at most one `active` session per conversation. On cwd change
//! the previous session is deactivated (enforced by the engine, not this
//! type — the type just carries the flag).

use crate::codebase::CodebaseId;
use crate::conversation::ConversationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Identifier for a session record.
    pub struct SessionId("sess-");
}

/// Key used in `Session::metadata` for the last command name applied,
/// consulted by the plan -> execute rotation (spec §4.K step 6).
pub const LAST_COMMAND_KEY: &str = "lastCommand";

/// An assistant conversation turn sequence bound to one `Conversation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub conversation_id: ConversationId,
    pub codebase_id: CodebaseId,
    pub ai_assistant_type: String,
    /// Opaque resume token handed back by the assistant client's `result`
    /// chunk; `None` until the first turn completes.
    pub assistant_session_id: Option<String>,
    pub active: bool,
    pub metadata: HashMap<String, String>,
    pub started_at: u64,
    pub ended_at: Option<u64>,
}

impl Session {
    pub fn new(
        conversation_id: ConversationId,
        codebase_id: CodebaseId,
        ai_assistant_type: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            id: SessionId::new(),
            conversation_id,
            codebase_id,
            ai_assistant_type: ai_assistant_type.into(),
            assistant_session_id: None,
            active: true,
            metadata: HashMap::new(),
            started_at: now_ms,
            ended_at: None,
        }
    }

    pub fn deactivate(&mut self, now_ms: u64) {
        self.active = false;
        self.ended_at = Some(now_ms);
    }

    pub fn last_command(&self) -> Option<&str> {
        self.metadata.get(LAST_COMMAND_KEY).map(String::as_str)
    }

    pub fn set_last_command(&mut self, command: impl Into<String>) {
        self.metadata.insert(LAST_COMMAND_KEY.to_string(), command.into());
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct SessionBuilder => Session {
        set {
            id: SessionId = SessionId::new(),
            conversation_id: ConversationId = ConversationId::new(),
            codebase_id: CodebaseId = CodebaseId::new(),
            assistant_session_id: Option<String> = None,
            active: bool = true,
            metadata: HashMap<String, String> = HashMap::new(),
            started_at: u64 = 0,
            ended_at: Option<u64> = None,
        }
        into {
            ai_assistant_type: String = "claude",
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
