// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `PlatformAdapter` (spec §6): the collaborator boundary between the
//! orchestrator and whatever chat/webhook surface a message arrived from.

use async_trait::async_trait;

use archon_core::PlatformType;
use archon_wire::StreamingMode;

use crate::error::AdapterError;

/// How the orchestrator talks to a single chat/webhook platform.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Send `text` to the conversation identified by `conversation_id`.
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<(), AdapterError>;

    /// Whether this platform wants chunks delivered as a live-edited
    /// stream or a single batched reply (spec §4.K step 7).
    fn streaming_mode(&self) -> StreamingMode;

    /// The platform tag used in `Conversation` identity (spec §3).
    fn platform_type(&self) -> PlatformType;

    /// Pin a platform-specific thread for this conversation, returning the
    /// id future messages should target. May be a no-op that echoes back
    /// `original_conversation_id`.
    async fn ensure_thread(
        &self,
        original_conversation_id: &str,
        context: Option<&str>,
    ) -> Result<String, AdapterError>;
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
