// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `AssistantClient` (spec §6): the collaborator boundary between the
//! orchestrator and whatever coding-assistant SDK is actually invoked.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use archon_wire::AssistantChunk;

use crate::error::AdapterError;

/// A query's reply, as a lazy finite sequence of chunks. The orchestrator
/// drains this to completion and never drops it early (spec §9: must not
/// silently discard `result` chunks).
pub type AssistantChunkStream = Pin<Box<dyn Stream<Item = AssistantChunk> + Send>>;

#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send `prompt` against the assistant, rooted at `cwd`. `resume_token`,
    /// when present, is the `session_id` carried by a prior turn's `result`
    /// chunk and asks the assistant to continue that session.
    async fn send_query(
        &self,
        prompt: &str,
        cwd: &str,
        resume_token: Option<&str>,
    ) -> Result<AssistantChunkStream, AdapterError>;
}

#[cfg(test)]
#[path = "assistant_tests.rs"]
mod tests;
