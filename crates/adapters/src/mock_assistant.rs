// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `MockAssistantClient`: replays a scripted chunk sequence instead of
//! invoking a real assistant SDK. Used by the demo binary and engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use archon_wire::AssistantChunk;

use crate::assistant::{AssistantChunkStream, AssistantClient};
use crate::error::AdapterError;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub prompt: String,
    pub cwd: String,
    pub resume_token: Option<String>,
}

#[derive(Default)]
struct State {
    queries: Vec<RecordedQuery>,
    script: Vec<AssistantChunk>,
    next_query_fails: bool,
}

/// Defaults to a single `assistant` chunk followed by a `result` chunk
/// carrying session id `"mock-session"`, which is enough to exercise the
/// orchestrator's session-persistence step without a real backend.
pub struct MockAssistantClient {
    state: Mutex<State>,
}

impl MockAssistantClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                script: vec![
                    AssistantChunk::Assistant { content: "Here's what I found.".to_string() },
                    AssistantChunk::Result { session_id: "mock-session".to_string() },
                ],
                ..State::default()
            }),
        }
    }

    /// Replace the chunk sequence returned by every subsequent `send_query`.
    pub fn set_script(&self, chunks: Vec<AssistantChunk>) {
        self.state.lock().script = chunks;
    }

    pub fn fail_next_query(&self) {
        self.state.lock().next_query_fails = true;
    }

    pub fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.state.lock().queries.clone()
    }
}

impl Default for MockAssistantClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantClient for MockAssistantClient {
    async fn send_query(
        &self,
        prompt: &str,
        cwd: &str,
        resume_token: Option<&str>,
    ) -> Result<AssistantChunkStream, AdapterError> {
        let mut state = self.state.lock();
        state.queries.push(RecordedQuery {
            prompt: prompt.to_string(),
            cwd: cwd.to_string(),
            resume_token: resume_token.map(str::to_string),
        });
        if state.next_query_fails {
            state.next_query_fails = false;
            return Err(AdapterError::SendFailed("simulated assistant failure".to_string()));
        }
        let chunks = state.script.clone();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

#[cfg(test)]
#[path = "mock_assistant_tests.rs"]
mod tests;
