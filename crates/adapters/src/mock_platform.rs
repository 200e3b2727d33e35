// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `MockPlatformAdapter`: records sent messages in memory instead of
//! talking to a real chat API. Used by the demo binary and by engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use archon_core::PlatformType;
use archon_wire::StreamingMode;

use crate::error::AdapterError;
use crate::platform::PlatformAdapter;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub conversation_id: String,
    pub text: String,
}

#[derive(Default)]
struct State {
    sent: Vec<SentMessage>,
    next_send_fails: bool,
}

pub struct MockPlatformAdapter {
    platform_type: PlatformType,
    streaming_mode: StreamingMode,
    state: Mutex<State>,
}

impl MockPlatformAdapter {
    pub fn new(platform_type: PlatformType, streaming_mode: StreamingMode) -> Self {
        Self { platform_type, streaming_mode, state: Mutex::new(State::default()) }
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.lock().sent.clone()
    }

    pub fn last_message(&self) -> Option<SentMessage> {
        self.state.lock().sent.last().cloned()
    }

    pub fn fail_next_send(&self) {
        self.state.lock().next_send_fails = true;
    }
}

impl Default for MockPlatformAdapter {
    fn default() -> Self {
        Self::new(PlatformType::Mock, StreamingMode::Batch)
    }
}

#[async_trait]
impl PlatformAdapter for MockPlatformAdapter {
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        if state.next_send_fails {
            state.next_send_fails = false;
            return Err(AdapterError::SendFailed("simulated failure".to_string()));
        }
        state.sent.push(SentMessage { conversation_id: conversation_id.to_string(), text: text.to_string() });
        Ok(())
    }

    fn streaming_mode(&self) -> StreamingMode {
        self.streaming_mode
    }

    fn platform_type(&self) -> PlatformType {
        self.platform_type
    }

    async fn ensure_thread(
        &self,
        original_conversation_id: &str,
        _context: Option<&str>,
    ) -> Result<String, AdapterError> {
        Ok(original_conversation_id.to_string())
    }
}

#[cfg(test)]
#[path = "mock_platform_tests.rs"]
mod tests;
