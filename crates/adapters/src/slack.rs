// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Thin `PlatformAdapter` stub for Slack. See `telegram.rs` for why this is
//! a stub rather than a real client.

use async_trait::async_trait;

use archon_core::PlatformType;
use archon_wire::StreamingMode;

use crate::error::AdapterError;
use crate::platform::PlatformAdapter;

pub struct SlackAdapter;

#[async_trait]
impl PlatformAdapter for SlackAdapter {
    async fn send_message(&self, _conversation_id: &str, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::NotImplemented("SlackAdapter::send_message"))
    }

    fn streaming_mode(&self) -> StreamingMode {
        StreamingMode::Batch
    }

    fn platform_type(&self) -> PlatformType {
        PlatformType::Slack
    }

    async fn ensure_thread(
        &self,
        _original_conversation_id: &str,
        _context: Option<&str>,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::NotImplemented("SlackAdapter::ensure_thread"))
    }
}
