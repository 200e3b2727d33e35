// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Thin `PlatformAdapter` stub for Discord. See `telegram.rs` for why this
//! is a stub rather than a real client.

use async_trait::async_trait;

use archon_core::PlatformType;
use archon_wire::StreamingMode;

use crate::error::AdapterError;
use crate::platform::PlatformAdapter;

pub struct DiscordAdapter;

#[async_trait]
impl PlatformAdapter for DiscordAdapter {
    async fn send_message(&self, _conversation_id: &str, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::NotImplemented("DiscordAdapter::send_message"))
    }

    fn streaming_mode(&self) -> StreamingMode {
        StreamingMode::Stream
    }

    fn platform_type(&self) -> PlatformType {
        PlatformType::Discord
    }

    async fn ensure_thread(
        &self,
        _original_conversation_id: &str,
        _context: Option<&str>,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::NotImplemented("DiscordAdapter::ensure_thread"))
    }
}
