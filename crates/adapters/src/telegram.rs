// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Thin `PlatformAdapter` stub for Telegram. Wiring a real bot API client is
//! out of scope (spec §1 item c); this exists so the platform surface and
//! its streaming-mode/authorization rules have a concrete home.

use async_trait::async_trait;

use archon_core::PlatformType;
use archon_wire::StreamingMode;

use crate::error::AdapterError;
use crate::platform::PlatformAdapter;

pub struct TelegramAdapter;

#[async_trait]
impl PlatformAdapter for TelegramAdapter {
    async fn send_message(&self, _conversation_id: &str, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::NotImplemented("TelegramAdapter::send_message"))
    }

    fn streaming_mode(&self) -> StreamingMode {
        StreamingMode::Stream
    }

    fn platform_type(&self) -> PlatformType {
        PlatformType::Telegram
    }

    async fn ensure_thread(
        &self,
        _original_conversation_id: &str,
        _context: Option<&str>,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::NotImplemented("TelegramAdapter::ensure_thread"))
    }
}
