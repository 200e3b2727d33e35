// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

struct EchoAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for EchoAdapter {
    async fn send_message(&self, _conversation_id: &str, _text: &str) -> Result<(), AdapterError> {
        Ok(())
    }

    fn streaming_mode(&self) -> StreamingMode {
        StreamingMode::Batch
    }

    fn platform_type(&self) -> PlatformType {
        PlatformType::Mock
    }

    async fn ensure_thread(
        &self,
        original_conversation_id: &str,
        _context: Option<&str>,
    ) -> Result<String, AdapterError> {
        Ok(original_conversation_id.to_string())
    }
}

#[tokio::test]
async fn trait_is_object_safe_and_dispatches() {
    let adapter: Box<dyn PlatformAdapter> = Box::new(EchoAdapter);
    assert_eq!(adapter.platform_type(), PlatformType::Mock);
    assert_eq!(adapter.streaming_mode(), StreamingMode::Batch);
    adapter.send_message("conv-1", "hi").await.expect("send");
    let thread = adapter.ensure_thread("conv-1", None).await.expect("ensure_thread");
    assert_eq!(thread, "conv-1");
}
