// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[tokio::test]
async fn records_sent_messages_in_order() {
    let adapter = MockPlatformAdapter::default();
    adapter.send_message("conv-1", "hello").await.expect("send");
    adapter.send_message("conv-1", "world").await.expect("send");
    let sent = adapter.sent_messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].text, "world");
}

#[tokio::test]
async fn fail_next_send_surfaces_once() {
    let adapter = MockPlatformAdapter::default();
    adapter.fail_next_send();
    assert!(adapter.send_message("conv-1", "hi").await.is_err());
    assert!(adapter.send_message("conv-1", "hi again").await.is_ok());
    assert_eq!(adapter.sent_messages().len(), 1);
}

#[tokio::test]
async fn ensure_thread_echoes_original_id() {
    let adapter = MockPlatformAdapter::default();
    let thread = adapter.ensure_thread("conv-42", Some("ctx")).await.expect("ensure_thread");
    assert_eq!(thread, "conv-42");
}

#[test]
fn reports_configured_platform_and_streaming_mode() {
    let adapter = MockPlatformAdapter::new(PlatformType::Slack, StreamingMode::Stream);
    assert_eq!(adapter.platform_type(), PlatformType::Slack);
    assert_eq!(adapter.streaming_mode(), StreamingMode::Stream);
}
