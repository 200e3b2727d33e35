// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;
use tokio_stream::StreamExt;

struct OneShotClient;

#[async_trait::async_trait]
impl AssistantClient for OneShotClient {
    async fn send_query(
        &self,
        _prompt: &str,
        _cwd: &str,
        _resume_token: Option<&str>,
    ) -> Result<AssistantChunkStream, AdapterError> {
        let chunks = vec![AssistantChunk::Result { session_id: "sess-1".to_string() }];
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

#[tokio::test]
async fn stream_is_drainable_to_a_terminal_chunk() {
    let client = OneShotClient;
    let mut stream = client.send_query("hi", "/repo", None).await.expect("send_query");
    let chunk = stream.next().await.expect("one chunk");
    assert!(chunk.is_terminal());
    assert!(stream.next().await.is_none());
}
