// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[test]
fn only_result_is_terminal() {
    assert!(!AssistantChunk::Assistant { content: "hi".into() }.is_terminal());
    assert!(!AssistantChunk::Thinking { content: "hm".into() }.is_terminal());
    assert!(!AssistantChunk::Tool { name: "read_file".into(), input: HashMap::new() }.is_terminal());
    assert!(AssistantChunk::Result { session_id: "sess-1".into() }.is_terminal());
}

#[test]
fn chunk_roundtrips_through_json() {
    let chunk = AssistantChunk::Tool {
        name: "read_file".into(),
        input: HashMap::from([("path".to_string(), Value::String("src/lib.rs".into()))]),
    };
    let json = serde_json::to_string(&chunk).expect("serialize");
    let back: AssistantChunk = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(chunk, back);
}

#[test]
fn streaming_mode_roundtrips_through_json() {
    for mode in [StreamingMode::Stream, StreamingMode::Batch] {
        let json = serde_json::to_string(&mode).expect("serialize");
        let back: StreamingMode = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(mode, back);
    }
}
