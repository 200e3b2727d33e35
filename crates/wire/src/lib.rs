// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! archon-wire: the chunk protocol spoken between an `AssistantClient` and
//! the engine, and the per-platform streaming-mode contract (spec §6).
//!
//! An `AssistantClient::send_query` call yields a lazy stream of
//! [`AssistantChunk`] values; the engine folds them into either live
//! streamed edits or a single batched reply depending on what the
//! originating [`StreamingMode`] allows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chunk of an assistant's reply to a single query.
///
/// Variant names match the wire vocabulary in spec §6 so adapter and
/// engine code can talk about "a tool chunk" or "a result chunk" without
/// translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantChunk {
    /// A fragment of the assistant's natural-language reply.
    Assistant { content: String },
    /// A tool invocation the assistant made mid-turn.
    Tool {
        name: String,
        #[serde(default)]
        input: HashMap<String, Value>,
    },
    /// A fragment of the assistant's visible reasoning/thinking trace.
    Thinking { content: String },
    /// Terminal chunk: the turn is complete and carries the resumable
    /// session id the next query on this conversation should pass back.
    Result { session_id: String },
}

impl AssistantChunk {
    /// True for the chunk that ends a query's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssistantChunk::Result { .. })
    }
}

/// How a platform adapter wants chunks delivered back to it (spec §4.K
/// step 7, §6 `PlatformAdapter::get_streaming_mode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingMode {
    /// Edit a single message in place as chunks arrive (e.g. Telegram,
    /// Discord message-edit).
    Stream,
    /// Accumulate the whole turn and deliver one final message (e.g.
    /// Slack, GitHub comment).
    Batch,
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
