// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `ConversationStore` (spec §4.F): keyed by id, with a secondary lookup
//! by `identity_key()` since an incoming message only carries platform
//! type + platform conversation id, never the internal `ConversationId`.

use std::collections::HashMap;
use std::sync::Arc;

use archon_core::{Conversation, ConversationId, PlatformType};
use parking_lot::Mutex;

use crate::error::StorageError;

/// Builds the same composite key `upsert` indexes by, so callers can look a
/// conversation up by `(platform_type, platform_conversation_id)` without
/// reaching into `Conversation` internals.
pub fn identity_key_string(platform_type: PlatformType, platform_conversation_id: &str) -> String {
    format!("{platform_type}:{platform_conversation_id}")
}

pub trait ConversationStore: Send + Sync {
    fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, StorageError>;
    fn find_by_identity(&self, identity_key: &str) -> Result<Option<Conversation>, StorageError>;
    fn upsert(&self, conversation: Conversation) -> Result<(), StorageError>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<ConversationId, Conversation>,
    by_identity: HashMap<String, ConversationId>,
}

/// Reference `ConversationStore` backed by a single coarse mutex, matching
/// the daemon's general preference for `parking_lot::Mutex` over
/// `std::sync::Mutex` for non-async-held locks.
#[derive(Default, Clone)]
pub struct InMemoryConversationStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, StorageError> {
        Ok(self.inner.lock().by_id.get(id).cloned())
    }

    fn find_by_identity(&self, identity_key: &str) -> Result<Option<Conversation>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner
            .by_identity
            .get(identity_key)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    fn upsert(&self, conversation: Conversation) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        let (platform, platform_conversation_id) = conversation.identity_key();
        let key = identity_key_string(platform, platform_conversation_id);
        inner.by_identity.insert(key, conversation.id);
        inner.by_id.insert(conversation.id, conversation);
        Ok(())
    }
}

#[cfg(test)]
#[path = "conversation_store_tests.rs"]
mod tests;
