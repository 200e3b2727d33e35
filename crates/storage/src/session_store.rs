// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `SessionStore` (spec §4.E): keyed by id, with a secondary lookup of the
//! single active session for a conversation, used by the plan -> execute
//! rotation (spec §4.K step 6).

use std::collections::HashMap;
use std::sync::Arc;

use archon_core::{ConversationId, Session, SessionId};
use parking_lot::Mutex;

use crate::error::StorageError;

pub trait SessionStore: Send + Sync {
    fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError>;
    fn active_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Session>, StorageError>;
    fn upsert(&self, session: Session) -> Result<(), StorageError>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<SessionId, Session>,
    active_by_conversation: HashMap<ConversationId, SessionId>,
}

#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        Ok(self.inner.lock().by_id.get(id).cloned())
    }

    fn active_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Session>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner
            .active_by_conversation
            .get(conversation_id)
            .and_then(|id| inner.by_id.get(id))
            .filter(|s| s.active)
            .cloned())
    }

    fn upsert(&self, session: Session) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        if session.active {
            inner.active_by_conversation.insert(session.conversation_id, session.id);
        } else if inner.active_by_conversation.get(&session.conversation_id) == Some(&session.id) {
            inner.active_by_conversation.remove(&session.conversation_id);
        }
        inner.by_id.insert(session.id, session);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
