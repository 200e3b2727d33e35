// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `ConversationLock` (spec §4.D): a non-blocking lock manager providing
//! per-conversation FIFO ordering under a global concurrency ceiling.
//!
//! State lives behind a single coarse `parking_lot::Mutex`, matching the
//! teacher's general preference for one lock over one-per-key locking
//! (spec §9 design note): every admission and completion decision touches
//! both the active set and the per-key queues together, so one mutex
//! avoids any ordering hazard between the two.
//!
//! A key invariant this relies on: at most one handler per key ever runs
//! concurrently (L2), so `active.len()` alone *is* the global running
//! count (L4) — no separate counter is needed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;

/// A queued unit of work. Returns `Err` to signal a handler failure; the
/// lock logs it and keeps scheduling (L4), it never stops the queue.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;
pub type Handler = Box<dyn FnOnce() -> HandlerFuture + Send>;

#[derive(Debug, Clone)]
pub struct HandlerError(pub String);

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HandlerError {}

impl<E: std::error::Error> From<E> for HandlerError {
    fn from(value: E) -> Self {
        HandlerError(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockStats {
    pub active: usize,
    pub queued_total: usize,
    pub queued_by_key: Vec<(String, usize)>,
    pub max_concurrent: usize,
    pub active_keys: Vec<String>,
}

#[derive(Default)]
struct LockState {
    active: HashSet<String>,
    queues: HashMap<String, VecDeque<Handler>>,
}

#[derive(Clone)]
pub struct ConversationLock {
    inner: Arc<Inner>,
}

struct Inner {
    max_concurrent: usize,
    state: Mutex<LockState>,
}

impl ConversationLock {
    pub fn new(max_concurrent: usize) -> Self {
        Self { inner: Arc::new(Inner { max_concurrent, state: Mutex::new(LockState::default()) }) }
    }

    /// Admission rule (spec §4.D): run immediately if `key` has no handler
    /// running and the global ceiling isn't hit; otherwise enqueue. Never
    /// blocks the caller (L3) — the handler runs on a spawned task.
    pub fn acquire(&self, key: impl Into<String>, handler: Handler) {
        let key = key.into();
        let to_run = {
            let mut state = self.inner.state.lock();
            if state.active.contains(&key) || state.active.len() >= self.inner.max_concurrent {
                state.queues.entry(key.clone()).or_default().push_back(handler);
                None
            } else {
                state.active.insert(key.clone());
                Some(handler)
            }
        };
        if let Some(handler) = to_run {
            self.spawn(key, handler);
        }
    }

    fn spawn(&self, key: String, handler: Handler) {
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(err) = handler().await {
                tracing::error!("[ConversationLock] error in {key}: {err}");
            }
            this.on_complete(key);
        });
    }

    /// Completion rule (spec §4.D): promote at most one handler for the
    /// just-finished key, then at most one handler for any other
    /// currently-idle key, bounding reentrant promotion to two dispatches
    /// per completion.
    fn on_complete(&self, key: String) {
        let own_next = {
            let mut state = self.inner.state.lock();
            state.active.remove(&key);
            let next = state.queues.get_mut(&key).and_then(VecDeque::pop_front);
            if state.queues.get(&key).is_some_and(VecDeque::is_empty) {
                state.queues.remove(&key);
            }
            next
        };
        if let Some(handler) = own_next {
            // Re-enters `acquire`, which re-checks global capacity.
            self.acquire(key, handler);
            return;
        }

        let promoted = {
            let mut state = self.inner.state.lock();
            let candidate = state
                .queues
                .iter()
                .find(|(k, q)| !state.active.contains(*k) && !q.is_empty())
                .map(|(k, _)| k.clone());
            candidate.and_then(|k| {
                let handler = state.queues.get_mut(&k).and_then(VecDeque::pop_front);
                if state.queues.get(&k).is_some_and(VecDeque::is_empty) {
                    state.queues.remove(&k);
                }
                handler.map(|h| (k, h))
            })
        };
        if let Some((promoted_key, handler)) = promoted {
            self.acquire(promoted_key, handler);
        }
    }

    pub fn stats(&self) -> LockStats {
        let state = self.inner.state.lock();
        let mut queued_by_key: Vec<(String, usize)> =
            state.queues.iter().map(|(k, q)| (k.clone(), q.len())).collect();
        queued_by_key.sort_by(|a, b| a.0.cmp(&b.0));
        LockStats {
            active: state.active.len(),
            queued_total: state.queues.values().map(VecDeque::len).sum(),
            queued_by_key,
            max_concurrent: self.inner.max_concurrent,
            active_keys: {
                let mut keys: Vec<String> = state.active.iter().cloned().collect();
                keys.sort();
                keys
            },
        }
    }
}

#[cfg(test)]
#[path = "conversation_lock_tests.rs"]
mod tests;
