// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `IsolationStore`: worktree records, looked up by id or by the
//! `(codebase_id, workflow_type, workflow_id)` scope key the
//! `IsolationResolver`'s reuse step (spec §4.C step 1) keys on.

use std::collections::HashMap;
use std::sync::Arc;

use archon_core::{CodebaseId, IsolationEnvironment, IsolationEnvironmentId};
use parking_lot::Mutex;

use crate::error::StorageError;

/// Builds the same composite key `upsert` indexes by, mirroring
/// `IsolationEnvironment::scope_key`'s tuple shape as a hashable string.
pub fn scope_key_string(codebase_id: CodebaseId, workflow_type: &str, workflow_id: &str) -> String {
    format!("{codebase_id}:{workflow_type}:{workflow_id}")
}

pub trait IsolationStore: Send + Sync {
    fn get(&self, id: &IsolationEnvironmentId) -> Result<Option<IsolationEnvironment>, StorageError>;
    fn find_by_scope(&self, scope_key: &str) -> Result<Option<IsolationEnvironment>, StorageError>;
    fn upsert(&self, env: IsolationEnvironment) -> Result<(), StorageError>;
    fn list_for_codebase(&self, codebase_id: &CodebaseId) -> Result<Vec<IsolationEnvironment>, StorageError>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<IsolationEnvironmentId, IsolationEnvironment>,
    by_scope: HashMap<String, IsolationEnvironmentId>,
}

#[derive(Default, Clone)]
pub struct InMemoryIsolationStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryIsolationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IsolationStore for InMemoryIsolationStore {
    fn get(&self, id: &IsolationEnvironmentId) -> Result<Option<IsolationEnvironment>, StorageError> {
        Ok(self.inner.lock().by_id.get(id).cloned())
    }

    fn find_by_scope(&self, scope_key: &str) -> Result<Option<IsolationEnvironment>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner.by_scope.get(scope_key).and_then(|id| inner.by_id.get(id)).cloned())
    }

    fn upsert(&self, env: IsolationEnvironment) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        let (codebase_id, workflow_type, workflow_id) = env.scope_key();
        let key = scope_key_string(codebase_id, workflow_type, workflow_id);
        inner.by_scope.insert(key, env.id);
        inner.by_id.insert(env.id, env);
        Ok(())
    }

    fn list_for_codebase(&self, codebase_id: &CodebaseId) -> Result<Vec<IsolationEnvironment>, StorageError> {
        Ok(self
            .inner
            .lock()
            .by_id
            .values()
            .filter(|env| &env.codebase_id == codebase_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "isolation_store_tests.rs"]
mod tests;
