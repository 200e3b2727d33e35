// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `CodebaseStore`: registered codebases, looked up by id or by the
//! operator-facing `name` used in `/clone`-style commands.

use std::collections::HashMap;
use std::sync::Arc;

use archon_core::{Codebase, CodebaseId};
use parking_lot::Mutex;

use crate::error::StorageError;

pub trait CodebaseStore: Send + Sync {
    fn get(&self, id: &CodebaseId) -> Result<Option<Codebase>, StorageError>;
    fn find_by_name(&self, name: &str) -> Result<Option<Codebase>, StorageError>;
    fn upsert(&self, codebase: Codebase) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<Codebase>, StorageError>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<CodebaseId, Codebase>,
    by_name: HashMap<String, CodebaseId>,
}

#[derive(Default, Clone)]
pub struct InMemoryCodebaseStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryCodebaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodebaseStore for InMemoryCodebaseStore {
    fn get(&self, id: &CodebaseId) -> Result<Option<Codebase>, StorageError> {
        Ok(self.inner.lock().by_id.get(id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Codebase>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner.by_name.get(name).and_then(|id| inner.by_id.get(id)).cloned())
    }

    fn upsert(&self, codebase: Codebase) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        inner.by_name.insert(codebase.name.clone(), codebase.id);
        inner.by_id.insert(codebase.id, codebase);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Codebase>, StorageError> {
        Ok(self.inner.lock().by_id.values().cloned().collect())
    }
}

#[cfg(test)]
#[path = "codebase_store_tests.rs"]
mod tests;
