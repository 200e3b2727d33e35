// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `TemplateStore`: global command templates (`/template-add`, the
//! `command-invoke` fallback, and the non-slash `router` template all read
//! from the same namespace, spec §4.K steps 2/3). Template *bodies* are
//! plain substitution strings (spec §6); management (`template-add`,
//! `template-delete`, `template-list`/`templates`) is deterministic
//! `CommandRouter` business logic and thus out of scope here — this store
//! only holds the `name -> body` mapping both sides read and write.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StorageError;

pub trait TemplateStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;
    fn upsert(&self, name: &str, body: String) -> Result<(), StorageError>;
    fn delete(&self, name: &str) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<String>, StorageError>;
}

#[derive(Default, Clone)]
pub struct InMemoryTemplateStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().get(name).cloned())
    }

    fn upsert(&self, name: &str, body: String) -> Result<(), StorageError> {
        self.inner.lock().insert(name.to_string(), body);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.inner.lock().remove(name);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self.inner.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
#[path = "template_store_tests.rs"]
mod tests;
