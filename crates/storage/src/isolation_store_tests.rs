// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;
use archon_core::{CodebaseId, IsolationEnvironment};

#[test]
fn upsert_then_get_by_id() {
    let store = InMemoryIsolationStore::new();
    let env = IsolationEnvironment::builder().build();
    store.upsert(env.clone()).expect("upsert");
    assert_eq!(store.get(&env.id).expect("get"), Some(env));
}

#[test]
fn find_by_scope_matches_the_tuple_key() {
    let store = InMemoryIsolationStore::new();
    let env = IsolationEnvironment::builder().workflow_id("42").build();
    let (codebase_id, workflow_type, workflow_id) = env.scope_key();
    let key = scope_key_string(codebase_id, workflow_type, workflow_id);
    store.upsert(env.clone()).expect("upsert");
    assert_eq!(store.find_by_scope(&key).expect("find"), Some(env));
}

#[test]
fn list_for_codebase_filters_by_owner() {
    let store = InMemoryIsolationStore::new();
    let codebase_id = CodebaseId::new();
    let mine = IsolationEnvironment::builder().codebase_id(codebase_id).workflow_id("1").build();
    let other = IsolationEnvironment::builder().workflow_id("2").build();
    store.upsert(mine).expect("upsert mine");
    store.upsert(other).expect("upsert other");

    let listed = store.list_for_codebase(&codebase_id).expect("list");
    assert_eq!(listed.len(), 1);
}
