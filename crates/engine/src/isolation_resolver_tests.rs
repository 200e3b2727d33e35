// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use std::path::PathBuf;
use std::sync::Arc;

use archon_core::{CodebaseBuilder, FakeClock, IsolationEnvironmentBuilder, IsolationHints, WorkflowType};
use archon_git::FakeGitService;
use archon_storage::{InMemoryIsolationStore, IsolationStore};

use crate::cleanup::NullCleanupService;

use super::*;

fn resolver(
    git: Arc<FakeGitService>,
    store: Arc<InMemoryIsolationStore>,
    max_worktrees: usize,
) -> IsolationResolver<FakeClock> {
    IsolationResolver::new(git, store, Arc::new(NullCleanupService), FakeClock::new(), max_worktrees, 30)
}

#[tokio::test]
async fn reuses_existing_environment_when_worktree_still_exists() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default().default_cwd(PathBuf::from("/repo")).build();

    let existing = IsolationEnvironmentBuilder::default()
        .codebase_id(codebase.id)
        .workflow_id("42")
        .working_path(PathBuf::from("/repo/.worktrees/issue-42"))
        .build();
    git.seed_worktree("/repo", "/repo/.worktrees/issue-42", "issue-42");
    store.upsert(existing.clone()).unwrap();

    let resolver = resolver(git, store, 25);
    let (resolution, msg) = resolver
        .resolve(&codebase, WorkflowType::Issue, "42", &IsolationHints::default(), "mock")
        .await
        .unwrap();

    assert!(msg.is_none());
    match resolution {
        Resolution::Ready { env, is_new } => {
            assert_eq!(env.id, existing.id);
            assert!(!is_new);
        }
        Resolution::Blocked => panic!("expected Ready"),
    }
}

#[tokio::test]
async fn link_based_sharing_reuses_linked_issue_worktree() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default().default_cwd(PathBuf::from("/repo")).build();

    let linked = IsolationEnvironmentBuilder::default()
        .codebase_id(codebase.id)
        .workflow_id("7")
        .working_path(PathBuf::from("/repo/.worktrees/issue-7"))
        .build();
    git.seed_worktree("/repo", "/repo/.worktrees/issue-7", "issue-7");
    store.upsert(linked).unwrap();

    let hints = IsolationHints { linked_issues: vec![7], ..Default::default() };
    let resolver = resolver(git, store, 25);
    let (resolution, msg) = resolver.resolve(&codebase, WorkflowType::Pr, "9", &hints, "mock").await.unwrap();

    assert_eq!(msg, Some("Reusing worktree from issue #7".to_string()));
    assert!(matches!(resolution, Resolution::Ready { is_new: false, .. }));
}

#[tokio::test]
async fn skill_adoption_creates_record_for_found_branch() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default().default_cwd(PathBuf::from("/repo")).build();
    git.seed_worktree("/repo", "/repo/.worktrees/pr-9-review", "pr-9-review");

    let hints = IsolationHints { pr_branch: Some("pr-9-review".to_string()), ..Default::default() };
    let resolver = resolver(git, store.clone(), 25);
    let (resolution, _msg) = resolver.resolve(&codebase, WorkflowType::Pr, "9", &hints, "mock").await.unwrap();

    match resolution {
        Resolution::Ready { env, is_new } => {
            assert!(!is_new);
            assert_eq!(env.metadata.get("adopted").map(String::as_str), Some("true"));
            assert_eq!(env.metadata.get("adopted_from").map(String::as_str), Some("skill"));
        }
        Resolution::Blocked => panic!("expected Ready"),
    }
    assert_eq!(store.list_for_codebase(&codebase.id).unwrap().len(), 1);
}

#[tokio::test]
async fn creates_fresh_environment_when_nothing_to_reuse() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default()
        .default_cwd(PathBuf::from("/repo"))
        .repository_url("https://github.com/acme/demo.git")
        .build();

    let resolver = resolver(git, store.clone(), 25);
    let (resolution, msg) = resolver
        .resolve(&codebase, WorkflowType::Issue, "42", &IsolationHints::default(), "mock")
        .await
        .unwrap();

    assert!(msg.is_none());
    assert!(matches!(resolution, Resolution::Ready { is_new: true, .. }));
    assert_eq!(store.list_for_codebase(&codebase.id).unwrap().len(), 1);
}

#[tokio::test]
async fn blocks_at_limit_when_cleanup_finds_nothing() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default().name("demo").default_cwd(PathBuf::from("/repo")).build();

    for i in 0..2 {
        let env = IsolationEnvironmentBuilder::default()
            .codebase_id(codebase.id)
            .workflow_id(i.to_string())
            .working_path(PathBuf::from(format!("/repo/.worktrees/issue-{i}")))
            .build();
        store.upsert(env).unwrap();
    }

    let resolver = resolver(git, store, 2);
    let (resolution, msg) = resolver
        .resolve(&codebase, WorkflowType::Issue, "99", &IsolationHints::default(), "mock")
        .await
        .unwrap();

    assert!(matches!(resolution, Resolution::Blocked));
    let msg = msg.unwrap();
    assert!(msg.starts_with("Worktree limit reached (2/2) for **demo**."));
}

#[tokio::test]
async fn creation_failure_messages_and_blocks() {
    let git = Arc::new(FakeGitService::new());
    git.fail_next_create();
    let store = Arc::new(InMemoryIsolationStore::new());
    let codebase = CodebaseBuilder::default().default_cwd(PathBuf::from("/repo")).build();

    let resolver = resolver(git, store, 25);
    let (resolution, msg) = resolver
        .resolve(&codebase, WorkflowType::Issue, "1", &IsolationHints::default(), "mock")
        .await
        .unwrap();

    assert!(matches!(resolution, Resolution::Blocked));
    assert!(msg.unwrap().contains("Execution blocked to prevent changes to shared codebase."));
}

#[tokio::test]
async fn repair_clears_reference_when_worktree_path_is_gone() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let env = IsolationEnvironmentBuilder::default()
        .working_path(PathBuf::from("/repo/.worktrees/missing"))
        .build();
    store.upsert(env.clone()).unwrap();

    let resolver = resolver(git, store.clone(), 25);
    let repaired = resolver.repair_stale_reference(&env.id).await;

    assert!(repaired);
    let stored = store.get(&env.id).unwrap().unwrap();
    assert!(!stored.is_active());
}

#[tokio::test]
async fn repair_is_noop_when_worktree_still_exists() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let env = IsolationEnvironmentBuilder::default()
        .working_path(PathBuf::from("/repo/.worktrees/alive"))
        .build();
    git.seed_worktree("/repo", "/repo/.worktrees/alive", "issue-1");
    store.upsert(env.clone()).unwrap();

    let resolver = resolver(git, store.clone(), 25);
    let repaired = resolver.repair_stale_reference(&env.id).await;

    assert!(!repaired);
    assert!(store.get(&env.id).unwrap().unwrap().is_active());
}

#[tokio::test]
async fn repair_tolerates_missing_row() {
    let git = Arc::new(FakeGitService::new());
    let store = Arc::new(InMemoryIsolationStore::new());
    let resolver = resolver(git, store, 25);

    let repaired = resolver.repair_stale_reference(&archon_core::IsolationEnvironmentId::new()).await;
    assert!(repaired);
}
