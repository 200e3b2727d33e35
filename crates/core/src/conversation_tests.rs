// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[test]
fn new_has_no_codebase_or_isolation() {
    let c = Conversation::new(PlatformType::Telegram, "123", "claude", 1000);
    assert_eq!(c.identity_key(), (PlatformType::Telegram, "123"));
    assert!(c.codebase_id.is_none());
    assert!(c.isolation_env_id.is_none());
    assert_eq!(c.created_at, 1000);
}

#[test]
fn inherit_from_parent_only_when_missing_codebase() {
    let mut parent = Conversation::new(PlatformType::GitHub, "issue-1", "claude", 0);
    parent.codebase_id = Some(CodebaseId::new());
    parent.cwd = Some(PathBuf::from("/workspace/project"));

    let mut child = Conversation::new(PlatformType::GitHub, "issue-1-thread", "claude", 0);
    child.inherit_from_parent(&parent);
    assert_eq!(child.codebase_id, parent.codebase_id);
    assert_eq!(child.cwd, parent.cwd);

    // Already has a codebase: inheritance must not overwrite it.
    let existing = CodebaseId::new();
    let mut child2 = Conversation::new(PlatformType::GitHub, "issue-2", "claude", 0);
    child2.codebase_id = Some(existing);
    child2.inherit_from_parent(&parent);
    assert_eq!(child2.codebase_id, Some(existing));
}

#[test]
fn clear_isolation_resets_reference() {
    let mut c = Conversation::new(PlatformType::Slack, "c1", "claude", 0);
    c.isolation_env_id = Some(IsolationEnvironmentId::new());
    c.clear_isolation();
    assert!(c.isolation_env_id.is_none());
}
