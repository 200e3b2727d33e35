// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[test]
fn new_session_is_active_with_no_resume_token() {
    let s = Session::new(ConversationId::new(), CodebaseId::new(), "claude", 100);
    assert!(s.active);
    assert!(s.assistant_session_id.is_none());
    assert!(s.last_command().is_none());
}

#[test]
fn deactivate_sets_ended_at() {
    let mut s = Session::builder().build();
    s.deactivate(500);
    assert!(!s.active);
    assert_eq!(s.ended_at, Some(500));
}

#[test]
fn last_command_roundtrips_through_metadata() {
    let mut s = Session::builder().build();
    s.set_last_command("plan-feature");
    assert_eq!(s.last_command(), Some("plan-feature"));
}
