// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[test]
fn scope_key_identifies_workflow_slot() {
    let env = IsolationEnvironment::builder().workflow_id("42").build();
    let (_, wf_type, wf_id) = env.scope_key();
    assert_eq!(wf_type, "thread");
    assert_eq!(wf_id, "42");
}

#[test]
fn destroy_is_monotonic() {
    let mut env = IsolationEnvironment::builder().build();
    assert!(env.is_active());
    env.destroy();
    assert_eq!(env.status, IsolationStatus::Destroyed);
    env.destroy();
    assert_eq!(env.status, IsolationStatus::Destroyed);
}

#[test]
fn other_workflow_type_passes_through_as_str() {
    let wf = WorkflowType::Other("release".to_string());
    assert_eq!(wf.as_str(), "release");
}
