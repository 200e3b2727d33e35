// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[tokio::test]
async fn successful_command_returns_output() {
    let mut cmd = Command::new("true");
    cmd.kill_on_drop(true);
    let output = run_with_timeout(cmd, Duration::from_secs(5), "true").await.expect("run");
    assert!(output.status.success());
}

#[tokio::test]
async fn slow_command_times_out() {
    let mut cmd = Command::new("sleep");
    cmd.arg("5").kill_on_drop(true);
    let err = run_with_timeout(cmd, Duration::from_millis(50), "sleep").await.unwrap_err();
    assert!(matches!(err, GitError::Timeout { secs: 0, .. }));
}

#[tokio::test]
async fn missing_binary_is_an_io_error() {
    let cmd = Command::new("definitely-not-a-real-binary-xyz");
    let err = run_with_timeout(cmd, Duration::from_secs(5), "missing").await.unwrap_err();
    assert!(matches!(err, GitError::Io { .. }));
}
