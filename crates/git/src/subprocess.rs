// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Subprocess helper shared by `GitCliService` and `IsolationProvider`'s
//! PR-fetch/checkout steps. Mirrors the daemon's `run_with_timeout`
//! wrapping pattern: every `git` invocation gets a label (for error
//! messages and tracing) and a timeout (spec §5 — 30s for network/worktree
//! ops, 10s for local ops; the exact durations live in
//! `archon_core::config`).

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use crate::error::GitError;

pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, GitError> {
    let output = tokio::time::timeout(timeout, cmd.output()).await.map_err(|_| {
        GitError::Timeout { label: label.to_string(), secs: timeout.as_secs() }
    })?;
    output.map_err(|source| GitError::Io { label: label.to_string(), source })
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
