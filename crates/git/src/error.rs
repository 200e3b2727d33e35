// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

/// Errors surfaced by `GitService`/`IsolationProvider` git subprocess calls.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("{label} timed out after {secs}s")]
    Timeout { label: String, secs: u64 },
    #[error("{label} failed: {stderr}")]
    CommandFailed { label: String, stderr: String },
    #[error("io error running {label}: {source}")]
    Io { label: String, #[source] source: std::io::Error },
}
