// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! archon-git: the `GitService` collaborator contract (spec §6), its real
//! `git`-CLI-backed implementation, an in-memory fake for engine tests,
//! and `IsolationProvider`, which turns a resolved isolation request into
//! an actual worktree.

pub mod cli_service;
pub mod error;
pub mod fake;
pub mod isolation_provider;
pub mod service;
pub mod subprocess;

pub use cli_service::GitCliService;
pub use error::GitError;
pub use fake::FakeGitService;
pub use isolation_provider::{CreateRequest, CreatedWorktree, IsolationProvider};
pub use service::{GitService, WorktreeInfo};
