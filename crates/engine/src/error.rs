// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Engine-crate error types. Most internal failures are best-effort and
//! swallowed per spec §7 propagation rules; this enum only covers the
//! handful of paths where the caller must see a distinct failure mode.

use archon_adapters::AdapterError;
use archon_git::GitError;
use archon_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Git(#[from] GitError),
    /// Reached a step that requires `conversation.codebase_id` to already
    /// be set; callers are expected to have checked this and messaged the
    /// user before invoking the step (spec §4.K step 3).
    #[error("no codebase configured for this conversation")]
    NoCodebase,
}
