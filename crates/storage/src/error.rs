// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

/// Errors a repository implementation can raise. Out-of-process
/// implementations (spec §4.E/F explicitly scope persistence as an
/// external collaborator) are expected to map their own failures onto
/// this set; the in-memory reference stores only ever raise `NotFound`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("no record found for {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
