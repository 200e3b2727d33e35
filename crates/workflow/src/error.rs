// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
