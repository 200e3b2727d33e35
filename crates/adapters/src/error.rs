// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("unknown conversation: {0}")]
    NotFound(String),
    #[error("failed to send message: {0}")]
    SendFailed(String),
    #[error("{0} is a stub in this build; command bodies are out of scope")]
    NotImplemented(&'static str),
}
