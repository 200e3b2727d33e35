// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! A clonable repository already materialized under a canonical path.
//!
//! Read-only to the core: the core never clones, renames, or mutates a
//! codebase record, only looks one up by id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

crate::define_id! {
    /// Identifier for a registered codebase.
    pub struct CodebaseId("code-");
}

/// One entry in `Codebase::commands`: a named slash-command backed by a
/// markdown file relative to the codebase's `cwd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Path to the command's markdown body, relative to `cwd`.
    pub path: String,
    pub description: String,
}

/// A repository already cloned to disk at `default_cwd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Codebase {
    pub id: CodebaseId,
    pub name: String,
    pub repository_url: String,
    /// Canonical repo path; source of truth for worktrees created against
    /// it.
    pub default_cwd: PathBuf,
    pub ai_assistant_type: String,
    pub commands: HashMap<String, CommandEntry>,
}

impl Codebase {
    pub fn new(
        name: impl Into<String>,
        repository_url: impl Into<String>,
        default_cwd: PathBuf,
        ai_assistant_type: impl Into<String>,
    ) -> Self {
        Self {
            id: CodebaseId::new(),
            name: name.into(),
            repository_url: repository_url.into(),
            default_cwd,
            ai_assistant_type: ai_assistant_type.into(),
            commands: HashMap::new(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct CodebaseBuilder => Codebase {
        into {
            name: String = "demo",
            repository_url: String = "https://github.com/example/demo.git",
            ai_assistant_type: String = "claude",
        }
        set {
            id: CodebaseId = CodebaseId::new(),
            default_cwd: PathBuf = PathBuf::from("/workspace/demo"),
            commands: HashMap<String, CommandEntry> = HashMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "codebase_tests.rs"]
mod tests;
