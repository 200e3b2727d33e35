// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `CommandRouter` (spec §4.G): dispatches the fixed set of deterministic
//! slash commands (spec §4.K step 2) without invoking the assistant.
//!
//! Command *bodies* (`/clone`, `/repo-remove`, …) are an explicit
//! non-goal; this module implements the dispatch *shape* — the fixed name
//! table, the `{message, modified}` contract, and an "unknown name" error
//! — and leaves `NullCommandRouter` as the reference implementation used
//! by the demo binary and engine tests.

use archon_core::Conversation;

/// The deterministic command names handled entirely by `CommandRouter`
/// (spec §4.K step 2); anything else falls through to `command-invoke` or
/// the unknown-command-as-template path.
pub const DETERMINISTIC_COMMANDS: &[&str] = &[
    "help",
    "status",
    "getcwd",
    "setcwd",
    "clone",
    "repos",
    "repo",
    "repo-remove",
    "reset",
    "reset-context",
    "command-set",
    "load-commands",
    "commands",
    "template-add",
    "template-list",
    "templates",
    "template-delete",
    "worktree",
    "workflow",
];

pub fn is_deterministic(command: &str) -> bool {
    DETERMINISTIC_COMMANDS.contains(&command)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOutcome {
    pub message: String,
    /// Whether the router mutated the conversation; the orchestrator must
    /// reload it before continuing when this is `true`.
    pub modified: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("no handler for deterministic command /{0}")]
    Unknown(String),
}

pub trait CommandRouter: Send + Sync {
    fn handle(&self, conversation: &Conversation, raw: &str) -> Result<RouterOutcome, RouterError>;
}

/// Reference `CommandRouter`: for each name in `DETERMINISTIC_COMMANDS`
/// returns a canned "<cmd> executed" reply with `modified: false`, never
/// touching the conversation. The business logic behind each command is
/// out of scope (spec §4.K step 2 scope note) — this only proves out the
/// dispatch table shape.
#[derive(Default)]
pub struct NullCommandRouter;

impl CommandRouter for NullCommandRouter {
    fn handle(&self, _conversation: &Conversation, raw: &str) -> Result<RouterOutcome, RouterError> {
        let command = raw.trim_start_matches('/').split_whitespace().next().unwrap_or("");
        if is_deterministic(command) {
            Ok(RouterOutcome { message: format!("{command} executed"), modified: false })
        } else {
            Err(RouterError::Unknown(command.to_string()))
        }
    }
}

#[cfg(test)]
#[path = "command_router_tests.rs"]
mod tests;
