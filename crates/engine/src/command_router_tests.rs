// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use archon_core::ConversationBuilder;

use super::*;

#[test]
fn deterministic_command_names_cover_spec_table() {
    for name in [
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
    ] {
        assert!(is_deterministic(name), "{name} should be deterministic");
    }
    assert!(!is_deterministic("command-invoke"));
}

#[test]
fn null_router_returns_canned_reply_for_known_command() {
    let router = NullCommandRouter;
    let conversation = ConversationBuilder::default().build();

    let outcome = router.handle(&conversation, "/status").unwrap();
    assert_eq!(outcome, RouterOutcome { message: "status executed".to_string(), modified: false });
}

#[test]
fn null_router_handles_command_with_arguments() {
    let router = NullCommandRouter;
    let conversation = ConversationBuilder::default().build();

    let outcome = router.handle(&conversation, "/setcwd /some/path").unwrap();
    assert_eq!(outcome.message, "setcwd executed");
}

#[test]
fn null_router_errors_on_unknown_command() {
    let router = NullCommandRouter;
    let conversation = ConversationBuilder::default().build();

    let err = router.handle(&conversation, "/not-a-real-command").unwrap_err();
    assert_eq!(err, RouterError::Unknown("not-a-real-command".to_string()));
}
