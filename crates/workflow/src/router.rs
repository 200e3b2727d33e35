// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Workflow-aware router prompt construction and invocation-directive
//! detection (spec §4.I, §6), plus the command-body wrapper every
//! assistant-invoking command path shares.

use regex::Regex;
use std::sync::LazyLock;

use archon_core::RouterContext;

use crate::registry::WorkflowRegistry;

#[allow(clippy::expect_used)]
static INVOKE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)/invoke-workflow\s+(\S+)").expect("constant regex pattern is valid"));

/// Build the prompt that asks the assistant to either answer conversationally
/// or hand off to a named workflow via `/invoke-workflow <name>`.
pub fn build_router_prompt(text: &str, workflows: &WorkflowRegistry, ctx: &RouterContext) -> String {
    let mut prompt = String::from(
        "You can either respond directly to the user, or hand this request off to one \
         of the following workflows. To hand off, emit exactly one line of the form \
         `/invoke-workflow <name>` followed by a short, human-readable preamble \
         describing what you're about to do.\n\n",
    );

    for workflow in workflows.iter() {
        prompt.push_str(&format!("- {} — {}\n", workflow.name, workflow.description));
    }
    prompt.push('\n');

    if let Some(platform) = &ctx.platform_type {
        prompt.push_str(&format!("Platform: {platform}\n"));
    }
    if let Some(title) = &ctx.title {
        prompt.push_str(&format!("Title: {title}\n"));
    }
    if !ctx.labels.is_empty() {
        prompt.push_str(&format!("Labels: {}\n", ctx.labels.join(", ")));
    }
    if let Some(is_pr) = ctx.is_pull_request {
        prompt.push_str(&format!("Is pull request: {is_pr}\n"));
    }
    if let Some(workflow_type) = &ctx.workflow_type {
        prompt.push_str(&format!("Workflow type: {workflow_type}\n"));
    }
    if let Some(history) = &ctx.thread_history {
        prompt.push_str(&format!("\nThread history:\n{history}\n"));
    }

    prompt.push_str(&format!("\n## Request\n\n{text}\n"));
    prompt
}

/// Parse the assistant's combined text for the first `/invoke-workflow
/// <token>` directive naming a workflow known to `workflows`. Unknown tokens
/// are ignored (treated as conversational). Returns `(name, preamble_before,
/// preamble_after)` on a hit.
pub fn detect_invocation(text: &str, workflows: &WorkflowRegistry) -> Option<(String, String, String)> {
    for caps in INVOKE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(token_match)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let token = token_match.as_str();
        if !workflows.contains(token) {
            continue;
        }
        let before = text[..whole.start()].trim().to_string();
        let after = text[whole.end()..].trim().to_string();
        return Some((token.to_string(), before, after));
    }
    None
}

/// Wrap a command's rendered body in the standard assistant-facing
/// instruction envelope (spec §6).
pub fn wrap_command_body(name: &str, content: &str) -> String {
    format!(
        "The user invoked the `/{name}` command. Execute the following instructions \
         immediately without asking for confirmation:\n\n---\n\n{content}\n\n---\n\n\
         Remember: The user already decided to run this command. Take action now."
    )
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
