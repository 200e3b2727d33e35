// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `Orchestrator` (spec §4.K): the end-to-end entry point. Ties together
//! every other engine collaborator into the eight-step `handle_message`
//! contract — conversation load/inheritance, slash-command dispatch,
//! non-slash routing, thread-context prepending, isolation resolution,
//! session selection, stream/batch output, and session persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use archon_core::{
    classify_error, Clock, Codebase, Conversation, CredentialSanitizer, IsolationEnvironment,
    IsolationHints, RouterContext, Session, WorkflowType,
};
use archon_wire::{AssistantChunk, StreamingMode};
use archon_workflow::{build_router_prompt, detect_invocation, substitute, wrap_command_body, WorkflowRegistry};
use futures_util::StreamExt;
use regex::Regex;

use archon_adapters::{AssistantClient, PlatformAdapter};
use archon_storage::{identity_key_string, CodebaseStore, ConversationStore, SessionStore, TemplateStore};

use crate::command_router::{is_deterministic, CommandRouter, RouterOutcome};
use crate::conversation_lock::{ConversationLock, LockStats};
use crate::error::EngineError;
use crate::isolation_resolver::{IsolationResolver, Resolution};
use crate::workflow_executor::{WorkflowExecutionContext, WorkflowExecutor};

const NO_CODEBASE_MESSAGE: &str =
    "No codebase configured. Use /clone for a new repo or /repos to list your current repos you can switch to.";

const INDICATOR_EMOJI: [&str; 7] = ["🔧", "💭", "📝", "✏️", "🗑️", "📂", "🔍"];

#[allow(clippy::expect_used)]
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:Issue|PR) #\d+: "([^"]+)""#).expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static LABELS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Labels: ([^\n]+)").expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static BLANK_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("constant regex pattern is valid"));

fn unknown_command_message(command: &str) -> String {
    format!("Unknown command: /{command}\n\nType /help for available commands or /templates for command templates.")
}

/// Quote-aware whitespace splitting for `command-invoke <name> [args...]`
/// (spec §8 scenario 2: `"Add dark mode"` is one positional). No escaping
/// or nested quotes — a minimal tokenizer, not a shell.
fn shell_split(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_current = false;
    for ch in raw.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_current = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_current {
                    tokens.push(std::mem::take(&mut current));
                    has_current = false;
                }
            }
            c => {
                current.push(c);
                has_current = true;
            }
        }
    }
    if has_current {
        tokens.push(current);
    }
    tokens
}

fn parse_workflow_type(raw: &str) -> WorkflowType {
    match raw {
        "thread" => WorkflowType::Thread,
        "issue" => WorkflowType::Issue,
        "pr" => WorkflowType::Pr,
        "review" => WorkflowType::Review,
        other => WorkflowType::Other(other.to_string()),
    }
}

fn truncate_one_line(s: &str, max_len: usize) -> String {
    let flat: String = s.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
    if flat.chars().count() <= max_len {
        flat
    } else {
        let truncated: String = flat.chars().take(max_len).collect();
        format!("{truncated}…")
    }
}

fn format_tool_header(name: &str, input: &HashMap<String, serde_json::Value>) -> String {
    let summary = serde_json::to_string(input).unwrap_or_default();
    format!("🔧 {}: {}", name.to_uppercase(), truncate_one_line(&summary, 80))
}

fn split_blocks(text: &str) -> Vec<&str> {
    BLANK_LINE_PATTERN.split(text).map(str::trim).filter(|b| !b.is_empty()).collect()
}

/// Batch-mode tool/thinking-indicator filter (spec §4.K step 7). Falls back
/// to the unfiltered joined text if every block gets dropped.
fn filter_indicator_blocks(joined: &str) -> String {
    let blocks = split_blocks(joined);
    let kept: Vec<&str> =
        blocks.iter().filter(|b| !INDICATOR_EMOJI.iter().any(|emoji| b.starts_with(emoji))).copied().collect();
    if kept.is_empty() {
        joined.trim().to_string()
    } else {
        kept.join("\n\n")
    }
}

/// RouterContext extraction (spec §4.I): `issueContext` if given, else the
/// raw text, scanned for the GitHub marker patterns.
fn extract_router_context(platform_type: &str, source: &str) -> RouterContext {
    let title = TITLE_PATTERN.captures(source).and_then(|c| c.get(1)).map(|m| m.as_str().to_string());
    let labels = LABELS_PATTERN
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();
    RouterContext {
        platform_type: Some(platform_type.to_string()),
        title,
        labels,
        is_pull_request: Some(source.contains("[GitHub Pull Request Context]")),
        workflow_type: None,
        thread_history: None,
    }
}

pub struct Orchestrator<Ck: Clock> {
    conversations: std::sync::Arc<dyn ConversationStore>,
    sessions: std::sync::Arc<dyn SessionStore>,
    codebases: std::sync::Arc<dyn CodebaseStore>,
    templates: std::sync::Arc<dyn TemplateStore>,
    resolver: IsolationResolver<Ck>,
    command_router: std::sync::Arc<dyn CommandRouter>,
    workflow_executor: std::sync::Arc<dyn WorkflowExecutor>,
    platform: std::sync::Arc<dyn PlatformAdapter>,
    assistant: std::sync::Arc<dyn AssistantClient>,
    sanitizer: CredentialSanitizer,
    clock: Ck,
    default_ai_assistant_type: String,
    lock: ConversationLock,
}

impl<Ck: Clock> Orchestrator<Ck> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversations: std::sync::Arc<dyn ConversationStore>,
        sessions: std::sync::Arc<dyn SessionStore>,
        codebases: std::sync::Arc<dyn CodebaseStore>,
        templates: std::sync::Arc<dyn TemplateStore>,
        resolver: IsolationResolver<Ck>,
        command_router: std::sync::Arc<dyn CommandRouter>,
        workflow_executor: std::sync::Arc<dyn WorkflowExecutor>,
        platform: std::sync::Arc<dyn PlatformAdapter>,
        assistant: std::sync::Arc<dyn AssistantClient>,
        clock: Ck,
        default_ai_assistant_type: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            conversations,
            sessions,
            codebases,
            templates,
            resolver,
            command_router,
            workflow_executor,
            platform,
            assistant,
            sanitizer: CredentialSanitizer::from_env_allowlist(&[
                "GITHUB_TOKEN",
                "TELEGRAM_BOT_TOKEN",
                "DISCORD_BOT_TOKEN",
                "SLACK_BOT_TOKEN",
                "ANTHROPIC_API_KEY",
                "OPENAI_API_KEY",
            ]),
            clock,
            default_ai_assistant_type: default_ai_assistant_type.into(),
            lock: ConversationLock::new(max_concurrent),
        }
    }

    /// Per-conversation FIFO gate (spec §4.D). The transport layer (a
    /// platform webhook handler, or `archon-daemon`'s dispatch loop) wraps
    /// concurrent inbound calls to `handle_message` in
    /// `lock_handle().acquire(conversationId, ...)`; a single sequential
    /// caller (tests, the demo binary) can call `handle_message` directly.
    pub fn lock_handle(&self) -> &ConversationLock {
        &self.lock
    }

    /// Read-only health accessor over the lock's current queue depth.
    pub fn lock_stats(&self) -> LockStats {
        self.lock.stats()
    }

    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), EngineError> {
        let clean = self.sanitizer.sanitize(text);
        self.platform.send_message(conversation_id, &clean).await?;
        Ok(())
    }

    /// Entry point (spec §4.K): `handleMessage(platform, conversationId,
    /// text, issueContext?, threadContext?, parentConversationId?,
    /// isolationHints?)`. `platform` is this orchestrator's own
    /// `PlatformAdapter` collaborator, fixed at construction.
    pub async fn handle_message(
        &self,
        platform_conversation_id: &str,
        text: &str,
        issue_context: Option<&str>,
        thread_context: Option<&str>,
        parent_conversation_id: Option<&str>,
        isolation_hints: Option<IsolationHints>,
    ) -> Result<(), EngineError> {
        let conversation = self.load_or_create_conversation(platform_conversation_id, parent_conversation_id)?;

        if let Some(stripped) = text.strip_prefix('/') {
            let mut parts = stripped.splitn(2, char::is_whitespace);
            let command = parts.next().unwrap_or("").to_string();
            let rest = parts.next().unwrap_or("").trim();

            if is_deterministic(&command) {
                return self.run_deterministic_command(&conversation, text).await;
            }
            if command == "command-invoke" {
                return self.run_command_invoke(conversation, rest, issue_context, thread_context, isolation_hints).await;
            }
            return self.run_unknown_command(conversation, &command, rest, issue_context, thread_context, isolation_hints).await;
        }

        self.run_non_slash(conversation, text, issue_context, thread_context, isolation_hints).await
    }

    fn load_or_create_conversation(
        &self,
        platform_conversation_id: &str,
        parent_conversation_id: Option<&str>,
    ) -> Result<Conversation, EngineError> {
        let platform_type = self.platform.platform_type();
        let identity = identity_key_string(platform_type, platform_conversation_id);
        let mut conversation = match self.conversations.find_by_identity(&identity)? {
            Some(existing) => existing,
            None => {
                let now = self.clock.epoch_ms();
                let fresh =
                    Conversation::new(platform_type, platform_conversation_id, self.default_ai_assistant_type.clone(), now);
                self.conversations.upsert(fresh.clone())?;
                fresh
            }
        };

        if let Some(parent_id) = parent_conversation_id {
            if conversation.codebase_id.is_none() {
                let parent_identity = identity_key_string(platform_type, parent_id);
                if let Some(parent) = self.conversations.find_by_identity(&parent_identity)? {
                    conversation.inherit_from_parent(&parent);
                    self.conversations.upsert(conversation.clone())?;
                }
            }
        }

        Ok(conversation)
    }

    async fn run_deterministic_command(&self, conversation: &Conversation, raw: &str) -> Result<(), EngineError> {
        // Router errors are sanitized `{message, modified: false}` values
        // (spec §7 propagation (a)), not a distinct engine failure mode.
        let outcome = self
            .command_router
            .handle(conversation, raw)
            .unwrap_or_else(|err| RouterOutcome { message: format!("Error: {err}"), modified: false });
        self.send(&conversation.platform_conversation_id, &outcome.message).await
        // `outcome.modified` asks the caller to reload the conversation
        // before continuing; there's nothing left to continue with here,
        // since a deterministic command always ends the turn.
    }

    async fn require_codebase(&self, conversation: &Conversation) -> Result<Option<Codebase>, EngineError> {
        let Some(codebase_id) = conversation.codebase_id else {
            self.send(&conversation.platform_conversation_id, NO_CODEBASE_MESSAGE).await?;
            return Ok(None);
        };
        match self.codebases.get(&codebase_id)? {
            Some(codebase) => Ok(Some(codebase)),
            None => {
                self.send(&conversation.platform_conversation_id, NO_CODEBASE_MESSAGE).await?;
                Ok(None)
            }
        }
    }

    async fn run_command_invoke(
        &self,
        conversation: Conversation,
        rest: &str,
        issue_context: Option<&str>,
        thread_context: Option<&str>,
        isolation_hints: Option<IsolationHints>,
    ) -> Result<(), EngineError> {
        let Some(codebase) = self.require_codebase(&conversation).await? else {
            return Ok(());
        };

        let mut tokens = shell_split(rest);
        if tokens.is_empty() {
            self.send(&conversation.platform_conversation_id, &unknown_command_message("command-invoke")).await?;
            return Ok(());
        }
        let name = tokens.remove(0);
        let args = tokens;

        let Some(entry) = codebase.commands.get(&name).cloned() else {
            self.send(&conversation.platform_conversation_id, &unknown_command_message(&name)).await?;
            return Ok(());
        };

        let effective_cwd = conversation.cwd.clone().unwrap_or_else(|| codebase.default_cwd.clone());
        let Ok(raw_body) = std::fs::read_to_string(effective_cwd.join(&entry.path)) else {
            self.send(&conversation.platform_conversation_id, &unknown_command_message(&name)).await?;
            return Ok(());
        };

        let substituted = substitute(&raw_body, &args);
        let mut prompt = wrap_command_body(&name, &substituted);
        if let Some(issue) = issue_context {
            prompt.push_str("\n\n---\n\n");
            prompt.push_str(issue);
        }

        self.run_turn(
            conversation,
            codebase,
            effective_cwd,
            prompt,
            name,
            rest.to_string(),
            thread_context,
            issue_context,
            isolation_hints,
            WorkflowRegistry::default(),
        )
        .await
    }

    async fn run_unknown_command(
        &self,
        conversation: Conversation,
        command: &str,
        rest: &str,
        issue_context: Option<&str>,
        thread_context: Option<&str>,
        isolation_hints: Option<IsolationHints>,
    ) -> Result<(), EngineError> {
        let Some(body) = self.templates.get(command)? else {
            self.send(&conversation.platform_conversation_id, &unknown_command_message(command)).await?;
            return Ok(());
        };
        let Some(codebase) = self.require_codebase(&conversation).await? else {
            return Ok(());
        };

        let args = shell_split(rest);
        let substituted = substitute(&body, &args);
        let mut prompt = wrap_command_body(command, &substituted);
        if let Some(issue) = issue_context {
            prompt.push_str("\n\n---\n\n");
            prompt.push_str(issue);
        }

        let effective_cwd = conversation.cwd.clone().unwrap_or_else(|| codebase.default_cwd.clone());
        self.run_turn(
            conversation,
            codebase,
            effective_cwd,
            prompt,
            command.to_string(),
            rest.to_string(),
            thread_context,
            issue_context,
            isolation_hints,
            WorkflowRegistry::default(),
        )
        .await
    }

    async fn run_non_slash(
        &self,
        conversation: Conversation,
        text: &str,
        issue_context: Option<&str>,
        thread_context: Option<&str>,
        isolation_hints: Option<IsolationHints>,
    ) -> Result<(), EngineError> {
        let Some(codebase) = self.require_codebase(&conversation).await? else {
            return Ok(());
        };

        let effective_cwd = conversation.cwd.clone().unwrap_or_else(|| codebase.default_cwd.clone());
        crate::artifact_sync::sync(&effective_cwd);

        let registry = match WorkflowRegistry::discover(&effective_cwd) {
            Ok(registry) => registry,
            Err(err) => {
                let message = err.to_string();
                let lower = message.to_lowercase();
                let silent = ["enoent", "no such file", "not found", "does not exist"].iter().any(|m| lower.contains(m));
                if !silent {
                    self.send(&conversation.platform_conversation_id, &format!("Warning: {message}")).await?;
                }
                WorkflowRegistry::default()
            }
        };

        let (prompt, command_name) = if !registry.is_empty() {
            let source = issue_context.unwrap_or(text);
            let ctx = extract_router_context(&self.platform.platform_type().to_string(), source);
            (build_router_prompt(text, &registry, &ctx), "workflow-router".to_string())
        } else if let Some(template) = self.templates.get("router")? {
            let substituted = substitute(&template, &[text.to_string()]);
            (wrap_command_body("router", &substituted), "router".to_string())
        } else {
            (text.to_string(), "router".to_string())
        };

        self.run_turn(
            conversation,
            codebase,
            effective_cwd,
            prompt,
            command_name,
            text.to_string(),
            thread_context,
            issue_context,
            isolation_hints,
            registry,
        )
        .await
    }

    /// Steps 4-8: thread-context prepend, isolation resolution, session
    /// selection, streaming/batching, and session persistence. Shared by
    /// all three assistant-invoking paths (`command-invoke`,
    /// unknown-command-as-template, non-slash routing).
    #[allow(clippy::too_many_arguments)]
    async fn run_turn(
        &self,
        mut conversation: Conversation,
        codebase: Codebase,
        mut cwd: PathBuf,
        mut prompt: String,
        command_name: String,
        original_message: String,
        thread_context: Option<&str>,
        issue_context: Option<&str>,
        isolation_hints: Option<IsolationHints>,
        registry: WorkflowRegistry,
    ) -> Result<(), EngineError> {
        if let Some(thread) = thread_context {
            prompt =
                format!("## Thread Context (previous messages)\n\n{thread}\n\n---\n\n## Current Request\n\n{prompt}");
        }

        let hints = isolation_hints.unwrap_or_default();
        let workflow_type = hints.workflow_type.as_deref().map(parse_workflow_type).unwrap_or(WorkflowType::Thread);
        let workflow_id = hints.workflow_id.clone().unwrap_or_else(|| conversation.id.to_string());

        if let Some(env_id) = conversation.isolation_env_id {
            if self.resolver.repair_stale_reference(&env_id).await {
                conversation.clear_isolation();
                self.conversations.upsert(conversation.clone())?;
            }
        }

        let platform_type = self.platform.platform_type().to_string();
        let (resolution, message) =
            self.resolver.resolve(&codebase, workflow_type, &workflow_id, &hints, &platform_type).await?;
        if let Some(msg) = &message {
            self.send(&conversation.platform_conversation_id, msg).await?;
        }
        let (env, is_new_isolation) = match resolution {
            Resolution::Ready { env, is_new } => (env, is_new),
            Resolution::Blocked => return Ok(()),
        };

        cwd = env.working_path.clone();
        conversation.isolation_env_id = Some(env.id);
        conversation.cwd = Some(cwd.clone());
        conversation.last_activity_at = self.clock.epoch_ms();
        self.conversations.upsert(conversation.clone())?;

        let now = self.clock.epoch_ms();
        let active_session = self.sessions.active_for_conversation(&conversation.id)?;
        let rotate_plan_execute = active_session.as_ref().and_then(|s| s.last_command()).is_some_and(|last| {
            (command_name == "execute" && last == "plan-feature")
                || (command_name == "execute-github" && last == "plan-feature-github")
        });

        let mut session = if is_new_isolation || rotate_plan_execute {
            if let Some(mut old) = active_session {
                old.deactivate(now);
                self.sessions.upsert(old)?;
            }
            Session::new(conversation.id, codebase.id, conversation.ai_assistant_type.clone(), now)
        } else if let Some(existing) = active_session {
            existing
        } else {
            Session::new(conversation.id, codebase.id, conversation.ai_assistant_type.clone(), now)
        };
        let resume_token = session.assistant_session_id.clone();

        let stream = match self.assistant.send_query(&prompt, &cwd.to_string_lossy(), resume_token.as_deref()).await {
            Ok(stream) => stream,
            Err(err) => {
                let classified = classify_error(&err.to_string());
                self.send(&conversation.platform_conversation_id, &classified.user_message).await?;
                return Ok(());
            }
        };
        futures_util::pin_mut!(stream);

        match self.platform.streaming_mode() {
            StreamingMode::Stream => {
                let mut assistant_chunks: Vec<String> = Vec::new();
                while let Some(chunk) = stream.next().await {
                    match chunk {
                        AssistantChunk::Tool { name, input } => {
                            let header = format_tool_header(&name, &input);
                            self.send(&conversation.platform_conversation_id, &header).await?;
                        }
                        AssistantChunk::Assistant { content } => assistant_chunks.push(content),
                        AssistantChunk::Thinking { .. } => {}
                        AssistantChunk::Result { session_id } => session.assistant_session_id = Some(session_id),
                    }
                }

                let combined = assistant_chunks.concat();
                let handoff = self
                    .maybe_handoff(&combined, &registry, &conversation, &codebase, &cwd, &original_message, &env, issue_context, &hints)
                    .await?;
                match handoff {
                    Some(preamble) => {
                        if !preamble.is_empty() {
                            self.send(&conversation.platform_conversation_id, &preamble).await?;
                        }
                    }
                    None => {
                        for chunk in assistant_chunks {
                            self.send(&conversation.platform_conversation_id, &chunk).await?;
                        }
                    }
                }
            }
            StreamingMode::Batch => {
                let mut assistant_chunks: Vec<String> = Vec::new();
                while let Some(chunk) = stream.next().await {
                    match chunk {
                        AssistantChunk::Assistant { content } => assistant_chunks.push(content),
                        AssistantChunk::Tool { .. } | AssistantChunk::Thinking { .. } => {}
                        AssistantChunk::Result { session_id } => session.assistant_session_id = Some(session_id),
                    }
                }

                let joined = assistant_chunks.join("\n\n---\n\n");
                let cleaned = filter_indicator_blocks(&joined);
                let handoff = self
                    .maybe_handoff(&cleaned, &registry, &conversation, &codebase, &cwd, &original_message, &env, issue_context, &hints)
                    .await?;
                match handoff {
                    Some(preamble) => {
                        if !preamble.is_empty() {
                            self.send(&conversation.platform_conversation_id, &preamble).await?;
                        }
                    }
                    None => {
                        self.send(&conversation.platform_conversation_id, &cleaned).await?;
                    }
                }
            }
        }

        session.set_last_command(command_name);
        if let Err(err) = self.sessions.upsert(session) {
            tracing::warn!(error = %err, "failed to persist session state");
        }
        Ok(())
    }

    /// Workflow-invocation detection and hand-off (spec §4.I). Returns
    /// `Some(preamble)` when a directive fired (the caller sends the
    /// preamble and suppresses the rest), `None` when the caller should
    /// send the full/cleaned text unchanged.
    #[allow(clippy::too_many_arguments)]
    async fn maybe_handoff(
        &self,
        combined_text: &str,
        registry: &WorkflowRegistry,
        conversation: &Conversation,
        codebase: &Codebase,
        cwd: &Path,
        original_message: &str,
        env: &IsolationEnvironment,
        issue_context: Option<&str>,
        hints: &IsolationHints,
    ) -> Result<Option<String>, EngineError> {
        let Some((name, before, after)) = detect_invocation(combined_text, registry) else {
            return Ok(None);
        };
        let Some(workflow) = registry.get(&name).cloned() else {
            return Ok(None);
        };
        let preamble = match (before.is_empty(), after.is_empty()) {
            (true, true) => String::new(),
            (false, true) => before,
            (true, false) => after,
            (false, false) => format!("{before}\n\n{after}"),
        };

        let ctx = WorkflowExecutionContext {
            branch_name: env.branch_name.clone(),
            is_pr_review: matches!(env.workflow_type, WorkflowType::Pr),
            pr_sha: hints.pr_sha.clone(),
            pr_branch: hints.pr_branch.clone(),
        };
        self.workflow_executor
            .execute_workflow(
                &self.platform.platform_type().to_string(),
                &conversation.platform_conversation_id,
                &cwd.to_string_lossy(),
                &workflow,
                original_message,
                conversation.id,
                codebase.id,
                issue_context,
                ctx,
            )
            .await?;
        Ok(Some(preamble))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
