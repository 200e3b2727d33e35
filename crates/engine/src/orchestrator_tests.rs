// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use std::fs;
use std::sync::Arc;

use archon_adapters::{MockAssistantClient, MockPlatformAdapter};
use archon_core::{Codebase, CodebaseBuilder, CodebaseId, CommandEntry, Conversation, FakeClock, PlatformType};
use archon_git::FakeGitService;
use archon_storage::{
    identity_key_string, CodebaseStore, ConversationStore, InMemoryCodebaseStore, InMemoryConversationStore,
    InMemoryIsolationStore, InMemorySessionStore, InMemoryTemplateStore,
};
use archon_wire::{AssistantChunk, StreamingMode};
use tempfile::tempdir;

use crate::cleanup::NullCleanupService;
use crate::command_router::NullCommandRouter;
use crate::isolation_resolver::IsolationResolver;
use crate::workflow_executor::NullWorkflowExecutor;

use super::*;

struct Harness {
    orchestrator: Orchestrator<FakeClock>,
    platform: Arc<MockPlatformAdapter>,
    assistant: Arc<MockAssistantClient>,
    conversations: Arc<InMemoryConversationStore>,
    codebases: Arc<InMemoryCodebaseStore>,
    executor: Arc<NullWorkflowExecutor>,
}

fn harness(streaming_mode: StreamingMode) -> Harness {
    let conversations = Arc::new(InMemoryConversationStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let codebases = Arc::new(InMemoryCodebaseStore::new());
    let templates = Arc::new(InMemoryTemplateStore::new());
    let git = Arc::new(FakeGitService::new());
    let isolation_store = Arc::new(InMemoryIsolationStore::new());
    let resolver = IsolationResolver::new(git, isolation_store, Arc::new(NullCleanupService), FakeClock::new(), 25, 30);
    let platform = Arc::new(MockPlatformAdapter::new(PlatformType::Mock, streaming_mode));
    let assistant = Arc::new(MockAssistantClient::new());
    let executor = Arc::new(NullWorkflowExecutor::new());

    let orchestrator = Orchestrator::new(
        conversations.clone(),
        sessions,
        codebases.clone(),
        templates,
        resolver,
        Arc::new(NullCommandRouter),
        executor.clone(),
        platform.clone(),
        assistant.clone(),
        FakeClock::new(),
        "claude",
        4,
    );

    Harness { orchestrator, platform, assistant, conversations, codebases, executor }
}

/// Registers a codebase with a fixed command table rooted at `cwd`.
fn register_codebase(h: &Harness, cwd: &std::path::Path) -> CodebaseId {
    let codebase: Codebase = CodebaseBuilder::default()
        .repository_url("https://github.com/example/demo.git")
        .default_cwd(cwd.to_path_buf())
        .commands(
            [
                ("plan".to_string(), CommandEntry { path: "commands/plan.md".to_string(), description: "plan".to_string() }),
                (
                    "plan-feature".to_string(),
                    CommandEntry { path: "commands/plan.md".to_string(), description: "plan".to_string() },
                ),
                (
                    "execute".to_string(),
                    CommandEntry { path: "commands/execute.md".to_string(), description: "execute".to_string() },
                ),
            ]
            .into_iter()
            .collect(),
        )
        .build();
    h.codebases.upsert(codebase.clone()).unwrap();
    codebase.id
}

/// Pre-seeds a conversation already bound to `codebase_id`, the way a
/// prior `/repo`/`/clone` deterministic command would have left it.
fn bind_conversation(h: &Harness, platform_conversation_id: &str, codebase_id: CodebaseId) {
    let mut conversation = Conversation::new(PlatformType::Mock, platform_conversation_id, "claude", 1_000_000);
    conversation.codebase_id = Some(codebase_id);
    h.conversations.upsert(conversation).unwrap();
    let identity = identity_key_string(PlatformType::Mock, platform_conversation_id);
    assert!(h.conversations.find_by_identity(&identity).unwrap().is_some());
}

#[tokio::test]
async fn slash_passthrough_runs_deterministic_command_without_assistant() {
    let h = harness(StreamingMode::Batch);
    h.orchestrator.handle_message("chat-1", "/status", None, None, None, None).await.unwrap();

    let sent = h.platform.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "status executed");
    assert!(h.assistant.recorded_queries().is_empty());
}

#[tokio::test]
async fn shell_split_keeps_quoted_phrase_as_one_token() {
    let tokens = shell_split(r#"plan "Add dark mode" --flag"#);
    assert_eq!(tokens, vec!["plan".to_string(), "Add dark mode".to_string(), "--flag".to_string()]);
}

#[tokio::test]
async fn command_invoke_substitutes_a_quoted_positional_and_resumes_the_session() {
    let repo = tempdir().unwrap();
    fs::create_dir_all(repo.path().join("commands")).unwrap();
    fs::write(repo.path().join("commands").join("plan.md"), "Plan: $1").unwrap();

    let h = harness(StreamingMode::Batch);
    let codebase_id = register_codebase(&h, repo.path());
    bind_conversation(&h, "chat-1", codebase_id);

    h.orchestrator
        .handle_message("chat-1", r#"/command-invoke plan "Add dark mode""#, None, None, None, None)
        .await
        .unwrap();

    let first = h.assistant.recorded_queries();
    assert_eq!(first.len(), 1);
    assert!(first[0].prompt.contains("Plan: Add dark mode"));
    assert_eq!(first[0].resume_token, None);

    // Second turn on the same conversation resumes the session the first
    // turn's `result` chunk established (spec §4.K step 6/8).
    h.orchestrator.handle_message("chat-1", r#"/command-invoke plan "Again""#, None, None, None, None).await.unwrap();
    let second = h.assistant.recorded_queries();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].resume_token.as_deref(), Some("mock-session"));
}

#[tokio::test]
async fn plan_to_execute_rotation_starts_a_fresh_session_with_no_resume_token() {
    let repo = tempdir().unwrap();
    fs::create_dir_all(repo.path().join("commands")).unwrap();
    fs::write(repo.path().join("commands").join("plan.md"), "Plan: $ARGUMENTS").unwrap();
    fs::write(repo.path().join("commands").join("execute.md"), "Execute: $ARGUMENTS").unwrap();

    let h = harness(StreamingMode::Batch);
    let codebase_id = register_codebase(&h, repo.path());
    bind_conversation(&h, "chat-1", codebase_id);

    h.orchestrator
        .handle_message("chat-1", "/command-invoke plan-feature build the thing", None, None, None, None)
        .await
        .unwrap();
    let after_plan = h.assistant.recorded_queries();
    assert_eq!(after_plan.last().unwrap().resume_token, None);

    // Without rotation the second turn would resume `mock-session`; the
    // plan -> execute transition must deactivate it and start fresh.
    h.orchestrator.handle_message("chat-1", "/command-invoke execute now", None, None, None, None).await.unwrap();
    let after_execute = h.assistant.recorded_queries();
    assert_eq!(after_execute.len(), 2);
    assert_eq!(after_execute[1].resume_token, None);
}

#[tokio::test]
async fn workflow_invocation_hands_off_and_sends_only_the_preamble() {
    let repo = tempdir().unwrap();
    let workflows_dir = repo.path().join(".archon").join("workflows");
    fs::create_dir_all(&workflows_dir).unwrap();
    fs::write(workflows_dir.join("deploy.yml"), "name: deploy\ndescription: Deploy the service\nsteps: []\n").unwrap();

    let h = harness(StreamingMode::Batch);
    let codebase_id = register_codebase(&h, repo.path());
    bind_conversation(&h, "chat-1", codebase_id);

    h.assistant.set_script(vec![
        AssistantChunk::Assistant {
            content: "Sure, I'll handle this.\n/invoke-workflow deploy\nStarting the deployment now.".to_string(),
        },
        AssistantChunk::Result { session_id: "sess-1".to_string() },
    ]);

    h.orchestrator.handle_message("chat-1", "please deploy this", None, None, None, None).await.unwrap();

    let invocations = h.executor.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].workflow_name, "deploy");
    assert_eq!(invocations[0].original_message, "please deploy this");

    let sent = h.platform.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].text.contains("/invoke-workflow"));
}

#[tokio::test]
async fn no_invocation_directive_sends_full_text_and_skips_the_executor() {
    let repo = tempdir().unwrap();
    let h = harness(StreamingMode::Batch);
    let codebase_id = register_codebase(&h, repo.path());
    bind_conversation(&h, "chat-1", codebase_id);

    h.assistant.set_script(vec![
        AssistantChunk::Assistant { content: "Just a conversational reply, no handoff here.".to_string() },
        AssistantChunk::Result { session_id: "sess-1".to_string() },
    ]);

    h.orchestrator.handle_message("chat-1", "what's the status?", None, None, None, None).await.unwrap();

    assert!(h.executor.invocations().is_empty());
    let sent = h.platform.sent_messages();
    assert_eq!(sent.last().unwrap().text, "Just a conversational reply, no handoff here.");
}

#[tokio::test]
async fn batch_mode_tool_indicator_blocks_are_filtered_from_the_final_reply() {
    let repo = tempdir().unwrap();
    let h = harness(StreamingMode::Batch);
    let codebase_id = register_codebase(&h, repo.path());
    bind_conversation(&h, "chat-1", codebase_id);

    h.assistant.set_script(vec![
        AssistantChunk::Assistant { content: "🔧 BASH\nnpm test\n\nClean summary here".to_string() },
        AssistantChunk::Result { session_id: "sess-1".to_string() },
    ]);

    h.orchestrator.handle_message("chat-1", "run the tests please", None, None, None, None).await.unwrap();

    let sent = h.platform.sent_messages();
    assert_eq!(sent.last().unwrap().text, "Clean summary here");
}
