// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `archond`: demo wiring for the orchestrator.
//!
//! There is no real transport here — no Telegram/Discord/Slack/GitHub
//! webhook listener, no persistent store, no real assistant SDK. This
//! binary exists to prove the collaborators actually wire together, the
//! way `ojd` exists to run the daemon rather than to be a feature in its
//! own right: it builds the in-memory stores, a `FakeGitService`, a
//! `MockPlatformAdapter`/`MockAssistantClient` pair, and drives a short
//! scripted conversation through `Orchestrator::handle_message`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use archon_adapters::{MockAssistantClient, MockPlatformAdapter};
use archon_core::{
    Clock, Codebase, CommandEntry, Conversation, IsolationEnvironment, IsolationEnvironmentId, IsolationProviderKind,
    IsolationStatus, OrchestratorConfig, PlatformType, SystemClock, WorkflowType,
};
use archon_engine::{IsolationResolver, NullCleanupService, NullCommandRouter, NullWorkflowExecutor, Orchestrator};
use archon_git::FakeGitService;
use archon_storage::{
    CodebaseStore, ConversationStore, InMemoryCodebaseStore, InMemoryConversationStore, InMemoryIsolationStore,
    InMemorySessionStore, InMemoryTemplateStore, IsolationStore,
};
use archon_wire::{AssistantChunk, StreamingMode};

/// Demo entry point for the archon orchestrator.
#[derive(Parser)]
#[command(name = "archond", author, version, about = "Demo wiring for the archon orchestrator", long_about = None)]
struct Cli {
    /// Conversation id to drive through the demo script.
    #[arg(long, default_value = "demo-chat")]
    conversation_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let repo_dir = std::env::temp_dir().join(format!("archon-demo-{}", std::process::id()));
    let demo = seed_demo_repo(&repo_dir)?;

    let conversations = Arc::new(InMemoryConversationStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let codebases = Arc::new(InMemoryCodebaseStore::new());
    let templates = Arc::new(InMemoryTemplateStore::new());
    let git = Arc::new(FakeGitService::new());
    let isolation_store = Arc::new(InMemoryIsolationStore::new());
    let config = OrchestratorConfig::default();
    let resolver = IsolationResolver::new(
        git.clone(),
        isolation_store.clone(),
        Arc::new(NullCleanupService),
        SystemClock,
        config.max_worktrees_per_codebase,
        config.stale_threshold_days,
    );
    let platform = Arc::new(MockPlatformAdapter::new(PlatformType::Mock, StreamingMode::Batch));
    let assistant = Arc::new(MockAssistantClient::new());

    let orchestrator = Orchestrator::new(
        conversations.clone(),
        sessions,
        codebases.clone(),
        templates,
        resolver,
        Arc::new(NullCommandRouter),
        Arc::new(NullWorkflowExecutor::new()),
        platform.clone(),
        assistant.clone(),
        SystemClock,
        "claude",
        config.max_concurrent,
    );

    codebases.upsert(demo.codebase.clone())?;
    // `/clone`/`/repo` bodies are a named non-goal (spec §4.K step 2 scope
    // note), so the demo binds the conversation to its codebase directly,
    // the way a prior deterministic command would have left it.
    let mut conversation = Conversation::new(PlatformType::Mock, &cli.conversation_id, "claude", SystemClock.epoch_ms());
    conversation.codebase_id = Some(demo.codebase.id);

    // `FakeGitService` never creates a worktree on disk, so step 5 of
    // isolation resolution would hand back a path nothing was ever written
    // to. Pre-seed the conversation's thread slot onto the repo directory
    // itself so reuse (step 1) keeps every turn pointed at the commands and
    // workflows `seed_demo_repo` actually wrote.
    git.seed_worktree(repo_dir.clone(), repo_dir.clone(), "main");
    isolation_store.upsert(IsolationEnvironment {
        id: IsolationEnvironmentId::new(),
        codebase_id: demo.codebase.id,
        workflow_type: WorkflowType::Thread,
        workflow_id: conversation.id.to_string(),
        provider: IsolationProviderKind::Worktree,
        working_path: repo_dir.clone(),
        branch_name: "main".to_string(),
        status: IsolationStatus::Active,
        created_by_platform: "mock".to_string(),
        created_at: SystemClock.epoch_ms(),
        metadata: Default::default(),
    })?;

    conversations.upsert(conversation)?;

    tracing::info!("running deterministic command");
    orchestrator.handle_message(&cli.conversation_id, "/status", None, None, None, None).await?;

    tracing::info!("running a custom command against the demo codebase");
    orchestrator
        .handle_message(&cli.conversation_id, r#"/command-invoke plan "add a dark mode toggle""#, None, None, None, None)
        .await?;

    tracing::info!("running a workflow-invoking non-slash message");
    assistant.set_script(vec![
        AssistantChunk::Assistant {
            content: "I'll kick off the deploy workflow.\n/invoke-workflow deploy\nDeployment started.".to_string(),
        },
        AssistantChunk::Result { session_id: "demo-session".to_string() },
    ]);
    orchestrator.handle_message(&cli.conversation_id, "please deploy this", None, None, None, None).await?;

    for sent in platform.sent_messages() {
        println!("[{}] {}", sent.conversation_id, sent.text);
    }
    tracing::info!(?config, stats = ?orchestrator.lock_stats(), "demo run complete");

    let _ = fs::remove_dir_all(&repo_dir);
    Ok(())
}

struct DemoRepo {
    codebase: Codebase,
}

/// Writes a throwaway repo directory with one custom command and one
/// workflow definition so the demo exercises `command-invoke` and the
/// workflow-invocation hand-off without a real git checkout.
fn seed_demo_repo(repo_dir: &PathBuf) -> anyhow::Result<DemoRepo> {
    let commands_dir = repo_dir.join("commands");
    fs::create_dir_all(&commands_dir)?;
    fs::write(commands_dir.join("plan.md"), "Draft a plan for: $ARGUMENTS")?;

    let workflows_dir = repo_dir.join(".archon").join("workflows");
    fs::create_dir_all(&workflows_dir)?;
    fs::write(workflows_dir.join("deploy.yml"), "name: deploy\ndescription: Deploy the service\nsteps: []\n")?;

    let mut codebase = Codebase::new("demo", "https://github.com/example/demo.git", repo_dir.clone(), "claude");
    codebase.commands.insert(
        "plan".to_string(),
        CommandEntry { path: "commands/plan.md".to_string(), description: "Draft a plan".to_string() },
    );
    Ok(DemoRepo { codebase })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
