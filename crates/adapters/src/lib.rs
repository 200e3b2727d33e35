// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! archon-adapters: the `PlatformAdapter` and `AssistantClient`
//! collaborator traits (spec §6), their in-memory mocks, thin per-platform
//! stubs, and the pure allowlist-parsing helpers of the Authorization
//! section.

pub mod assistant;
pub mod authorization;
pub mod discord;
pub mod error;
pub mod github;
pub mod mock_assistant;
pub mod mock_platform;
pub mod platform;
pub mod slack;
pub mod telegram;

pub use assistant::{AssistantChunkStream, AssistantClient};
pub use discord::DiscordAdapter;
pub use error::AdapterError;
pub use github::GitHubAdapter;
pub use mock_assistant::{MockAssistantClient, RecordedQuery};
pub use mock_platform::{MockPlatformAdapter, SentMessage};
pub use platform::PlatformAdapter;
pub use slack::SlackAdapter;
pub use telegram::TelegramAdapter;
