// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Platform identity.
//!
//! Half of a [`crate::conversation::Conversation`]'s identity tuple. A closed
//! enum instead of a bare string so the identity key can't be built from a
//! typo'd platform name.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The chat platform or source-control event source a message arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    Telegram,
    Discord,
    Slack,
    /// Generic GitHub-style webhook source (issues, PRs).
    GitHub,
    /// Synthetic test adapter.
    Mock,
}

crate::simple_display! {
    PlatformType {
        Telegram => "telegram",
        Discord => "discord",
        Slack => "slack",
        GitHub => "github",
        Mock => "mock",
    }
}

/// Error returned when parsing an unknown platform tag.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown platform type: {0}")]
pub struct UnknownPlatformType(pub String);

impl FromStr for PlatformType {
    type Err = UnknownPlatformType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(Self::Telegram),
            "discord" => Ok(Self::Discord),
            "slack" => Ok(Self::Slack),
            "github" => Ok(Self::GitHub),
            "mock" => Ok(Self::Mock),
            other => Err(UnknownPlatformType(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
