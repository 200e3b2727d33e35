// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Adapter-level authorization (spec §6): pure allowlist parsing/matching
//! helpers, one pair per platform's id shape. An empty allowlist always
//! means open access.

/// Telegram/Discord numeric-id allowlist: comma-separated, parsed as
/// non-zero positive integers. Malformed entries are dropped, not fatal.
pub fn parse_numeric_allowlist(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .filter(|&id| id > 0)
        .collect()
}

pub fn is_telegram_authorized(allowlist: &[u64], user_id: u64) -> bool {
    allowlist.is_empty() || allowlist.contains(&user_id)
}

pub fn is_discord_authorized(allowlist: &[u64], user_id: u64) -> bool {
    allowlist.is_empty() || allowlist.contains(&user_id)
}

/// Slack allowlist: comma-separated ids matching `^[UW][A-Z0-9]+$`.
pub fn parse_slack_allowlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| is_slack_id_shape(s))
        .map(str::to_string)
        .collect()
}

pub fn is_slack_authorized(allowlist: &[String], user_id: &str) -> bool {
    allowlist.is_empty() || allowlist.iter().any(|id| id == user_id)
}

fn is_slack_id_shape(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('U') | Some('W') => {}
        _ => return false,
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Discord allowlist: comma-separated ids matching `^\d+$`, parsed as
/// non-zero positive integers (same shape as Telegram).
pub fn parse_discord_allowlist(raw: &str) -> Vec<u64> {
    parse_numeric_allowlist(raw)
}

/// GitHub allowlist: comma-separated usernames, trimmed and lowercased;
/// comparison is case-insensitive.
pub fn parse_github_allowlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn is_github_authorized(allowlist: &[String], username: &str) -> bool {
    allowlist.is_empty() || allowlist.iter().any(|u| u == &username.to_lowercase())
}

#[cfg(test)]
#[path = "authorization_tests.rs"]
mod tests;
