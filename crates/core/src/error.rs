// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Error classification and credential sanitization (spec §7).
//!
//! `classify_error` maps a raw error message to a safe, user-facing string
//! by substring match, first rule wins. `sanitize` replaces known secret
//! values and GitHub-style embedded credentials before a string reaches a
//! log line or a platform message; treated as infallible (regex/substring
//! replace only, never fails).

use std::collections::HashSet;

/// One entry in the fixed classification table (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimit,
    Auth,
    Timeout,
    Database,
    Session,
    AssistantSpecific,
    ShortSafeGeneric,
    Fallback,
}

/// Whether the user may retry the action that produced this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    UserLevel,
    No,
    Unspecified,
}

/// Result of classifying a raw error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub user_message: String,
    pub retry: RetryPolicy,
}

const SENSITIVE_WORDS: [&str; 4] = ["password", "token", "secret", "key="];

/// Classify a raw error message per the fixed substring table in spec §7.
/// First matching rule wins; the table is checked top to bottom.
pub fn classify_error(message: &str) -> ClassifiedError {
    if message.contains("rate limit") || message.contains("Rate limit") {
        return ClassifiedError {
            kind: ErrorKind::RateLimit,
            user_message: "AI rate limit reached. Please wait a moment and try again."
                .to_string(),
            retry: RetryPolicy::UserLevel,
        };
    }
    if message.contains("API key") || message.contains("authentication") || message.contains("401")
    {
        return ClassifiedError {
            kind: ErrorKind::Auth,
            user_message: "AI service authentication error. Please check configuration."
                .to_string(),
            retry: RetryPolicy::No,
        };
    }
    if message.contains("timeout") || message.contains("ETIMEDOUT") {
        return ClassifiedError {
            kind: ErrorKind::Timeout,
            user_message: "Request timed out. Try again or use /reset.".to_string(),
            retry: RetryPolicy::UserLevel,
        };
    }
    if message.contains("ECONNREFUSED") || message.contains("database") {
        return ClassifiedError {
            kind: ErrorKind::Database,
            user_message: "Database connection issue. Please try again in a moment.".to_string(),
            retry: RetryPolicy::UserLevel,
        };
    }
    if message.contains("session") || message.contains("Session") {
        return ClassifiedError {
            kind: ErrorKind::Session,
            user_message: "Session error. Use /reset to start a fresh session.".to_string(),
            retry: RetryPolicy::UserLevel,
        };
    }
    const ASSISTANT_MARKER: &str = "Codex query failed:";
    if let Some(marker_pos) = message.find(ASSISTANT_MARKER) {
        let inner = message[marker_pos + ASSISTANT_MARKER.len()..].trim();
        return ClassifiedError {
            kind: ErrorKind::AssistantSpecific,
            user_message: format!("AI error: {}. Try /reset if issue persists.", inner),
            retry: RetryPolicy::UserLevel,
        };
    }
    if (1..100).contains(&message.len()) && !SENSITIVE_WORDS.iter().any(|w| message.contains(w)) {
        return ClassifiedError {
            kind: ErrorKind::ShortSafeGeneric,
            user_message: format!("Error: {}. Try /reset if issue persists.", message),
            retry: RetryPolicy::Unspecified,
        };
    }
    ClassifiedError {
        kind: ErrorKind::Fallback,
        user_message: "An unexpected error occurred. Try /reset to start a fresh session."
            .to_string(),
        retry: RetryPolicy::Unspecified,
    }
}

/// Isolation-creation error sub-taxonomy (spec §7). Always appends the fixed
/// "blocked to prevent changes" suffix.
pub fn classify_isolation_error(message: &str) -> String {
    let lower = message.to_lowercase();
    let reason = if lower.contains("permission denied") || lower.contains("eacces") {
        "permissions"
    } else if lower.contains("timeout") {
        "slow/unavailable"
    } else if lower.contains("no space left") || lower.contains("enospc") {
        "disk full"
    } else if lower.contains("not a git repository") {
        "invalid target"
    } else {
        "generic"
    };
    format!(
        "{} Execution blocked to prevent changes to shared codebase. Please resolve the issue and try again.",
        reason
    )
}

/// Replaces known secret values and GitHub-style embedded credentials in any
/// string bound for a log line or a user-visible message. Infallible:
/// regex/substring replace only, no parsing that can fail.
pub struct CredentialSanitizer {
    secrets: HashSet<String>,
}

impl CredentialSanitizer {
    /// Build a sanitizer from a fixed allowlist of environment variable
    /// names; any variable that's actually set becomes a value to redact.
    pub fn from_env_allowlist(var_names: &[&str]) -> Self {
        let secrets = var_names
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .filter(|v| !v.is_empty())
            .collect();
        Self { secrets }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn from_values(values: impl IntoIterator<Item = String>) -> Self {
        Self { secrets: values.into_iter().filter(|v| !v.is_empty()).collect() }
    }

    /// Replace every occurrence of a known secret value, then redact any
    /// `https://<user>@github.com` embedded credential.
    pub fn sanitize(&self, input: &str) -> String {
        let mut out = input.to_string();
        for secret in &self.secrets {
            out = out.replace(secret.as_str(), "[REDACTED]");
        }
        redact_github_credentials(&out)
    }
}

fn redact_github_credentials(input: &str) -> String {
    const SCHEME: &str = "https://";
    const HOST: &str = "@github.com";
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(scheme_pos) = rest.find(SCHEME) {
        let after_scheme = &rest[scheme_pos + SCHEME.len()..];
        if let Some(host_pos) = after_scheme.find(HOST) {
            // Guard against the scheme showing up without an '@' before the
            // host boundary immediately preceding it (i.e. no embedded
            // credential at all — a bare https://github.com link).
            let candidate = &after_scheme[..host_pos];
            if !candidate.is_empty() && !candidate.contains('/') && !candidate.contains(' ') {
                out.push_str(&rest[..scheme_pos]);
                out.push_str(SCHEME);
                out.push_str("[REDACTED]");
                out.push_str(HOST);
                rest = &after_scheme[host_pos + HOST.len()..];
                continue;
            }
        }
        out.push_str(&rest[..scheme_pos + SCHEME.len()]);
        rest = after_scheme;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
