// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Variable substitution for command files and templates (spec §6):
//! `$1`..`$9` positional, `$ARGUMENTS` = all args joined by a single space,
//! `\$` → literal `$`. Missing positionals are left verbatim.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\$|\$ARGUMENTS|\$([1-9])").expect("constant regex pattern is valid"));

/// Substitute `$1`..`$9`, `$ARGUMENTS`, and `\$` in `template` using `args`.
pub fn substitute(template: &str, args: &[String]) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let whole = &caps[0];
            if whole == r"\$" {
                return "$".to_string();
            }
            if whole == "$ARGUMENTS" {
                return args.join(" ");
            }
            match caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                Some(n) => args.get(n - 1).cloned().unwrap_or_else(|| whole.to_string()),
                None => whole.to_string(),
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "substitution_tests.rs"]
mod tests;
