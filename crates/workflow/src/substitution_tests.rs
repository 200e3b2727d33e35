// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn substitutes_positional_arguments() {
    let out = substitute("Fix $1 in $2", &args(&["bug-42", "auth.rs"]));
    assert_eq!(out, "Fix bug-42 in auth.rs");
}

#[test]
fn substitutes_arguments_token_with_joined_args() {
    let out = substitute("run: $ARGUMENTS", &args(&["--fast", "--verbose"]));
    assert_eq!(out, "run: --fast --verbose");
}

#[test]
fn leaves_missing_positionals_verbatim() {
    let out = substitute("$1 and $3", &args(&["only-one"]));
    assert_eq!(out, "only-one and $3");
}

#[test]
fn unescapes_literal_dollar() {
    let out = substitute(r"price is \$5", &[]);
    assert_eq!(out, "price is $5");
}

#[test]
fn empty_args_list_yields_empty_arguments_token() {
    let out = substitute("$ARGUMENTS", &[]);
    assert_eq!(out, "");
}
