// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use std::fs;

use tempfile::tempdir;

use super::*;

fn make_worktree(canonical: &Path, worktree: &Path) {
    fs::create_dir_all(canonical).unwrap();
    fs::create_dir_all(worktree).unwrap();
    let worktrees_dir = canonical.join(".git").join("worktrees").join("wt1");
    fs::create_dir_all(&worktrees_dir).unwrap();
    fs::write(worktree.join(".git"), format!("gitdir: {}\n", worktrees_dir.display())).unwrap();
}

#[test]
fn not_a_worktree_path_returns_false() {
    let dir = tempdir().unwrap();
    assert!(!sync(dir.path()));
}

#[test]
fn canonical_repo_path_resolves_from_gitdir() {
    let root = tempdir().unwrap();
    let canonical = root.path().join("repo");
    let worktree = root.path().join("wt");
    make_worktree(&canonical, &worktree);

    assert!(is_worktree_path(&worktree));
    assert_eq!(canonical_repo_path(&worktree), Some(canonical));
}

#[test]
fn missing_canonical_metadata_returns_false() {
    let root = tempdir().unwrap();
    let canonical = root.path().join("repo");
    let worktree = root.path().join("wt");
    make_worktree(&canonical, &worktree);

    assert!(!sync(&worktree));
}

#[test]
fn copies_archon_dir_when_worktree_copy_is_missing() {
    let root = tempdir().unwrap();
    let canonical = root.path().join("repo");
    let worktree = root.path().join("wt");
    make_worktree(&canonical, &worktree);

    let canonical_meta = canonical.join(".archon");
    fs::create_dir_all(&canonical_meta).unwrap();
    fs::write(canonical_meta.join("notes.md"), "hello").unwrap();

    assert!(sync(&worktree));
    assert_eq!(fs::read_to_string(worktree.join(".archon").join("notes.md")).unwrap(), "hello");
}

#[test]
fn skips_copy_when_worktree_metadata_is_already_current() {
    let root = tempdir().unwrap();
    let canonical = root.path().join("repo");
    let worktree = root.path().join("wt");
    make_worktree(&canonical, &worktree);

    let canonical_meta = canonical.join(".archon");
    fs::create_dir_all(&canonical_meta).unwrap();

    // The worktree's copy is created after the canonical one, so its
    // directory mtime is >= the canonical directory's mtime.
    fs::create_dir_all(worktree.join(".archon")).unwrap();

    assert!(!sync(&worktree));
}

#[test]
fn rejects_copy_entries_that_escape_their_root() {
    assert!(is_contained(".archon"));
    assert!(is_contained("docs/readme.md"));
    assert!(!is_contained("../secrets"));
    assert!(!is_contained("docs/../../escape"));
}

#[test]
fn copy_entry_parses_rename_syntax() {
    let entry = CopyEntry::parse("src/templates -> .archon/templates");
    assert_eq!(entry.src, "src/templates");
    assert_eq!(entry.dst, ".archon/templates");

    let plain = CopyEntry::parse(".archon");
    assert_eq!(plain.src, ".archon");
    assert_eq!(plain.dst, ".archon");
}
