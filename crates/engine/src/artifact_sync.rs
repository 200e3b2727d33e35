// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `ArtifactSync` (spec §4.J): keeps a worktree's `.archon` metadata
//! directory (and any configured extra paths) in sync with the canonical
//! repo's copy. Never panics or propagates filesystem errors upstream —
//! any non-ENOENT error is logged and the call reports "no copy happened".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const METADATA_DIR: &str = ".archon";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
struct RepoConfig {
    worktree: Option<WorktreeConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
struct WorktreeConfig {
    #[serde(default, rename = "copyFiles")]
    copy_files: Vec<String>,
}

/// One `copyFiles` entry, after parsing the optional `"src -> dst"` rename
/// syntax.
struct CopyEntry {
    src: String,
    dst: String,
}

impl CopyEntry {
    fn parse(raw: &str) -> Self {
        match raw.split_once("->") {
            Some((src, dst)) => CopyEntry { src: src.trim().to_string(), dst: dst.trim().to_string() },
            None => CopyEntry { src: raw.trim().to_string(), dst: raw.trim().to_string() },
        }
    }
}

/// Sync `.archon` (and configured extras) from the canonical repo into
/// `worktree_path`. Returns `true` if a copy happened.
pub fn sync(worktree_path: &Path) -> bool {
    if !is_worktree_path(worktree_path) {
        return false;
    }
    let Some(canonical) = canonical_repo_path(worktree_path) else {
        return false;
    };

    let canonical_metadata = canonical.join(METADATA_DIR);
    let Ok(canonical_mtime) = mtime(&canonical_metadata) else {
        return false;
    };

    let worktree_metadata = worktree_path.join(METADATA_DIR);
    if let Ok(worktree_mtime) = mtime(&worktree_metadata) {
        if worktree_mtime >= canonical_mtime {
            return false;
        }
    }

    let entries = copy_entries(&canonical);
    let mut copied_anything = false;
    for entry in entries {
        if !is_contained(&entry.src) || !is_contained(&entry.dst) {
            tracing::warn!(src = %entry.src, dst = %entry.dst, "skipping copyFiles entry that escapes its root");
            continue;
        }
        let src_path = canonical.join(&entry.src);
        let dst_path = worktree_path.join(&entry.dst);
        match copy_recursive(&src_path, &dst_path) {
            Ok(did_copy) => copied_anything |= did_copy,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(src = %src_path.display(), error = %err, "artifact sync copy failed"),
        }
    }
    copied_anything
}

/// Step 1: a `.git` entry that is a regular file whose first line starts
/// with `gitdir:` marks `path` as a worktree (as opposed to a canonical
/// clone, whose `.git` is a directory).
fn is_worktree_path(path: &Path) -> bool {
    let git_entry = path.join(".git");
    let Ok(metadata) = fs::symlink_metadata(&git_entry) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    fs::read_to_string(&git_entry)
        .map(|content| content.lines().next().is_some_and(|line| line.starts_with("gitdir:")))
        .unwrap_or(false)
}

/// Step 2: resolve the canonical repo root by parsing the `gitdir:`
/// target and stripping the `/.git/worktrees/<name>` suffix.
fn canonical_repo_path(path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(path.join(".git")).ok()?;
    let target = content.lines().next()?.strip_prefix("gitdir:")?.trim();
    let target = Path::new(target);
    let worktrees_dir = target.parent()?;
    if worktrees_dir.file_name()?.to_str()? != "worktrees" {
        return None;
    }
    let dot_git = worktrees_dir.parent()?;
    if dot_git.file_name()?.to_str()? != ".git" {
        return None;
    }
    dot_git.parent().map(Path::to_path_buf)
}

fn mtime(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Step 5: `worktree.copyFiles` from repo-local config, `".archon"`
/// ensured first.
fn copy_entries(canonical_repo: &Path) -> Vec<CopyEntry> {
    let config_path = canonical_repo.join(METADATA_DIR).join("config.toml");
    let configured: Vec<String> = fs::read_to_string(&config_path)
        .ok()
        .and_then(|content| toml::from_str::<RepoConfig>(&content).ok())
        .and_then(|config| config.worktree)
        .map(|w| w.copy_files)
        .unwrap_or_default();

    let mut paths = vec![METADATA_DIR.to_string()];
    for raw in configured {
        let entry = CopyEntry::parse(&raw);
        if entry.src != METADATA_DIR {
            paths.push(raw);
        }
    }
    paths.into_iter().map(|raw| CopyEntry::parse(&raw)).collect()
}

/// Reject any path segment that would escape its root via `..`.
fn is_contained(relative: &str) -> bool {
    Path::new(relative).components().all(|c| !matches!(c, std::path::Component::ParentDir))
}

fn copy_recursive(src: &Path, dst: &Path) -> std::io::Result<bool> {
    let metadata = fs::symlink_metadata(src)?;
    if metadata.is_dir() {
        fs::create_dir_all(dst)?;
        let mut copied_any = false;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            let child_dst = dst.join(entry.file_name());
            copied_any |= copy_recursive(&entry.path(), &child_dst)?;
        }
        Ok(copied_any)
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "artifact_sync_tests.rs"]
mod tests;
