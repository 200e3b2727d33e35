// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! Workflow file discovery (spec §4.H).

use std::path::{Path, PathBuf};

use archon_core::WorkflowDefinition;

use crate::error::WorkflowError;

/// `WorkflowDefinition`s discovered under a single `cwd`'s
/// `.archon/workflows/` directory. Built fresh per call — no process-wide
/// cache, since the set of workflows is scoped to one `cwd` (spec §3).
#[derive(Debug, Clone, Default)]
pub struct WorkflowRegistry {
    workflows: Vec<WorkflowDefinition>,
}

impl WorkflowRegistry {
    /// Scan `<cwd>/.archon/workflows/` recursively for `.yml`/`.yaml` files.
    /// A file that fails to read or parse is skipped (logged), never fails
    /// the whole discovery.
    pub fn discover(cwd: &Path) -> Result<Self, WorkflowError> {
        let dir = cwd.join(".archon").join("workflows");
        if !dir.exists() {
            return Ok(Self::default());
        }

        let mut workflows = Vec::new();
        for path in collect_workflow_files(&dir)? {
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable workflow file");
                    continue;
                }
            };
            match serde_yaml::from_str::<WorkflowDefinition>(&content) {
                Ok(def) => workflows.push(def),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping invalid workflow file");
                }
            }
        }
        workflows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { workflows })
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkflowDefinition> {
        self.workflows.iter()
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

fn is_workflow_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yml") | Some("yaml"))
}

fn collect_workflow_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_workflow_file(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
