// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

//! `WorkflowDefinition`: the shape `archon-workflow`'s registry parses YAML
//! files into, and what `archon-engine`'s router prompt and invocation
//! detection operate over (spec §4.H/§4.I).

use serde::{Deserialize, Serialize};

/// A single step of a workflow. The spec treats step bodies as opaque
/// executor input; only `name` participates in routing/display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub run: Option<String>,
}

/// One `.yml`/`.yaml` file under `<cwd>/.archon/workflows/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct WorkflowDefinitionBuilder => WorkflowDefinition {
        into {
            name: String = "deploy",
            description: String = "Deploy the service",
        }
        set {
            steps: Vec<WorkflowStep> = Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
