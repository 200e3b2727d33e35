// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! archon-workflow: discovers `WorkflowDefinition`s under a `cwd`'s
//! `.archon/workflows/` directory, substitutes `$1..$9`/`$ARGUMENTS`
//! variables into command/template bodies, builds the workflow-aware
//! router prompt, and detects `/invoke-workflow` handoff directives
//! (spec §4.H, §4.I, §6).

pub mod error;
pub mod registry;
pub mod router;
pub mod substitution;

pub use error::WorkflowError;
pub use registry::WorkflowRegistry;
pub use router::{build_router_prompt, detect_invocation, wrap_command_body};
pub use substitution::substitute;
