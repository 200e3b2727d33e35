// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the archon authors

use super::*;

#[test]
fn builder_produces_expected_defaults() {
    let def = WorkflowDefinition::builder().build();
    assert_eq!(def.name, "deploy");
    assert!(def.steps.is_empty());
}

#[test]
fn roundtrips_through_yaml() {
    let def = WorkflowDefinition {
        name: "triage".to_string(),
        description: "Triage an incoming issue".to_string(),
        steps: vec![WorkflowStep {
            name: "classify".to_string(),
            description: Some("label the issue".to_string()),
            run: None,
        }],
    };
    let yaml = serde_yaml::to_string(&def).expect("serialize");
    let back: WorkflowDefinition = serde_yaml::from_str(&yaml).expect("deserialize");
    assert_eq!(def, back);
}

#[test]
fn missing_optional_fields_default() {
    let yaml = "name: bare\n";
    let def: WorkflowDefinition = serde_yaml::from_str(yaml).expect("deserialize");
    assert_eq!(def.name, "bare");
    assert_eq!(def.description, "");
    assert!(def.steps.is_empty());
}
