//! Tests for the reverse compiler: traversal, recovery and topological ordering.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use procflow::graph::StepMetadata;
use procflow::mapping;
use procflow::prelude::*;
use serde_json::json;

const NOOP: &str = "n8n-nodes-base.noOp";

fn titles(document: &ProcedureDocument) -> Vec<&str> {
    document.steps.iter().map(|s| s.title.as_str()).collect()
}

#[test]
fn test_dependency_order_overrides_declaration_order() {
    let graph = create_graph(
        vec![
            create_node("A", NOOP),
            create_node("B", NOOP),
            create_node("C", NOOP),
        ],
        &[("C", "B"), ("B", "A")],
    );

    let document = decompile(&graph).expect("Failed to decompile");
    assert_eq!(titles(&document), vec!["C", "B", "A"]);
    let orders: Vec<u32> = document.steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let c = &document.steps[0];
    let b = &document.steps[1];
    let a = &document.steps[2];
    assert_eq!(c.next_steps, vec![b.id.clone()]);
    assert_eq!(b.next_steps, vec![a.id.clone()]);
    assert!(a.next_steps.is_empty());
}

#[test]
fn test_cyclic_graph_is_rejected() {
    let graph = create_graph(
        vec![create_node("A", NOOP), create_node("B", NOOP)],
        &[("A", "B"), ("B", "A")],
    );

    match decompile(&graph) {
        Err(CompilationError::CyclicGraph { nodes }) => {
            assert_eq!(nodes, vec!["A".to_string(), "B".to_string()]);
        }
        other => panic!("Expected CyclicGraph error, got {:?}", other),
    }
}

#[test]
fn test_cycle_behind_a_trigger_is_rejected() {
    let graph = create_graph(
        vec![
            create_node("Start", mapping::MANUAL_TRIGGER_NODE),
            create_node("A", NOOP),
            create_node("B", NOOP),
            create_node("C", NOOP),
        ],
        &[("Start", "A"), ("A", "B"), ("B", "C"), ("C", "B")],
    );

    match decompile(&graph) {
        Err(CompilationError::CyclicGraph { nodes }) => {
            assert_eq!(nodes, vec!["B".to_string(), "C".to_string()]);
        }
        other => panic!("Expected CyclicGraph error, got {:?}", other),
    }
}

#[test]
fn test_graph_without_step_nodes_is_rejected() {
    let graph = create_graph(
        vec![create_node("Start", mapping::MANUAL_TRIGGER_NODE)],
        &[],
    );

    match decompile(&graph) {
        Err(CompilationError::NoStepNodes { graph }) => assert_eq!(graph, "Test Graph"),
        other => panic!("Expected NoStepNodes error, got {:?}", other),
    }
}

#[test]
fn test_missing_trigger_is_a_warning() {
    let graph = create_graph(vec![create_node("Only", NOOP)], &[]);

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    assert!(decompilation.document.triggers.is_empty());
    assert_eq!(
        decompilation.warnings,
        vec![StructuralWarning::MissingTrigger]
    );
}

#[test]
fn test_trigger_is_recovered_with_its_config() {
    let mut start = create_node("Every Hour", "n8n-nodes-base.scheduleTrigger");
    start.parameters.insert("rule".to_string(), json!({ "interval": [{ "field": "hours" }] }));
    let graph = create_graph(
        vec![start, create_node("Work", "n8n-nodes-base.code")],
        &[("Every Hour", "Work")],
    );

    let document = decompile(&graph).expect("Failed to decompile");
    assert_eq!(document.title, "Test Graph");
    assert_eq!(document.triggers.len(), 1);
    assert_eq!(
        document.triggers[0].kind,
        Declared::Known(TriggerKind::Schedule)
    );
    assert_eq!(
        document.triggers[0].config.get("rule"),
        Some(&json!({ "interval": [{ "field": "hours" }] }))
    );
    assert_eq!(document.steps.len(), 1);
    assert_eq!(document.steps[0].action_type.as_deref(), Some("run_code"));
}

#[test]
fn test_nodes_without_metadata_use_the_type_map() {
    let mut wait = create_node("Hold", mapping::WAIT_NODE);
    wait.notes = Some("Give the customer a day".to_string());
    let graph = create_graph(
        vec![
            create_node("Call API", "n8n-nodes-base.httpRequest"),
            wait,
            create_node("Child", mapping::EXECUTE_WORKFLOW_NODE),
        ],
        &[("Call API", "Hold"), ("Hold", "Child")],
    );

    let document = decompile(&graph).expect("Failed to decompile");
    let kinds: Vec<Option<StepKind>> = document.steps.iter().map(Step::kind).collect();
    assert_eq!(
        kinds,
        vec![
            Some(StepKind::Action),
            Some(StepKind::Wait),
            Some(StepKind::Subprocess),
        ]
    );
    assert_eq!(document.steps[0].action_type.as_deref(), Some("http_request"));
    assert_eq!(document.steps[0].description, "Perform the 'Call API' action");
    assert_eq!(document.steps[1].description, "Give the customer a day");
    let ids: Vec<&str> = document.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["step_1", "step_2", "step_3"]);
}

#[test]
fn test_unknown_node_type_becomes_generic_action() {
    let mut graph = create_graph(vec![create_node("Mystery", "acme.quantumNode")], &[]);
    graph.nodes[0]
        .parameters
        .insert("qubits".to_string(), json!(3));

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("unknown node types never fail");
    let step = &decompilation.document.steps[0];
    assert_eq!(step.kind(), Some(StepKind::Action));
    assert_eq!(step.action_type, None);
    assert_eq!(step.parameters.get("qubits"), Some(&json!(3)));
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::UnknownNodeType {
            node: "Mystery".to_string(),
            node_type: "acme.quantumNode".to_string(),
        }));
}

#[test]
fn test_custom_action_mapping_is_read_back() {
    let graph = create_graph(vec![create_node("Fax", "acme.fax")], &[]);

    let decompilation = Decompiler::builder(&graph)
        .with_action_mapping("fax_machine", "acme.fax", 1.0)
        .build()
        .decompile()
        .expect("Failed to decompile");
    assert_eq!(
        decompilation.document.steps[0].action_type.as_deref(),
        Some("fax_machine")
    );
    assert_eq!(
        decompilation.warnings,
        vec![StructuralWarning::MissingTrigger]
    );
}

#[test]
fn test_non_conditional_fan_out_keeps_the_first_edge() {
    let mut graph = create_graph(
        vec![
            create_node("A", NOOP),
            create_node("B", NOOP),
            create_node("C", NOOP),
        ],
        &[],
    );
    connect(&mut graph, "A", vec![vec!["B", "C"]]);

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let document = &decompilation.document;
    assert_eq!(titles(document), vec!["A", "B", "C"]);
    assert_eq!(document.steps[0].next_steps, vec![document.steps[1].id.clone()]);
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::UnsupportedBranching {
            node: "A".to_string(),
            port: 0,
            dropped: vec!["C".to_string()],
        }));
}

#[test]
fn test_conditions_are_recovered_from_an_if_node() {
    let mut check = create_node("Check Amount", mapping::IF_NODE);
    check.parameters = if_parameters(&[
        ("amount", "gt", json!(500)),
        ("amount", "gte", json!(100)),
    ]);
    let mut graph = create_graph(
        vec![
            check,
            create_node("Big", NOOP),
            create_node("Medium", NOOP),
            create_node("Small", NOOP),
        ],
        &[],
    );
    connect(&mut graph, "Check Amount", vec![vec!["Big", "Medium"], vec!["Small"]]);

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let step = &decompilation.document.steps[0];
    assert_eq!(step.kind(), Some(StepKind::Decision));
    assert!(step.parameters.is_empty());
    assert_eq!(
        step.conditions,
        vec![
            Condition::new("amount", ConditionOperator::Greater, 500, "step_2"),
            Condition::new("amount", ConditionOperator::Greater, 100, "step_3"),
        ]
    );
    assert_eq!(step.next_steps, vec!["step_4".to_string()]);
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::ApproximateOperator {
            node: "Check Amount".to_string(),
            operation: "gte".to_string(),
            operator: "greater".to_string(),
        }));
}

#[test]
fn test_unknown_engine_operation_reads_as_equals() {
    let mut check = create_node("Check", mapping::IF_NODE);
    check.parameters = if_parameters(&[("status", "notEquals", json!("closed"))]);
    let mut graph = create_graph(vec![check, create_node("Open", NOOP)], &[]);
    connect(&mut graph, "Check", vec![vec!["Open"], vec![]]);

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let step = &decompilation.document.steps[0];
    assert_eq!(step.conditions[0].operator, ConditionOperator::Equals);
    assert_eq!(step.conditions[0].value, json!("closed"));
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::UnknownOperator {
            node: "Check".to_string(),
            operation: "notEquals".to_string(),
        }));
}

#[test]
fn test_dangling_connections_are_dropped() {
    let graph = create_graph(
        vec![create_node("A", NOOP), create_node("B", NOOP)],
        &[("A", "Nowhere")],
    );

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    assert!(decompilation.document.steps[0].next_steps.is_empty());
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::DanglingConnection {
            source: "A".to_string(),
            target: "Nowhere".to_string(),
        }));
}

#[test]
fn test_duplicate_metadata_ids_are_renamed() {
    let mut first = create_node("First", NOOP);
    let mut second = create_node("Second", NOOP);
    let step = Step::new("same", 1, "Same", StepKind::Action);
    StepMetadata::from_step(&step, StepKind::Action).embed(&mut first.parameters);
    StepMetadata::from_step(&step, StepKind::Action).embed(&mut second.parameters);
    let graph = create_graph(vec![first, second], &[("First", "Second")]);

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let ids: Vec<&str> = decompilation
        .document
        .steps
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["same", "same_2"]);
    assert_eq!(
        decompilation.document.steps[0].next_steps,
        vec!["same_2".to_string()]
    );
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::DuplicateStepId {
            node: "Second".to_string(),
            id: "same".to_string(),
            replacement: "same_2".to_string(),
        }));
}

#[test]
fn test_engine_json_is_decompiled() {
    let json = r#"{
        "name": "Lead Capture",
        "nodes": [
            {
                "id": "a1", "name": "Form Hook", "type": "n8n-nodes-base.webhook",
                "typeVersion": 2, "position": [0, 0], "parameters": { "path": "lead" }
            },
            {
                "id": "a2", "name": "Store Lead", "type": "n8n-nodes-base.postgres",
                "typeVersion": 2.5, "position": [220, 0], "parameters": {},
                "notes": "Insert into leads"
            },
            {
                "id": "a3", "name": "Say Thanks", "type": "n8n-nodes-base.emailSend",
                "typeVersion": 2.1, "position": [440, 0], "parameters": {}
            }
        ],
        "connections": {
            "Form Hook": { "main": [[{ "node": "Store Lead", "type": "main", "index": 0 }]] },
            "Store Lead": { "main": [[{ "node": "Say Thanks", "type": "main", "index": 0 }]] }
        }
    }"#;
    let graph = WorkflowGraph::from_json(json).expect("graph JSON should parse");
    let document = decompile(&graph).expect("Failed to decompile");

    assert_eq!(document.title, "Lead Capture");
    assert_eq!(
        document.triggers,
        vec![Trigger::new(TriggerKind::Webhook).with_config("path", "lead")]
    );
    assert_eq!(titles(&document), vec!["Store Lead", "Say Thanks"]);
    assert_eq!(document.steps[0].action_type.as_deref(), Some("database_query"));
    assert_eq!(document.steps[0].description, "Insert into leads");
    assert_eq!(document.steps[1].action_type.as_deref(), Some("send_email"));
    assert!(validate(&document).valid);
}

#[test]
fn test_malformed_graph_json_is_an_error() {
    let result = WorkflowGraph::from_json("{ \"name\": \"x\", \"nodes\": 3 }");
    assert!(matches!(result, Err(CompilationError::JsonParseError(_))));
}

#[test]
fn test_cycle_report_includes_nodes_stuck_behind_it() {
    let graph = create_graph(
        vec![
            create_node("Entry", NOOP),
            create_node("A", NOOP),
            create_node("B", NOOP),
            create_node("After", NOOP),
        ],
        &[("Entry", "A"), ("A", "B"), ("B", "A"), ("B", "After")],
    );

    match decompile(&graph) {
        Err(CompilationError::CyclicGraph { nodes }) => {
            assert_eq!(
                nodes,
                vec!["A".to_string(), "B".to_string(), "After".to_string()]
            );
        }
        other => panic!("Expected CyclicGraph error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_node_names_are_renamed() {
    let graph = create_graph(
        vec![
            create_node("Start", mapping::MANUAL_TRIGGER_NODE),
            create_node("X", NOOP),
            create_node("X", NOOP),
        ],
        &[("Start", "X")],
    );

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("duplicate names are not fatal");
    let document = &decompilation.document;
    assert_eq!(titles(document), vec!["X", "X (2)"]);
    assert_ne!(document.steps[0].id, document.steps[1].id);
    assert_eq!(
        decompilation.warnings,
        vec![StructuralWarning::DuplicateNodeName {
            name: "X".to_string(),
            replacement: "X (2)".to_string(),
        }]
    );
}

#[test]
fn test_duplicate_node_name_rename_skips_taken_names() {
    let graph = create_graph(
        vec![
            create_node("X", NOOP),
            create_node("X (2)", NOOP),
            create_node("X", NOOP),
        ],
        &[("X", "X (2)")],
    );

    let decompilation = Decompiler::builder(&graph)
        .build()
        .decompile()
        .expect("Failed to decompile");
    assert_eq!(titles(&decompilation.document), vec!["X", "X (2)", "X (3)"]);
    assert!(decompilation
        .warnings
        .contains(&StructuralWarning::DuplicateNodeName {
            name: "X".to_string(),
            replacement: "X (3)".to_string(),
        }));
}

#[test]
fn test_mapped_action_type_named_like_a_trigger_stays_a_step() {
    let graph = create_graph(
        vec![
            create_node("Start", mapping::MANUAL_TRIGGER_NODE),
            create_node("Watch Repo", "n8n-nodes-base.githubTrigger"),
        ],
        &[("Start", "Watch Repo")],
    );

    let decompilation = Decompiler::builder(&graph)
        .with_action_mapping("github_watch", "n8n-nodes-base.githubTrigger", 1.0)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let document = &decompilation.document;
    assert!(decompilation.warnings.is_empty());
    assert_eq!(titles(document), vec!["Watch Repo"]);
    assert_eq!(document.steps[0].action_type.as_deref(), Some("github_watch"));
    assert_eq!(document.triggers, vec![Trigger::new(TriggerKind::Manual)]);
}

#[test]
fn test_mapped_trigger_named_action_survives_compile_and_decompile() {
    let document = create_chain_document().with_step(
        Step::new("watch", 4, "Watch Repo", StepKind::Action).with_action("github_watch"),
    );
    let compilation = Compiler::builder(&document)
        .with_action_mapping("github_watch", "n8n-nodes-base.githubTrigger", 1.0)
        .build()
        .compile()
        .expect("Failed to compile");

    let decompilation = Decompiler::builder(&compilation.graph)
        .with_action_mapping("github_watch", "n8n-nodes-base.githubTrigger", 1.0)
        .build()
        .decompile()
        .expect("Failed to decompile");
    let recovered = &decompilation.document;
    assert_eq!(recovered.steps.len(), 4);
    let watch = recovered.step("watch").expect("watch step is recovered");
    assert_eq!(watch.action_type.as_deref(), Some("github_watch"));
    assert_eq!(recovered.triggers.len(), 1);
    assert!(!decompilation
        .warnings
        .iter()
        .any(|w| matches!(w, StructuralWarning::ExtraTriggerNode { .. })));
}
