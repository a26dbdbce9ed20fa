//! Common test utilities for building procedure documents and workflow graphs.
use procflow::prelude::*;
use serde_json::json;

/// A webhook-triggered chain of three actions: fetch -> transform -> notify.
#[allow(dead_code)]
pub fn create_chain_document() -> ProcedureDocument {
    ProcedureDocument::new("Order Intake")
        .with_description("Receives an order and tells the warehouse")
        .with_version("1.0")
        .with_trigger(Trigger::new(TriggerKind::Webhook).with_config("path", "orders"))
        .with_step(
            Step::new("fetch", 1, "Fetch Order", StepKind::Action)
                .with_description("Load the order from the shop API")
                .with_action("http_request")
                .with_parameter("url", "https://shop.example.com/orders")
                .with_next(["transform"]),
        )
        .with_step(
            Step::new("transform", 2, "Normalize Order", StepKind::Action)
                .with_description("Map shop fields onto warehouse fields")
                .with_action("set_fields")
                .with_next(["notify"]),
        )
        .with_step(
            Step::new("notify", 3, "Notify Warehouse", StepKind::Action)
                .with_description("Post the order to the warehouse channel")
                .with_action("slack_message")
                .with_parameter("channel", "#warehouse"),
        )
}

/// A manual trigger, a decision with two conditions and two terminal actions.
#[allow(dead_code)]
pub fn create_decision_document() -> ProcedureDocument {
    ProcedureDocument::new("Refund Review")
        .with_description("Routes refund requests by amount")
        .with_version("2.1")
        .with_trigger(Trigger::new(TriggerKind::Manual))
        .with_step(
            Step::new("check", 1, "Check Amount", StepKind::Decision)
                .with_description("Large refunds need a manager")
                .with_condition(Condition::new(
                    "amount",
                    ConditionOperator::Greater,
                    500,
                    "escalate",
                ))
                .with_condition(Condition::new(
                    "status",
                    ConditionOperator::Equals,
                    "approved",
                    "refund",
                )),
        )
        .with_step(
            Step::new("escalate", 2, "Escalate", StepKind::Action)
                .with_description("Ask a manager")
                .with_action("send_email"),
        )
        .with_step(
            Step::new("refund", 3, "Refund", StepKind::Action)
                .with_description("Pay the refund")
                .with_action("http_request"),
        )
}

/// A plain engine node without any round-trip metadata.
#[allow(dead_code)]
pub fn create_node(name: &str, node_type: &str) -> Node {
    Node {
        id: format!("id-{}", name.to_lowercase()),
        name: name.to_string(),
        node_type: node_type.to_string(),
        type_version: 1.0,
        position: Position(0.0, 0.0),
        parameters: Parameters::new(),
        notes: None,
    }
}

/// A graph of plain nodes with one single-edge port per listed connection.
#[allow(dead_code)]
pub fn create_graph(nodes: Vec<Node>, edges: &[(&str, &str)]) -> WorkflowGraph {
    let mut graph = WorkflowGraph {
        name: "Test Graph".to_string(),
        nodes,
        ..Default::default()
    };
    for &(source, target) in edges {
        connect(&mut graph, source, vec![vec![target]]);
    }
    graph
}

/// Replaces the ports of `source`, one inner list of target names per port.
#[allow(dead_code)]
pub fn connect(graph: &mut WorkflowGraph, source: &str, ports: Vec<Vec<&str>>) {
    let main = ports
        .into_iter()
        .map(|targets| targets.into_iter().map(Edge::main).collect())
        .collect();
    graph
        .connections
        .insert(source.to_string(), procflow::graph::NodeConnections { main });
}

/// Engine-native `If` parameters with one comparison per `(field, operation, value)`.
#[allow(dead_code)]
pub fn if_parameters(comparisons: &[(&str, &str, serde_json::Value)]) -> Parameters {
    let conditions: Vec<serde_json::Value> = comparisons
        .iter()
        .map(|(field, operation, value)| {
            json!({
                "leftValue": format!("={{{{ $json.{} }}}}", field),
                "rightValue": value,
                "operator": { "type": "number", "operation": operation },
            })
        })
        .collect();
    let mut parameters = Parameters::new();
    parameters.insert(
        "conditions".to_string(),
        json!({ "conditions": conditions, "combinator": "or" }),
    );
    parameters
}

/// The names of the targets on each output port of `source`.
#[allow(dead_code)]
pub fn port_targets(graph: &WorkflowGraph, source: &str) -> Vec<Vec<String>> {
    graph
        .ports(source)
        .iter()
        .map(|port| port.iter().map(|edge| edge.node.clone()).collect())
        .collect()
}
