use crate::diagnostics::StructuralWarning;
use crate::document::{Condition, ConditionOperator, Declared, Parameters, Step, StepKind};
use crate::graph::{Node, StepMetadata, strip_metadata};
use crate::mapping::{self, OperatorMatch, StepClass, TypeMap};
use itertools::Itertools;
use serde_json::Value;

/// Rebuilds the step a node stands for. Successor references are node names at this
/// point and are rewritten to step IDs once every step has an ID.
pub(super) fn recover_step(
    node: &Node,
    ports: &[Vec<&str>],
    type_map: &TypeMap,
    warnings: &mut Vec<StructuralWarning>,
) -> Step {
    let conditional = node.node_type == mapping::IF_NODE;

    let mut step = match StepMetadata::extract(&node.parameters) {
        Some(metadata) => Step {
            id: metadata.id,
            order: metadata.order,
            title: metadata.title,
            description: metadata.description,
            kind: Some(Declared::Known(metadata.kind)),
            action_type: metadata.action_type,
            parameters: metadata.config,
            ..Default::default()
        },
        None => derive_step(node, conditional, type_map, warnings),
    };

    if conditional {
        step.conditions = extract_conditions(node, ports.first().map(Vec::as_slice), warnings);
        step.next_steps = dedup(ports.iter().skip(1).flatten().copied());
    } else {
        step.next_steps = first_edges(node, ports, warnings);
    }
    step
}

fn derive_step(
    node: &Node,
    conditional: bool,
    type_map: &TypeMap,
    warnings: &mut Vec<StructuralWarning>,
) -> Step {
    let class = type_map.classify(&node.node_type).unwrap_or_else(|| {
        warnings.push(StructuralWarning::UnknownNodeType {
            node: node.name.clone(),
            node_type: node.node_type.clone(),
        });
        StepClass {
            kind: StepKind::Action,
            action_type: None,
        }
    });

    let mut parameters: Parameters = strip_metadata(&node.parameters);
    if conditional {
        parameters.remove("conditions");
        parameters.remove("options");
    }

    let description = node
        .notes
        .clone()
        .filter(|notes| !notes.trim().is_empty())
        .unwrap_or_else(|| describe(class.kind, &node.name));

    Step {
        title: node.name.clone(),
        description,
        kind: Some(Declared::Known(class.kind)),
        action_type: class.action_type,
        parameters,
        ..Default::default()
    }
}

/// Generic description for nodes that carry no notes.
fn describe(kind: StepKind, name: &str) -> String {
    match kind {
        StepKind::Action => format!("Perform the '{}' action", name),
        StepKind::Decision => format!("Decide how to continue after '{}'", name),
        StepKind::Subprocess => format!("Run the '{}' sub-process", name),
        StepKind::Wait => format!("Wait at '{}' before continuing", name),
    }
}

/// Reads the engine comparisons of an `If` node. Condition `i` continues to the
/// `i`-th edge of port 0.
fn extract_conditions(
    node: &Node,
    true_port: Option<&[&str]>,
    warnings: &mut Vec<StructuralWarning>,
) -> Vec<Condition> {
    let entries = node
        .parameters
        .get("conditions")
        .and_then(|c| c.get("conditions"))
        .and_then(Value::as_array);
    let Some(entries) = entries else {
        return Vec::new();
    };
    let targets = true_port.unwrap_or_default();

    let mut conditions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let left = entry.get("leftValue").and_then(Value::as_str);
        let operation = entry
            .get("operator")
            .and_then(|op| op.get("operation"))
            .and_then(Value::as_str);
        let (Some(left), Some(operation)) = (left, operation) else {
            warnings.push(StructuralWarning::MalformedCondition {
                node: node.name.clone(),
                index,
            });
            continue;
        };

        let operator = match mapping::logical_operator(operation) {
            OperatorMatch::Exact(operator) => operator,
            OperatorMatch::Approximate(operator) => {
                warnings.push(StructuralWarning::ApproximateOperator {
                    node: node.name.clone(),
                    operation: operation.to_string(),
                    operator: operator.to_string(),
                });
                operator
            }
            OperatorMatch::Unknown => {
                warnings.push(StructuralWarning::UnknownOperator {
                    node: node.name.clone(),
                    operation: operation.to_string(),
                });
                ConditionOperator::Equals
            }
        };

        let next_step = targets
            .get(index)
            .or(targets.last())
            .map(|t| t.to_string())
            .unwrap_or_default();

        conditions.push(Condition {
            field: mapping::field_from_expression(left),
            operator,
            value: entry.get("rightValue").cloned().unwrap_or(Value::Null),
            next_step,
        });
    }
    conditions
}

/// First edge of every port; extra edges on a port are dropped and reported.
fn first_edges(
    node: &Node,
    ports: &[Vec<&str>],
    warnings: &mut Vec<StructuralWarning>,
) -> Vec<String> {
    let mut firsts = Vec::with_capacity(ports.len());
    for (index, port) in ports.iter().enumerate() {
        let Some((first, rest)) = port.split_first() else {
            continue;
        };
        if !rest.is_empty() {
            warnings.push(StructuralWarning::UnsupportedBranching {
                node: node.name.clone(),
                port: index,
                dropped: rest.iter().map(|t| t.to_string()).collect(),
            });
        }
        firsts.push(*first);
    }
    dedup(firsts)
}

fn dedup<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names.into_iter().unique().map(str::to_string).collect()
}
