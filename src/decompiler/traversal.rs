use crate::diagnostics::StructuralWarning;
use crate::graph::{Node, WorkflowGraph};
use crate::mapping::TypeMap;
use ahash::{AHashMap, AHashSet};
use std::borrow::Cow;

/// The step-level view of a graph: which node starts it, which nodes are steps,
/// and where each step can go next.
pub(super) struct Traversal<'g> {
    pub trigger: Option<&'g Node>,
    /// Step nodes in declaration order.
    pub steps: Vec<&'g Node>,
    /// Output ports per step node, with targets restricted to step nodes.
    pub ports: AHashMap<&'g str, Vec<Vec<&'g str>>>,
    /// All successors per step node, ports flattened and deduplicated.
    pub next_steps: AHashMap<&'g str, Vec<&'g str>>,
}

/// Node names are connection keys, so a repeated name is ambiguous. Later nodes
/// with a taken name are renamed ` (2)`, ` (3)`, ...; existing connections keep
/// pointing at the first node of that name.
pub(super) fn unique_names<'g>(
    graph: &'g WorkflowGraph,
    warnings: &mut Vec<StructuralWarning>,
) -> Cow<'g, WorkflowGraph> {
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(graph.nodes.len());
    let mut repeated: Vec<usize> = Vec::new();
    for (index, node) in graph.nodes.iter().enumerate() {
        if !seen.insert(node.name.as_str()) {
            repeated.push(index);
        }
    }
    if repeated.is_empty() {
        return Cow::Borrowed(graph);
    }

    let mut taken: AHashSet<String> = graph.nodes.iter().map(|n| n.name.clone()).collect();
    let mut renamed = graph.clone();
    for index in repeated {
        let node = &mut renamed.nodes[index];
        let replacement = (2..)
            .map(|suffix| format!("{} ({})", node.name, suffix))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| format!("{} ({})", node.name, index));
        warnings.push(StructuralWarning::DuplicateNodeName {
            name: node.name.clone(),
            replacement: replacement.clone(),
        });
        taken.insert(replacement.clone());
        node.name = replacement;
    }
    Cow::Owned(renamed)
}

/// A node is the trigger when its type reads as one and the type map does not
/// claim it as a step.
fn is_trigger(node: &Node, type_map: &TypeMap) -> bool {
    node.is_trigger() && type_map.classify(&node.node_type).is_none()
}

pub(super) fn traverse<'g>(
    graph: &'g WorkflowGraph,
    type_map: &TypeMap,
    warnings: &mut Vec<StructuralWarning>,
) -> Traversal<'g> {
    let mut trigger: Option<&Node> = None;
    let mut steps: Vec<&Node> = Vec::new();
    let mut trigger_names: AHashSet<&str> = AHashSet::new();

    for node in &graph.nodes {
        if !is_trigger(node, type_map) {
            steps.push(node);
            continue;
        }
        trigger_names.insert(node.name.as_str());
        if trigger.is_none() {
            trigger = Some(node);
        } else {
            warnings.push(StructuralWarning::ExtraTriggerNode {
                node: node.name.clone(),
            });
        }
    }
    if trigger.is_none() {
        warnings.push(StructuralWarning::MissingTrigger);
    }

    let step_names: AHashSet<&str> = steps.iter().map(|n| n.name.as_str()).collect();
    let mut ports: AHashMap<&str, Vec<Vec<&str>>> = AHashMap::with_capacity(steps.len());
    let mut next_steps: AHashMap<&str, Vec<&str>> = AHashMap::with_capacity(steps.len());

    for node in &steps {
        let source = node.name.as_str();
        let mut node_ports: Vec<Vec<&str>> = Vec::new();
        let mut flattened: Vec<&str> = Vec::new();

        for port in graph.ports(source) {
            let mut targets: Vec<&str> = Vec::with_capacity(port.len());
            for edge in port {
                let target = edge.node.as_str();
                if step_names.contains(target) {
                    targets.push(target);
                    if !flattened.contains(&target) {
                        flattened.push(target);
                    }
                } else if !trigger_names.contains(target) {
                    warnings.push(StructuralWarning::DanglingConnection {
                        source: source.to_string(),
                        target: target.to_string(),
                    });
                }
            }
            node_ports.push(targets);
        }

        ports.insert(source, node_ports);
        next_steps.insert(source, flattened);
    }

    Traversal {
        trigger,
        steps,
        ports,
        next_steps,
    }
}
