use itertools::Itertools;
use std::fmt;

/// A lossy but non-fatal anomaly met while compiling in either direction.
///
/// Every warning comes with a deterministic fallback; the same input always
/// produces the same warnings and the same output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralWarning {
    /// An action type outside the type map, compiled as a passthrough node.
    UnknownActionType { step: String, action_type: String },
    /// A document trigger after the first, which is not materialized.
    ExtraTrigger { index: usize, kind: String },
    /// No trigger node was found; every node is read as a step.
    MissingTrigger,
    /// A second trigger node in a graph, which is ignored.
    ExtraTriggerNode { node: String },
    /// A non-conditional port with several edges; only the first is kept.
    UnsupportedBranching {
        node: String,
        port: usize,
        dropped: Vec<String>,
    },
    /// An engine node type outside the type map, read as a generic action.
    UnknownNodeType { node: String, node_type: String },
    /// An engine comparison read as the closest logical operator.
    ApproximateOperator {
        node: String,
        operation: String,
        operator: String,
    },
    /// An engine comparison with no logical counterpart, read as `equals`.
    UnknownOperator { node: String, operation: String },
    /// A condition entry without a readable comparison, skipped.
    MalformedCondition { node: String, index: usize },
    /// An edge to a node name that does not exist, dropped.
    DanglingConnection { source: String, target: String },
    /// A node sharing its name with an earlier node, renamed; edges keep going to
    /// the earlier node.
    DuplicateNodeName { name: String, replacement: String },
    /// A recovered step ID already taken by an earlier node.
    DuplicateStepId {
        node: String,
        id: String,
        replacement: String,
    },
}

impl StructuralWarning {
    /// Emits the warning as a `tracing` event.
    pub fn log(&self) {
        match self {
            StructuralWarning::UnknownActionType { step, action_type } => {
                tracing::warn!(step = %step, action_type = %action_type, "{}", self)
            }
            StructuralWarning::UnsupportedBranching { node, port, .. } => {
                tracing::warn!(node = %node, port = *port, "{}", self)
            }
            StructuralWarning::UnknownNodeType { node, node_type } => {
                tracing::warn!(node = %node, node_type = %node_type, "{}", self)
            }
            StructuralWarning::DanglingConnection { source, target } => {
                tracing::warn!(node = %source, missing = %target, "{}", self)
            }
            _ => tracing::warn!("{}", self),
        }
    }
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralWarning::UnknownActionType { step, action_type } => write!(
                f,
                "Step '{}' uses unknown action type '{}'; compiled as a passthrough node",
                step, action_type
            ),
            StructuralWarning::ExtraTrigger { index, kind } => write!(
                f,
                "Trigger #{} ({}) ignored; only the first trigger is compiled",
                index + 1,
                kind
            ),
            StructuralWarning::MissingTrigger => write!(
                f,
                "No trigger node found; all nodes are read as steps in declaration order"
            ),
            StructuralWarning::ExtraTriggerNode { node } => {
                write!(f, "Additional trigger node '{}' ignored", node)
            }
            StructuralWarning::UnsupportedBranching {
                node,
                port,
                dropped,
            } => write!(
                f,
                "Node '{}' branches on port {} without being conditional; dropped edges to {}",
                node,
                port,
                dropped.iter().map(|d| format!("'{}'", d)).join(", ")
            ),
            StructuralWarning::UnknownNodeType { node, node_type } => write!(
                f,
                "Node '{}' has unknown type '{}'; read as a generic action step",
                node, node_type
            ),
            StructuralWarning::ApproximateOperator {
                node,
                operation,
                operator,
            } => write!(
                f,
                "Node '{}' compares with '{}'; read as '{}'",
                node, operation, operator
            ),
            StructuralWarning::UnknownOperator { node, operation } => write!(
                f,
                "Node '{}' compares with unsupported operation '{}'; read as 'equals'",
                node, operation
            ),
            StructuralWarning::MalformedCondition { node, index } => write!(
                f,
                "Node '{}' has an unreadable condition at position {}; skipped",
                node, index
            ),
            StructuralWarning::DanglingConnection { source, target } => write!(
                f,
                "Connection from '{}' to missing node '{}' dropped",
                source, target
            ),
            StructuralWarning::DuplicateNodeName { name, replacement } => write!(
                f,
                "Node name '{}' appears more than once; later node renamed to '{}'",
                name, replacement
            ),
            StructuralWarning::DuplicateStepId {
                node,
                id,
                replacement,
            } => write!(
                f,
                "Node '{}' repeats step ID '{}'; renamed to '{}'",
                node, id, replacement
            ),
        }
    }
}
