//! Static tables between the logical vocabulary of procedure documents and the
//! engine's node catalog, with optional per-compiler overrides for actions.

use crate::document::StepKind;
use ahash::AHashMap;

pub mod action;
pub mod operator;
pub mod trigger;

pub use action::*;
pub use operator::*;
pub use trigger::*;

pub const IF_NODE: &str = "n8n-nodes-base.if";
pub const WAIT_NODE: &str = "n8n-nodes-base.wait";
pub const EXECUTE_WORKFLOW_NODE: &str = "n8n-nodes-base.executeWorkflow";

/// An engine node type identifier and the version of it the compiler targets.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeType {
    pub name: String,
    pub version: f64,
}

impl NodeType {
    pub fn new(name: impl Into<String>, version: f64) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn noop() -> Self {
        action::builtin_node_type(NOOP_ACTION)
            .unwrap_or_else(|| NodeType::new("n8n-nodes-base.noOp", 1.0))
    }
}

// Non-action step kinds map to fixed node types; actions go through `TypeMap`.

pub fn decision_node() -> NodeType {
    NodeType::new(IF_NODE, 2.0)
}

pub fn subprocess_node() -> NodeType {
    NodeType::new(EXECUTE_WORKFLOW_NODE, 1.0)
}

pub fn wait_node() -> NodeType {
    NodeType::new(WAIT_NODE, 1.1)
}

/// What a node type means as a step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepClass {
    pub kind: StepKind,
    pub action_type: Option<String>,
}

/// Action table consulted by the compilers: custom entries first, then the
/// built-in table.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    actions: AHashMap<String, NodeType>,
    reverse: AHashMap<String, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_action(&mut self, action_type: &str, node_type: &str, type_version: f64) {
        self.actions.insert(
            action_type.to_string(),
            NodeType::new(node_type, type_version),
        );
        self.reverse
            .insert(node_type.to_string(), action_type.to_string());
    }

    pub fn with_action(mut self, action_type: &str, node_type: &str, type_version: f64) -> Self {
        self.insert_action(action_type, node_type, type_version);
        self
    }

    /// The node type for an action, or `None` when neither table knows it.
    pub fn action_node(&self, action_type: &str) -> Option<NodeType> {
        self.actions
            .get(action_type)
            .cloned()
            .or_else(|| action::builtin_node_type(action_type))
    }

    /// Classifies an engine node type, or `None` when it is not in any table.
    pub fn classify(&self, node_type: &str) -> Option<StepClass> {
        let structural = match node_type {
            IF_NODE => Some(StepKind::Decision),
            WAIT_NODE => Some(StepKind::Wait),
            EXECUTE_WORKFLOW_NODE => Some(StepKind::Subprocess),
            _ => None,
        };
        if let Some(kind) = structural {
            return Some(StepClass {
                kind,
                action_type: None,
            });
        }

        self.reverse
            .get(node_type)
            .cloned()
            .or_else(|| action::builtin_action_type(node_type).map(str::to_string))
            .map(|action_type| StepClass {
                kind: StepKind::Action,
                action_type: Some(action_type),
            })
    }
}
