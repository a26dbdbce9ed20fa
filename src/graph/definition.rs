use crate::document::Parameters;
use crate::error::CompilationError;
use crate::mapping;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only connection kind the compiler produces or follows.
pub const MAIN_PORT_TYPE: &str = "main";

/// The node-and-edge representation consumed by the workflow engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub name: String,
    pub nodes: Vec<Node>,
    /// Outgoing ports keyed by source node name.
    #[serde(default)]
    pub connections: BTreeMap<String, NodeConnections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Parameters>,
}

/// One executable unit in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(rename = "typeVersion", alias = "type_version")]
    pub type_version: f64,
    pub position: Position,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Layout coordinates, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub f64, pub f64);

/// The output ports of a single node. Port `i` is `main[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeConnections {
    #[serde(default)]
    pub main: Vec<Vec<Edge>>,
}

/// A directed link to the input `index` of the node named `node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub node: String,
    #[serde(rename = "type")]
    pub port_type: String,
    pub index: u32,
}

impl WorkflowGraph {
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// The output ports of the named node; empty when it has no connections.
    pub fn ports(&self, name: &str) -> &[Vec<Edge>] {
        self.connections
            .get(name)
            .map(|c| c.main.as_slice())
            .unwrap_or_default()
    }

    /// Number of edges over all nodes and ports.
    pub fn edge_count(&self) -> usize {
        self.connections
            .values()
            .flat_map(|c| c.main.iter())
            .map(Vec::len)
            .sum()
    }

    pub fn from_json(json: &str) -> Result<Self, CompilationError> {
        serde_json::from_str(json).map_err(|e| CompilationError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CompilationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompilationError::JsonParseError(e.to_string()))
    }
}

impl Node {
    /// Whether the engine type identifies this node as a workflow entry point.
    pub fn is_trigger(&self) -> bool {
        mapping::is_trigger_type(&self.node_type)
    }
}

impl Edge {
    pub fn main(target: impl Into<String>) -> Self {
        Self {
            node: target.into(),
            port_type: MAIN_PORT_TYPE.to_string(),
            index: 0,
        }
    }
}
