use crate::document::Parameters;
use crate::graph::{Edge, Node, NodeConnections, Position, WorkflowGraph};
use crate::mapping::NodeType;
use ahash::AHashSet;
use std::collections::BTreeMap;

/// Accumulates the nodes and connections of a single compilation.
///
/// Node IDs come from a counter owned by this builder, so two compilations never
/// share an ID sequence and the same document always yields the same IDs.
pub(super) struct GraphBuilder {
    counter: u32,
    nodes: Vec<Node>,
    names: AHashSet<String>,
    connections: BTreeMap<String, NodeConnections>,
}

impl GraphBuilder {
    pub(super) fn new() -> Self {
        Self {
            counter: 0,
            nodes: Vec::new(),
            names: AHashSet::new(),
            connections: BTreeMap::new(),
        }
    }

    pub(super) fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("node_{}", self.counter)
    }

    /// Adds a node and returns its name, made unique within the graph.
    pub(super) fn push_node(
        &mut self,
        id: String,
        base_name: &str,
        node_type: NodeType,
        position: Position,
        parameters: Parameters,
        notes: Option<String>,
    ) -> String {
        let name = self.unique_name(base_name);
        self.nodes.push(Node {
            id,
            name: name.clone(),
            node_type: node_type.name,
            type_version: node_type.version,
            position,
            parameters,
            notes,
        });
        name
    }

    /// Sets the output ports of `source`, one inner list of target names per port.
    pub(super) fn connect(&mut self, source: &str, ports: Vec<Vec<&str>>) {
        let main = ports
            .into_iter()
            .map(|targets| targets.into_iter().map(Edge::main).collect())
            .collect();
        self.connections
            .insert(source.to_string(), NodeConnections { main });
    }

    pub(super) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn finish(self, name: String, settings: Option<Parameters>) -> WorkflowGraph {
        WorkflowGraph {
            name,
            nodes: self.nodes,
            connections: self.connections,
            settings,
        }
    }

    fn unique_name(&mut self, base_name: &str) -> String {
        let base = base_name.trim();
        let mut candidate = base.to_string();
        let mut suffix = 1;
        while self.names.contains(&candidate) {
            suffix += 1;
            candidate = format!("{} ({})", base, suffix);
        }
        self.names.insert(candidate.clone());
        candidate
    }
}
