//! Reverse compiler: workflow graph back to procedure document.
//!
//! The graph is read in three passes. Traversal separates the trigger from the step
//! nodes and flattens each node's ports into a successor list. Recovery turns every
//! step node into a [`Step`], preferring the round-trip record the forward compiler
//! embeds. Ordering then renumbers the steps along a topological order of the
//! successor lists, which fails on cyclic graphs instead of looping.

use crate::diagnostics::StructuralWarning;
use crate::document::{Declared, ProcedureDocument, Step, Trigger};
use crate::error::CompilationError;
use crate::graph::{Node, WorkflowGraph, strip_metadata};
use crate::mapping::{self, TypeMap};
use ahash::{AHashMap, AHashSet};

mod ordering;
mod recovery;
mod traversal;

/// Everything a successful reverse compilation produces.
#[derive(Debug, Clone)]
pub struct Decompilation {
    pub document: ProcedureDocument,
    pub warnings: Vec<StructuralWarning>,
}

pub struct Decompiler<'g> {
    graph: &'g WorkflowGraph,
    type_map: TypeMap,
}

pub struct DecompilerBuilder<'g> {
    graph: &'g WorkflowGraph,
    type_map: TypeMap,
}

impl<'g> DecompilerBuilder<'g> {
    pub fn new(graph: &'g WorkflowGraph) -> Self {
        Self {
            graph,
            type_map: TypeMap::new(),
        }
    }

    /// Reads `node_type` back as `action_type`, overriding the built-in table.
    pub fn with_action_mapping(
        mut self,
        action_type: &str,
        node_type: &str,
        type_version: f64,
    ) -> Self {
        self.type_map
            .insert_action(action_type, node_type, type_version);
        self
    }

    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = type_map;
        self
    }

    pub fn build(self) -> Decompiler<'g> {
        Decompiler {
            graph: self.graph,
            type_map: self.type_map,
        }
    }
}

impl<'g> Decompiler<'g> {
    pub fn builder(graph: &'g WorkflowGraph) -> DecompilerBuilder<'g> {
        DecompilerBuilder::new(graph)
    }

    pub fn decompile(self) -> Result<Decompilation, CompilationError> {
        let mut warnings = Vec::new();
        let graph = traversal::unique_names(self.graph, &mut warnings);
        let traversal = traversal::traverse(&graph, &self.type_map, &mut warnings);
        if traversal.steps.is_empty() {
            return Err(CompilationError::NoStepNodes {
                graph: self.graph.name.clone(),
            });
        }

        let names: Vec<&str> = traversal.steps.iter().map(|n| n.name.as_str()).collect();
        let ordered = ordering::topological_order(&names, &traversal.next_steps)?;

        let mut taken: AHashSet<String> = AHashSet::with_capacity(names.len());
        let mut ids: AHashMap<&str, String> = AHashMap::with_capacity(names.len());
        let mut steps: Vec<(&str, Step)> = Vec::with_capacity(names.len());

        for (index, node) in traversal.steps.iter().enumerate() {
            let ports = traversal
                .ports
                .get(node.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut step = recovery::recover_step(node, ports, &self.type_map, &mut warnings);

            let id = if step.id.trim().is_empty() {
                allocate_id(&format!("step_{}", index + 1), &taken)
            } else {
                let id = allocate_id(&step.id, &taken);
                if id != step.id {
                    warnings.push(StructuralWarning::DuplicateStepId {
                        node: node.name.clone(),
                        id: step.id.clone(),
                        replacement: id.clone(),
                    });
                }
                id
            };
            taken.insert(id.clone());
            ids.insert(node.name.as_str(), id.clone());
            step.id = id;
            steps.push((node.name.as_str(), step));
        }

        let positions: AHashMap<&str, u32> = ordered
            .iter()
            .enumerate()
            .map(|(index, &name)| (name, index as u32 + 1))
            .collect();

        for (name, step) in &mut steps {
            step.order = positions.get(*name).copied().unwrap_or_default();
            step.next_steps = step
                .next_steps
                .iter()
                .filter_map(|target| ids.get(target.as_str()).cloned())
                .collect();
            for condition in &mut step.conditions {
                if let Some(id) = ids.get(condition.next_step.as_str()) {
                    condition.next_step = id.clone();
                }
            }
        }
        steps.sort_by_key(|(_, step)| step.order);

        let document = ProcedureDocument {
            title: self.graph.name.clone(),
            description: String::new(),
            version: String::new(),
            steps: steps.into_iter().map(|(_, step)| step).collect(),
            triggers: traversal.trigger.map(recover_trigger).into_iter().collect(),
        };

        tracing::debug!(
            steps = document.steps.len(),
            warnings = warnings.len(),
            "decompiled workflow '{}'",
            self.graph.name
        );
        for warning in &warnings {
            warning.log();
        }

        Ok(Decompilation { document, warnings })
    }
}

fn recover_trigger(node: &Node) -> Trigger {
    Trigger {
        kind: Declared::Known(mapping::trigger_kind(&node.node_type)),
        config: strip_metadata(&node.parameters),
    }
}

/// `preferred`, or the first of `preferred_2`, `preferred_3`, ... not yet taken.
fn allocate_id(preferred: &str, taken: &AHashSet<String>) -> String {
    if !taken.contains(preferred) {
        return preferred.to_string();
    }
    (2..)
        .map(|suffix| format!("{}_{}", preferred, suffix))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| preferred.to_string())
}

/// Decompiles a graph with the default configuration.
pub fn decompile(graph: &WorkflowGraph) -> Result<ProcedureDocument, CompilationError> {
    Decompiler::builder(graph)
        .build()
        .decompile()
        .map(|d| d.document)
}
