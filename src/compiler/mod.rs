//! Forward compiler: procedure document to workflow graph.

use crate::diagnostics::StructuralWarning;
use crate::document::{Parameters, ProcedureDocument, Step, StepKind, Trigger};
use crate::error::CompilationError;
use crate::graph::{StepMetadata, WorkflowGraph};
use crate::mapping::{self, NodeType, TypeMap};
use crate::validator::{self, ValidationReport};
use ahash::AHashMap;
use serde_json::{Value, json};

mod builder;
mod layout;

use builder::GraphBuilder;
pub use layout::LayoutConfig;
use layout::Layout;

/// Everything a successful forward compilation produces.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub graph: WorkflowGraph,
    /// Non-blocking validator findings.
    pub validation: ValidationReport,
    pub warnings: Vec<StructuralWarning>,
}

pub struct Compiler<'a> {
    document: &'a ProcedureDocument,
    type_map: TypeMap,
    layout: LayoutConfig,
    workflow_name: Option<String>,
}

pub struct CompilerBuilder<'a> {
    document: &'a ProcedureDocument,
    type_map: TypeMap,
    layout: LayoutConfig,
    workflow_name: Option<String>,
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(document: &'a ProcedureDocument) -> Self {
        Self {
            document,
            type_map: TypeMap::new(),
            layout: LayoutConfig::default(),
            workflow_name: None,
        }
    }

    /// Maps a custom action type onto an engine node type, overriding the built-in table.
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

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Names the generated workflow; defaults to the document title.
    pub fn with_workflow_name(mut self, name: impl Into<String>) -> Self {
        self.workflow_name = Some(name.into());
        self
    }

    pub fn build(self) -> Compiler<'a> {
        Compiler {
            document: self.document,
            type_map: self.type_map,
            layout: self.layout,
            workflow_name: self.workflow_name,
        }
    }
}

/// Per-call state: the counter-backed graph builder, the layout cursor and the
/// step ID to node name table.
struct CompileContext {
    graph: GraphBuilder,
    layout: Layout,
    node_names: AHashMap<String, String>,
    warnings: Vec<StructuralWarning>,
}

impl<'a> Compiler<'a> {
    pub fn builder(document: &'a ProcedureDocument) -> CompilerBuilder<'a> {
        CompilerBuilder::new(document)
    }

    /// Validates the document and compiles it. Only validation errors fail.
    pub fn compile(self) -> Result<Compilation, CompilationError> {
        let validation = validator::validate(self.document);
        if !validation.valid {
            return Err(CompilationError::InvalidDocument {
                errors: validation.errors,
            });
        }

        let mut ctx = CompileContext {
            graph: GraphBuilder::new(),
            layout: Layout::new(self.layout),
            node_names: AHashMap::new(),
            warnings: Vec::new(),
        };

        let trigger_name = self.compile_trigger(&mut ctx);

        let steps = self.document.ordered_steps();
        for step in &steps {
            self.compile_step(step, &mut ctx);
        }

        for step in &steps {
            connect_step(step, &mut ctx);
        }
        if let (Some(trigger), Some(first)) = (&trigger_name, steps.first()) {
            if let Some(target) = ctx.node_names.get(&first.id) {
                ctx.graph.connect(trigger, vec![vec![target.as_str()]]);
            }
        }

        tracing::debug!(
            nodes = ctx.graph.node_count(),
            warnings = ctx.warnings.len(),
            "compiled document '{}'",
            self.document.title
        );
        for warning in &ctx.warnings {
            warning.log();
        }

        let name = self
            .workflow_name
            .clone()
            .unwrap_or_else(|| self.document.title.trim().to_string());
        let mut settings = Parameters::new();
        settings.insert("executionOrder".to_string(), json!("v1"));

        Ok(Compilation {
            graph: ctx.graph.finish(name, Some(settings)),
            validation,
            warnings: ctx.warnings,
        })
    }

    /// Materializes the first trigger; any further triggers are reported and skipped.
    fn compile_trigger(&self, ctx: &mut CompileContext) -> Option<String> {
        let mut triggers = self.document.triggers.iter().enumerate();
        let (_, first) = triggers.next()?;
        for (index, extra) in triggers {
            ctx.warnings.push(StructuralWarning::ExtraTrigger {
                index,
                kind: extra.kind.to_string(),
            });
        }
        self.materialize_trigger(first, ctx)
    }

    fn materialize_trigger(&self, trigger: &Trigger, ctx: &mut CompileContext) -> Option<String> {
        let kind = trigger.kind.known()?;
        let position = ctx.layout.place_trigger();
        let id = ctx.graph.next_id();
        Some(ctx.graph.push_node(
            id,
            mapping::trigger_node_name(kind),
            mapping::trigger_node_type(kind),
            position,
            trigger.config.clone(),
            None,
        ))
    }

    fn compile_step(&self, step: &Step, ctx: &mut CompileContext) {
        // Validation guarantees a known kind.
        let Some(kind) = step.kind() else {
            return;
        };
        let position = ctx.layout.place_step(step);
        let id = ctx.graph.next_id();

        let (node_type, mut parameters) = match kind {
            StepKind::Action => (self.action_node(step, ctx), step.parameters.clone()),
            StepKind::Decision => (mapping::decision_node(), decision_parameters(step, &id)),
            StepKind::Subprocess => (mapping::subprocess_node(), step.parameters.clone()),
            StepKind::Wait => (mapping::wait_node(), step.parameters.clone()),
        };
        StepMetadata::from_step(step, kind).embed(&mut parameters);

        let notes = Some(step.description.clone()).filter(|d| !d.trim().is_empty());
        let name = ctx
            .graph
            .push_node(id, &step.title, node_type, position, parameters, notes);
        ctx.node_names.insert(step.id.clone(), name);
    }

    fn action_node(&self, step: &Step, ctx: &mut CompileContext) -> NodeType {
        let Some(action_type) = &step.action_type else {
            return NodeType::noop();
        };
        self.type_map.action_node(action_type).unwrap_or_else(|| {
            ctx.warnings.push(StructuralWarning::UnknownActionType {
                step: step.id.clone(),
                action_type: action_type.clone(),
            });
            NodeType::noop()
        })
    }
}

/// Wires a step's outgoing ports. A decision always gets two ports: port 0 holds
/// one edge per condition, port 1 the declared next steps no condition covers.
fn connect_step(step: &Step, ctx: &mut CompileContext) {
    let Some(source) = ctx.node_names.get(&step.id).cloned() else {
        return;
    };
    let names = &ctx.node_names;
    let name_of = |id: &str| names.get(id).map(String::as_str);

    let ports: Vec<Vec<&str>> = if step.is_decision() {
        let true_branch: Vec<&str> = step
            .conditions
            .iter()
            .filter_map(|c| name_of(&c.next_step))
            .collect();
        let mut false_branch: Vec<&str> = Vec::new();
        for next in &step.next_steps {
            if step.conditions.iter().any(|c| &c.next_step == next) {
                continue;
            }
            if let Some(target) = name_of(next) {
                if !false_branch.contains(&target) {
                    false_branch.push(target);
                }
            }
        }
        vec![true_branch, false_branch]
    } else if step.next_steps.is_empty() {
        return;
    } else {
        vec![step.next_steps.iter().filter_map(|id| name_of(id)).collect()]
    };

    ctx.graph.connect(&source, ports);
}

/// Engine-native `If` parameters: one comparison per condition, any of which
/// selects the true branch.
fn decision_parameters(step: &Step, node_id: &str) -> Parameters {
    let conditions: Vec<Value> = step
        .conditions
        .iter()
        .enumerate()
        .map(|(index, condition)| {
            json!({
                "id": format!("{}-condition-{}", node_id, index + 1),
                "leftValue": mapping::field_expression(&condition.field),
                "rightValue": condition.value,
                "operator": mapping::engine_operator_value(condition.operator),
            })
        })
        .collect();

    let mut parameters = step.parameters.clone();
    parameters.insert(
        "conditions".to_string(),
        json!({
            "options": {
                "caseSensitive": true,
                "leftValue": "",
                "typeValidation": "loose",
            },
            "conditions": conditions,
            "combinator": "or",
        }),
    );
    parameters
        .entry("options".to_string())
        .or_insert_with(|| json!({}));
    parameters
}

/// Compiles a document with the default configuration.
pub fn compile(document: &ProcedureDocument) -> Result<WorkflowGraph, CompilationError> {
    Compiler::builder(document).build().compile().map(|c| c.graph)
}
