//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! procflow crate. Import it to get the document and graph models, both compilers
//! and the markup functions without importing each item individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use procflow::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let markup = std::fs::read_to_string("path/to/procedure.md")?;
//! let document = parse_markup(&markup);
//!
//! let graph = compile(&document)?;
//! std::fs::write("path/to/workflow.json", graph.to_json_pretty()?)?;
//! # Ok(())
//! # }
//! ```

// Entry points
pub use crate::compiler::{Compilation, Compiler, LayoutConfig, compile};
pub use crate::decompiler::{Decompilation, Decompiler, decompile};
pub use crate::markup::{parse_markup, serialize_to_markup};
pub use crate::validator::{ValidationIssue, ValidationReport, validate};

// Document model
pub use crate::document::{
    Condition, ConditionOperator, Declared, Parameters, ProcedureDocument, Step, StepKind,
    Trigger, TriggerKind,
};

// Graph model
pub use crate::graph::{Edge, Node, Position, WorkflowGraph};

// Diagnostics and errors
pub use crate::diagnostics::StructuralWarning;
pub use crate::error::CompilationError;
