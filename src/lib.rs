//! # procflow - Procedure Document and Workflow Graph Compiler
//!
//! **procflow** converts standard operating procedures between two shapes: a
//! human-authored [`ProcedureDocument`](document::ProcedureDocument) made of ordered
//! steps, decisions and triggers, and the node-and-edge
//! [`WorkflowGraph`](graph::WorkflowGraph) a workflow engine executes.
//!
//! ## Core Workflow
//!
//! Every conversion is a pure, synchronous, in-memory transformation:
//!
//! 1.  **Author**: Build a document in code, load it from JSON, or parse it from markup with [`parse_markup`].
//! 2.  **Validate**: [`validate`] reports every structural problem at once. Errors block compilation, warnings never do.
//! 3.  **Compile**: [`compile`] (or `Compiler::builder` for custom layout and action mappings) lays the steps out as engine nodes and wires their ports.
//! 4.  **Decompile**: [`decompile`] reads a graph back, recovering steps, conditions and a valid step order.
//!
//! Shapes the other side cannot express are degraded with a
//! [`StructuralWarning`](diagnostics::StructuralWarning) instead of failing. Warnings are
//! returned by the builder forms and logged through `tracing`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use procflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = ProcedureDocument::new("Onboard Customer")
//!         .with_description("Brings a new customer into the system")
//!         .with_version("1.0")
//!         .with_trigger(Trigger::new(TriggerKind::Webhook).with_config("path", "onboard"))
//!         .with_step(
//!             Step::new("create", 1, "Create Account", StepKind::Action)
//!                 .with_action("http_request")
//!                 .with_next(["notify"]),
//!         )
//!         .with_step(
//!             Step::new("notify", 2, "Notify Team", StepKind::Action).with_action("slack_message"),
//!         );
//!
//!     let report = validate(&document);
//!     assert!(report.valid);
//!
//!     // Compile with a custom action mapping on top of the built-in table.
//!     let compilation = Compiler::builder(&document)
//!         .with_action_mapping("crm_sync", "n8n-nodes-base.hubspot", 2.0)
//!         .build()
//!         .compile()?;
//!     println!("{}", compilation.graph.to_json_pretty()?);
//!
//!     // And back again, as markup.
//!     let recovered = decompile(&compilation.graph)?;
//!     println!("{}", serialize_to_markup(&recovered));
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod decompiler;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod markup;
pub mod prelude;
pub mod validator;

pub use compiler::compile;
pub use decompiler::decompile;
pub use markup::{parse_markup, serialize_to_markup};
pub use validator::validate;
