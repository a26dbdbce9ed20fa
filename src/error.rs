use crate::validator::ValidationIssue;
use itertools::Itertools;
use thiserror::Error;

/// Errors that stop a compilation in either direction.
#[derive(Error, Debug, Clone)]
pub enum CompilationError {
    #[error(
        "Document failed validation with {} error(s): {}",
        .errors.len(),
        format_issues(.errors)
    )]
    InvalidDocument { errors: Vec<ValidationIssue> },

    #[error("Workflow graph has a cyclic step dependency through: {}", .nodes.join(", "))]
    CyclicGraph { nodes: Vec<String> },

    #[error("Workflow graph '{graph}' has no nodes that can be read as steps")]
    NoStepNodes { graph: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(String),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|issue| issue.to_string()).join("; ")
}
