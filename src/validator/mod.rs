//! Structural checks on a [`ProcedureDocument`] before it is compiled.
//!
//! Every rule runs independently, so a document with several problems reports all
//! of them at once. Nothing here fails: the outcome is a [`ValidationReport`] and the
//! caller decides whether warnings are acceptable.

use crate::document::ProcedureDocument;
use serde::Serialize;
use std::fmt;

mod rules;

/// A single finding, with a stable code and the location it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationIssue {
    pub fn new(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Validation issue codes
pub mod error_codes {
    pub const MISSING_TITLE: &str = "ERR_DOC_MISSING_TITLE";
    pub const MISSING_DESCRIPTION: &str = "WARN_DOC_MISSING_DESCRIPTION";
    pub const MISSING_VERSION: &str = "WARN_DOC_MISSING_VERSION";
    pub const NO_STEPS: &str = "ERR_DOC_NO_STEPS";
    pub const DUPLICATE_ID: &str = "ERR_STEP_DUPLICATE_ID";
    pub const MISSING_REQUIRED_FIELD: &str = "ERR_STEP_MISSING_REQUIRED_FIELD";
    pub const INVALID_STEP_TYPE: &str = "ERR_STEP_INVALID_TYPE";
    pub const DECISION_WITHOUT_CONDITIONS: &str = "WARN_STEP_DECISION_WITHOUT_CONDITIONS";
    pub const INVALID_REFERENCE: &str = "ERR_STEP_INVALID_REFERENCE";
    pub const INVALID_TRIGGER_TYPE: &str = "ERR_TRIGGER_INVALID_TYPE";
}

/// Outcome of [`validate`]. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub(crate) fn error(&mut self, code: &'static str, message: String, path: Option<String>) {
        self.errors.push(ValidationIssue::new(code, message, path));
    }

    pub(crate) fn warning(&mut self, code: &'static str, message: String, path: Option<String>) {
        self.warnings.push(ValidationIssue::new(code, message, path));
    }

    /// Whether any error mentions `needle` in its message.
    pub fn mentions(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.message.contains(needle))
    }
}

/// Checks a document for internal consistency.
pub fn validate(document: &ProcedureDocument) -> ValidationReport {
    let mut report = ValidationReport::default();
    for rule in rules::RULES {
        rule(document, &mut report);
    }
    report.valid = report.errors.is_empty();

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated document '{}'",
        document.title
    );
    report
}
