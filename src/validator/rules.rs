use super::{ValidationReport, error_codes};
use crate::document::{Declared, ProcedureDocument, StepKind, TriggerKind};
use ahash::AHashSet;
use itertools::Itertools;

type Rule = fn(&ProcedureDocument, &mut ValidationReport);

pub(super) const RULES: &[Rule] = &[
    check_header,
    check_has_steps,
    check_unique_ids,
    check_step_fields,
    check_decisions,
    check_references,
    check_triggers,
];

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_header(document: &ProcedureDocument, report: &mut ValidationReport) {
    if is_blank(&document.title) {
        report.error(
            error_codes::MISSING_TITLE,
            "Document title is required".to_string(),
            Some("title".to_string()),
        );
    }
    if is_blank(&document.description) {
        report.warning(
            error_codes::MISSING_DESCRIPTION,
            "Document has no description".to_string(),
            Some("description".to_string()),
        );
    }
    if is_blank(&document.version) {
        report.warning(
            error_codes::MISSING_VERSION,
            "Document has no version".to_string(),
            Some("version".to_string()),
        );
    }
}

fn check_has_steps(document: &ProcedureDocument, report: &mut ValidationReport) {
    if document.steps.is_empty() {
        report.error(
            error_codes::NO_STEPS,
            "Document must contain at least one step".to_string(),
            Some("steps".to_string()),
        );
    }
}

/// One error per repeated occurrence of an ID.
fn check_unique_ids(document: &ProcedureDocument, report: &mut ValidationReport) {
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(document.steps.len());
    for (index, step) in document.steps.iter().enumerate() {
        if is_blank(&step.id) {
            continue;
        }
        if !seen.insert(step.id.as_str()) {
            report.error(
                error_codes::DUPLICATE_ID,
                format!(
                    "Duplicate step ID: '{}' - step IDs must be unique within a document",
                    step.id
                ),
                Some(format!("steps[{}].id", index)),
            );
        }
    }
}

fn check_step_fields(document: &ProcedureDocument, report: &mut ValidationReport) {
    for (index, step) in document.steps.iter().enumerate() {
        let label = step_label(index, &step.id);
        if is_blank(&step.id) {
            report.error(
                error_codes::MISSING_REQUIRED_FIELD,
                format!("{} is missing an id", label),
                Some(format!("steps[{}].id", index)),
            );
        }
        if is_blank(&step.title) {
            report.error(
                error_codes::MISSING_REQUIRED_FIELD,
                format!("{} is missing a title", label),
                Some(format!("steps[{}].title", index)),
            );
        }
        match &step.kind {
            None => report.error(
                error_codes::MISSING_REQUIRED_FIELD,
                format!("{} is missing a type", label),
                Some(format!("steps[{}].type", index)),
            ),
            Some(Declared::Unknown(raw)) => report.error(
                error_codes::INVALID_STEP_TYPE,
                format!(
                    "{} has invalid type '{}'; expected one of: {}",
                    label,
                    raw,
                    StepKind::ALL.iter().join(", ")
                ),
                Some(format!("steps[{}].type", index)),
            ),
            Some(Declared::Known(_)) => {}
        }
    }
}

fn check_decisions(document: &ProcedureDocument, report: &mut ValidationReport) {
    for (index, step) in document.steps.iter().enumerate() {
        if step.is_decision() && step.conditions.is_empty() {
            report.warning(
                error_codes::DECISION_WITHOUT_CONDITIONS,
                format!(
                    "Decision {} has no conditions",
                    step_label(index, &step.id)
                ),
                Some(format!("steps[{}].conditions", index)),
            );
        }
    }
}

fn check_references(document: &ProcedureDocument, report: &mut ValidationReport) {
    let known: AHashSet<&str> = document
        .steps
        .iter()
        .map(|step| step.id.as_str())
        .filter(|id| !is_blank(id))
        .collect();

    for (index, step) in document.steps.iter().enumerate() {
        let label = step_label(index, &step.id);
        for (next_index, target) in step.next_steps.iter().enumerate() {
            if !known.contains(target.as_str()) {
                report.error(
                    error_codes::INVALID_REFERENCE,
                    format!("{} references unknown next step '{}'", label, target),
                    Some(format!("steps[{}].nextSteps[{}]", index, next_index)),
                );
            }
        }
        for (condition_index, condition) in step.conditions.iter().enumerate() {
            let path = Some(format!(
                "steps[{}].conditions[{}].nextStep",
                index, condition_index
            ));
            if is_blank(&condition.next_step) {
                report.error(
                    error_codes::INVALID_REFERENCE,
                    format!(
                        "Condition {} of {} has no target step",
                        condition_index + 1,
                        label
                    ),
                    path,
                );
            } else if !known.contains(condition.next_step.as_str()) {
                report.error(
                    error_codes::INVALID_REFERENCE,
                    format!(
                        "Condition {} of {} references unknown step '{}'",
                        condition_index + 1,
                        label,
                        condition.next_step
                    ),
                    path,
                );
            }
        }
    }
}

fn check_triggers(document: &ProcedureDocument, report: &mut ValidationReport) {
    for (index, trigger) in document.triggers.iter().enumerate() {
        if let Declared::Unknown(raw) = &trigger.kind {
            report.error(
                error_codes::INVALID_TRIGGER_TYPE,
                format!(
                    "Trigger has invalid type '{}'; expected one of: {}",
                    raw,
                    TriggerKind::ALL.iter().join(", ")
                ),
                Some(format!("triggers[{}].type", index)),
            );
        }
    }
}

fn step_label(index: usize, id: &str) -> String {
    if is_blank(id) {
        format!("Step #{}", index + 1)
    } else {
        format!("Step '{}'", id)
    }
}
