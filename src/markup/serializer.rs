use super::value::{encode_field, encode_text, encode_value, escape_line};
use crate::document::{Parameters, ProcedureDocument, Step, Trigger};
use itertools::Itertools;
use std::fmt;

/// Displays a document as procedure markup.
///
/// Sections come in a fixed order (title block, description, trigger, steps) and
/// step properties in a fixed order, so equal documents render identically.
pub struct DisplayMarkup<'a> {
    pub document: &'a ProcedureDocument,
}

impl fmt::Display for DisplayMarkup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.document;
        writeln!(f, "# {}", document.title)?;
        if !document.version.is_empty() {
            writeln!(f)?;
            writeln!(f, "- Version: {}", document.version)?;
        }

        if !document.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Description")?;
            writeln!(f)?;
            for line in document.description.lines() {
                writeln!(f, "{}", escape_line(line))?;
            }
        }

        if !document.triggers.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Trigger")?;
            writeln!(f)?;
            for trigger in &document.triggers {
                write_trigger(f, trigger)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "## Steps")?;
        for step in &document.steps {
            writeln!(f)?;
            write_step(f, step)?;
        }
        Ok(())
    }
}

fn write_trigger(f: &mut fmt::Formatter<'_>, trigger: &Trigger) -> fmt::Result {
    writeln!(f, "- Type: {}", trigger.kind)?;
    write_entries(f, &trigger.config)
}

fn write_step(f: &mut fmt::Formatter<'_>, step: &Step) -> fmt::Result {
    writeln!(f, "### {}. {}", step.order, step.title)?;
    writeln!(f, "- ID: {}", step.id)?;
    if let Some(kind) = &step.kind {
        writeln!(f, "- Type: {}", kind)?;
    }
    if let Some(action_type) = &step.action_type {
        writeln!(f, "- Action: {}", action_type)?;
    }
    if !step.description.is_empty() {
        writeln!(f, "- Description: {}", encode_text(&step.description))?;
    }
    if !step.parameters.is_empty() {
        writeln!(f, "- Parameters:")?;
        write_entries(f, &step.parameters)?;
    }
    if !step.next_steps.is_empty() {
        writeln!(f, "- Next: {}", step.next_steps.iter().join(", "))?;
    }
    for condition in &step.conditions {
        writeln!(
            f,
            "- Condition: {} {} {}",
            encode_field(&condition.field),
            condition.operator,
            encode_value(&condition.value)
        )?;
        if !condition.next_step.is_empty() {
            writeln!(f, "- If true: {}", condition.next_step)?;
        }
    }
    Ok(())
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &Parameters) -> fmt::Result {
    for (key, value) in entries {
        writeln!(f, "  - {}: {}", key, encode_value(value))?;
    }
    Ok(())
}

/// Renders a document as procedure markup.
pub fn serialize_to_markup(document: &ProcedureDocument) -> String {
    DisplayMarkup { document }.to_string()
}
