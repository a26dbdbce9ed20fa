use super::value::{decode_text, decode_value, split_field, unescape_line};
use crate::document::{
    Condition, ConditionOperator, Declared, Parameters, ProcedureDocument, Step, StepKind,
    Trigger, TriggerKind,
};

/// The part of the document the parser is currently reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Description,
    Trigger,
    Steps,
    /// A `##` heading outside the vocabulary; its lines are skipped.
    Other,
}

/// A step whose block is still open. Omitted fields get defaults on close.
#[derive(Debug, Default)]
struct PartialStep {
    order: u32,
    title: String,
    id: Option<String>,
    kind: Option<Declared<StepKind>>,
    action_type: Option<String>,
    description: String,
    parameters: Parameters,
    next_steps: Vec<String>,
    conditions: Vec<Condition>,
    pending: Option<Condition>,
}

impl PartialStep {
    fn flush_condition(&mut self) {
        if let Some(condition) = self.pending.take() {
            self.conditions.push(condition);
        }
    }

    fn into_step(mut self) -> Step {
        self.flush_condition();
        Step {
            id: self
                .id
                .unwrap_or_else(|| format!("step_{}", self.order)),
            order: self.order,
            title: self.title,
            description: self.description,
            kind: Some(self.kind.unwrap_or(Declared::Known(StepKind::Action))),
            action_type: self.action_type,
            parameters: self.parameters,
            next_steps: self.next_steps,
            conditions: self.conditions,
        }
    }
}

/// Line-oriented state machine over headings (`#`, `##`, `###`) and property lines.
struct MarkupParser {
    document: ProcedureDocument,
    section: Section,
    description: Vec<String>,
    step: Option<PartialStep>,
    trigger: Option<Trigger>,
}

impl MarkupParser {
    fn new() -> Self {
        Self {
            document: ProcedureDocument::default(),
            section: Section::None,
            description: Vec::new(),
            step: None,
            trigger: None,
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim_end();

        if let Some((level, text)) = heading(line) {
            self.close_blocks();
            match level {
                1 => {
                    self.document.title = text.to_string();
                    self.section = Section::None;
                }
                2 => self.section = section_for(text),
                _ => self.open_step(text),
            }
            return;
        }

        if self.section == Section::Description {
            self.description.push(unescape_line(line).to_string());
            return;
        }

        let indented = line.starts_with([' ', '\t']);
        let Some((key, value)) = property(line.trim_start()) else {
            return;
        };

        if indented {
            self.feed_entry(key, value);
        } else {
            self.feed_property(&key.to_ascii_lowercase(), value);
        }
    }

    /// A `  - key: value` line: a parameter of the open step or a config entry of
    /// the open trigger.
    fn feed_entry(&mut self, key: &str, value: &str) {
        let target = match self.section {
            Section::Steps => self.step.as_mut().map(|s| &mut s.parameters),
            Section::Trigger => self.trigger.as_mut().map(|t| &mut t.config),
            _ => None,
        };
        if let Some(map) = target {
            map.insert(key.to_string(), decode_value(value));
        }
    }

    fn feed_property(&mut self, key: &str, value: &str) {
        match self.section {
            Section::None if key == "version" => self.document.version = value.to_string(),
            Section::Trigger if key == "type" => {
                self.close_trigger();
                self.trigger = Some(Trigger {
                    kind: Declared::<TriggerKind>::parse(value),
                    config: Parameters::new(),
                });
            }
            Section::Steps => {
                if let Some(step) = self.step.as_mut() {
                    apply_step_property(step, key, value);
                }
            }
            _ => {}
        }
    }

    fn open_step(&mut self, text: &str) {
        self.section = Section::Steps;
        let fallback_order = self.document.steps.len() as u32 + 1;
        let (order, title) = match text.split_once('.') {
            Some((number, title)) => match number.trim().parse::<u32>() {
                Ok(order) => (order, title.trim()),
                Err(_) => (fallback_order, text),
            },
            None => (fallback_order, text),
        };
        self.step = Some(PartialStep {
            order,
            title: title.to_string(),
            ..Default::default()
        });
    }

    fn close_trigger(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            self.document.triggers.push(trigger);
        }
    }

    fn close_blocks(&mut self) {
        if let Some(step) = self.step.take() {
            self.document.steps.push(step.into_step());
        }
        self.close_trigger();
    }

    fn finish(mut self) -> ProcedureDocument {
        self.close_blocks();
        self.document.description = self.description.join("\n").trim().to_string();
        self.document
    }
}

fn apply_step_property(step: &mut PartialStep, key: &str, value: &str) {
    match key {
        "id" => step.id = Some(value.to_string()),
        "type" => step.kind = Some(Declared::<StepKind>::parse(value)),
        "action" => step.action_type = Some(value.to_string()).filter(|a| !a.is_empty()),
        "description" => step.description = decode_text(value),
        "next" => step.next_steps.extend(
            value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        ),
        "condition" => {
            step.flush_condition();
            step.pending = Some(parse_condition(value));
        }
        "if true" => match step.pending.take() {
            Some(mut condition) => {
                condition.next_step = value.to_string();
                step.conditions.push(condition);
            }
            None => tracing::warn!(
                step = %step.title,
                "'If true' line without a preceding condition ignored"
            ),
        },
        // Entries follow as indented lines.
        "parameters" => {}
        other => tracing::debug!(key = other, "unknown step property ignored"),
    }
}

/// `<field> <operator> <value>`; an unknown operator reads as `equals`.
fn parse_condition(text: &str) -> Condition {
    let (field, rest) = split_field(text);
    let (operator_word, value) = match rest.split_once(char::is_whitespace) {
        Some((word, value)) => (word, value),
        None => (rest, ""),
    };
    let operator = ConditionOperator::from_keyword(operator_word).unwrap_or_else(|| {
        tracing::warn!(
            operator = operator_word,
            "unknown condition operator, reading as 'equals'"
        );
        ConditionOperator::Equals
    });
    Condition {
        field,
        operator,
        value: decode_value(value),
        next_step: String::new(),
    }
}

/// `#`-prefix level and heading text, for lines like `## Steps`.
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|text| (level, text.trim()))
}

fn section_for(name: &str) -> Section {
    match name.trim().to_ascii_lowercase().as_str() {
        "description" => Section::Description,
        "trigger" | "triggers" => Section::Trigger,
        "steps" => Section::Steps,
        _ => Section::Other,
    }
}

/// Splits `- Key: Value` into key and trimmed value.
fn property(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix("- ")?;
    let (key, value) = body.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Parses procedure markup. Never fails: unknown lines are skipped and omitted step
/// fields get defaults (`type` is `action`, `id` is `step_<order>`).
pub fn parse_markup(text: &str) -> ProcedureDocument {
    let mut parser = MarkupParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}
