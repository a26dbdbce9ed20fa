use super::keyword::{ConditionOperator, Declared, StepKind, TriggerKind};
use crate::error::CompilationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value payload passed through the compiler untouched.
pub type Parameters = Map<String, Value>;

/// A standard operating procedure: ordered steps, branches and how it starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

/// One unit of work in a procedure.
///
/// `action_type` is only meaningful for action steps and `conditions` only for
/// decision steps; both are carried for every kind so documents survive editing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Declared<StepKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// A branch of a decision step, taken when `field <operator> value` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub next_step: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: Declared<TriggerKind>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Parameters,
}

impl ProcedureDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// The trigger that starts the procedure, if any.
    pub fn trigger(&self) -> Option<&Trigger> {
        self.triggers.first()
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Steps in ascending `order`; ties keep declaration order.
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    pub fn from_json(json: &str) -> Result<Self, CompilationError> {
        serde_json::from_str(json).map_err(|e| CompilationError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CompilationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompilationError::JsonParseError(e.to_string()))
    }
}

impl Step {
    pub fn new(id: impl Into<String>, order: u32, title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            order,
            title: title.into(),
            kind: Some(Declared::Known(kind)),
            ..Default::default()
        }
    }

    /// The step kind, if it was declared and recognized.
    pub fn kind(&self) -> Option<StepKind> {
        self.kind.as_ref().and_then(Declared::known)
    }

    pub fn is_decision(&self) -> bool {
        self.kind() == Some(StepKind::Decision)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_action(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_next<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_steps.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Every step ID this step can continue to, conditions first, without repeats.
    pub fn successors(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        let candidates = self
            .conditions
            .iter()
            .map(|c| c.next_step.as_str())
            .chain(self.next_steps.iter().map(String::as_str));
        for target in candidates {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<Value>,
        next_step: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            next_step: next_step.into(),
        }
    }
}

impl Trigger {
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind: Declared::Known(kind),
            config: Parameters::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}
