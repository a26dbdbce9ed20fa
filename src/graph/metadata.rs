use crate::document::{Parameters, Step, StepKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Reserved node parameter holding the step a node was compiled from.
pub const METADATA_KEY: &str = "_procedureStep";

/// Round-trip record of a step, embedded into the node it compiles to.
///
/// The graph format cannot express everything a step carries (a wait step is just
/// another engine node, step IDs are not node names), so the forward compiler stores
/// this record and the reverse compiler prefers it over anything it could derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetadata {
    pub id: String,
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default)]
    pub config: Parameters,
}

impl StepMetadata {
    pub fn from_step(step: &Step, kind: StepKind) -> Self {
        Self {
            id: step.id.clone(),
            order: step.order,
            title: step.title.clone(),
            description: step.description.clone(),
            kind,
            action_type: step.action_type.clone(),
            config: step.parameters.clone(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "id": self.id,
            "order": self.order,
            "title": self.title,
            "description": self.description,
            "type": self.kind.as_str(),
            "config": Value::Object(self.config.clone()),
        });
        if let (Some(action_type), Value::Object(map)) = (&self.action_type, &mut value) {
            map.insert("actionType".to_string(), Value::String(action_type.clone()));
        }
        value
    }

    pub fn embed(&self, parameters: &mut Parameters) {
        parameters.insert(METADATA_KEY.to_string(), self.to_value());
    }

    /// Reads the record back; a missing or malformed record yields `None`.
    pub fn extract(parameters: &Parameters) -> Option<Self> {
        parameters
            .get(METADATA_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// A copy of node parameters without the reserved metadata entry.
pub fn strip_metadata(parameters: &Parameters) -> Parameters {
    parameters
        .iter()
        .filter(|(key, _)| key.as_str() != METADATA_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
