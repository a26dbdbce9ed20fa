use super::NodeType;
use crate::document::TriggerKind;

pub const MANUAL_TRIGGER_NODE: &str = "n8n-nodes-base.manualTrigger";
pub const SCHEDULE_TRIGGER_NODE: &str = "n8n-nodes-base.scheduleTrigger";
pub const WEBHOOK_NODE: &str = "n8n-nodes-base.webhook";
pub const EVENT_TRIGGER_NODE: &str = "n8n-nodes-base.n8nTrigger";

pub fn trigger_node_type(kind: TriggerKind) -> NodeType {
    match kind {
        TriggerKind::Manual => NodeType::new(MANUAL_TRIGGER_NODE, 1.0),
        TriggerKind::Schedule => NodeType::new(SCHEDULE_TRIGGER_NODE, 1.2),
        TriggerKind::Webhook => NodeType::new(WEBHOOK_NODE, 2.0),
        TriggerKind::Event => NodeType::new(EVENT_TRIGGER_NODE, 1.0),
    }
}

/// Display name given to a materialized trigger node.
pub fn trigger_node_name(kind: TriggerKind) -> &'static str {
    match kind {
        TriggerKind::Manual => "Manual Trigger",
        TriggerKind::Schedule => "Schedule Trigger",
        TriggerKind::Webhook => "Webhook",
        TriggerKind::Event => "Event Trigger",
    }
}

/// Whether an engine node type is an entry point, judged by its name alone.
/// Decompilation reads types claimed by the `TypeMap` as steps first.
pub fn is_trigger_type(node_type: &str) -> bool {
    let lowered = node_type.to_ascii_lowercase();
    lowered.contains("trigger") || lowered.ends_with(".webhook")
}

/// Reverse lookup. Trigger types outside the table are external events, except
/// the ones whose name says they are schedules or webhooks.
pub fn trigger_kind(node_type: &str) -> TriggerKind {
    match node_type {
        MANUAL_TRIGGER_NODE => TriggerKind::Manual,
        SCHEDULE_TRIGGER_NODE => TriggerKind::Schedule,
        WEBHOOK_NODE => TriggerKind::Webhook,
        EVENT_TRIGGER_NODE => TriggerKind::Event,
        other => {
            let lowered = other.to_ascii_lowercase();
            if lowered.contains("schedule") || lowered.contains("cron") {
                TriggerKind::Schedule
            } else if lowered.contains("webhook") {
                TriggerKind::Webhook
            } else if lowered.contains("manual") {
                TriggerKind::Manual
            } else {
                TriggerKind::Event
            }
        }
    }
}
