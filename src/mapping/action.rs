use super::NodeType;

/// Master macro defining the built-in action table together with its lookups in
/// both directions.
macro_rules! define_action_types {
    ( $( ($action:literal, $node_type:literal, $version:literal) ),* $(,)? ) => {
        /// Built-in `(action_type, node_type, type_version)` entries.
        pub const BUILTIN_ACTIONS: &[(&str, &str, f64)] = &[
            $( ($action, $node_type, $version), )*
        ];

        pub(super) fn builtin_node_type(action_type: &str) -> Option<NodeType> {
            match action_type {
                $( $action => Some(NodeType::new($node_type, $version)), )*
                _ => None,
            }
        }

        pub(super) fn builtin_action_type(node_type: &str) -> Option<&'static str> {
            match node_type {
                $( $node_type => Some($action), )*
                _ => None,
            }
        }
    };
}

define_action_types! {
    ("http_request", "n8n-nodes-base.httpRequest", 4.2),
    ("send_email", "n8n-nodes-base.emailSend", 2.1),
    ("slack_message", "n8n-nodes-base.slack", 2.2),
    ("set_fields", "n8n-nodes-base.set", 3.4),
    ("run_code", "n8n-nodes-base.code", 2.0),
    ("database_query", "n8n-nodes-base.postgres", 2.5),
    ("spreadsheet_update", "n8n-nodes-base.googleSheets", 4.5),
    ("respond_webhook", "n8n-nodes-base.respondToWebhook", 1.1),
    ("merge_data", "n8n-nodes-base.merge", 3.0),
    ("noop", "n8n-nodes-base.noOp", 1.0),
}

/// Passthrough node used for actions the table does not know.
pub const NOOP_ACTION: &str = "noop";
