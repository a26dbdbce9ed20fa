use crate::document::ConditionOperator;
use serde_json::{Value, json};

/// How an engine comparison maps back onto the logical operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMatch {
    Exact(ConditionOperator),
    /// A close but not identical comparison, e.g. `gte` read as `greater`.
    Approximate(ConditionOperator),
    Unknown,
}

/// The engine's `{ type, operation }` pair for a logical operator.
pub fn engine_operator(operator: ConditionOperator) -> (&'static str, &'static str) {
    match operator {
        ConditionOperator::Equals => ("string", "equals"),
        ConditionOperator::Contains => ("string", "contains"),
        ConditionOperator::Greater => ("number", "gt"),
        ConditionOperator::Less => ("number", "lt"),
    }
}

pub fn engine_operator_value(operator: ConditionOperator) -> Value {
    let (value_type, operation) = engine_operator(operator);
    json!({ "type": value_type, "operation": operation })
}

pub fn logical_operator(operation: &str) -> OperatorMatch {
    match operation {
        "equals" => OperatorMatch::Exact(ConditionOperator::Equals),
        "contains" => OperatorMatch::Exact(ConditionOperator::Contains),
        "gt" => OperatorMatch::Exact(ConditionOperator::Greater),
        "lt" => OperatorMatch::Exact(ConditionOperator::Less),
        "gte" => OperatorMatch::Approximate(ConditionOperator::Greater),
        "lte" => OperatorMatch::Approximate(ConditionOperator::Less),
        _ => OperatorMatch::Unknown,
    }
}

/// Engine expression reading `field` from the incoming item.
pub fn field_expression(field: &str) -> String {
    let plain = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain {
        format!("={{{{ $json.{} }}}}", field)
    } else {
        format!("={{{{ $json[{}] }}}}", Value::String(field.to_string()))
    }
}

/// Recovers the field name from an expression built by [`field_expression`].
/// Anything else is returned trimmed, as a literal field key.
pub fn field_from_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix("={{")
        .and_then(|rest| rest.strip_suffix("}}"))
        .map(str::trim);
    let Some(path) = inner.and_then(|inner| inner.strip_prefix("$json")) else {
        return trimmed.to_string();
    };
    if let Some(field) = path.strip_prefix('.') {
        return field.trim().to_string();
    }
    path.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|quoted| serde_json::from_str::<String>(quoted).ok())
        .unwrap_or_else(|| trimmed.to_string())
}
