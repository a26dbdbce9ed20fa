use serde_json::{Deserializer, Value};

/// Writes a value the way it appears after `Key:` in markup: plain strings raw,
/// everything else (and strings that would read back differently) as JSON.
pub(super) fn encode_value(value: &Value) -> String {
    match value {
        Value::String(text) if is_plain(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Reads a markup value: JSON when it parses as JSON, the raw text otherwise.
pub(super) fn decode_value(text: &str) -> Value {
    let text = text.trim();
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Free text on a property line: raw when it is a single plain line, a JSON
/// string otherwise.
pub(super) fn encode_text(text: &str) -> String {
    let plain = text == text.trim() && !text.contains(['\n', '\r']) && !text.starts_with('"');
    if plain {
        text.to_string()
    } else {
        Value::String(text.to_string()).to_string()
    }
}

/// Reads text written by [`encode_text`].
pub(super) fn decode_text(text: &str) -> String {
    let text = text.trim();
    if text.starts_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(text) {
            return decoded;
        }
    }
    text.to_string()
}

/// Description lines that would read as a heading get a leading `\`, as does any
/// line already starting with one.
pub(super) fn escape_line(line: &str) -> String {
    if line.starts_with(['#', '\\']) {
        format!("\\{}", line)
    } else {
        line.to_string()
    }
}

pub(super) fn unescape_line(line: &str) -> &str {
    line.strip_prefix('\\').unwrap_or(line)
}

/// A condition field is written raw when it is a single token.
pub(super) fn encode_field(field: &str) -> String {
    let plain = !field.is_empty()
        && !field.starts_with('"')
        && !field.chars().any(char::is_whitespace);
    if plain {
        field.to_string()
    } else {
        Value::String(field.to_string()).to_string()
    }
}

/// Splits a leading field token off `text`, returning it with the remainder.
pub(super) fn split_field(text: &str) -> (String, &str) {
    let text = text.trim_start();
    if text.starts_with('"') {
        let mut stream = Deserializer::from_str(text).into_iter::<String>();
        if let Some(Ok(field)) = stream.next() {
            let rest = &text[stream.byte_offset()..];
            return (field, rest.trim_start());
        }
    }
    match text.split_once(char::is_whitespace) {
        Some((field, rest)) => (field.to_string(), rest.trim_start()),
        None => (text.to_string(), ""),
    }
}

fn is_plain(text: &str) -> bool {
    !text.is_empty()
        && text == text.trim()
        && !text.contains(['\n', '\r'])
        && serde_json::from_str::<Value>(text).is_err()
}
