//! Locate and decode the JSON object inside raw parse-task output.
//!
//! The model is asked for bare JSON but routinely wraps it in code fences or
//! chats around it, so we scan for the first balanced `{...}` block.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Fields the parse-task prompt asks for. Every one of them may be missing,
/// null, or of the wrong JSON type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTask {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub status: Option<String>,
    #[serde(default, alias = "due_date", deserialize_with = "loose_text")]
    pub due_date: Option<String>,
}

fn loose_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Array(items)) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(|i| i.as_str().map(str::to_string))
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
        _ => None,
    })
}

/// Return the first balanced JSON object in `raw`, ignoring braces inside strings.
pub fn find_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode parse-task output. `None` means there was no usable JSON object.
pub fn parse_task_response(raw: &str) -> Option<ParsedTask> {
    let mut rest = raw;
    // A stray `{` in leading prose should not hide a later valid object.
    while let Some(obj) = find_json_object(rest) {
        if let Ok(parsed) = serde_json::from_str::<ParsedTask>(obj) {
            return Some(parsed);
        }
        let offset = obj.as_ptr() as usize - rest.as_ptr() as usize;
        rest = &rest[offset + 1..];
    }
    None
}

/// Shorten raw AI output for an error message.
pub fn snippet(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut s: String = trimmed.chars().take(max_chars).collect();
    s.push('…');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"title\":\"Call Sarah\",\"dueDate\":null,\"priority\":\"High\"}\n```";
        let p = parse_task_response(raw).unwrap();
        assert_eq!(p.title.as_deref(), Some("Call Sarah"));
        assert_eq!(p.due_date, None);
        assert_eq!(p.priority.as_deref(), Some("High"));
    }

    #[test]
    fn test_surrounding_prose_and_braces_in_strings() {
        let raw = "Sure! Here you go: {\"title\":\"Fix {braces}\",\"description\":\"1. a\\n2. b\"} Hope it helps.";
        let p = parse_task_response(raw).unwrap();
        assert_eq!(p.title.as_deref(), Some("Fix {braces}"));
        assert_eq!(p.description.as_deref(), Some("1. a\n2. b"));
    }

    #[test]
    fn test_stray_brace_before_object() {
        let raw = "Note {not json} then {\"title\":\"Real\"}";
        assert_eq!(parse_task_response(raw).unwrap().title.as_deref(), Some("Real"));
    }

    #[test]
    fn test_loose_field_types() {
        let raw = r#"{"title": 42, "description": ["Buy milk", "Pay rent"], "status": true}"#;
        let p = parse_task_response(raw).unwrap();
        assert_eq!(p.title.as_deref(), Some("42"));
        assert_eq!(p.description.as_deref(), Some("Buy milk\nPay rent"));
        assert_eq!(p.status.as_deref(), Some("true"));
    }

    #[test]
    fn test_no_object() {
        assert_eq!(parse_task_response("I could not understand that."), None);
        assert_eq!(parse_task_response("{\"title\": \"unterminated\""), None);
    }

    #[test]
    fn test_snippet_truncates() {
        assert_eq!(snippet("  abc  ", 5), "abc");
        assert_eq!(snippet("abcdef", 3), "abc…");
    }
}
