//! Turning raw model text into checked JSON.
//!
//! Models often wrap their JSON in a markdown code fence even when told not
//! to. Cleanup is best-effort: strip the fence if there is one, then parse.
//! Parse failures are `MalformedResponse`; a parsed value that lacks or
//! mistypes a required field is `InvalidShape`.

use serde_json::{Map, Value};

use crate::{FutplotError, Result};

const FENCE: &str = "```";

/// Remove a surrounding markdown code fence, with or without a language tag.
///
/// Only a fence that opens a line counts, so backticks inside a JSON string
/// are left alone. Text outside the fenced block is dropped. Unfenced text
/// is only trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = opening_fence(trimmed) else {
        return trimmed;
    };
    let after_open = &trimmed[start + FENCE.len()..];
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body = match after_open.find('\n') {
        Some(nl) if is_info_string(&after_open[..nl]) => &after_open[nl + 1..],
        _ => after_open
            .strip_prefix("json")
            .or_else(|| after_open.strip_prefix("JSON"))
            .unwrap_or(after_open),
    };
    let body = match body.rfind(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Byte offset of the first fence at the start of a line.
fn opening_fence(text: &str) -> Option<usize> {
    text.match_indices(FENCE)
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || text[..idx].ends_with('\n'))
}

fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse JSON, stripping a code fence if the text is not already JSON.
pub fn parse_json(raw: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(raw.trim()) {
        return Ok(value);
    }
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        FutplotError::MalformedResponse(format!("{e} (response starts with {:?})", preview(cleaned)))
    })
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

/// Typed access to the required fields of a JSON object.
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Require `value` to be a JSON object.
    pub fn of(value: &'a Value) -> Result<Self> {
        value
            .as_object()
            .map(|object| Self { object })
            .ok_or_else(|| FutplotError::InvalidShape("expected a JSON object".to_string()))
    }

    fn get(&self, field: &str) -> Result<&'a Value> {
        self.object
            .get(field)
            .ok_or_else(|| FutplotError::InvalidShape(format!("missing field `{field}`")))
    }

    pub fn string(&self, field: &str) -> Result<String> {
        match self.get(field)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(mistyped(field, "a string", other)),
        }
    }

    /// An array whose every element is a string.
    pub fn string_array(&self, field: &str) -> Result<Vec<String>> {
        let Value::Array(items) = self.get(field)? else {
            return Err(mistyped(field, "an array of strings", self.get(field)?));
        };
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(mistyped(field, "an array of strings", other)),
            })
            .collect()
    }

    pub fn number(&self, field: &str) -> Result<f64> {
        match self.get(field)? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| FutplotError::InvalidShape(format!("`{field}` is not finite"))),
            other => Err(mistyped(field, "a number", other)),
        }
    }
}

fn mistyped(field: &str, expected: &str, found: &Value) -> FutplotError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    FutplotError::InvalidShape(format!("`{field}` must be {expected}, found {found}"))
}
