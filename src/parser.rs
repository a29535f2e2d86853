use crate::error::ParseError;
use crate::ir::{Dashboard, DiagramKind, DiagramRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*```[A-Za-z0-9_-]*\s*$").unwrap());

/// Remove Markdown code fences the generator sometimes wraps around JSON.
pub fn strip_code_fences(input: &str) -> String {
    FENCE_RE.replace_all(input, "").trim().to_string()
}

fn parse_value(input: &str) -> Result<Value, ParseError> {
    let cleaned = strip_code_fences(input);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => Ok(value),
        Err(strict_err) => json5::from_str::<Value>(&cleaned).map_err(|_| strict_err.into()),
    }
}

/// Parse a single tagged diagram record.
pub fn parse_record(input: &str) -> Result<DiagramRecord, ParseError> {
    record_from_value(parse_value(input)?)
}

/// Parse a record produced for a known variant; its own `type` tag, if any, is ignored.
pub fn parse_record_as(input: &str, kind: DiagramKind) -> Result<DiagramRecord, ParseError> {
    let mut value = parse_value(input)?;
    match value.as_object_mut() {
        Some(map) => {
            map.insert("type".to_string(), Value::String(kind.tag().to_string()));
        }
        None => return Err(ParseError::MissingType),
    }
    record_from_value(value)
}

pub fn record_from_value(mut value: Value) -> Result<DiagramRecord, ParseError> {
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingType)?
        .to_string();
    let kind = DiagramKind::from_tag(&tag).ok_or(ParseError::UnknownType(tag))?;
    if let Some(map) = value.as_object_mut() {
        map.insert("type".to_string(), Value::String(kind.tag().to_string()));
    }
    serde_json::from_value(value).map_err(|source| ParseError::Record {
        kind: kind.tag(),
        source,
    })
}

/// Parse a dashboard response: `{title, summary, diagrams: [...]}`.
///
/// A bare array of records or a single record is accepted as well. Entries
/// with an unknown type or a malformed shape are skipped, not fatal.
pub fn parse_dashboard(input: &str) -> Result<Dashboard, ParseError> {
    let value = parse_value(input)?;
    let text = |map: &serde_json::Map<String, Value>, key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    if value.get("type").is_some() {
        return Ok(Dashboard {
            title: String::new(),
            summary: String::new(),
            diagrams: vec![record_from_value(value)?],
        });
    }

    let (title, summary, entries) = match value {
        Value::Array(entries) => (String::new(), String::new(), entries),
        Value::Object(mut map) => {
            let title = text(&map, "title");
            let summary = text(&map, "summary");
            let entries = match map.remove("diagrams") {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            };
            (title, summary, entries)
        }
        _ => return Err(ParseError::MissingType),
    };

    let mut diagrams = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match record_from_value(entry) {
            Ok(record) => diagrams.push(record),
            Err(err) => tracing::warn!(index, error = %err, "skipping dashboard diagram"),
        }
    }
    tracing::debug!(count = diagrams.len(), "parsed dashboard");

    Ok(Dashboard {
        title,
        summary,
        diagrams,
    })
}
