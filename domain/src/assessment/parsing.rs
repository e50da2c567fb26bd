//! Reviewer response parsing.
//!
//! Extracts a structured [`ProposedDecision`] from free-form reviewer output.
//! Pure text handling, no I/O.
//!
//! Accepted shapes, tried in order:
//!
//! 1. the whole response is a JSON object
//! 2. a fenced code block (```` ```json ... ``` ````) holding one
//! 3. the first `{ ... }` span in the text
//!
//! Missing or unknown fields fall back conservatively: an unknown decision
//! becomes `more_info`, a missing confidence becomes 0.5.

use super::decision::{DecisionKind, ProposedDecision};
use serde_json::Value;

/// Confidence assumed when the reviewer omits one
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Parse a reviewer response.
///
/// Returns `None` when no JSON object can be found at all; callers then use
/// [`Decision::fallback`](super::decision::Decision::fallback).
///
/// # Examples
///
/// ```
/// use matchmaker_domain::assessment::parsing::parse_reviewer_response;
/// use matchmaker_domain::assessment::DecisionKind;
///
/// let d = parse_reviewer_response(r#"{"decision": "proceed", "rationale": "Fit", "confidence": 0.8}"#)
///     .unwrap();
/// assert_eq!(d.decision, DecisionKind::Proceed);
/// assert!(parse_reviewer_response("no json here").is_none());
/// ```
pub fn parse_reviewer_response(response: &str) -> Option<ProposedDecision> {
    let object = extract_json_object(response)?;

    let decision = object
        .get("decision")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<DecisionKind>().ok())
        .unwrap_or_default();

    let rationale = match object.get("rationale") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let confidence = object
        .get("confidence")
        .and_then(value_as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE);

    Some(ProposedDecision::new(decision, rationale, confidence))
}

/// Locate the first JSON object in a response
fn extract_json_object(response: &str) -> Option<serde_json::Map<String, Value>> {
    let trimmed = response.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(map);
    }

    if let Some(fenced) = strip_code_fence(trimmed)
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&fenced)
    {
        return Some(map);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    // Widest span first, then shrink to the first balanced object
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
        return Some(map);
    }
    let mut stream = serde_json::Deserializer::from_str(&trimmed[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(map))) => Some(map),
        _ => None,
    }
}

/// Contents of the first fenced block, without the fence lines
fn strip_code_fence(text: &str) -> Option<String> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let close = body.find("```").unwrap_or(body.len());
    Some(body[..close].trim().to_string())
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
