//! Request input: where the counts object comes from

use errors::PlannerResult;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Read the raw request body from the `--counts` flag, a file, or stdin (in that order)
pub fn read_request(counts: Option<&str>, file: Option<&Path>) -> PlannerResult<Value> {
    let text = match (counts, file) {
        (Some(inline), _) => inline.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        },
    };
    parse_request(&text)
}

/// Parse request text; blank input is an empty request
pub fn parse_request(text: &str) -> PlannerResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(text)?)
}

/// Unwrap a `{ "counts": {...} }` envelope; a bare object is taken as the counts
///
/// A missing or null `counts` inside an envelope means an empty request.
pub fn extract_counts(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("counts") => match map.remove("counts") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(counts) => counts,
        },
        other => other,
    }
}
