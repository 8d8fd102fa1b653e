// Argument handling at the tool boundary.
//
// Callers sometimes wrap the argument object in a one-element array. That is
// unwrapped here so the services only ever see one well-typed parameter set.

use serde_json::{Map, Value};

pub type ToolArgs = Map<String, Value>;

/// Accepts `{...}` or `[{...}]`; `null` counts as no arguments.
pub fn normalize_args(args: &Value) -> Result<ToolArgs, String> {
    match args {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.len() == 1 => match &items[0] {
            Value::Object(map) => Ok(map.clone()),
            _ => Err("Arguments must be an object".to_string()),
        },
        Value::Array(items) => Err(format!(
            "Expected one argument object, got an array of {}",
            items.len()
        )),
        _ => Err("Arguments must be an object".to_string()),
    }
}

pub fn required_str<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, String> {
    match args.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) => Err(format!("'{}' must not be empty", key)),
        Some(_) => Err(format!("'{}' must be a string", key)),
        None => Err(format!("Missing '{}' argument", key)),
    }
}

/// Accepts a bare document ID or a `docs.google.com/document/d/<id>/...` URL.
pub fn extract_document_id(url_or_id: &str) -> Option<&str> {
    let trimmed = url_or_id.trim();
    if trimmed.contains("docs.google.com") {
        let (_, after_d) = trimmed.split_once("/document/d/")?;
        let id = after_d.split(['/', '?', '#']).next().unwrap_or_default();
        (!id.is_empty()).then_some(id)
    } else if !trimmed.is_empty() && !trimmed.contains('/') && !trimmed.contains(' ') {
        Some(trimmed)
    } else {
        None
    }
}

pub fn document_id_arg<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, String> {
    let raw = required_str(args, key)?;
    extract_document_id(raw)
        .ok_or_else(|| format!("'{}' must be a document ID or a Google Docs URL", key))
}

/// Like `required_str` but allows an empty string (e.g. clearing a document).
pub fn required_text<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, String> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(format!("'{}' must be a string", key)),
        None => Err(format!("Missing '{}' argument", key)),
    }
}

pub fn optional_str<'a>(args: &'a ToolArgs, key: &str) -> Result<Option<&'a str>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(format!("'{}' must be a string", key)),
    }
}

/// Accepts a number or a numeric string.
pub fn optional_u32(args: &ToolArgs, key: &str) -> Result<Option<u32>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("'{}' must be a non-negative integer", key)),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("'{}' must be a non-negative integer", key)),
        Some(_) => Err(format!("'{}' must be a non-negative integer", key)),
    }
}

/// A list of strings given as a JSON array or a comma-separated string.
pub fn string_list(args: &ToolArgs, key: &str) -> Result<Vec<String>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| format!("'{}' must contain only strings", key))
            })
            .collect(),
        Some(_) => Err(format!("'{}' must be a list of strings", key)),
    }
}

/// A rectangular-ish matrix of scalars: `[[1, "a"], [2, "b"]]`.
pub fn value_rows(args: &ToolArgs, key: &str) -> Result<Vec<Vec<Value>>, String> {
    let rows = args
        .get(key)
        .ok_or_else(|| format!("Missing '{}' argument", key))?
        .as_array()
        .ok_or_else(|| format!("'{}' must be an array of rows", key))?;

    if rows.is_empty() {
        return Err(format!("'{}' must contain at least one row", key));
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .as_array()
                .ok_or_else(|| format!("Row {} of '{}' must be an array", i + 1, key))?;
            cells
                .iter()
                .map(|cell| match cell {
                    Value::Array(_) | Value::Object(_) => Err(format!(
                        "Row {} of '{}' contains a non-scalar value",
                        i + 1,
                        key
                    )),
                    scalar => Ok(scalar.clone()),
                })
                .collect::<Result<Vec<Value>, String>>()
        })
        .collect()
}
