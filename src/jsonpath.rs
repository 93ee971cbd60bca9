//! Path query over the canonical structured form
//!
//! Supports:
//! - $.a.b.c (dot notation)
//! - $.a[0].b (array index)
//! - a.b.c and a.0.b (without $ prefix, numeric segments as indices,
//!   or as keys when the current value is an object)
//!
//! Does NOT support:
//! - Filters: $.a[?(@.x==1)]
//! - Wildcards: $.a[*]
//! - Slices: $.a[0:5]

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unsupported path syntax: {path}")]
pub struct PathError {
    pub path: String,
}

/// A parsed path segment
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object field access: .field
    Field(String),
    /// Array index access: [0]
    Index(usize),
}

/// Parse a path string into segments
///
/// Examples:
/// - "$.price.currency" → [Field("price"), Field("currency")]
/// - "items[0].name" → [Field("items"), Index(0), Field("name")]
pub fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    let path = if let Some(stripped) = path.strip_prefix("$.") {
        stripped
    } else if path == "$" {
        return Ok(vec![]);
    } else {
        path
    };

    if path.is_empty() {
        return Ok(vec![]);
    }

    let unsupported = || PathError {
        path: path.to_string(),
    };

    let mut segments = Vec::new();

    for part in path.split('.') {
        if part.is_empty() {
            return Err(unsupported());
        }

        if let Some(bracket_pos) = part.find('[') {
            let field = &part[..bracket_pos];
            if !field.is_empty() {
                segments.push(Segment::Field(field.to_string()));
            }

            // One or more trailing [n] groups: a[0][1]
            let mut rest = &part[bracket_pos..];
            while !rest.is_empty() {
                let inner = rest.strip_prefix('[').ok_or_else(unsupported)?;
                let close = inner.find(']').ok_or_else(unsupported)?;
                let index: usize = inner[..close].parse().map_err(|_| unsupported())?;
                segments.push(Segment::Index(index));
                rest = &inner[close + 1..];
            }
        } else if let Ok(index) = part.parse::<usize>() {
            segments.push(Segment::Index(index));
        } else {
            segments.push(Segment::Field(part.to_string()));
        }
    }

    Ok(segments)
}

/// Apply segments to a JSON value, cloning once at the end
pub fn apply(value: &Value, segments: &[Segment]) -> Option<Value> {
    let mut current = value;

    for segment in segments {
        current = match segment {
            Segment::Field(name) => current.get(name)?,
            Segment::Index(idx) => match current {
                Value::Object(map) => map.get(&idx.to_string())?,
                _ => current.get(*idx)?,
            },
        };
    }

    Some(current.clone())
}

/// Parse and apply in one step
pub fn resolve(value: &Value, path: &str) -> Result<Option<Value>, PathError> {
    let segments = parse(path)?;
    Ok(apply(value, &segments))
}

/// Lookup where invalid syntax counts as not found
pub fn get(root: &Value, path: &str) -> Option<Value> {
    resolve(root, path).ok().flatten()
}
