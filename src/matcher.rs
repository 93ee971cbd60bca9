//! Row and structure matching against expected tables
//!
//! The actual value is encoded to its canonical JSON form, each expected
//! field is looked up with a path query, and values are compared by their
//! rendering. Expected cells are resolved first, so `{token}` works in tables.
//!
//! One asymmetric rule: an actual boolean matches the plain strings
//! "true"/"false" even though a bool is not a string.

use crate::config::constants::SCHEMA_MARKER_SUFFIX;
use crate::error::StepError;
use crate::jsonpath;
use crate::resolve::Resolver;
use crate::table::Row;
use crate::value::Value;

/// Outcome of matching one row: verdict plus diagnostic trace
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch {
    pub matched: bool,
    pub diagnostic: String,
}

/// Table matcher bound to a resolver for expected cells
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    resolver: &'a Resolver,
}

impl<'a> Matcher<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    /// Compare one actual value with one expected row
    ///
    /// Short-circuits on the first mismatch; the diagnostic lists the
    /// serialized actual value and every field checked so far.
    pub fn matches(&self, expected: &Row, actual: &Value) -> RowMatch {
        let actual_json = actual.to_json();
        let mut trace = vec![format!("Actual object: {actual_json}")];

        for (field, expected_cell) in expected {
            if field.ends_with(SCHEMA_MARKER_SUFFIX) {
                trace.push(format!("  {field}: SKIPPED (schema validation)"));
                continue;
            }

            let found = jsonpath::get(&actual_json, field)
                .map(Value::from)
                .unwrap_or_default();
            let resolved = self.resolver.resolve(expected_cell);

            if bool_matches_literal(&found, &resolved) {
                trace.push(format!("  {field}: OK ({found})"));
                continue;
            }

            let found_str = found.to_string();
            let expected_str = resolved.to_string();
            if found_str != expected_str {
                trace.push(format!(
                    "  {field}: MISMATCH - found: '{found_str}', expected: '{expected_str}'"
                ));
                return RowMatch {
                    matched: false,
                    diagnostic: trace.join("\n"),
                };
            }
            trace.push(format!("  {field}: OK ({found_str})"));
        }

        RowMatch {
            matched: true,
            diagnostic: trace.join("\n"),
        }
    }

    /// Same length, element-wise in order
    pub fn match_array(&self, actual: &[Value], expected: &[Row]) -> Result<(), StepError> {
        if actual.len() != expected.len() {
            return Err(StepError::LengthMismatch {
                expected: expected.len(),
                actual: actual.len(),
            });
        }

        for (index, (row, item)) in expected.iter().zip(actual).enumerate() {
            let outcome = self.matches(row, item);
            if !outcome.matched {
                return Err(StepError::RowMismatch {
                    index,
                    diagnostic: outcome.diagnostic,
                });
            }
        }
        Ok(())
    }

    /// Every expected row matches some actual element (order-free)
    pub fn match_subset(&self, actual: &[Value], expected: &[Row]) -> Result<(), StepError> {
        for row in expected {
            if !actual.iter().any(|item| self.matches(row, item).matched) {
                return Err(StepError::RowNotFound {
                    row: format!("{row:?}"),
                });
            }
        }
        Ok(())
    }

    /// No actual element matches any forbidden row
    pub fn match_excluded(&self, actual: &[Value], forbidden: &[Row]) -> Result<(), StepError> {
        for row in forbidden {
            if actual.iter().any(|item| self.matches(row, item).matched) {
                return Err(StepError::UnwantedRow {
                    row: format!("{row:?}"),
                });
            }
        }
        Ok(())
    }
}

/// Ordered comparison of rendered elements against literal strings
pub fn match_strings(actual: &[Value], expected: &[String]) -> Result<(), StepError> {
    if actual.len() != expected.len() {
        return Err(StepError::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (index, (item, want)) in actual.iter().zip(expected).enumerate() {
        let got = item.to_string();
        if &got != want {
            return Err(StepError::ElementMismatch {
                index,
                expected: want.clone(),
                actual: got,
            });
        }
    }
    Ok(())
}

/// Direct key comparison of a map or object against literal strings
pub fn match_object(field: &str, actual: &Value, expected: &Row) -> Result<(), StepError> {
    if !matches!(actual, Value::Map(_) | Value::Object(_)) {
        return Err(StepError::NotAnObject {
            field: field.to_string(),
        });
    }

    for (key, want) in expected {
        let got = actual.field(key).ok_or_else(|| StepError::FieldMissing { key: key.clone() })?;
        let got = got.to_string();
        if &got != want {
            return Err(StepError::FieldMismatch {
                key: key.clone(),
                expected: want.clone(),
                actual: got,
            });
        }
    }
    Ok(())
}

fn bool_matches_literal(found: &Value, expected: &Value) -> bool {
    match (found, expected.as_str()) {
        (Value::Bool(true), Some("true")) => true,
        (Value::Bool(false), Some("false")) => true,
        _ => false,
    }
}
