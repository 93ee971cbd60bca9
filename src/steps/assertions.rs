//! Value assertion steps
//!
//! Every assertion resolves its field first. Comparisons are made on the
//! rendered form, so `{42}` (a float) equals the JSON integer `42`.

use crate::error::StepError;
use crate::table::DataTable;
use crate::value::Value;
use crate::world::PropsWorld;

impl PropsWorld {
    /// "{x}" is null | is nil | is undefined
    pub fn assert_null(&self, field: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        if !actual.is_null() {
            return Err(StepError::ExpectedNull {
                field: field.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// "{x}" is not null | is not nil
    pub fn assert_not_null(&self, field: &str) -> Result<(), StepError> {
        if self.resolver.resolve(field).is_null() {
            return Err(StepError::ExpectedNotNull {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// "{x}" is true
    pub fn assert_truthy(&self, field: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        if !actual.is_truthy() {
            return Err(StepError::ExpectedTruthy {
                field: field.to_string(),
                actual: actual.to_string(),
                kind: actual.kind(),
            });
        }
        Ok(())
    }

    /// "{x}" is false
    pub fn assert_falsy(&self, field: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        if actual.is_truthy() {
            return Err(StepError::ExpectedFalsy {
                field: field.to_string(),
                actual: actual.to_string(),
                kind: actual.kind(),
            });
        }
        Ok(())
    }

    /// "{x}" is empty (lists and strings only)
    pub fn assert_empty(&self, field: &str) -> Result<(), StepError> {
        let len = match self.resolver.resolve(field) {
            Value::List(items) => items.len(),
            Value::String(s) => s.len(),
            _ => {
                return Err(StepError::NotEmptiable {
                    field: field.to_string(),
                })
            }
        };
        if len != 0 {
            return Err(StepError::ExpectedEmpty {
                field: field.to_string(),
                len,
            });
        }
        Ok(())
    }

    /// "{x}" is "{v}"
    pub fn assert_equals(&self, field: &str, expected: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field).to_string();
        let expected = self.resolver.resolve(expected).to_string();
        if actual != expected {
            return Err(StepError::NotEqual {
                field: field.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// "{x}" is an error
    pub fn assert_error(&self, field: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        if !actual.is_error() {
            return Err(StepError::ExpectedError {
                field: field.to_string(),
                kind: actual.kind(),
            });
        }
        Ok(())
    }

    /// "{x}" is an error with message "{m}" (exact, unresolved message)
    pub fn assert_error_message(&self, field: &str, message: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        let Some(actual_message) = actual.error_message() else {
            return Err(StepError::ExpectedError {
                field: field.to_string(),
                kind: actual.kind(),
            });
        };
        if actual_message != message {
            return Err(StepError::ErrorMessage {
                expected: message.to_string(),
                actual: actual_message.to_string(),
            });
        }
        Ok(())
    }

    /// "{x}" is not an error
    pub fn assert_not_error(&self, field: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        if actual.is_error() {
            return Err(StepError::ExpectedNoError {
                field: field.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// "{x}" contains "{s}" (errors compare by message)
    pub fn assert_contains(&self, field: &str, needle: &str) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field).to_string();
        if !actual.contains(needle) {
            return Err(StepError::NotContained {
                field: field.to_string(),
                needle: needle.to_string(),
                actual,
            });
        }
        Ok(())
    }

    /// "{x}" is a string containing one of (single-column table)
    pub fn assert_contains_one_of(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field).to_string();
        let candidates = table.column_values();
        if candidates.iter().any(|c| actual.contains(c.as_str())) {
            return Ok(());
        }
        Err(StepError::NoneContained {
            field: field.to_string(),
            candidates,
            actual,
        })
    }

    /// "{x}" should be greater than "{n}"
    pub fn assert_greater_than(&self, field: &str, threshold: &str) -> Result<(), StepError> {
        let (actual, threshold_num) = self.numeric_pair(field, threshold)?;
        if actual <= threshold_num {
            return Err(StepError::NotGreater {
                field: field.to_string(),
                actual,
                threshold: threshold_num,
            });
        }
        Ok(())
    }

    /// "{x}" should be less than "{n}"
    pub fn assert_less_than(&self, field: &str, threshold: &str) -> Result<(), StepError> {
        let (actual, threshold_num) = self.numeric_pair(field, threshold)?;
        if actual >= threshold_num {
            return Err(StepError::NotLess {
                field: field.to_string(),
                actual,
                threshold: threshold_num,
            });
        }
        Ok(())
    }

    fn numeric_pair(&self, field: &str, threshold: &str) -> Result<(f64, f64), StepError> {
        Ok((self.number(field)?, self.number(threshold)?))
    }

    fn number(&self, text: &str) -> Result<f64, StepError> {
        let value = self.resolver.resolve(text);
        value.as_f64().ok_or_else(|| StepError::NotANumber {
            field: text.to_string(),
            actual: value.to_string(),
        })
    }
}
