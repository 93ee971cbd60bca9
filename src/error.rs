//! Step failures with fix suggestions
//!
//! Every step handler returns `Result<(), StepError>`. Invocation faults are
//! not step failures: they are recorded as `Value::Error` results in the store.

use std::time::Duration;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum StepError {
    // ─────────────────────────────────────────────────────────────
    // Shape errors
    // ─────────────────────────────────────────────────────────────
    #[error("field {field} is not an array")]
    NotAnArray { field: String },

    #[error("field {field} is not an object/map")]
    NotAnObject { field: String },

    #[error("expected exactly one data row in table")]
    TableShape,

    // ─────────────────────────────────────────────────────────────
    // Structural assertions
    // ─────────────────────────────────────────────────────────────
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("row {index} does not match:\n{diagnostic}")]
    RowMismatch { index: usize, diagnostic: String },

    #[error("expected row not found: {row}")]
    RowNotFound { row: String },

    #[error("unwanted row found in array: {row}")]
    UnwantedRow { row: String },

    #[error("element {index} mismatch: expected {expected}, got {actual}")]
    ElementMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("field {key} missing in actual object")]
    FieldMissing { key: String },

    #[error("field {key} mismatch: expected {expected}, got {actual}")]
    FieldMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("invalid length: {value}")]
    InvalidLength { value: String },

    // ─────────────────────────────────────────────────────────────
    // Value assertions
    // ─────────────────────────────────────────────────────────────
    #[error("expected {field} to be null, got {actual}")]
    ExpectedNull { field: String, actual: String },

    #[error("expected {field} to not be null")]
    ExpectedNotNull { field: String },

    #[error("expected {field} to be truthy, got {actual} (type: {kind})")]
    ExpectedTruthy {
        field: String,
        actual: String,
        kind: &'static str,
    },

    #[error("expected {field} to be falsy, got {actual} (type: {kind})")]
    ExpectedFalsy {
        field: String,
        actual: String,
        kind: &'static str,
    },

    #[error("expected {field} to be empty, got length {len}")]
    ExpectedEmpty { field: String, len: usize },

    #[error("cannot check if {field} is empty: unsupported type")]
    NotEmptiable { field: String },

    #[error("expected {field} to be an error, got {kind}")]
    ExpectedError { field: String, kind: &'static str },

    #[error("expected {field} to not be an error, but got: {actual}")]
    ExpectedNoError { field: String, actual: String },

    #[error("expected error message '{expected}', got '{actual}'")]
    ErrorMessage { expected: String, actual: String },

    #[error("expected {field} to contain '{needle}', but got '{actual}'")]
    NotContained {
        field: String,
        needle: String,
        actual: String,
    },

    #[error("expected {field} to contain one of {candidates:?}, but got '{actual}'")]
    NoneContained {
        field: String,
        candidates: Vec<String>,
        actual: String,
    },

    #[error("cannot parse {field} as number: {actual}")]
    NotANumber { field: String, actual: String },

    #[error("expected {field} ({actual}) to be greater than {threshold}")]
    NotGreater {
        field: String,
        actual: f64,
        threshold: f64,
    },

    #[error("expected {field} ({actual}) to be less than {threshold}")]
    NotLess {
        field: String,
        actual: f64,
        threshold: f64,
    },

    #[error("expected {field} to equal '{expected}', got '{actual}'")]
    NotEqual {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("invalid duration: {value}")]
    InvalidDuration { value: String },

    // ─────────────────────────────────────────────────────────────
    // Jobs
    // ─────────────────────────────────────────────────────────────
    #[error("task {name} not found")]
    TaskNotFound { name: String },

    #[error("task {name} timed out after {timeout:?}")]
    TaskTimeout { name: String, timeout: Duration },

    #[error("task {name} is still running")]
    TaskRunning { name: String },

    /// Displays the job's own error message unchanged
    #[error("{message}")]
    TaskFailed { name: String, message: String },

    #[error("task {name} panicked: {detail}")]
    TaskPanicked { name: String, detail: String },

    // ─────────────────────────────────────────────────────────────
    // Registry, scripts, config
    // ─────────────────────────────────────────────────────────────
    #[error("no step matches: {text}")]
    UnknownStep { text: String },

    #[error("script error at line {line}: {details}")]
    Script { line: usize, details: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for StepError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            StepError::NotAnArray { .. } | StepError::NotAnObject { .. } => {
                Some("Check the reference resolves to the expected shape (list or map)")
            }
            StepError::TableShape => Some("Use a header row followed by exactly one data row"),
            StepError::LengthMismatch { .. } => {
                Some("Use 'with at least the following contents' for partial matches")
            }
            StepError::RowMismatch { .. } => {
                Some("Compare the 'Actual object' dump with the table; rows are matched in order")
            }
            StepError::RowNotFound { .. } | StepError::UnwantedRow { .. } => {
                Some("Check field paths in the table header against the actual objects")
            }
            StepError::InvalidLength { .. } | StepError::InvalidDuration { .. } => {
                Some("Use a whole number, e.g. \"3\" or \"{count}\"")
            }
            StepError::NotANumber { .. } => Some("Compare numeric values only"),
            StepError::TaskNotFound { .. } => {
                Some("Start the job with 'I start \"fn\" as \"job\"' before waiting for it")
            }
            StepError::TaskTimeout { .. } => {
                Some("Increase the budget with 'within \"ms\" ms' or check the job finishes")
            }
            StepError::TaskRunning { .. } => Some("Wait for the job before reading its result"),
            StepError::UnknownStep { .. } => Some("Run `propsteps list` to see supported phrases"),
            StepError::Script { .. } => {
                Some("Table lines must follow a step and start and end with '|'")
            }
            StepError::Config(_) => Some("Check propsteps.toml syntax and field names"),
            StepError::Io(_) => Some("Check file path and permissions"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_includes_duration() {
        let err = StepError::TaskTimeout {
            name: "t".to_string(),
            timeout: Duration::from_millis(10),
        };
        assert_eq!(err.to_string(), "task t timed out after 10ms");
    }

    #[test]
    fn row_mismatch_carries_diagnostic() {
        let err = StepError::RowMismatch {
            index: 0,
            diagnostic: "Actual object: {}".to_string(),
        };
        assert_eq!(err.to_string(), "row 0 does not match:\nActual object: {}");
    }

    #[test]
    fn every_job_error_has_a_suggestion() {
        let errs = [
            StepError::TaskNotFound { name: "a".into() },
            StepError::TaskRunning { name: "a".into() },
            StepError::TaskTimeout {
                name: "a".into(),
                timeout: Duration::from_secs(1),
            },
        ];
        for err in errs {
            assert!(err.fix_suggestion().is_some(), "{err}");
        }
    }
}
