//! Phrase registry - maps step text to handlers
//!
//! Every phrase is an anchored regex whose `"([^"]*)"` captures become the
//! handler's string arguments. Phrases are tried in registration order and
//! the first match wins, so longer forms are listed before shorter ones that
//! share a prefix.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::StepError;
use crate::table::DataTable;
use crate::world::PropsWorld;

/// Handler selected by a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    CallFunction,
    CallMethod,
    ReferTo,
    ArrayContents,
    ArrayAtLeast,
    ArrayWithout,
    ArrayLength,
    ArrayOfStrings,
    ObjectContents,
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
    IsEmpty,
    Equals,
    SetField,
    ErrorWithMessage,
    IsError,
    IsNotError,
    Contains,
    ContainsOneOf,
    GreaterThan,
    LessThan,
    InvocationCounter,
    AsyncFunction,
    WaitPeriod,
    StartJob,
    WaitJob,
    WaitJobWithin,
    WaitFunction,
    WaitFunctionWithin,
}

/// One registered phrase
#[derive(Debug)]
pub struct StepDef {
    pub phrase: &'static str,
    pub kind: StepKind,
    /// Whether the step reads a data table
    pub takes_table: bool,
    pattern: Regex,
}

/// Phrase (with `"..."` placeholders for captures), kind, takes table
const PHRASES: &[(&str, StepKind, bool)] = &[
    // Calls
    (r#"I call "..." with "..." using arguments "...", "...", "...", and "...""#, StepKind::CallMethod, false),
    (r#"I call "..." with "..." using arguments "...", "...", and "...""#, StepKind::CallMethod, false),
    (r#"I call "..." with "..." using arguments "..." and "...""#, StepKind::CallMethod, false),
    (r#"I call "..." with "..." using argument "...""#, StepKind::CallMethod, false),
    (r#"I call "..." with "...""#, StepKind::CallMethod, false),
    (r#"I call "..." using arguments "...", "...", "...", and "...""#, StepKind::CallFunction, false),
    (r#"I call "..." using arguments "...", "...", and "...""#, StepKind::CallFunction, false),
    (r#"I call "..." using arguments "..." and "...""#, StepKind::CallFunction, false),
    (r#"I call "..." using argument "...""#, StepKind::CallFunction, false),
    (r#"I call "...""#, StepKind::CallFunction, false),
    (r#"I refer to "..." as "...""#, StepKind::ReferTo, false),
    // Arrays and objects
    (r#""..." is an array of objects with the following contents"#, StepKind::ArrayContents, true),
    (r#""..." is an array of objects with at least the following contents"#, StepKind::ArrayAtLeast, true),
    (r#""..." is an array of objects which doesn't contain any of"#, StepKind::ArrayWithout, true),
    (r#""..." is an array of objects with length "...""#, StepKind::ArrayLength, false),
    (r#""..." is an array of strings with the following values"#, StepKind::ArrayOfStrings, true),
    (r#""..." is an object with the following contents"#, StepKind::ObjectContents, true),
    // Values
    (r#""..." is null"#, StepKind::IsNull, false),
    (r#""..." is nil"#, StepKind::IsNull, false),
    (r#""..." is undefined"#, StepKind::IsNull, false),
    (r#""..." is not null"#, StepKind::IsNotNull, false),
    (r#""..." is not nil"#, StepKind::IsNotNull, false),
    (r#""..." is true"#, StepKind::IsTrue, false),
    (r#""..." is false"#, StepKind::IsFalse, false),
    (r#""..." is empty"#, StepKind::IsEmpty, false),
    (r#""..." is "...""#, StepKind::Equals, false),
    (r#"I set "..." to "...""#, StepKind::SetField, false),
    (r#""..." is an error with message "...""#, StepKind::ErrorWithMessage, false),
    (r#""..." is an error"#, StepKind::IsError, false),
    (r#""..." is not an error"#, StepKind::IsNotError, false),
    (r#""..." contains "...""#, StepKind::Contains, false),
    (r#""..." is a string containing one of"#, StepKind::ContainsOneOf, true),
    (r#""..." should be greater than "...""#, StepKind::GreaterThan, false),
    (r#""..." should be less than "...""#, StepKind::LessThan, false),
    // Setup
    (r#""..." is a invocation counter into "...""#, StepKind::InvocationCounter, false),
    (r#""..." is an async function returning "...""#, StepKind::AsyncFunction, false),
    (r#"we wait for a period of "..." ms"#, StepKind::WaitPeriod, false),
    // Jobs
    (r#"I start "..." as "...""#, StepKind::StartJob, false),
    (r#"I start "..." using argument "..." as "...""#, StepKind::StartJob, false),
    (r#"I start "..." using arguments "..." and "..." as "...""#, StepKind::StartJob, false),
    (r#"I start "..." using arguments "...", "...", and "..." as "...""#, StepKind::StartJob, false),
    (r#"I start "..." using arguments "...", "...", "...", and "..." as "...""#, StepKind::StartJob, false),
    (r#"I wait for job "...""#, StepKind::WaitJob, false),
    (r#"I wait for job "..." within "..." ms"#, StepKind::WaitJobWithin, false),
    (r#"I wait for "...""#, StepKind::WaitFunction, false),
    (r#"I wait for "..." within "..." ms"#, StepKind::WaitFunctionWithin, false),
    (r#"I wait for "..." using argument "...""#, StepKind::WaitFunction, false),
    (r#"I wait for "..." using arguments "..." and "...""#, StepKind::WaitFunction, false),
    (r#"I wait for "..." using arguments "...", "...", and "...""#, StepKind::WaitFunction, false),
    (r#"I wait for "..." using arguments "...", "...", "...", and "...""#, StepKind::WaitFunction, false),
];

static REGISTRY: Lazy<StepRegistry> = Lazy::new(StepRegistry::build);

/// Compiled phrase table
#[derive(Debug)]
pub struct StepRegistry {
    steps: Vec<StepDef>,
}

impl StepRegistry {
    /// Shared registry, compiled on first use
    pub fn global() -> &'static StepRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let steps = PHRASES
            .iter()
            .map(|&(phrase, kind, takes_table)| StepDef {
                phrase,
                kind,
                takes_table,
                pattern: compile(phrase),
            })
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[StepDef] {
        &self.steps
    }

    /// First phrase matching `text`, with its captures
    pub fn find(&self, text: &str) -> Option<(&StepDef, Vec<String>)> {
        let text = text.trim();
        self.steps.iter().find_map(|def| {
            let caps = def.pattern.captures(text)?;
            let args = caps
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            Some((def, args))
        })
    }

    /// Run one step against `world`
    ///
    /// Table steps given no table see an empty one.
    #[instrument(skip(self, world, table))]
    pub async fn run(
        &self,
        world: &PropsWorld,
        text: &str,
        table: Option<&DataTable>,
    ) -> Result<(), StepError> {
        let (def, args) = self.find(text).ok_or_else(|| StepError::UnknownStep {
            text: text.to_string(),
        })?;
        debug!(kind = ?def.kind, "dispatching step");

        let empty = DataTable::default();
        let table = table.unwrap_or(&empty);
        let a: Vec<&str> = args.iter().map(String::as_str).collect();

        match def.kind {
            StepKind::CallFunction => world.call_function(a[0], &a[1..]),
            StepKind::CallMethod => world.call_method(a[0], a[1], &a[2..]),
            StepKind::ReferTo => world.refer_to(a[0], a[1]),
            StepKind::ArrayContents => world.array_with_contents(a[0], table),
            StepKind::ArrayAtLeast => world.array_with_at_least(a[0], table),
            StepKind::ArrayWithout => world.array_without_any(a[0], table),
            StepKind::ArrayLength => world.array_with_length(a[0], a[1]),
            StepKind::ArrayOfStrings => world.array_of_strings(a[0], table),
            StepKind::ObjectContents => world.object_with_contents(a[0], table),
            StepKind::IsNull => world.assert_null(a[0]),
            StepKind::IsNotNull => world.assert_not_null(a[0]),
            StepKind::IsTrue => world.assert_truthy(a[0]),
            StepKind::IsFalse => world.assert_falsy(a[0]),
            StepKind::IsEmpty => world.assert_empty(a[0]),
            StepKind::Equals => world.assert_equals(a[0], a[1]),
            StepKind::SetField => world.set_field(a[0], a[1]),
            StepKind::ErrorWithMessage => world.assert_error_message(a[0], a[1]),
            StepKind::IsError => world.assert_error(a[0]),
            StepKind::IsNotError => world.assert_not_error(a[0]),
            StepKind::Contains => world.assert_contains(a[0], a[1]),
            StepKind::ContainsOneOf => world.assert_contains_one_of(a[0], table),
            StepKind::GreaterThan => world.assert_greater_than(a[0], a[1]),
            StepKind::LessThan => world.assert_less_than(a[0], a[1]),
            StepKind::InvocationCounter => world.invocation_counter(a[0], a[1]),
            StepKind::AsyncFunction => world.async_function_returning(a[0], a[1]),
            StepKind::WaitPeriod => world.wait_for_period(a[0]).await,
            StepKind::StartJob => {
                // job name is always the last capture
                let last = a.len() - 1;
                world.start_job(a[0], &a[1..last], a[last])
            }
            StepKind::WaitJob => world.wait_for_job(a[0], None).await,
            StepKind::WaitJobWithin => world.wait_for_job(a[0], Some(a[1])).await,
            StepKind::WaitFunction => world.wait_for_function(a[0], &a[1..], None).await,
            StepKind::WaitFunctionWithin => {
                world.wait_for_function(a[0], &[], Some(a[1])).await
            }
        }
    }
}

/// Anchored regex from a phrase, `"..."` becoming a quoted capture
fn compile(phrase: &str) -> Regex {
    let body = phrase
        .split(r#""...""#)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r#""([^"]*)""#);
    Regex::new(&format!("^{body}$")).expect("phrase table compiles")
}
