//! Plain-text scenario scripts
//!
//! ```text
//! # comment
//! Scenario: users are listed
//!   Given I set "limit" to "2"
//!   Then "{users}" is an array of objects with length "{limit}"
//!   And "{users}" is an array of objects with the following contents
//!     | name  |
//!     | Alice |
//!     | Bob   |
//! ```
//!
//! `Scenario:` starts a fresh world. `|` lines are the data table of the
//! step above them. A leading Given/When/Then/And/But is dropped. Steps
//! before the first header belong to an unnamed scenario. After a failed
//! step the rest of its scenario is skipped.

use tracing::{info, instrument};

use crate::config::WorldConfig;
use crate::error::{FixSuggestion, StepError};
use crate::steps::StepRegistry;
use crate::table::DataTable;
use crate::world::PropsWorld;

const KEYWORDS: &[&str] = &["Given ", "When ", "Then ", "And ", "But ", "* "];

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub text: String,
    pub table: Option<DataTable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub line: usize,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub scenarios: Vec<Scenario>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, StepError> {
        let mut scenarios: Vec<Scenario> = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("Feature:") {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix("Scenario:") {
                scenarios.push(Scenario {
                    name: name.trim().to_string(),
                    line,
                    steps: Vec::new(),
                });
                continue;
            }

            if trimmed.starts_with('|') {
                let cells = DataTable::parse_line(trimmed).ok_or_else(|| StepError::Script {
                    line,
                    details: "table line must end with '|'".to_string(),
                })?;
                let step = scenarios
                    .last_mut()
                    .and_then(|s| s.steps.last_mut())
                    .ok_or_else(|| StepError::Script {
                        line,
                        details: "table line without a preceding step".to_string(),
                    })?;
                step.table.get_or_insert_with(DataTable::default).push_row(cells);
                continue;
            }

            if scenarios.is_empty() {
                scenarios.push(Scenario {
                    name: String::new(),
                    line,
                    steps: Vec::new(),
                });
            }
            if let Some(scenario) = scenarios.last_mut() {
                scenario.steps.push(ScriptStep {
                    line,
                    text: strip_keyword(trimmed).to_string(),
                    table: None,
                });
            }
        }

        Ok(Self { scenarios })
    }
}

fn strip_keyword(text: &str) -> &str {
    KEYWORDS
        .iter()
        .find_map(|k| text.strip_prefix(k))
        .map(str::trim_start)
        .unwrap_or(text)
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Passed,
    Failed {
        message: String,
        suggestion: Option<String>,
    },
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub line: usize,
    pub text: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.outcome, StepOutcome::Passed))
    }
}

/// Run every scenario, each in a fresh world
pub async fn run_script(script: &Script, config: &WorldConfig) -> Vec<ScenarioReport> {
    let mut reports = Vec::with_capacity(script.scenarios.len());
    for scenario in &script.scenarios {
        reports.push(run_scenario(scenario, config).await);
    }
    reports
}

#[instrument(skip_all, fields(scenario = %scenario.name))]
pub async fn run_scenario(scenario: &Scenario, config: &WorldConfig) -> ScenarioReport {
    let world = PropsWorld::with_config(config.clone());
    let registry = StepRegistry::global();
    let mut failed = false;
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for step in &scenario.steps {
        let outcome = if failed {
            StepOutcome::Skipped
        } else {
            match registry.run(&world, &step.text, step.table.as_ref()).await {
                Ok(()) => StepOutcome::Passed,
                Err(err) => {
                    failed = true;
                    StepOutcome::Failed {
                        suggestion: err.fix_suggestion().map(str::to_string),
                        message: err.to_string(),
                    }
                }
            }
        };
        steps.push(StepReport {
            line: step.line,
            text: step.text.clone(),
            outcome,
        });
    }

    info!(passed = !failed, steps = steps.len(), "scenario finished");
    ScenarioReport {
        name: scenario.name.clone(),
        steps,
    }
}
