//! World configuration
//!
//! Defaults cover the step library's fixed behaviour; a `propsteps.toml` or
//! the `PROPSTEPS_WAIT_TIMEOUT_MS` environment variable can override them.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::StepError;

pub mod constants {
    //! Centralized constants

    use std::time::Duration;

    /// Budget for name-only waits ("I wait for job ...")
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Prefix for jobs started by "I wait for \"fn\"" forms
    pub const TEMP_JOB_PREFIX: &str = "temp_";

    /// Store key receiving every call and job outcome
    pub const RESULT_KEY: &str = "result";

    /// Table column suffix marking schema-only columns
    pub const SCHEMA_MARKER_SUFFIX: &str = "matches_type";

    /// Environment override for the default wait budget
    pub const WAIT_TIMEOUT_ENV: &str = "PROPSTEPS_WAIT_TIMEOUT_MS";
}

use constants::{DEFAULT_WAIT_TIMEOUT, RESULT_KEY, TEMP_JOB_PREFIX, WAIT_TIMEOUT_ENV};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Wait budget when a step names no timeout
    #[serde(rename = "default_wait_timeout_ms", with = "millis")]
    pub default_wait_timeout: Duration,
    /// Job-name prefix for direct "I wait for" calls
    pub temp_job_prefix: String,
    /// Store key receiving call and job outcomes
    pub result_key: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            default_wait_timeout: DEFAULT_WAIT_TIMEOUT,
            temp_job_prefix: TEMP_JOB_PREFIX.to_string(),
            result_key: RESULT_KEY.to_string(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, StepError> {
        toml::from_str(text).map_err(|e| StepError::Config(e.to_string()))
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StepError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)?.with_env_overrides()
    }

    /// Apply `PROPSTEPS_WAIT_TIMEOUT_MS` if set
    pub fn with_env_overrides(mut self) -> Result<Self, StepError> {
        if let Ok(raw) = std::env::var(WAIT_TIMEOUT_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| StepError::Config(format!("{WAIT_TIMEOUT_ENV}={raw} is not a number")))?;
            self.default_wait_timeout = Duration::from_millis(ms);
        }
        Ok(self)
    }

    /// Job name used by "I wait for \"fn\"" forms
    pub fn temp_job_name(&self, function: &str) -> String {
        format!("{}{}", self.temp_job_prefix, function)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
