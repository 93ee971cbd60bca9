//! Background job steps
//!
//! A job resolves its function when it runs, renders every argument to a
//! string, and calls the function on the blocking pool. Waiting never fails
//! the step for a job failure or timeout: the outcome (value or error) is
//! stored under both the result key and the job name.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::StepError;
use crate::invoke::guard;
use crate::resolve::Resolver;
use crate::steps::setup::parse_millis;
use crate::tasks::TaskOutcome;
use crate::value::Value;
use crate::world::PropsWorld;

impl PropsWorld {
    /// I start "{f}" [using argument(s) ...] as "{job}"
    #[instrument(skip(self, args), fields(arity = args.len()))]
    pub fn start_job(&self, function: &str, args: &[&str], job: &str) -> Result<(), StepError> {
        let resolver = self.resolver.clone();
        let function = function.to_string();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        self.tasks.start(job, move |_cancel| async move {
            tokio::task::spawn_blocking(move || run_job(&resolver, &function, &args))
                .await
                .unwrap_or_else(|join| Err(join.to_string()))
        });
        Ok(())
    }

    /// I wait for job "{job}" [within "{ms}" ms]
    pub async fn wait_for_job(&self, job: &str, timeout: Option<&str>) -> Result<(), StepError> {
        let timeout = self.wait_budget(timeout)?;

        let outcome = match self.tasks.wait(job, timeout).await {
            Ok(()) => self
                .tasks
                .peek(job)
                .unwrap_or_else(|err| Value::error(err.to_string())),
            Err(err) => Value::error(err.to_string()),
        };

        debug!(job, kind = outcome.kind(), "job outcome stored");
        self.store.insert(self.config.result_key.clone(), outcome.clone());
        self.store.insert(job, outcome);
        Ok(())
    }

    /// I wait for "{f}" [using argument(s) ...] [within "{ms}" ms]
    ///
    /// Runs the function as a temporary job named after it and waits.
    pub async fn wait_for_function(
        &self,
        function: &str,
        args: &[&str],
        timeout: Option<&str>,
    ) -> Result<(), StepError> {
        let job = self.config.temp_job_name(function);
        self.start_job(function, args, &job)?;
        self.wait_for_job(&job, timeout).await
    }

    fn wait_budget(&self, timeout: Option<&str>) -> Result<Duration, StepError> {
        match timeout {
            Some(ms) => parse_millis(&self.resolver.resolve(ms)),
            None => Ok(self.config.default_wait_timeout),
        }
    }
}

/// Body of a job: resolve, check arity, call with rendered arguments
fn run_job(resolver: &Resolver, function: &str, args: &[String]) -> TaskOutcome {
    let callable = match resolver.resolve(function) {
        Value::Null => return Err(format!("function {function} not found")),
        Value::Callable(c) if c.arity() == args.len() => c,
        _ => return Err(not_callable(function, args.len())),
    };

    let args: Vec<Value> = args
        .iter()
        .map(|arg| Value::String(resolver.resolve(arg).to_string()))
        .collect();

    match guard(|| callable.call(args)) {
        Ok(Ok(returned)) => match returned.into_outcome() {
            None => Ok(Value::Null),
            Some(Value::Error(message)) => Err(message),
            Some(value) => Ok(value),
        },
        Ok(Err(mismatch)) => Err(format!("Error calling {function}: {mismatch}")),
        Err(detail) => Err(format!("Error calling {function}: {detail}")),
    }
}

fn not_callable(function: &str, arity: usize) -> String {
    match arity {
        0 => format!("{function} is not a callable function"),
        1 => format!("{function} is not a callable function with 1 parameter"),
        n => format!("{function} is not a callable function with {n} parameters"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Callable;

    fn sleeper(ms: u64, value: &'static str) -> Callable {
        Callable::nullary(move || {
            std::thread::sleep(Duration::from_millis(ms));
            value
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn job_result_stored_under_job_and_result() {
        let world = PropsWorld::new();
        world.set("asyncFn", sleeper(20, "async result"));

        world.start_job("{asyncFn}", &[], "job1").unwrap();
        world.wait_for_job("job1", None).await.unwrap();

        assert_eq!(world.store().get("job1"), Some(Value::from("async result")));
        assert_eq!(world.result(), Some(Value::from("async result")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn arguments_are_rendered_to_strings() {
        let world = PropsWorld::new();
        world.set(
            "kinds",
            Callable::binary(|a: Value, b: Value| format!("{}:{a} {}:{b}", a.kind(), b.kind())),
        );
        world.set("n", 5);

        world.wait_for_function("{kinds}", &["{n}", "x"], None).await.unwrap();
        assert_eq!(world.result(), Some(Value::from("string:5 string:x")));
        assert!(world.store().contains("temp_{kinds}"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn timeout_is_stored_not_raised() {
        let world = PropsWorld::new();
        world.set("slow", sleeper(300, "late"));

        world.start_job("{slow}", &[], "slowJob").unwrap();
        world.wait_for_job("slowJob", Some("10")).await.unwrap();

        let stored = world.store().get("slowJob").unwrap();
        assert_eq!(stored.error_message(), Some("task slowJob timed out after 10ms"));
        assert_eq!(world.result(), Some(stored));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failures_become_error_values() {
        let world = PropsWorld::new();
        world.set("failing", Callable::nullary(|| Err::<Value, _>("Test error message")));
        world.set("notFn", 3);

        world.wait_for_function("{failing}", &[], None).await.unwrap();
        assert_eq!(world.result(), Some(Value::error("Test error message")));

        world.wait_for_function("{missing}", &[], None).await.unwrap();
        assert_eq!(world.result(), Some(Value::error("function {missing} not found")));

        world.wait_for_function("{notFn}", &["a"], None).await.unwrap();
        assert_eq!(
            world.result(),
            Some(Value::error("{notFn} is not a callable function with 1 parameter"))
        );
    }

    #[tokio::test]
    async fn unknown_job_and_bad_timeout() {
        let world = PropsWorld::new();
        world.wait_for_job("ghost", None).await.unwrap();
        assert_eq!(world.result(), Some(Value::error("task ghost not found")));

        assert!(matches!(
            world.wait_for_job("ghost", Some("soon")).await,
            Err(StepError::InvalidDuration { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn nothing_returned_is_null() {
        let world = PropsWorld::new();
        world.set("noop", Callable::nullary(|| ()));
        world.wait_for_function("{noop}", &[], None).await.unwrap();
        assert_eq!(world.result(), Some(Value::Null));
    }
}
