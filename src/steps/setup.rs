//! Setup steps: seeding values and helper callables

use std::time::Duration;

use tracing::debug;

use crate::error::StepError;
use crate::value::{Callable, Value};
use crate::world::PropsWorld;

impl PropsWorld {
    /// I set "{x}" to "{v}"
    pub fn set_field(&self, field: &str, value: &str) -> Result<(), StepError> {
        self.store.insert(field, self.resolver.resolve(value));
        Ok(())
    }

    /// "{h}" is a invocation counter into "{f}"
    ///
    /// Resets `field` to 0 and stores a nullary callable under `handler`
    /// that increments it.
    pub fn invocation_counter(&self, handler: &str, field: &str) -> Result<(), StepError> {
        self.store.insert(field, Value::Int(0));

        let store = self.store.downgrade();
        let field = field.to_string();
        let counter = Callable::nullary(move || {
            if let Some(store) = store.upgrade() {
                store.update(&field, |current| match current {
                    Some(Value::Int(n)) => Value::Int(n + 1),
                    _ => Value::Int(1),
                });
            }
        });

        self.store.insert(handler, counter);
        Ok(())
    }

    /// "{f}" is an async function returning "{v}"
    ///
    /// The value is resolved now; the callable returns that snapshot.
    pub fn async_function_returning(&self, function: &str, value: &str) -> Result<(), StepError> {
        let snapshot = self.resolver.resolve(value);
        self.store
            .insert(function, Callable::nullary(move || snapshot.clone()));
        Ok(())
    }

    /// we wait for a period of "{ms}" ms
    pub async fn wait_for_period(&self, ms: &str) -> Result<(), StepError> {
        let period = parse_millis(&self.resolver.resolve(ms))?;
        debug!(?period, "sleeping");
        tokio::time::sleep(period).await;
        Ok(())
    }
}

/// Whole, non-negative milliseconds from a resolved step argument
pub(crate) fn parse_millis(value: &Value) -> Result<Duration, StepError> {
    let text = value.to_string();
    text.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| StepError::InvalidDuration { value: text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::run;

    #[test]
    fn counter_starts_at_zero_and_counts() {
        let world = PropsWorld::new();
        world.invocation_counter("onClick", "clicks").unwrap();
        assert_eq!(world.store().get("clicks"), Some(Value::Int(0)));

        world.call_function("{onClick}", &[]).unwrap();
        world.call_function("{onClick}", &[]).unwrap();
        assert_eq!(world.store().get("clicks"), Some(Value::Int(2)));
    }

    #[test]
    fn counter_recovers_from_overwritten_field() {
        let world = PropsWorld::new();
        world.invocation_counter("h", "n").unwrap();
        world.set("n", "not a number");
        world.call_function("{h}", &[]).unwrap();
        assert_eq!(world.store().get("n"), Some(Value::Int(1)));
    }

    #[test]
    fn async_function_returns_snapshot() {
        let world = PropsWorld::new();
        world.set("greeting", "hi");
        world.async_function_returning("fetch", "{greeting}").unwrap();
        world.set("greeting", "changed");

        let Some(Value::Callable(fetch)) = world.store().get("fetch") else {
            panic!("fetch should be callable");
        };
        assert_eq!(run("fetch", &fetch, Vec::new()), Some(Value::from("hi")));
    }

    #[test]
    fn set_field_resolves_value() {
        let world = PropsWorld::new();
        world.set_field("flag", "{true}").unwrap();
        world.set_field("name", "Bob").unwrap();
        assert_eq!(world.store().get("flag"), Some(Value::Bool(true)));
        assert_eq!(world.store().get("name"), Some(Value::from("Bob")));
    }

    #[test]
    fn millis_parsing() {
        assert_eq!(parse_millis(&Value::from("25")).unwrap(), Duration::from_millis(25));
        assert_eq!(parse_millis(&Value::Float(100.0)).unwrap(), Duration::from_millis(100));
        assert!(matches!(
            parse_millis(&Value::from("soon")),
            Err(StepError::InvalidDuration { .. })
        ));
    }

    #[tokio::test]
    async fn wait_for_period_sleeps() {
        let world = PropsWorld::new();
        let started = std::time::Instant::now();
        world.wait_for_period("20").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(world.wait_for_period("-1").await.is_err());
    }
}
