//! Shared fixtures for integration tests

#![allow(dead_code)]

use propsteps::script::Script;
use propsteps::{Callable, PropsWorld, Record, StepError, StepRegistry, Value};
use serde_json::json;

fn num(v: &Value) -> f64 {
    v.as_f64().unwrap_or_default()
}

pub fn calculator() -> Value {
    Value::object(
        Record::new("TestCalculator")
            .with_field("Value", 42.0)
            .with_method("GetValue", Callable::nullary(|| 42.0))
            .with_method("Add", Callable::unary(|n: Value| 42.0 + num(&n)))
            .with_method(
                "Multiply",
                Callable::binary(|a: Value, b: Value| num(&a) * num(&b)),
            )
            .with_method(
                "Sum3",
                Callable::ternary(|a: Value, b: Value, c: Value| num(&a) + num(&b) + num(&c)),
            )
            .with_method(
                "Sum4",
                Callable::quaternary(|a: Value, b: Value, c: Value, d: Value| {
                    num(&a) + num(&b) + num(&c) + num(&d)
                }),
            )
            .with_method(
                "FailingMethod",
                Callable::nullary(|| Err::<Value, _>("method failed")),
            ),
    )
}

/// World seeded with the standard fixtures
pub fn fixture_world() -> PropsWorld {
    let world = PropsWorld::new();

    world.set(
        "sampleArray",
        Value::from(json!([
            {"name": "Alice", "value": 100},
            {"name": "Bob", "value": 200}
        ])),
    );
    world.set("sampleStringArray", Value::from(json!(["one", "two", "three"])));
    world.set("sampleEmptyArray", Value::from(json!([])));
    world.set("sampleObject", Value::from(json!({"name": "John", "age": 30})));

    world.set("singleArgFn", Callable::unary(|a: Value| a));
    world.set(
        "twoArgFn",
        Callable::binary(|a: Value, b: Value| format!("{a}{b}")),
    );
    world.set(
        "threeArgConcatFn",
        Callable::ternary(|a: Value, b: Value, c: Value| format!("{a}{b}{c}")),
    );
    world.set(
        "fourArgConcatFn",
        Callable::quaternary(|a: Value, b: Value, c: Value, d: Value| format!("{a}{b}{c}{d}")),
    );

    world.set("errorThrowingFn", Callable::nullary(|| Value::error("Test error message")));
    world.set("errorWithArgFn", Callable::unary(|_: Value| Value::error("Test error message")));
    world.set(
        "errorWith2ArgsFn",
        Callable::binary(|_: Value, _: Value| Value::error("Test error message")),
    );

    world.set("testCalculator", calculator());

    world.set(
        "nestedObject",
        Value::from(json!({"name": "parent", "level1": {"level2": "deep-value"}})),
    );
    world.set(
        "arrayWithObjects",
        Value::from(json!([
            {"id": "1", "name": "first"},
            {"id": "2", "name": "second"},
            {"id": "3", "name": "third"}
        ])),
    );
    world.set(
        "deeplyNested",
        Value::from(json!({"a": {"b": {"c": {"d": "found"}}}})),
    );
    world.set(
        "userArray",
        Value::from(json!([
            {"name": "Alice", "address": {"city": "New York", "zip": "10001"}},
            {"name": "Bob", "address": {"city": "Los Angeles", "zip": "90001"}}
        ])),
    );
    world.set(
        "typedValues",
        Value::from(json!({
            "count": 42,
            "price": 9.99,
            "active": true,
            "deleted": false,
            "label": "hello",
            "nested": {"score": 100, "enabled": true}
        })),
    );

    world
}

/// Run every step of a one-scenario script on `world`, stopping at the
/// first failure (reported with its line)
pub async fn run_steps(world: &PropsWorld, source: &str) -> Result<(), (usize, StepError)> {
    let script = Script::parse(source).map_err(|e| (0, e))?;
    let registry = StepRegistry::global();
    for scenario in &script.scenarios {
        for step in &scenario.steps {
            registry
                .run(world, &step.text, step.table.as_ref())
                .await
                .map_err(|e| (step.line, e))?;
        }
    }
    Ok(())
}

/// Assert a script passes on a fresh fixture world
pub async fn passes(source: &str) {
    let world = fixture_world();
    if let Err((line, err)) = run_steps(&world, source).await {
        panic!("step at line {line} failed: {err}");
    }
}

/// Assert the last step of a script fails, returning its error
pub async fn fails(source: &str) -> StepError {
    let world = fixture_world();
    match run_steps(&world, source).await {
        Ok(()) => panic!("script unexpectedly passed:\n{source}"),
        Err((_, err)) => err,
    }
}
