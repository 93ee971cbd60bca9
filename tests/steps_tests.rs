//! Phrase-level tests: scripts run through the registry on a fixture world

mod common;

use common::{fails, fixture_world, passes, run_steps};
use pretty_assertions::assert_eq;
use propsteps::{AttachmentProvider, StepError, Value};

// ============================================================================
// Invocation
// ============================================================================

#[tokio::test]
async fn test_function_calls_with_arguments() {
    passes(
        r#"
Scenario: functions
  When I call "{singleArgFn}" using argument "solo"
  Then "{result}" is "solo"
  When I call "{twoArgFn}" using arguments "a" and "b"
  Then "{result}" is "ab"
  When I call "{threeArgConcatFn}" using arguments "a", "b", and "c"
  Then "{result}" is "abc"
  When I call "{fourArgConcatFn}" using arguments "a", "b", "c", and "d"
  Then "{result}" is "abcd"
"#,
    )
    .await;
}

#[tokio::test]
async fn test_method_calls() {
    passes(
        r#"
Scenario: calculator
  When I call "{testCalculator}" with "GetValue"
  Then "{result}" is "42"
  When I call "{testCalculator}" with "Add" using argument "{8}"
  Then "{result}" is "50"
  When I call "{testCalculator}" with "Multiply" using arguments "{6}" and "{7}"
  Then "{result}" is "42"
  When I call "{testCalculator}" with "Sum3" using arguments "{1}", "{2}", and "{3}"
  Then "{result}" is "6"
  When I call "{testCalculator}" with "Sum4" using arguments "{1}", "{2}", "{3}", and "{4}"
  Then "{result}" is "10"
  And "{testCalculator.value}" is "42"
"#,
    )
    .await;
}

#[tokio::test]
async fn test_call_failures_are_recorded() {
    passes(
        r#"
Scenario: faults
  When I call "{testCalculator}" with "FailingMethod"
  Then "{result}" is an error with message "method failed"
  When I call "{testCalculator}" with "Divide"
  Then "{result}" is an error with message "method Divide not found"
  When I call "{errorThrowingFn}"
  Then "{result}" is an error
  And "{result}" contains "Test error"
  When I call "{singleArgFn}"
  Then "{result}" is an error
  And "{result}" contains "expected 1 arguments, got 0"
  When I call "{sampleObject}"
  Then "{result}" is an error with message "{sampleObject} is not a function"
"#,
    )
    .await;
}

#[tokio::test]
async fn test_refer_and_set() {
    passes(
        r#"
Scenario: aliases
  Given I refer to "{sampleObject}" as "person"
  And I set "greeting" to "Hello {person.name}, age {person.age}"
  Then "{greeting}" is "Hello John, age 30"
  And "{person.name}" is "John"
  Given I set "flag" to "{true}"
  Then "{flag}" is true
"#,
    )
    .await;
}

// ============================================================================
// Arrays and objects
// ============================================================================

#[tokio::test]
async fn test_array_assertions() {
    passes(
        r#"
Scenario: arrays
  Then "{sampleArray}" is an array of objects with the following contents
    | name  | value |
    | Alice | 100   |
    | Bob   | 200   |
  And "{sampleArray}" is an array of objects with length "2"
  And "{sampleArray}" is an array of objects with at least the following contents
    | name |
    | Bob  |
  And "{sampleArray}" is an array of objects which doesn't contain any of
    | name  |
    | Carol |
  And "{sampleStringArray}" is an array of strings with the following values
    | value |
    | one   |
    | two   |
    | three |
  And "{sampleEmptyArray}" is empty
  And "{sampleEmptyArray}" is an array of objects with length "0"
"#,
    )
    .await;
}

#[tokio::test]
async fn test_nested_paths_in_tables() {
    passes(
        r#"
Scenario: nested
  Then "{userArray}" is an array of objects with the following contents
    | name  | address.city | address.zip |
    | Alice | New York     | 10001       |
    | Bob   | Los Angeles  | 90001       |
  And "{userArray}" is an array of objects with at least the following contents
    | address.city |
    | Los Angeles  |
  And "{arrayWithObjects}" is an array of objects which doesn't contain any of
    | id | name   |
    | 2  | first  |
"#,
    )
    .await;
}

#[tokio::test]
async fn test_object_contents() {
    passes(
        r#"
Scenario: object
  Then "{sampleObject}" is an object with the following contents
    | name | age |
    | John | 30  |
"#,
    )
    .await;

    let err = fails(
        r#"
Scenario: missing key
  Then "{sampleObject}" is an object with the following contents
    | email |
    | x     |
"#,
    )
    .await;
    assert_eq!(err.to_string(), "field email missing in actual object");
}

#[tokio::test]
async fn test_row_mismatch_diagnostic_is_attached() {
    let world = fixture_world();
    let source = r#"
Scenario: mismatch
  Then "{sampleArray}" is an array of objects with the following contents
    | name  | value |
    | Alice | 999   |
    | Bob   | 200   |
"#;
    let (line, err) = run_steps(&world, source).await.unwrap_err();
    assert_eq!(line, 3);

    let message = err.to_string();
    assert!(message.starts_with("row 0 does not match:"), "{message}");
    assert!(message.contains("name: OK (Alice)"), "{message}");
    assert!(
        message.contains("value: MISMATCH - found: '100', expected: '999'"),
        "{message}"
    );

    let attachments = world.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].name, "row 0 mismatch");
}

#[tokio::test]
async fn test_array_failures() {
    let err = fails(r#""{sampleArray}" is an array of objects with length "3""#).await;
    assert!(matches!(err, StepError::LengthMismatch { expected: 3, actual: 2 }));

    let err = fails(r#""{sampleObject}" is an array of objects with length "1""#).await;
    assert_eq!(err.to_string(), "field {sampleObject} is not an array");

    let err = fails(
        r#"
Scenario: unwanted
  Then "{arrayWithObjects}" is an array of objects which doesn't contain any of
    | id |
    | 3  |
"#,
    )
    .await;
    assert!(matches!(err, StepError::UnwantedRow { .. }));

    let err = fails(
        r#"
Scenario: order
  Then "{sampleStringArray}" is an array of strings with the following values
    | value |
    | three |
    | two   |
    | one   |
"#,
    )
    .await;
    assert_eq!(err.to_string(), "element 0 mismatch: expected three, got one");
}

// ============================================================================
// References and values
// ============================================================================

#[tokio::test]
async fn test_reference_resolution() {
    passes(
        r#"
Scenario: references
  Then "{nestedObject.level1.level2}" is "deep-value"
  And "{deeplyNested.a.b.c.d}" is "found"
  And "{arrayWithObjects[1].name}" is "second"
  And "{userArray[0].address.city}" is "New York"
  And "{typedValues.nested.score}" is "100"
  And "{typedValues.count}" is "{42}"
  And "{typedValues.price}" is "9.99"
  And "{typedValues.active}" is true
  And "{typedValues.deleted}" is false
  And "{nowhere}" is null
  And "{nowhere.deeper}" is undefined
  And "{null}" is nil
  And "{sampleObject}" is not null
"#,
    )
    .await;
}

#[tokio::test]
async fn test_value_assertions() {
    passes(
        r#"
Scenario: values
  Then "{typedValues.label}" contains "ell"
  And "{typedValues.label}" is a string containing one of
    | value |
    | xyz   |
    | hell  |
  And "{typedValues.price}" should be greater than "9"
  And "{typedValues.count}" should be less than "{100}"
  And "{typedValues.label}" is not an error
  And "{0}" is false
  And "{1}" is true
"#,
    )
    .await;
}

#[tokio::test]
async fn test_value_assertion_failures() {
    let err = fails(r#""{typedValues.label}" is "goodbye""#).await;
    assert_eq!(
        err.to_string(),
        "expected {typedValues.label} to equal 'goodbye', got 'hello'"
    );

    let err = fails(r#""{typedValues.count}" should be greater than "100""#).await;
    assert!(matches!(err, StepError::NotGreater { .. }));

    let err = fails(r#""{typedValues.label}" should be less than "1""#).await;
    assert!(matches!(err, StepError::NotANumber { .. }));

    let err = fails(r#""{typedValues.label}" is an error"#).await;
    assert!(matches!(err, StepError::ExpectedError { kind: "string", .. }));

    let err = fails("I juggle").await;
    assert!(matches!(err, StepError::UnknownStep { .. }));
}

// ============================================================================
// Setup helpers
// ============================================================================

#[tokio::test]
async fn test_invocation_counter() {
    let world = fixture_world();
    run_steps(
        &world,
        r#"
Scenario: counter
  Given "onClick" is a invocation counter into "clicks"
  Then "{clicks}" is "0"
  When I call "{onClick}"
  And I call "{onClick}"
  Then "{clicks}" is "2"
"#,
    )
    .await
    .unwrap();
    assert_eq!(world.store().get("clicks"), Some(Value::Int(2)));
}

#[tokio::test]
async fn test_wait_for_period() {
    let started = std::time::Instant::now();
    passes(r#"we wait for a period of "15" ms"#).await;
    assert!(started.elapsed() >= std::time::Duration::from_millis(15));

    let err = fails(r#"we wait for a period of "later" ms"#).await;
    assert_eq!(err.to_string(), "invalid duration: later");
}
