//! Steps Module - handlers for every supported phrase
//!
//! Handlers are methods on `PropsWorld`, grouped by concern:
//! - `calls`: function and method invocation, aliasing
//! - `collections`: array and object shape assertions
//! - `assertions`: single-value assertions
//! - `setup`: seeding values and helper callables
//! - `jobs`: background jobs and waits
//!
//! `StepRegistry` maps step text to these handlers.

mod assertions;
mod calls;
mod collections;
mod jobs;
mod registry;
mod setup;

pub use registry::{StepDef, StepKind, StepRegistry};
