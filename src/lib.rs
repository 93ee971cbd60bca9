//! propsteps - generic step library for behavior-driven tests
//!
//! Scenario values live in a shared property store and are referenced from
//! step text as `{name}` tokens. Steps call functions and object methods by
//! name, match values against data tables, and run functions as named
//! background jobs.

pub mod attachment;
pub mod config;
pub mod error;
pub mod invoke;
pub mod jsonpath;
pub mod matcher;
pub mod resolve;
pub mod script;
pub mod steps;
pub mod store;
pub mod table;
pub mod tasks;
pub mod value;
pub mod world;

pub use attachment::{Attachment, AttachmentProvider};
pub use config::WorldConfig;
pub use error::{FixSuggestion, StepError};
pub use matcher::{Matcher, RowMatch};
pub use resolve::Resolver;
pub use steps::{StepKind, StepRegistry};
pub use store::PropsStore;
pub use table::{DataTable, Row};
pub use tasks::TaskManager;
pub use value::{Callable, Object, Record, Returned, Value};
pub use world::PropsWorld;
