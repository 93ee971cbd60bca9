//! Structured objects with explicit field and method access

use std::collections::{BTreeMap, HashMap};

use super::{Callable, Value};

/// A structured value exposing named fields and named methods
///
/// Implement this for domain types under test. `fields` drives the canonical
/// serialized form used by the row matcher, so it should list every public
/// field.
pub trait Object: Send + Sync {
    /// Type name used in diagnostics
    fn type_name(&self) -> &str;

    /// Exact, case-sensitive field lookup
    fn field(&self, name: &str) -> Option<Value>;

    /// Exact, case-sensitive method lookup
    fn method(&self, name: &str) -> Option<Callable>;

    /// All fields, in serialization order
    fn fields(&self) -> Vec<(String, Value)>;
}

/// Builder-style `Object` from a field map and a method table
///
/// Methods are plain callables; they capture whatever state they need.
#[derive(Debug, Clone)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
    methods: HashMap<String, Callable>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
            methods: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, method: Callable) -> Self {
        self.methods.insert(name.into(), method);
        self
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn method(&self, name: &str) -> Option<Callable> {
        self.methods.get(name).cloned()
    }

    fn fields(&self) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
