//! PropsStore - scenario values behind one RwLock
//!
//! Reads (resolution) run concurrently; writes from steps and completing jobs
//! are exclusive. The lock is never held while user code runs, so a callable
//! may itself write to the store. Concurrent jobs writing the same key race;
//! last writer wins.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::jsonpath::{self, Segment};
use crate::value::Value;

/// Cloneable handle to the shared property map
#[derive(Clone, Default)]
pub struct PropsStore {
    props: Arc<RwLock<HashMap<String, Value>>>,
}

impl PropsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.write().insert(key.into(), value.into());
    }

    /// Get a value (cloned out; objects and callables share their Arc)
    pub fn get(&self, key: &str) -> Option<Value> {
        self.props.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.props.read().contains_key(key)
    }

    /// Apply `f` to the current value under the write lock
    pub fn update(&self, key: &str, f: impl FnOnce(Option<&Value>) -> Value) {
        let mut props = self.props.write();
        let next = f(props.get(key));
        props.insert(key.to_string(), next);
    }

    /// Sorted key list
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.props.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.props.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-owning handle, for callables stored inside this store
    pub fn downgrade(&self) -> WeakPropsStore {
        WeakPropsStore(Arc::downgrade(&self.props))
    }

    /// Resolve a path rooted at the store (e.g. "users[0].address.city")
    ///
    /// The first segment selects a key; the rest is queried against that
    /// value's canonical form. A bare key returns the stored value itself.
    pub fn resolve_path(&self, path: &str) -> Option<Value> {
        let segments = jsonpath::parse(path).ok()?;
        let (first, rest) = segments.split_first()?;
        let Segment::Field(key) = first else {
            return None;
        };

        let value = self.get(key)?;
        if rest.is_empty() {
            return Some(value);
        }

        jsonpath::apply(&value.to_json(), rest).map(Value::from)
    }
}

/// Weak counterpart of `PropsStore`
#[derive(Clone)]
pub struct WeakPropsStore(Weak<RwLock<HashMap<String, Value>>>);

impl WeakPropsStore {
    pub fn upgrade(&self) -> Option<PropsStore> {
        self.0.upgrade().map(|props| PropsStore { props })
    }
}

impl std::fmt::Debug for PropsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropsStore")
            .field("keys", &self.keys())
            .finish()
    }
}
