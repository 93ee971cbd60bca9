//! PropsWorld - per-scenario state shared by every step
//!
//! One world per scenario: store, resolver, invoker, job registry, config
//! and collected attachments. Step handlers are methods on the world (see
//! `steps`). Cloning shares all state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::attachment::{Attachment, AttachmentProvider};
use crate::config::WorldConfig;
use crate::invoke::Invoker;
use crate::resolve::Resolver;
use crate::store::PropsStore;
use crate::tasks::TaskManager;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct PropsWorld {
    pub(crate) store: PropsStore,
    pub(crate) resolver: Resolver,
    pub(crate) invoker: Invoker,
    pub(crate) tasks: TaskManager,
    pub(crate) config: Arc<WorldConfig>,
    attachments: Arc<Mutex<Vec<Attachment>>>,
}

impl Default for PropsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PropsWorld {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        let store = PropsStore::new();
        Self {
            resolver: Resolver::new(store.clone()),
            invoker: Invoker::new(store.clone(), config.result_key.clone()),
            store,
            tasks: TaskManager::new(),
            config: Arc::new(config),
            attachments: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn store(&self) -> &PropsStore {
        &self.store
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.tasks
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Resolve a step argument against the current store
    pub fn resolve(&self, text: &str) -> Value {
        self.resolver.resolve(text)
    }

    /// Seed a value (fixtures, host setup code)
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.insert(key, value);
    }

    /// Value under the configured result key
    pub fn result(&self) -> Option<Value> {
        self.store.get(&self.config.result_key)
    }

    pub fn attach(&self, attachment: Attachment) {
        self.attachments.lock().push(attachment);
    }
}

impl AttachmentProvider for PropsWorld {
    fn attachments(&self) -> Vec<Attachment> {
        self.attachments.lock().clone()
    }

    fn clear_attachments(&self) {
        self.attachments.lock().clear();
    }
}
