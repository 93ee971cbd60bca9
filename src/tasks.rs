//! Named background jobs with wait-with-timeout and non-blocking peek
//!
//! Each job owns a completion signal (a `watch` channel holding its outcome
//! once done) and a `CancellationToken`. The registry sits behind its own
//! RwLock, independent of the value store's lock.
//!
//! Cancellation is only ever triggered by a wait timing out (or by the job
//! being displaced, see `start`). Work that ignores its token keeps running;
//! a later `peek` then reports it as still running or returns its eventual
//! outcome.
//!
//! Must be used from within a Tokio runtime.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::StepError;
use crate::invoke::panic_message;
use crate::value::Value;

/// Terminal state of a job: its value, or its error message
pub type TaskOutcome = Result<Value, String>;

struct TaskEntry {
    started_at: Instant,
    done: watch::Receiver<Option<TaskOutcome>>,
    cancel: CancellationToken,
}

impl TaskEntry {
    fn is_finished(&self) -> bool {
        self.done.borrow().is_some()
    }
}

/// Registry of running and finished jobs (cloneable handle)
#[derive(Clone, Default)]
pub struct TaskManager {
    tasks: Arc<RwLock<HashMap<String, Arc<TaskEntry>>>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch `work` as job `name` and return immediately
    ///
    /// `work` receives the job's cancellation token. Starting a name that is
    /// still in flight replaces the registry entry: the displaced job is
    /// cancelled and its outcome becomes unreachable.
    #[instrument(skip(self, work))]
    pub fn start<F, Fut>(&self, name: &str, work: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = TaskOutcome> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(None);
        let job = work(cancel.clone());

        let entry = Arc::new(TaskEntry {
            started_at: Instant::now(),
            done: rx,
            cancel,
        });

        let displaced = self.tasks.write().insert(name.to_string(), entry);
        if let Some(old) = displaced {
            if !old.is_finished() {
                warn!(task = name, "job name reused while still running; cancelling previous job");
                old.cancel.cancel();
            }
        }

        let task_name = name.to_string();
        tokio::spawn(async move {
            let outcome = match tokio::spawn(job).await {
                Ok(outcome) => outcome,
                Err(join) if join.is_panic() => Err(StepError::TaskPanicked {
                    name: task_name.clone(),
                    detail: panic_message(join.into_panic()),
                }
                .to_string()),
                Err(join) => Err(format!("task {task_name} aborted: {join}")),
            };
            debug!(task = %task_name, ok = outcome.is_ok(), "job finished");
            tx.send_replace(Some(outcome));
        });
    }

    /// Block until job `name` finishes or `timeout` elapses
    ///
    /// Returns the job's own error if it failed. On timeout the job's token
    /// is cancelled and `TaskTimeout` is returned. Unknown names fail at once.
    #[instrument(skip(self))]
    pub async fn wait(&self, name: &str, timeout: Duration) -> Result<(), StepError> {
        let entry = self.entry(name)?;
        let mut done = entry.done.clone();

        // Clone out of the watch guard so it is released before matching
        let waited = tokio::time::timeout(timeout, done.wait_for(Option::is_some))
            .await
            .map(|r| r.map(|state| state.clone()));

        match waited {
            Ok(Ok(Some(Err(message)))) => Err(StepError::TaskFailed {
                name: name.to_string(),
                message,
            }),
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) => Err(StepError::TaskPanicked {
                name: name.to_string(),
                detail: "completion signal dropped".to_string(),
            }),
            Err(_) => {
                warn!(task = name, ?timeout, "wait timed out; cancelling job");
                entry.cancel.cancel();
                Err(StepError::TaskTimeout {
                    name: name.to_string(),
                    timeout,
                })
            }
        }
    }

    /// Outcome of a finished job, without blocking
    pub fn peek(&self, name: &str) -> Result<Value, StepError> {
        let entry = self.entry(name)?;
        let state = entry.done.borrow();
        match state.as_ref() {
            None => Err(StepError::TaskRunning {
                name: name.to_string(),
            }),
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(StepError::TaskFailed {
                name: name.to_string(),
                message: message.clone(),
            }),
        }
    }

    /// Whether job `name` exists and has not finished
    pub fn is_running(&self, name: &str) -> bool {
        self.entry(name).map(|e| !e.is_finished()).unwrap_or(false)
    }

    /// Time since job `name` started
    pub fn elapsed(&self, name: &str) -> Option<Duration> {
        self.entry(name).ok().map(|e| e.started_at.elapsed())
    }

    /// Registered job names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn entry(&self, name: &str) -> Result<Arc<TaskEntry>, StepError> {
        self.tasks
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StepError::TaskNotFound {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("tasks", &self.names())
            .finish()
    }
}
