//! Invoker - calls functions and object methods by name
//!
//! Every call runs inside a panic guard. Faults (panics, arity mismatches,
//! unusable targets) become `Value::Error` results in the store; they never
//! surface as step failures.
//!
//! Recording rule for the `result` key:
//! - value/error pair with an error → the error
//! - a value → the value
//! - nothing → the previous `result` stays as it was

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::{debug, instrument};

use crate::resolve::Resolver;
use crate::store::PropsStore;
use crate::value::{Callable, Value};

thread_local! {
    /// Nesting depth of `guard` on this thread
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

/// Panics inside `guard` are logged at debug level instead of going through
/// the default hook; all other panics still reach the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARD_DEPTH.with(Cell::get) > 0 {
                debug!(%info, "captured panic");
            } else {
                previous(info);
            }
        }));
    });
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        GUARD_DEPTH.with(|d| d.set(d.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f`, turning a panic into its message
pub(crate) fn guard<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    install_quiet_hook();
    let _depth = DepthGuard::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected panic without message".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Invoker {
    store: PropsStore,
    resolver: Resolver,
    result_key: String,
}

impl Invoker {
    pub fn new(store: PropsStore, result_key: impl Into<String>) -> Self {
        Self {
            resolver: Resolver::new(store.clone()),
            store,
            result_key: result_key.into(),
        }
    }

    /// "I call \"fn\" ..." : resolve the function and arguments, call, record
    #[instrument(skip(self, args), fields(arity = args.len()))]
    pub fn call_function(&self, function: &str, args: &[&str]) {
        let target = self.resolver.resolve(function);
        let Value::Callable(callable) = target else {
            self.record(Some(Value::error(format!("{function} is not a function"))));
            return;
        };

        let args = self.resolve_args(args);
        let outcome = run(function, &callable, args);
        self.record(outcome);
    }

    /// "I call \"obj\" with \"method\" ..." : method looked up by exact name
    #[instrument(skip(self, args), fields(arity = args.len()))]
    pub fn call_method(&self, receiver: &str, method: &str, args: &[&str]) {
        let object = self.resolver.resolve(receiver);
        let Some(callable) = object.method(method) else {
            self.record(Some(Value::error(format!("method {method} not found"))));
            return;
        };

        let args = self.resolve_args(args);
        let label = format!("{receiver}.{method}");
        let outcome = run(&label, &callable, args);
        self.record(outcome);
    }

    fn resolve_args(&self, args: &[&str]) -> Vec<Value> {
        args.iter().map(|arg| self.resolver.resolve(arg)).collect()
    }

    fn record(&self, outcome: Option<Value>) {
        match outcome {
            Some(value) => {
                debug!(key = %self.result_key, kind = value.kind(), "recording call outcome");
                self.store.insert(self.result_key.clone(), value);
            }
            None => debug!("call returned nothing; result left untouched"),
        }
    }
}

/// Call under the panic guard; `None` when the callable returned nothing
pub fn run(label: &str, callable: &Callable, args: Vec<Value>) -> Option<Value> {
    match guard(|| callable.call(args)) {
        Ok(Ok(returned)) => returned.into_outcome(),
        Ok(Err(mismatch)) => Some(Value::error(format!("Error calling {label}: {mismatch}"))),
        Err(detail) => Some(Value::error(format!("Error calling {label}: {detail}"))),
    }
}
