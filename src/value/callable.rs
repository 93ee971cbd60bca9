//! Fixed-arity callables
//!
//! Dispatch by name needs no type introspection: every callable declares its
//! arity through its variant, and the invoker checks the call-site arity
//! against it before calling.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::Value;

type Fn0 = dyn Fn() -> Returned + Send + Sync;
type Fn1 = dyn Fn(Value) -> Returned + Send + Sync;
type Fn2 = dyn Fn(Value, Value) -> Returned + Send + Sync;
type Fn3 = dyn Fn(Value, Value, Value) -> Returned + Send + Sync;
type Fn4 = dyn Fn(Value, Value, Value, Value) -> Returned + Send + Sync;

/// A function object taking zero to four `Value` arguments
#[derive(Clone)]
pub enum Callable {
    Nullary(Arc<Fn0>),
    Unary(Arc<Fn1>),
    Binary(Arc<Fn2>),
    Ternary(Arc<Fn3>),
    Quaternary(Arc<Fn4>),
}

/// Call-site arity does not match the callable
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected} arguments, got {actual}")]
pub struct ArityMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl Callable {
    pub fn nullary<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<Returned>,
    {
        Callable::Nullary(Arc::new(move || f().into()))
    }

    pub fn unary<F, R>(f: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Returned>,
    {
        Callable::Unary(Arc::new(move |a| f(a).into()))
    }

    pub fn binary<F, R>(f: F) -> Self
    where
        F: Fn(Value, Value) -> R + Send + Sync + 'static,
        R: Into<Returned>,
    {
        Callable::Binary(Arc::new(move |a, b| f(a, b).into()))
    }

    pub fn ternary<F, R>(f: F) -> Self
    where
        F: Fn(Value, Value, Value) -> R + Send + Sync + 'static,
        R: Into<Returned>,
    {
        Callable::Ternary(Arc::new(move |a, b, c| f(a, b, c).into()))
    }

    pub fn quaternary<F, R>(f: F) -> Self
    where
        F: Fn(Value, Value, Value, Value) -> R + Send + Sync + 'static,
        R: Into<Returned>,
    {
        Callable::Quaternary(Arc::new(move |a, b, c, d| f(a, b, c, d).into()))
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Nullary(_) => 0,
            Callable::Unary(_) => 1,
            Callable::Binary(_) => 2,
            Callable::Ternary(_) => 3,
            Callable::Quaternary(_) => 4,
        }
    }

    /// Call with positional arguments; arity must match exactly
    pub fn call(&self, args: Vec<Value>) -> Result<Returned, ArityMismatch> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(ArityMismatch {
                expected,
                actual: args.len(),
            });
        }

        let mut args = args.into_iter();
        let mut next = move || args.next().unwrap_or_default();

        let returned = match self {
            Callable::Nullary(f) => f(),
            Callable::Unary(f) => f(next()),
            Callable::Binary(f) => {
                let a = next();
                let b = next();
                f(a, b)
            }
            Callable::Ternary(f) => {
                let a = next();
                let b = next();
                let c = next();
                f(a, b, c)
            }
            Callable::Quaternary(f) => {
                let a = next();
                let b = next();
                let c = next();
                let d = next();
                f(a, b, c, d)
            }
        };
        Ok(returned)
    }

    /// Identity comparison (same underlying closure)
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Nullary(a), Callable::Nullary(b)) => Arc::ptr_eq(a, b),
            (Callable::Unary(a), Callable::Unary(b)) => Arc::ptr_eq(a, b),
            (Callable::Binary(a), Callable::Binary(b)) => Arc::ptr_eq(a, b),
            (Callable::Ternary(a), Callable::Ternary(b)) => Arc::ptr_eq(a, b),
            (Callable::Quaternary(a), Callable::Quaternary(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable/{}", self.arity())
    }
}

/// What a callable returns
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    /// No return value: the previous `result` is left untouched
    Nothing,
    /// A single value
    Value(Value),
    /// A value plus an optional error; a present error wins
    Pair(Value, Option<String>),
}

impl Returned {
    /// Collapse into the value to record, `None` for `Nothing`
    pub fn into_outcome(self) -> Option<Value> {
        match self {
            Returned::Nothing => None,
            Returned::Value(v) => Some(v),
            Returned::Pair(_, Some(err)) => Some(Value::Error(err)),
            Returned::Pair(v, None) => Some(v),
        }
    }
}

impl From<()> for Returned {
    fn from(_: ()) -> Self {
        Returned::Nothing
    }
}

impl From<Value> for Returned {
    fn from(v: Value) -> Self {
        Returned::Value(v)
    }
}

impl<E: fmt::Display> From<Result<Value, E>> for Returned {
    fn from(result: Result<Value, E>) -> Self {
        match result {
            Ok(v) => Returned::Pair(v, None),
            Err(e) => Returned::Pair(Value::Null, Some(e.to_string())),
        }
    }
}

impl From<String> for Returned {
    fn from(s: String) -> Self {
        Returned::Value(Value::String(s))
    }
}

impl From<&'static str> for Returned {
    fn from(s: &'static str) -> Self {
        Returned::Value(Value::from(s))
    }
}

impl From<f64> for Returned {
    fn from(x: f64) -> Self {
        Returned::Value(Value::Float(x))
    }
}

impl From<i64> for Returned {
    fn from(i: i64) -> Self {
        Returned::Value(Value::Int(i))
    }
}

impl From<bool> for Returned {
    fn from(b: bool) -> Self {
        Returned::Value(Value::Bool(b))
    }
}
