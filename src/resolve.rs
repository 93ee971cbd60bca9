//! Reference resolver for `{name}` tokens
//!
//! A text that is exactly one token resolves to the referenced value itself;
//! any other text has each embedded token replaced by its rendering. Nothing
//! is cached: every call reads the store as it is now.
//!
//! Single-token strategies, first hit wins:
//! 1. keywords: `null`, `nil`, `true`, `false`
//! 2. numeric literal (parsed as a float)
//! 3. exact store key
//! 4. capitalized store key
//! 5. `object.field`: field, capitalized field, then a `Get<Field>` accessor
//! 6. path query rooted at the store
//!
//! A miss resolves to `Value::Null`; resolution never fails.

use tracing::debug;

use crate::invoke::guard;
use crate::store::PropsStore;
use crate::value::{Returned, Value};

/// Resolves references against a store
#[derive(Debug, Clone)]
pub struct Resolver {
    store: PropsStore,
}

impl Resolver {
    pub fn new(store: PropsStore) -> Self {
        Self { store }
    }

    /// Resolve a step argument
    pub fn resolve(&self, text: &str) -> Value {
        if is_single_token(text) {
            return self.resolve_token(&text[1..text.len() - 1]);
        }
        if text.contains('{') && text.contains('}') {
            return Value::String(self.substitute(text));
        }
        Value::String(text.to_string())
    }

    /// Resolve the inside of one `{...}` token
    pub fn resolve_token(&self, name: &str) -> Value {
        match name {
            "null" | "nil" => return Value::Null,
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }

        if let Ok(number) = name.parse::<f64>() {
            return Value::Float(number);
        }

        if let Some(value) = self.store.get(name) {
            return value;
        }

        if let Some(value) = self.store.get(&capitalize(name)) {
            return value;
        }

        if let Some(value) = self.resolve_dotted(name) {
            return value;
        }

        if let Some(value) = self.store.resolve_path(name) {
            return value;
        }

        debug!(token = name, "reference did not resolve");
        Value::Null
    }

    /// Replace embedded tokens left to right; stop at the first miss
    fn substitute(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let end = start + len;

            let resolved = self.resolve_token(&rest[start + 1..end]);
            if resolved.is_null() {
                break;
            }

            result.push_str(&rest[..start]);
            result.push_str(&resolved.to_string());
            rest = &rest[end + 1..];
        }

        result.push_str(rest);
        result
    }

    /// `object.field` with exactly two segments
    fn resolve_dotted(&self, name: &str) -> Option<Value> {
        let (object_name, field_name) = name.split_once('.')?;
        if field_name.contains('.') || field_name.is_empty() {
            return None;
        }

        let object = self.store.get(object_name)?;
        let capitalized = capitalize(field_name);

        object
            .field(field_name)
            .or_else(|| object.field(&capitalized))
            .or_else(|| {
                let getter = object.method(&format!("Get{capitalized}"))?;
                if getter.arity() != 0 {
                    return None;
                }
                match guard(|| getter.call(Vec::new())) {
                    Ok(Ok(Returned::Value(v))) | Ok(Ok(Returned::Pair(v, _))) => Some(v),
                    _ => None,
                }
            })
    }
}

/// `{...}` with no other opening brace
fn is_single_token(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('{')
        && text.ends_with('}')
        && text.matches('{').count() == 1
}

/// Uppercase the first character
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
