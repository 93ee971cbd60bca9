//! Invocation steps
//!
//! Calls never fail the step: whatever happens is recorded under the result
//! key for later assertions.

use crate::error::StepError;
use crate::world::PropsWorld;

impl PropsWorld {
    /// I call "{f}" [using argument(s) ...]
    pub fn call_function(&self, function: &str, args: &[&str]) -> Result<(), StepError> {
        self.invoker.call_function(function, args);
        Ok(())
    }

    /// I call "{o}" with "{m}" [using argument(s) ...]
    pub fn call_method(&self, receiver: &str, method: &str, args: &[&str]) -> Result<(), StepError> {
        self.invoker.call_method(receiver, method, args);
        Ok(())
    }

    /// I refer to "{from}" as "{to}"
    pub fn refer_to(&self, from: &str, to: &str) -> Result<(), StepError> {
        self.store.insert(to, self.resolver.resolve(from));
        Ok(())
    }
}
