//! Array and object shape steps

use tracing::debug;

use crate::attachment::Attachment;
use crate::error::StepError;
use crate::matcher::{match_object, match_strings, Matcher};
use crate::table::DataTable;
use crate::value::Value;
use crate::world::PropsWorld;

impl PropsWorld {
    /// "{x}" is an array of objects with the following contents
    pub fn array_with_contents(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let items = self.resolve_list(field)?;
        let outcome = Matcher::new(&self.resolver).match_array(&items, &table.hashes());

        if let Err(StepError::RowMismatch { index, diagnostic }) = &outcome {
            debug!(field, index, "row mismatch");
            self.attach(Attachment::text(
                format!("row {index} mismatch"),
                diagnostic.clone(),
            ));
        }
        outcome
    }

    /// "{x}" is an array of objects with at least the following contents
    pub fn array_with_at_least(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let items = self.resolve_list(field)?;
        Matcher::new(&self.resolver).match_subset(&items, &table.hashes())
    }

    /// "{x}" is an array of objects which doesn't contain any of
    pub fn array_without_any(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let items = self.resolve_list(field)?;
        Matcher::new(&self.resolver).match_excluded(&items, &table.hashes())
    }

    /// "{x}" is an array of objects with length "{n}"
    pub fn array_with_length(&self, field: &str, length: &str) -> Result<(), StepError> {
        let items = self.resolve_list(field)?;
        let rendered = self.resolver.resolve(length).to_string();
        let expected: usize = rendered
            .trim()
            .parse()
            .map_err(|_| StepError::InvalidLength {
                value: length.to_string(),
            })?;

        if items.len() != expected {
            return Err(StepError::LengthMismatch {
                expected,
                actual: items.len(),
            });
        }
        Ok(())
    }

    /// "{x}" is an array of strings with the following values
    ///
    /// Expected cells are compared as written, without resolution.
    pub fn array_of_strings(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let items = self.resolve_list(field)?;
        match_strings(&items, &table.column_values())
    }

    /// "{x}" is an object with the following contents (one data row)
    pub fn object_with_contents(&self, field: &str, table: &DataTable) -> Result<(), StepError> {
        let actual = self.resolver.resolve(field);
        let rows = table.hashes();
        let [expected] = rows.as_slice() else {
            return Err(StepError::TableShape);
        };
        match_object(field, &actual, expected)
    }

    fn resolve_list(&self, field: &str) -> Result<Vec<Value>, StepError> {
        match self.resolver.resolve(field) {
            Value::List(items) => Ok(items),
            _ => Err(StepError::NotAnArray {
                field: field.to_string(),
            }),
        }
    }
}
