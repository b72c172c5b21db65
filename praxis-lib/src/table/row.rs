//! Row contract for the table engine

use uuid::Uuid;

use crate::model::Record;
use crate::model::Value;

/// A row the table engine can display.
///
/// The one type parameter of the table stack: column and filter
/// descriptors are checked against the row type at compile time instead of
/// being stringly-typed against whatever shows up at runtime.
///
/// The id must uniquely identify the row within one table instance for the
/// lifetime of a selection.
pub trait TableRow {
    /// Stable identity of this row.
    fn row_id(&self) -> Uuid;

    /// Returns the named field's value, if the row has it.
    fn field(&self, key: &str) -> Option<Value>;

    /// Renders the named field for display and search matching.
    fn field_display(&self, key: &str) -> String {
        self.field(key).map(|v| v.display_string()).unwrap_or_default()
    }
}

impl TableRow for Record {
    fn row_id(&self) -> Uuid {
        self.id().unwrap_or_else(Uuid::nil)
    }

    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}
