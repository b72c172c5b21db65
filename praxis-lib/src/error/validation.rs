//! Validation error types

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A local validation failure: one or more fields rejected before submit.
///
/// Never sent to the network; the form session surfaces the messages next
/// to their fields.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Validation failed for {} field(s)", errors.len())]
pub struct ValidationError {
    /// The individual field failures.
    pub errors: Vec<FieldValidationError>,
}

impl ValidationError {
    /// Creates a validation error from field failures.
    pub fn new(errors: Vec<FieldValidationError>) -> Self {
        Self { errors }
    }

    /// Returns the first message for the given field, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}
