//! Structured error detail from API error responses
//!
//! The backend reports rejections either as `{"detail": "..."}` or as a
//! per-field map `{"name": ["Name must be ..."], ...}`. Both shapes parse
//! into [`ServerErrorDetail`] so the form session can map messages back
//! onto individual fields.

use std::collections::HashMap;

/// Detailed error information parsed from an error response body.
#[derive(Debug, Clone, Default)]
pub struct ServerErrorDetail {
    /// General, non-field message (`detail`/`message` keys).
    pub message: Option<String>,
    /// Field name → messages for that field.
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ServerErrorDetail {
    /// Parses an error body, accepting both the general and per-field shapes.
    ///
    /// Returns `None` if the body is not a JSON object (plain-text error
    /// pages carry no structure worth keeping).
    pub fn from_body(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let object = value.as_object()?;

        let mut detail = ServerErrorDetail::default();

        for (key, value) in object {
            match (key.as_str(), value) {
                ("detail" | "message", serde_json::Value::String(s)) => {
                    detail.message = Some(s.clone());
                }
                (field, serde_json::Value::String(s)) => {
                    detail
                        .field_errors
                        .insert(field.to_string(), vec![s.clone()]);
                }
                (field, serde_json::Value::Array(items)) => {
                    let messages: Vec<String> = items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect();
                    if !messages.is_empty() {
                        detail.field_errors.insert(field.to_string(), messages);
                    }
                }
                _ => {}
            }
        }

        if detail.message.is_none() && detail.field_errors.is_empty() {
            None
        } else {
            Some(detail)
        }
    }

    /// Returns `true` if any field-scoped messages were reported.
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Returns the first message for the given field.
    pub fn first_message(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }

    /// A single human-readable summary for display outside a form.
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        let mut fields: Vec<&String> = self.field_errors.keys().collect();
        fields.sort();
        let parts: Vec<String> = fields
            .into_iter()
            .filter_map(|f| self.first_message(f).map(|m| format!("{f}: {m}")))
            .collect();
        parts.join("; ")
    }
}

impl std::fmt::Display for ServerErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_general_detail() {
        let detail = ServerErrorDetail::from_body(r#"{"detail": "Not found."}"#).unwrap();
        assert_eq!(detail.message.as_deref(), Some("Not found."));
        assert!(!detail.has_field_errors());
    }

    #[test]
    fn parses_field_errors() {
        let body = r#"{"name": ["Name must be at least 2 characters long"], "mobile_number": ["Required"]}"#;
        let detail = ServerErrorDetail::from_body(body).unwrap();

        assert!(detail.has_field_errors());
        assert_eq!(
            detail.first_message("name"),
            Some("Name must be at least 2 characters long")
        );
        assert_eq!(
            detail.summary(),
            "mobile_number: Required; name: Name must be at least 2 characters long"
        );
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(ServerErrorDetail::from_body("<html>502</html>").is_none());
        assert!(ServerErrorDetail::from_body("[]").is_none());
    }
}
