//! Value enum for dynamic field values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A dynamic value that can hold any field type the practice API exposes.
///
/// This enum is the cell type of [`Record`](super::Record). The API stores
/// everything as JSON, so deserialization is untagged: the declared variant
/// order decides how an incoming JSON value is classified (a UUID-shaped
/// string becomes `Uuid`, an ISO date becomes `Date`, everything else stays
/// `String`).
///
/// # Example
///
/// ```
/// use praxis_lib::model::Value;
///
/// let name = Value::from("Blue Clinic");
/// let age = Value::from(42i64);
/// let selected = Value::from(vec!["diabetes".to_string(), "asthma".to_string()]);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value (vitals such as temperature or SpO2).
    Float(f64),
    /// UUID value (record ids and foreign keys).
    Uuid(Uuid),
    /// Timestamp with timezone (`created_at`, `updated_at`).
    DateTime(DateTime<Utc>),
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// String value.
    String(String),
    /// List of strings (multi-select fields such as complaints).
    StringList(Vec<String>),
    /// Fallback for JSON shapes the model does not interpret.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::String(_) => "string",
            Value::StringList(_) => "string_list",
            Value::Json(_) => "json",
        }
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this value is numeric and whole.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the UUID if this is a `Uuid` value.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the calendar date of this value, if it has one.
    ///
    /// `DateTime` values are truncated to their UTC date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }

    /// Renders the value for display in a table cell or search match.
    ///
    /// Null renders as the empty string; lists join their items with ", ".
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Uuid(u) => u.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::String(s) => s.clone(),
            Value::StringList(items) => items.join(", "),
            Value::Json(v) => v.to_string(),
        }
    }

    /// Total ordering used by the table engine when sorting a column.
    ///
    /// Nulls sort first; numbers compare numerically across `Int`/`Float`;
    /// strings compare case-insensitively; everything else falls back to
    /// its display rendering.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (a, b) => {
                if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                    return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                }
                if let (Some(x), Some(y)) = (a.as_date(), b.as_date()) {
                    return x.cmp(&y);
                }
                a.display_string().cmp(&b.display_string())
            }
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringList(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_deserialization_classifies_shapes() {
        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_null());

        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));

        let v: Value = serde_json::from_str("36.8").unwrap();
        assert_eq!(v, Value::Float(36.8));

        let v: Value = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(v, Value::String("single".into()));

        let v: Value = serde_json::from_str("\"2f0c0f8e-0b1a-4a7e-9c79-9d9d53c5a001\"").unwrap();
        assert_eq!(v.type_name(), "uuid");

        let v: Value = serde_json::from_str("\"2026-03-14\"").unwrap();
        assert_eq!(v.type_name(), "date");

        let v: Value = serde_json::from_str("\"2026-03-14T09:30:00Z\"").unwrap();
        assert_eq!(v.type_name(), "datetime");

        let v: Value = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(v, Value::StringList(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn compare_orders_numbers_and_strings() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(
            Value::String("blue".into()).compare(&Value::String("Red".into())),
            Ordering::Less
        );
        assert_eq!(Value::Null.compare(&Value::Int(0)), Ordering::Less);
    }
}
