//! Dynamic entity record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use super::Value;
use crate::error::FieldError;

/// A dynamic record from one of the practice API collections.
///
/// Records hold field values as a `HashMap<String, Value>`, allowing the
/// generic table and form machinery to work over any entity. Typed getters
/// provide checked access when a caller knows the field's type.
///
/// # Example
///
/// ```
/// use praxis_lib::model::Record;
///
/// let record = Record::new("clinic").set("name", "Blue Clinic");
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Blue Clinic"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The logical name of the entity this record belongs to.
    pub(crate) entity_name: String,

    /// The unique identifier of the record.
    pub(crate) id: Option<Uuid>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record for the given entity.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            id: None,
            fields: HashMap::new(),
        }
    }

    /// Creates a new record with the given ID.
    pub fn with_id(entity_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            entity_name: entity_name.into(),
            id: Some(id),
            fields: HashMap::new(),
        }
    }

    /// Returns the entity logical name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the record ID, if set.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Sets the entity name.
    pub fn set_entity_name(&mut self, name: impl Into<String>) {
        self.entity_name = name.into();
    }

    /// Sets the record ID.
    pub fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns a mutable reference to all fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    /// Returns a string field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TypeMismatch`] if the field holds a non-string
    /// value. A missing field or explicit null yields `Ok(None)`.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Returns a boolean field.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Returns an integer field.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "int", v.type_name())),
        }
    }

    /// Returns a float field.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "float", v.type_name())),
        }
    }

    /// Returns a UUID field.
    pub fn get_uuid(&self, field: &str) -> Result<Option<Uuid>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Uuid(u)) => Ok(Some(*u)),
            Some(other) => Err(FieldError::type_mismatch(field, "uuid", other.type_name())),
        }
    }

    /// Returns a date field, truncating timestamps to their UTC date.
    pub fn get_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_date()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "date", v.type_name())),
        }
    }

    /// Returns a timestamp field.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "datetime",
                other.type_name(),
            )),
        }
    }

    /// Returns a string-list field.
    pub fn get_string_list(&self, field: &str) -> Result<Option<&[String]>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::StringList(items)) => Ok(Some(items)),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string_list",
                other.type_name(),
            )),
        }
    }
}
