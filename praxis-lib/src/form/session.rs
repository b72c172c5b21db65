//! Form session

use std::collections::HashMap;
use std::collections::HashSet;

use uuid::Uuid;

use crate::api::MutationOutcome;
use crate::api::Operation;
use crate::error::Error;
use crate::error::FieldValidationError;
use crate::error::ValidationError;
use crate::model::Entity;
use crate::model::Record;
use crate::model::Value;

use super::schema::FormSchema;
use super::visibility::Visibility;
use super::visibility::VisibilityTable;

/// Whether the session creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Creating a new record; success resets to defaults.
    Create,
    /// Editing the record with the given id; success repopulates from the
    /// server's returned record.
    Edit(Uuid),
}

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the edit target to load; submission is refused.
    Loading,
    /// Values are populated and the form is interactive.
    Ready,
}

/// In-progress state of one create/edit form instance.
///
/// Holds current values, per-field errors and the visibility state
/// machine. When a controlling value change hides a field, the field's
/// value is parked; revealing the field again restores the parked value
/// (or the default). Parked values never reach validation or the submitted
/// payload.
///
/// # Example
///
/// ```
/// use praxis_lib::form::{adult_defaults, adult_schema, adult_visibility, FormSession};
/// use praxis_lib::model::Entity;
///
/// let mut session = FormSession::create(
///     Entity::Adults,
///     adult_schema(),
///     adult_visibility(),
///     adult_defaults(),
/// );
///
/// session.set_value("marital_status", "married");
/// assert!(session.is_visible("children_number"));
/// ```
pub struct FormSession {
    entity: Entity,
    mode: FormMode,
    state: SessionState,
    schema: FormSchema,
    visibility: VisibilityTable,
    defaults: HashMap<String, Value>,
    values: HashMap<String, Value>,
    parked: HashMap<String, Value>,
    hidden: HashSet<String>,
    errors: HashMap<String, String>,
    submitting: bool,
}

impl FormSession {
    /// Starts a create session, immediately `Ready` with the defaults.
    pub fn create(
        entity: Entity,
        schema: FormSchema,
        visibility: VisibilityTable,
        defaults: HashMap<String, Value>,
    ) -> Self {
        let mut session = Self {
            entity,
            mode: FormMode::Create,
            state: SessionState::Ready,
            schema,
            visibility,
            values: defaults.clone(),
            defaults,
            parked: HashMap::new(),
            hidden: HashSet::new(),
            errors: HashMap::new(),
            submitting: false,
        };
        session.reevaluate_visibility();
        session
    }

    /// Starts an edit session in the `Loading` state.
    ///
    /// The caller fetches the record asynchronously and hands it to
    /// [`FormSession::populate`]; until then the session refuses to submit.
    pub fn edit(
        entity: Entity,
        id: Uuid,
        schema: FormSchema,
        visibility: VisibilityTable,
    ) -> Self {
        Self {
            entity,
            mode: FormMode::Edit(id),
            state: SessionState::Loading,
            schema,
            visibility,
            defaults: HashMap::new(),
            values: HashMap::new(),
            parked: HashMap::new(),
            hidden: HashSet::new(),
            errors: HashMap::new(),
            submitting: false,
        }
    }

    /// Populates the session from the loaded record and makes it `Ready`.
    pub fn populate(&mut self, record: &Record) {
        self.values = record.fields().clone();
        self.parked.clear();
        self.errors.clear();
        self.state = SessionState::Ready;
        self.reevaluate_visibility();
    }

    /// Returns `true` while the edit target is still loading.
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Returns `true` while a submit is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The session's mode.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The collection this form writes to.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    // =========================================================================
    // Values and visibility
    // =========================================================================

    /// Sets a field value and re-evaluates dependent visibility.
    ///
    /// Fields that become hidden have their value parked; fields that
    /// become visible again get their parked value (or default) back.
    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        self.values.insert(field.clone(), value.into());
        self.errors.remove(&field);

        if self.visibility.is_controlling(&field) {
            self.reevaluate_visibility();
        }
    }

    /// Returns the current value of a visible field.
    ///
    /// Hidden fields report `None` even though their value is parked.
    pub fn value(&self, field: &str) -> Option<&Value> {
        if self.hidden.contains(field) {
            None
        } else {
            self.values.get(field)
        }
    }

    /// Visibility of one field.
    pub fn is_visible(&self, field: &str) -> bool {
        !self.hidden.contains(field)
    }

    /// Current visibility state of one field.
    pub fn visibility_of(&self, field: &str) -> Visibility {
        if self.hidden.contains(field) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    fn reevaluate_visibility(&mut self) {
        let hidden_now = self.visibility.hidden_fields(&self.values);

        // Newly hidden: park the live value and drop any stale error.
        for field in &hidden_now {
            if !self.hidden.contains(field) {
                if let Some(value) = self.values.remove(field) {
                    self.parked.insert(field.clone(), value);
                }
                self.errors.remove(field);
            }
        }

        // Newly visible: restore the parked value, or fall back to default.
        for field in self.hidden.difference(&hidden_now) {
            let restored = self
                .parked
                .remove(field)
                .or_else(|| self.defaults.get(field).cloned());
            if let Some(value) = restored {
                self.values.insert(field.clone(), value);
            }
        }

        self.hidden = hidden_now;
    }

    // =========================================================================
    // Validation and submission
    // =========================================================================

    /// Runs schema validation over the visible fields.
    ///
    /// Returns `true` when everything passes; the per-field messages are
    /// available via [`FormSession::error`] either way.
    pub fn validate(&mut self) -> bool {
        self.errors = self.schema.validate(&self.values, &self.hidden);
        self.errors.is_empty()
    }

    /// Returns the current error for a field, if any.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns all current per-field errors.
    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    /// Builds the mutation for the current values.
    ///
    /// Refuses while loading or while a previous submit is unresolved.
    /// Validation failures come back as [`Error::Validation`] and never
    /// reach the network. Hidden fields are excluded from the payload.
    pub fn submit(&mut self) -> Result<Operation, Error> {
        if self.state == SessionState::Loading {
            return Err(Error::InvalidOperation(
                "form is still loading its record".to_string(),
            ));
        }
        if self.submitting {
            return Err(Error::InvalidOperation(
                "a submit is already in flight".to_string(),
            ));
        }
        if !self.validate() {
            let errors = self
                .errors
                .iter()
                .map(|(field, message)| FieldValidationError::new(field, message))
                .collect();
            return Err(ValidationError::new(errors).into());
        }

        let mut record = Record::new(self.entity.logical_name());
        for (field, value) in &self.values {
            if !self.hidden.contains(field) {
                record.insert(field.clone(), value.clone());
            }
        }

        self.submitting = true;
        Ok(match self.mode {
            FormMode::Create => Operation::create(self.entity, record),
            FormMode::Edit(id) => Operation::update(self.entity, id, record),
        })
    }

    /// Applies the gateway's answer to a submitted operation.
    ///
    /// Create success resets to the defaults; edit success repopulates
    /// from the returned record. Failure maps server field errors back
    /// onto the fields and leaves the values untouched for retry.
    pub fn resolve_submit(&mut self, result: &Result<MutationOutcome, Error>) {
        self.submitting = false;

        match result {
            Ok(outcome) => match (self.mode, outcome.record()) {
                (FormMode::Create, _) => {
                    self.values = self.defaults.clone();
                    self.parked.clear();
                    self.errors.clear();
                    self.reevaluate_visibility();
                }
                (FormMode::Edit(_), Some(record)) => {
                    self.populate(record);
                }
                (FormMode::Edit(_), None) => {
                    self.errors.clear();
                }
            },
            Err(error) => {
                if let Some(detail) = error.field_errors() {
                    for (field, messages) in &detail.field_errors {
                        if let Some(message) = messages.first() {
                            self.errors.insert(field.clone(), message.clone());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ApiError;
    use crate::error::ServerErrorDetail;
    use crate::form::adult_defaults;
    use crate::form::adult_schema;
    use crate::form::adult_visibility;

    use super::*;

    fn session() -> FormSession {
        FormSession::create(
            Entity::Adults,
            adult_schema(),
            adult_visibility(),
            adult_defaults(),
        )
    }

    #[test]
    fn single_marital_status_hides_children_fields() {
        let mut form = session();

        // Defaults: single, so the children fields start hidden.
        assert!(!form.is_visible("children_number"));

        form.set_value("marital_status", "married");
        assert!(form.is_visible("children_number"));

        form.set_value("children_number", 3i64);
        form.set_value("marital_status", "single");
        assert!(!form.is_visible("children_number"));
        assert!(form.value("children_number").is_none());

        // Hidden value is parked, not lost.
        form.set_value("marital_status", "married");
        assert_eq!(form.value("children_number"), Some(&Value::Int(3)));
    }

    #[test]
    fn hidden_fields_do_not_block_validation() {
        let mut form = session();
        form.set_value("code", "P-001");
        form.set_value("house_number", "12");
        form.set_value("name", "Amira Hassan");
        form.set_value("mobile_number", "01234567890");
        form.set_value("occupation", "teacher");

        // marital_status is "single": children_number stays hidden and
        // must not produce an error even though it has no value.
        assert!(form.validate(), "{:?}", form.errors());
    }

    #[test]
    fn submit_excludes_hidden_fields_from_payload() {
        let mut form = session();
        form.set_value("code", "P-001");
        form.set_value("house_number", "12");
        form.set_value("name", "Amira Hassan");
        form.set_value("mobile_number", "01234567890");
        form.set_value("occupation", "teacher");
        form.set_value("marital_status", "married");
        form.set_value("children_number", 2i64);
        form.set_value("marital_status", "single");

        let operation = form.submit().expect("submit should pass validation");
        let record = match operation {
            Operation::Create { record, .. } => record,
            other => panic!("expected create, got {other:?}"),
        };

        assert!(!record.contains("children_number"));
        assert_eq!(record.get_string("name").unwrap(), Some("Amira Hassan"));
    }

    #[test]
    fn validation_failure_never_reaches_the_gateway() {
        let mut form = session();
        form.set_value("name", "A");

        let err = form.submit().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(form.error("name").is_some());
        assert!(!form.is_submitting());
    }

    #[test]
    fn loading_session_refuses_submission() {
        let mut form = FormSession::edit(
            Entity::Adults,
            Uuid::from_u128(9),
            adult_schema(),
            adult_visibility(),
        );

        assert!(form.is_loading());
        assert!(matches!(form.submit(), Err(Error::InvalidOperation(_))));

        form.populate(
            &Record::with_id("adult", Uuid::from_u128(9))
                .set("code", "P-009")
                .set("house_number", "4")
                .set("name", "Omar Farouk")
                .set("gender", "male")
                .set("mobile_number", "01098765432")
                .set("occupation", "engineer")
                .set("marital_status", "married"),
        );
        assert!(!form.is_loading());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn create_success_resets_to_defaults() {
        let mut form = session();
        form.set_value("code", "P-001");
        form.set_value("house_number", "12");
        form.set_value("name", "Amira Hassan");
        form.set_value("mobile_number", "01234567890");
        form.set_value("occupation", "teacher");

        let _op = form.submit().unwrap();
        assert!(form.is_submitting());

        let outcome = Ok(MutationOutcome::Created(
            Record::with_id("adult", Uuid::from_u128(1)).set("name", "Amira Hassan"),
        ));
        form.resolve_submit(&outcome);

        assert!(!form.is_submitting());
        assert_eq!(form.value("name"), None);
        assert_eq!(
            form.value("marital_status"),
            Some(&Value::String("single".into()))
        );
    }

    #[test]
    fn server_field_errors_map_back_onto_fields() {
        let mut form = session();
        form.set_value("code", "P-001");
        form.set_value("house_number", "12");
        form.set_value("name", "Amira Hassan");
        form.set_value("mobile_number", "01234567890");
        form.set_value("occupation", "teacher");
        let _ = form.submit().unwrap();

        let detail = ServerErrorDetail::from_body(
            r#"{"code": ["A patient with this code already exists."]}"#,
        )
        .unwrap();
        let result = Err(Error::Api(ApiError::http_with_detail(
            400,
            detail.summary(),
            detail,
        )));
        form.resolve_submit(&result);

        assert_eq!(
            form.error("code"),
            Some("A patient with this code already exists.")
        );
        // Values stay put so the user can correct and retry.
        assert_eq!(form.value("name"), Some(&Value::String("Amira Hassan".into())));
    }
}
