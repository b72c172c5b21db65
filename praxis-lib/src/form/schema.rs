//! Field schema validation

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::Value;

/// The expected shape of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Floating point number (vitals).
    Float,
    /// One of a fixed set of choices.
    Choice,
    /// Any subset of a candidate set (backed by autocomplete).
    MultiChoice,
    /// Calendar date.
    Date,
}

/// Validation rule for one field.
///
/// # Example
///
/// ```
/// use praxis_lib::form::FieldRule;
///
/// let name = FieldRule::text("name", "Name").required().min_length(2);
/// let age = FieldRule::integer("age", "Age").min(0.0).max(150.0);
/// ```
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
    min_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    choices: Vec<String>,
}

impl FieldRule {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            min_length: None,
            min: None,
            max: None,
            choices: Vec::new(),
        }
    }

    /// Creates a text field rule.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Creates an integer field rule.
    pub fn integer(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    /// Creates a float field rule.
    pub fn float(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Float)
    }

    /// Creates a fixed-choice field rule.
    pub fn choice<I, S>(name: impl Into<String>, label: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rule = Self::new(name, label, FieldKind::Choice);
        rule.choices = choices.into_iter().map(Into::into).collect();
        rule
    }

    /// Creates a multi-choice field rule.
    pub fn multi_choice(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::MultiChoice)
    }

    /// Creates a date field rule.
    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Requires at least `n` characters (text fields).
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Sets the minimum numeric value.
    pub fn min(mut self, v: f64) -> Self {
        self.min = Some(v);
        self
    }

    /// Sets the maximum numeric value.
    pub fn max(mut self, v: f64) -> Self {
        self.max = Some(v);
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user-facing label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Validates one value against this rule.
    ///
    /// Returns the error message, or `None` if the value passes.
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        let value = match value {
            None | Some(Value::Null) => {
                return self
                    .required
                    .then(|| format!("{} is required", self.label));
            }
            Some(v) => v,
        };

        match self.kind {
            FieldKind::Text | FieldKind::Choice => {
                let text = match value {
                    Value::String(s) => s.trim(),
                    _ => return Some(format!("{} must be text", self.label)),
                };
                if text.is_empty() && self.required {
                    return Some(format!("{} is required", self.label));
                }
                if let Some(min) = self.min_length {
                    if text.chars().count() < min {
                        return Some(format!(
                            "{} must be at least {} characters long",
                            self.label, min
                        ));
                    }
                }
                if self.kind == FieldKind::Choice
                    && !text.is_empty()
                    && !self.choices.iter().any(|c| c == text)
                {
                    return Some(format!("{} has an invalid choice", self.label));
                }
                None
            }
            FieldKind::Integer | FieldKind::Float => {
                let number = match value.as_f64() {
                    Some(n) => n,
                    None => return Some(format!("{} must be a number", self.label)),
                };
                if self.kind == FieldKind::Integer && number.fract() != 0.0 {
                    return Some(format!("{} must be a whole number", self.label));
                }
                if let Some(min) = self.min {
                    if number < min {
                        return Some(format!("{} must be at least {}", self.label, min));
                    }
                }
                if let Some(max) = self.max {
                    if number > max {
                        return Some(format!("{} must be at most {}", self.label, max));
                    }
                }
                None
            }
            FieldKind::MultiChoice => match value {
                Value::StringList(_) => None,
                _ => Some(format!("{} must be a list", self.label)),
            },
            FieldKind::Date => match value.as_date() {
                Some(_) => None,
                None => Some(format!("{} must be a date", self.label)),
            },
        }
    }
}

/// The validation schema of one form.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    /// Creates a schema from field rules.
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// The field rules, in form order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Looks up the rule for a field.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Validates the given values.
    ///
    /// Hidden fields are skipped entirely; a value parked behind a hidden
    /// field can never block submission.
    pub fn validate(
        &self,
        values: &HashMap<String, Value>,
        hidden: &HashSet<String>,
    ) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        for rule in &self.rules {
            if hidden.contains(rule.name()) {
                continue;
            }
            if let Some(message) = rule.check(values.get(rule.name())) {
                errors.insert(rule.name().to_string(), message);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn required_fields_reject_missing_and_null() {
        let schema = FormSchema::new(vec![FieldRule::text("name", "Name").required()]);

        let errors = schema.validate(&HashMap::new(), &HashSet::new());
        assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));

        let errors = schema.validate(&values(&[("name", Value::Null)]), &HashSet::new());
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn min_length_and_ranges_are_enforced() {
        let schema = FormSchema::new(vec![
            FieldRule::text("name", "Name").required().min_length(2),
            FieldRule::integer("age", "Age").min(0.0).max(150.0),
        ]);

        let errors = schema.validate(
            &values(&[("name", Value::from("A")), ("age", Value::from(200i64))]),
            &HashSet::new(),
        );

        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Name must be at least 2 characters long")
        );
        assert_eq!(
            errors.get("age").map(String::as_str),
            Some("Age must be at most 150")
        );
    }

    #[test]
    fn choice_fields_reject_unknown_values() {
        let schema = FormSchema::new(vec![FieldRule::choice(
            "gender",
            "Gender",
            ["male", "female"],
        )]);

        let ok = schema.validate(&values(&[("gender", Value::from("male"))]), &HashSet::new());
        assert!(ok.is_empty());

        let bad = schema.validate(&values(&[("gender", Value::from("other"))]), &HashSet::new());
        assert!(bad.contains_key("gender"));
    }

    #[test]
    fn hidden_fields_are_not_validated() {
        let schema = FormSchema::new(vec![
            FieldRule::integer("children_number", "Children number")
                .required()
                .min(0.0),
        ]);

        let hidden: HashSet<String> = ["children_number".to_string()].into();
        let errors = schema.validate(&HashMap::new(), &hidden);

        assert!(errors.is_empty());
    }
}
