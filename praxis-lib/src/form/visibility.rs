//! Conditional field visibility
//!
//! Visibility is a pure function of sibling field values, expressed as a
//! declarative rule table instead of branching inside the renderer. Each
//! field is either `Visible` or `Hidden`; the only transition trigger is a
//! change of the value it depends on.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::Value;

/// Per-field visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The field is shown and participates in validation and submission.
    Visible,
    /// The field is hidden; its value is parked and ignored.
    Hidden,
}

/// Condition on the controlling field's current value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Visible when the controlling value equals the given value.
    Equals(Value),
    /// Visible when the controlling value differs from the given value.
    ///
    /// A missing controlling value counts as "differs".
    NotEquals(Value),
    /// Visible when the controlling value is one of the given values.
    OneOf(Vec<Value>),
}

impl Condition {
    /// Evaluates the condition against the controlling field's value.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => value == Some(expected),
            Condition::NotEquals(expected) => value != Some(expected),
            Condition::OneOf(candidates) => {
                value.is_some_and(|v| candidates.contains(v))
            }
        }
    }
}

/// One row of the visibility table: `field` is visible iff `condition`
/// holds for the current value of `depends_on`.
#[derive(Debug, Clone)]
pub struct VisibilityRule {
    /// The dependent field.
    pub field: String,
    /// The controlling sibling field.
    pub depends_on: String,
    /// When the dependent field is visible.
    pub condition: Condition,
}

impl VisibilityRule {
    /// Creates a rule: `field` appears when `depends_on` equals `value`.
    pub fn shown_when_eq(
        field: impl Into<String>,
        depends_on: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            depends_on: depends_on.into(),
            condition: Condition::Equals(value.into()),
        }
    }

    /// Creates a rule: `field` appears when `depends_on` differs from `value`.
    pub fn shown_when_ne(
        field: impl Into<String>,
        depends_on: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            depends_on: depends_on.into(),
            condition: Condition::NotEquals(value.into()),
        }
    }
}

/// The declarative visibility table of one form.
///
/// Fields without a rule are always visible. A field may appear in several
/// rules; it is visible only when every rule holds (the nested sections of
/// the adult form chain conditions this way).
///
/// # Example
///
/// ```
/// use praxis_lib::form::{VisibilityRule, VisibilityTable};
///
/// let table = VisibilityTable::new(vec![
///     VisibilityRule::shown_when_ne("children_number", "marital_status", "single"),
///     VisibilityRule::shown_when_eq("smoking_rate", "smoking", "yes"),
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VisibilityTable {
    rules: Vec<VisibilityRule>,
}

impl VisibilityTable {
    /// Creates a table from rules.
    pub fn new(rules: Vec<VisibilityRule>) -> Self {
        Self { rules }
    }

    /// The rules of this table.
    pub fn rules(&self) -> &[VisibilityRule] {
        &self.rules
    }

    /// Returns `true` if any rule depends on the given field.
    pub fn is_controlling(&self, field: &str) -> bool {
        self.rules.iter().any(|r| r.depends_on == field)
    }

    /// Evaluates the table: the set of currently hidden fields.
    pub fn hidden_fields(&self, values: &HashMap<String, Value>) -> HashSet<String> {
        let mut hidden = HashSet::new();
        for rule in &self.rules {
            if !rule.condition.matches(values.get(&rule.depends_on)) {
                hidden.insert(rule.field.clone());
            }
        }
        hidden
    }

    /// Visibility of one field under the given values.
    pub fn visibility(&self, field: &str, values: &HashMap<String, Value>) -> Visibility {
        let hidden = self
            .rules
            .iter()
            .filter(|r| r.field == field)
            .any(|r| !r.condition.matches(values.get(&r.depends_on)));
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn not_equals_hides_on_match_only() {
        let table = VisibilityTable::new(vec![VisibilityRule::shown_when_ne(
            "children_number",
            "marital_status",
            "single",
        )]);

        assert_eq!(
            table.visibility("children_number", &values(&[("marital_status", "single")])),
            Visibility::Hidden
        );
        assert_eq!(
            table.visibility("children_number", &values(&[("marital_status", "married")])),
            Visibility::Visible
        );
        // Missing controlling value counts as "differs".
        assert_eq!(
            table.visibility("children_number", &HashMap::new()),
            Visibility::Visible
        );
    }

    #[test]
    fn chained_rules_all_have_to_hold() {
        // contraception_method sits inside the female-only section.
        let table = VisibilityTable::new(vec![
            VisibilityRule::shown_when_eq("contraception_method", "gender", "female"),
            VisibilityRule::shown_when_eq("contraception_method", "contraception", "yes"),
        ]);

        let both = values(&[("gender", "female"), ("contraception", "yes")]);
        assert_eq!(
            table.visibility("contraception_method", &both),
            Visibility::Visible
        );

        let one = values(&[("gender", "female"), ("contraception", "no")]);
        assert_eq!(
            table.visibility("contraception_method", &one),
            Visibility::Hidden
        );
    }

    #[test]
    fn hidden_fields_collects_every_failing_rule() {
        let table = VisibilityTable::new(vec![
            VisibilityRule::shown_when_eq("smoking_rate", "smoking", "yes"),
            VisibilityRule::shown_when_eq("cessation_duration", "cessation", "yes"),
        ]);

        let hidden = table.hidden_fields(&values(&[("smoking", "no"), ("cessation", "yes")]));

        assert!(hidden.contains("smoking_rate"));
        assert!(!hidden.contains("cessation_duration"));
    }

    #[test]
    fn unruled_fields_are_always_visible() {
        let table = VisibilityTable::default();
        assert_eq!(table.visibility("name", &HashMap::new()), Visibility::Visible);
    }
}
