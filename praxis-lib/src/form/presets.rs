//! Ready-made form configurations
//!
//! The concrete schemas the dashboard binds to the generic form session.
//! The adult anamnesis form is the big one: most of its sections reveal
//! follow-up fields only when a controlling answer makes them relevant.

use std::collections::HashMap;

use crate::model::Value;

use super::schema::FieldRule;
use super::schema::FormSchema;
use super::visibility::VisibilityRule;
use super::visibility::VisibilityTable;

/// Patient genders.
pub const GENDERS: [&str; 2] = ["male", "female"];

/// Marital statuses.
pub const MARITAL_STATUSES: [&str; 4] = ["married", "single", "divorced", "widowed"];

/// Education levels.
pub const EDUCATION_LEVELS: [&str; 7] = [
    "illiterate",
    "read_write",
    "primary",
    "preparatory",
    "secondary",
    "university",
    "postgraduate",
];

/// Menstruation patterns.
pub const MENSTRUATIONS: [&str; 3] = ["regular", "irregular", "menopause"];

/// Contraception methods.
pub const CONTRACEPTION_METHODS: [&str; 4] = ["implant", "iud", "coc", "other"];

/// Blood transfusion frequencies.
pub const BLOOD_TRANSFUSIONS: [&str; 3] = ["no", "occasional", "regular"];

/// Surgical history kinds.
pub const SURGICALS: [&str; 2] = ["icu", "operation"];

/// Yes/no answers used by the habit questions.
pub const YES_NO: [&str; 2] = ["yes", "no"];

/// Validation schema of the adult patient form.
pub fn adult_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("code", "Code").required().min_length(1),
        FieldRule::text("house_number", "House number").required().min_length(1),
        FieldRule::text("name", "Name").required().min_length(2),
        FieldRule::choice("gender", "Gender", GENDERS).required(),
        FieldRule::text("mobile_number", "Mobile number")
            .required()
            .min_length(11),
        FieldRule::integer("age", "Age").min(0.0).max(150.0),
        FieldRule::text("occupation", "Occupation").required().min_length(1),
        FieldRule::choice("marital_status", "Marital status", MARITAL_STATUSES).required(),
        FieldRule::integer("children_number", "Children number").min(0.0),
        FieldRule::integer("age_of_the_youngest", "Age of the youngest").min(0.0),
        FieldRule::choice("education_level", "Education level", EDUCATION_LEVELS),
        FieldRule::choice("smoking", "Smoking", YES_NO),
        FieldRule::text("smoking_rate", "Smoking rate"),
        FieldRule::text("smoking_type", "Smoking type"),
        FieldRule::text("other_smoking", "Other smoking"),
        FieldRule::choice("cessation", "Smoking cessation", YES_NO),
        FieldRule::text("cessation_duration", "Cessation duration"),
        FieldRule::choice("menstruation", "Menstruation", MENSTRUATIONS),
        FieldRule::text("gravidal_number", "Gravidal number"),
        FieldRule::text("abortion_number", "Abortion number"),
        FieldRule::choice("contraception", "Contraception", YES_NO),
        FieldRule::choice("contraception_method", "Contraception method", CONTRACEPTION_METHODS),
        FieldRule::text("contraception_other_method", "Other contraception method"),
        FieldRule::multi_choice("complaints", "Complaints"),
        FieldRule::text("bp", "BP"),
        FieldRule::float("hr", "HR"),
        FieldRule::float("temp", "Temp"),
        FieldRule::float("rbs", "RBS"),
        FieldRule::float("spo2", "SpO2"),
        FieldRule::multi_choice("cyanosis", "Cyanosis"),
        FieldRule::choice("jaundice", "Jaundice", YES_NO),
        FieldRule::choice("pallor", "Pallor", YES_NO),
        FieldRule::multi_choice("medical", "Medical"),
        FieldRule::choice("allergy", "Allergy", YES_NO),
        FieldRule::text("allergy_specification", "Allergy specification"),
        FieldRule::choice("blood_transfusion", "Blood transfusion", BLOOD_TRANSFUSIONS),
        FieldRule::text("blood_transfusion_duration", "Blood transfusion duration"),
        FieldRule::choice("surgical", "Surgical", SURGICALS),
        FieldRule::text("surgical_operation", "Surgical operation"),
        FieldRule::text("icu", "ICU"),
        FieldRule::multi_choice("drugs", "Drugs"),
        FieldRule::multi_choice("family_history", "Family history"),
    ])
}

/// Visibility table of the adult patient form.
///
/// Mirrors the questionnaire flow: follow-up questions appear only when
/// the controlling answer makes them applicable, and the menstruation
/// section only exists for female patients.
pub fn adult_visibility() -> VisibilityTable {
    let mut rules = vec![
        VisibilityRule::shown_when_ne("children_number", "marital_status", "single"),
        VisibilityRule::shown_when_ne("age_of_the_youngest", "marital_status", "single"),
        VisibilityRule::shown_when_eq("smoking_rate", "smoking", "yes"),
        VisibilityRule::shown_when_eq("smoking_type", "smoking", "yes"),
        VisibilityRule::shown_when_eq("other_smoking", "smoking", "yes"),
        VisibilityRule::shown_when_eq("cessation_duration", "cessation", "yes"),
        VisibilityRule::shown_when_eq("contraception_method", "contraception", "yes"),
        VisibilityRule::shown_when_eq("contraception_other_method", "contraception", "yes"),
        VisibilityRule::shown_when_eq("allergy_specification", "allergy", "yes"),
        VisibilityRule::shown_when_ne("blood_transfusion_duration", "blood_transfusion", "no"),
        VisibilityRule::shown_when_eq("surgical_operation", "surgical", "operation"),
        VisibilityRule::shown_when_eq("icu", "surgical", "icu"),
    ];

    // The whole menstruation section is female-only.
    for field in [
        "menstruation",
        "gravidal_number",
        "abortion_number",
        "contraception",
        "contraception_method",
        "contraception_other_method",
    ] {
        rules.push(VisibilityRule::shown_when_eq(field, "gender", "female"));
    }

    VisibilityTable::new(rules)
}

/// Default values of a fresh adult patient form.
pub fn adult_defaults() -> HashMap<String, Value> {
    let mut defaults = HashMap::new();
    for (field, value) in [
        ("gender", "male"),
        ("marital_status", "single"),
        ("education_level", "primary"),
        ("smoking", "no"),
        ("cessation", "no"),
        ("contraception", "no"),
        ("jaundice", "no"),
        ("pallor", "no"),
        ("allergy", "no"),
        ("blood_transfusion", "no"),
    ] {
        defaults.insert(field.to_string(), Value::from(value));
    }
    for field in ["complaints", "cyanosis", "medical", "drugs", "family_history"] {
        defaults.insert(field.to_string(), Value::StringList(Vec::new()));
    }
    defaults
}

/// Validation schema of the clinic form.
pub fn clinic_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::text("name", "Name").required().min_length(2),
        FieldRule::text("address", "Address"),
    ])
}

/// Validation schema of the symptom form.
pub fn symptom_schema() -> FormSchema {
    FormSchema::new(vec![FieldRule::text("name", "Name").required().min_length(1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn female_only_section_is_hidden_for_males() {
        let table = adult_visibility();
        let values: HashMap<String, Value> =
            [("gender".to_string(), Value::from("male"))].into();

        let hidden = table.hidden_fields(&values);

        assert!(hidden.contains("menstruation"));
        assert!(hidden.contains("contraception"));
    }

    #[test]
    fn contraception_method_needs_both_conditions() {
        let table = adult_visibility();
        let mut values: HashMap<String, Value> =
            [("gender".to_string(), Value::from("female"))].into();
        values.insert("contraception".to_string(), Value::from("no"));

        assert!(table.hidden_fields(&values).contains("contraception_method"));

        values.insert("contraception".to_string(), Value::from("yes"));
        assert!(!table.hidden_fields(&values).contains("contraception_method"));
    }
}
