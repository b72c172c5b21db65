//! Filter model
//!
//! Declarative filter descriptors plus a value map, applied as a pure,
//! order-independent logical AND over the row set.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::Value;

use super::row::TableRow;

/// The kind of a user-facing filter control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match on one field.
    Text,
    /// Exact match against one option.
    SingleSelect,
    /// Membership in a set of options.
    MultiSelect,
    /// Exact calendar-date match.
    Date,
    /// Inclusive date range; an absent bound is unbounded on that side.
    DateRange,
}

/// One selectable option of a select-kind filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// The stored value, compared against the row field.
    pub value: String,
    /// The label shown to the user.
    pub label: String,
}

impl FilterOption {
    /// Creates an option whose label equals its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// Creates an option with a distinct label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Describes one filter control: which row field it narrows and how.
///
/// The id doubles as the row field key and must be unique per table.
/// Select kinds always carry options; the constructors enforce it.
///
/// # Example
///
/// ```
/// use praxis_lib::table::{FilterDescriptor, FilterOption};
///
/// let gender = FilterDescriptor::single_select(
///     "gender",
///     "Gender",
///     vec![FilterOption::plain("male"), FilterOption::plain("female")],
/// );
/// let created = FilterDescriptor::date_range("created_at", "Created");
/// ```
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    id: String,
    label: String,
    kind: FilterKind,
    options: Vec<FilterOption>,
}

impl FilterDescriptor {
    /// Creates a text filter.
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FilterKind::Text,
            options: Vec::new(),
        }
    }

    /// Creates a single-select filter.
    pub fn single_select(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FilterKind::SingleSelect,
            options,
        }
    }

    /// Creates a multi-select filter.
    pub fn multi_select(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FilterKind::MultiSelect,
            options,
        }
    }

    /// Creates an exact-date filter.
    pub fn date(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FilterKind::Date,
            options: Vec::new(),
        }
    }

    /// Creates a date-range filter.
    pub fn date_range(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FilterKind::DateRange,
            options: Vec::new(),
        }
    }

    /// The filter id, also the row field it narrows.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The label shown to the user.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The control kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The options of a select-kind filter (empty otherwise).
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }
}

/// The current value of one filter control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Substring query.
    Text(String),
    /// One selected option value.
    Single(String),
    /// Several selected option values.
    Multi(Vec<String>),
    /// One calendar date.
    Date(NaiveDate),
    /// Inclusive range; `None` means unbounded on that side.
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl FilterValue {
    /// Returns `true` if this value applies no narrowing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::Single(s) => s.is_empty(),
            FilterValue::Multi(items) => items.is_empty(),
            FilterValue::Date(_) => false,
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
        }
    }
}

/// Mapping from filter id to its current value.
///
/// Absent or empty entries mean "no filter applied".
#[derive(Debug, Clone, Default)]
pub struct FilterValues {
    values: HashMap<String, FilterValue>,
}

impl FilterValues {
    /// Creates an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a filter id. Empty values clear the entry.
    pub fn set(&mut self, id: impl Into<String>, value: FilterValue) {
        let id = id.into();
        if value.is_empty() {
            self.values.remove(&id);
        } else {
            self.values.insert(id, value);
        }
    }

    /// Clears the value for a filter id.
    pub fn clear(&mut self, id: &str) {
        self.values.remove(id);
    }

    /// Returns the value for a filter id, if set.
    pub fn get(&self, id: &str) -> Option<&FilterValue> {
        self.values.get(id)
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of active filters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over the active `(id, value)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Applies every active filter to the row set.
///
/// Pure and order-independent: each surviving row satisfies the rule of
/// every active filter (logical AND), so the application order cannot
/// change the result. Value entries whose id matches no descriptor are
/// ignored, not an error.
pub fn apply_filters<'r, R: TableRow>(
    rows: impl IntoIterator<Item = &'r R>,
    descriptors: &[FilterDescriptor],
    values: &FilterValues,
) -> Vec<&'r R> {
    rows.into_iter()
        .filter(|row| row_passes(*row, descriptors, values))
        .collect()
}

/// Returns `true` if the row satisfies every active filter.
pub fn row_passes<R: TableRow>(
    row: &R,
    descriptors: &[FilterDescriptor],
    values: &FilterValues,
) -> bool {
    values.iter().all(|(id, value)| {
        match descriptors.iter().find(|d| d.id() == id) {
            Some(descriptor) => matches(row, descriptor, value),
            // Unknown id: no descriptor to interpret it, so it narrows nothing.
            None => true,
        }
    })
}

fn matches<R: TableRow>(row: &R, descriptor: &FilterDescriptor, value: &FilterValue) -> bool {
    if value.is_empty() {
        return true;
    }

    let field = row.field(descriptor.id());

    match (descriptor.kind(), value) {
        (FilterKind::Text, FilterValue::Text(query)) => {
            let haystack = field.map(|v| v.display_string()).unwrap_or_default();
            haystack.to_lowercase().contains(&query.trim().to_lowercase())
        }
        (FilterKind::SingleSelect, FilterValue::Single(selected)) => match field {
            Some(v) => &v.display_string() == selected,
            None => false,
        },
        (FilterKind::MultiSelect, FilterValue::Multi(selected)) => match field {
            Some(Value::StringList(items)) => {
                items.iter().any(|item| selected.contains(item))
            }
            Some(v) => selected.contains(&v.display_string()),
            None => false,
        },
        (FilterKind::Date, FilterValue::Date(date)) => {
            field.and_then(|v| v.as_date()) == Some(*date)
        }
        (FilterKind::DateRange, FilterValue::DateRange { from, to }) => {
            match field.and_then(|v| v.as_date()) {
                Some(date) => {
                    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
                }
                None => false,
            }
        }
        // Value shape doesn't fit the descriptor kind; treat as no match
        // rather than silently passing rows through a broken filter.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::model::Record;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patients() -> Vec<Record> {
        vec![
            Record::with_id("patient", Uuid::from_u128(1))
                .set("name", "Amira Hassan")
                .set("gender", "female")
                .set("complaints", vec!["cough".to_string(), "fever".to_string()])
                .set("created_at", date(2026, 1, 10)),
            Record::with_id("patient", Uuid::from_u128(2))
                .set("name", "Omar Farouk")
                .set("gender", "male")
                .set("complaints", vec!["headache".to_string()])
                .set("created_at", date(2026, 2, 20)),
            Record::with_id("patient", Uuid::from_u128(3))
                .set("name", "Layla Mansour")
                .set("gender", "female")
                .set("complaints", Vec::<String>::new())
                .set("created_at", date(2026, 3, 5)),
        ]
    }

    fn descriptors() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::single_select(
                "gender",
                "Gender",
                vec![FilterOption::plain("male"), FilterOption::plain("female")],
            ),
            FilterDescriptor::multi_select(
                "complaints",
                "Complaints",
                vec![
                    FilterOption::plain("cough"),
                    FilterOption::plain("fever"),
                    FilterOption::plain("headache"),
                ],
            ),
            FilterDescriptor::date_range("created_at", "Created"),
        ]
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set("name", FilterValue::Text("aMiRa".into()));

        let result = apply_filters(&rows, &descriptors(), &values);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_string("name").unwrap(), Some("Amira Hassan"));
    }

    #[test]
    fn single_select_is_exact_equality() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set("gender", FilterValue::Single("female".into()));

        let result = apply_filters(&rows, &descriptors(), &values);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn multi_select_matches_any_overlap() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set(
            "complaints",
            FilterValue::Multi(vec!["fever".into(), "headache".into()]),
        );

        let result = apply_filters(&rows, &descriptors(), &values);

        // Amira has fever, Omar has headache; Layla has no complaints.
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn date_range_is_inclusive_and_half_open() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set(
            "created_at",
            FilterValue::DateRange {
                from: Some(date(2026, 2, 20)),
                to: None,
            },
        );

        let result = apply_filters(&rows, &descriptors(), &values);
        assert_eq!(result.len(), 2);

        values.set(
            "created_at",
            FilterValue::DateRange {
                from: Some(date(2026, 1, 10)),
                to: Some(date(2026, 2, 20)),
            },
        );
        let result = apply_filters(&rows, &descriptors(), &values);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filters_combine_as_logical_and() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set("gender", FilterValue::Single("female".into()));
        values.set(
            "complaints",
            FilterValue::Multi(vec!["cough".into()]),
        );

        let result = apply_filters(&rows, &descriptors(), &values);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].row_id(), Uuid::from_u128(1));
    }

    #[test]
    fn application_is_idempotent() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set("gender", FilterValue::Single("female".into()));

        let once = apply_filters(&rows, &descriptors(), &values);
        let twice = apply_filters(once.iter().copied(), &descriptors(), &values);

        assert_eq!(
            once.iter().map(|r| r.row_id()).collect::<Vec<_>>(),
            twice.iter().map(|r| r.row_id()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn unknown_id_is_ignored() {
        let rows = patients();
        let mut values = FilterValues::new();
        values.set("no_such_filter", FilterValue::Single("x".into()));

        let result = apply_filters(&rows, &descriptors(), &values);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn empty_values_clear_their_entry() {
        let mut values = FilterValues::new();
        values.set("gender", FilterValue::Single("female".into()));
        values.set("gender", FilterValue::Single(String::new()));

        assert!(values.is_empty());
    }
}
