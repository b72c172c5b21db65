//! Per-entity table configuration
//!
//! Column sets, search columns and filter controls for each collection
//! the dashboard navigates. Everything below is configuration consumed by
//! the generic engine; the medical meaning lives here and nowhere else.

use praxis_lib::model::Entity;
use praxis_lib::model::Record;
use praxis_lib::table::ColumnDescriptor;
use praxis_lib::table::FilterDescriptor;
use praxis_lib::table::FilterOption;

/// The full table setup of one collection.
pub struct TableConfig {
    /// Columns in display order.
    pub columns: Vec<ColumnDescriptor<Record>>,
    /// Keys of the columns the free-text search scans.
    pub search_columns: Vec<&'static str>,
    /// The filter controls offered for this collection.
    pub filters: Vec<FilterDescriptor>,
}

/// Builds the table configuration for a collection.
pub fn table_config(entity: Entity) -> TableConfig {
    match entity {
        Entity::Patients | Entity::Adults | Entity::Pediatrics => patient_config(entity),
        Entity::Clinics => clinic_config(),
        _ => catalog_config(),
    }
}

fn patient_config(entity: Entity) -> TableConfig {
    let mut columns = vec![
        ColumnDescriptor::new("code", "Code").width(10),
        ColumnDescriptor::new("name", "Name").sortable().width(24),
        ColumnDescriptor::new("gender", "Gender").hideable().width(8),
        ColumnDescriptor::new("mobile_number", "Mobile").width(14),
        ColumnDescriptor::new("age", "Age").sortable().hideable().width(5),
        ColumnDescriptor::new("created_at", "Created").sortable().width(18),
    ];
    if entity == Entity::Adults {
        columns.insert(
            4,
            ColumnDescriptor::new("occupation", "Occupation").hideable().width(16),
        );
    }

    let mut filters = vec![FilterDescriptor::single_select(
        "gender",
        "Gender",
        vec![FilterOption::plain("male"), FilterOption::plain("female")],
    )];
    if entity == Entity::Adults {
        filters.push(FilterDescriptor::single_select(
            "marital_status",
            "Marital status",
            ["married", "single", "divorced", "widowed"]
                .into_iter()
                .map(FilterOption::plain)
                .collect(),
        ));
    }
    filters.push(FilterDescriptor::date_range("created_at", "Created"));

    TableConfig {
        columns,
        search_columns: vec!["name", "mobile_number", "occupation"],
        filters,
    }
}

fn clinic_config() -> TableConfig {
    TableConfig {
        columns: vec![
            ColumnDescriptor::new("name", "Name").sortable().width(28),
            ColumnDescriptor::new("address", "Address").hideable().width(32),
            ColumnDescriptor::new("created_on", "Created").sortable().width(18),
        ],
        search_columns: vec!["name"],
        filters: vec![FilterDescriptor::date_range("created_on", "Created")],
    }
}

/// Name-only catalogs: symptoms, family history, medical, cyanosis, drugs.
fn catalog_config() -> TableConfig {
    TableConfig {
        columns: vec![
            ColumnDescriptor::new("name", "Name").sortable().width(32),
            ColumnDescriptor::new("created_on", "Created").sortable().width(18),
        ],
        search_columns: vec!["name"],
        filters: Vec::new(),
    }
}
