//! Data table engine
//!
//! The single source of truth for what a table shows. Every accessor
//! derives from one fixed pipeline:
//!
//! `rows → search → filters → sort → paginate`
//!
//! Sorting and pagination act on the already-filtered set, so counts and
//! page numbers always reflect filtered cardinality, never the raw row
//! count.

use std::collections::HashSet;

use uuid::Uuid;

use crate::api::Direction;

use super::column::ColumnDescriptor;
use super::filter::row_passes;
use super::filter::FilterDescriptor;
use super::filter::FilterValue;
use super::filter::FilterValues;
use super::row::TableRow;

/// The active sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// The column key being sorted by.
    pub column: String,
    /// The sort direction.
    pub direction: Direction,
}

/// Headless state engine for one table instance.
///
/// Created on mount with the table's column and filter configuration,
/// mutated by user interaction, discarded on unmount. Selection is
/// independent of pagination and survives page navigation; it is cleared
/// wholesale after a bulk action resolves, regardless of outcome.
///
/// # Example
///
/// ```
/// use praxis_lib::model::Record;
/// use praxis_lib::table::{ColumnDescriptor, TableEngine};
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Name").sortable(),
///     ColumnDescriptor::new("mobile_number", "Mobile"),
/// ];
/// let mut table: TableEngine<Record> = TableEngine::new(columns)
///     .with_search_columns(["name", "mobile_number"]);
///
/// table.set_search_text("blue");
/// let visible = table.visible_rows();
/// ```
pub struct TableEngine<R: TableRow> {
    rows: Vec<R>,
    columns: Vec<ColumnDescriptor<R>>,
    search_columns: Vec<String>,
    filter_descriptors: Vec<FilterDescriptor>,

    search_text: String,
    filters: FilterValues,
    sort: Option<Sort>,
    page_index: usize,
    page_size: usize,
    selection: HashSet<Uuid>,
    hidden_columns: HashSet<String>,
}

const DEFAULT_PAGE_SIZE: usize = 20;

impl<R: TableRow> TableEngine<R> {
    /// Creates an empty engine with the given column configuration.
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            search_columns: Vec::new(),
            filter_descriptors: Vec::new(),
            search_text: String::new(),
            filters: FilterValues::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            selection: HashSet::new(),
            hidden_columns: HashSet::new(),
        }
    }

    /// Sets the ordered set of search columns.
    pub fn with_search_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the filter configuration.
    pub fn with_filters(mut self, descriptors: Vec<FilterDescriptor>) -> Self {
        self.filter_descriptors = descriptors;
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Replaces the row set, e.g. after a refetch.
    ///
    /// View state survives; the page index is re-clamped against the new
    /// filtered count and selections of rows that vanished are pruned so
    /// no action can target an id the table no longer shows.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        let present: HashSet<Uuid> = self.rows.iter().map(TableRow::row_id).collect();
        self.selection.retain(|id| present.contains(id));
        self.clamp_page();
    }

    /// Returns the raw, unfiltered row set.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    // =========================================================================
    // Search and filters
    // =========================================================================

    /// Updates the free-text query.
    ///
    /// A row matches when any search column's rendering contains the
    /// trimmed text, case-insensitively. Empty text matches all rows.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page_index = 0;
        self.clamp_page();
    }

    /// Returns the current search text.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Replaces the filter value map.
    pub fn set_filters(&mut self, values: FilterValues) {
        self.filters = values;
        self.page_index = 0;
        self.clamp_page();
    }

    /// Updates a single filter value in place.
    pub fn set_filter(&mut self, id: impl Into<String>, value: FilterValue) {
        self.filters.set(id, value);
        self.page_index = 0;
        self.clamp_page();
    }

    /// Returns the current filter values.
    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    /// Returns the filter configuration.
    pub fn filter_descriptors(&self) -> &[FilterDescriptor] {
        &self.filter_descriptors
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sorts by the given column, toggling direction on repeat.
    ///
    /// The first sort on a column is ascending; sorting the same column
    /// again flips to descending and back. Once a sort is chosen there is
    /// no way back to "unsorted", matching how the toggle cycles. Keys
    /// that name no sortable column are ignored.
    pub fn sort_by(&mut self, column: &str) {
        if !self.is_sortable(column) {
            return;
        }
        self.sort = Some(match &self.sort {
            Some(sort) if sort.column == column => Sort {
                column: column.to_string(),
                direction: sort.direction.toggled(),
            },
            _ => Sort {
                column: column.to_string(),
                direction: Direction::Asc,
            },
        });
    }

    /// Sets an explicit sort key and direction.
    pub fn set_sort(&mut self, column: &str, direction: Direction) {
        if !self.is_sortable(column) {
            return;
        }
        self.sort = Some(Sort {
            column: column.to_string(),
            direction,
        });
    }

    /// Returns the active sort, if one has been chosen.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    fn is_sortable(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.key() == column && c.is_sortable())
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Moves to the given page, clamped to the valid range.
    pub fn set_page(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page();
    }

    /// Changes the page size and resets to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_index = 0;
    }

    /// The current page index (0-based).
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// The current page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of rows surviving search and filters.
    pub fn total_filtered(&self) -> usize {
        self.filtered_indices().len()
    }

    /// Number of pages of the filtered set; at least 1.
    pub fn page_count(&self) -> usize {
        self.total_filtered().div_ceil(self.page_size).max(1)
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles one row's membership in the selection.
    pub fn toggle_row_selection(&mut self, id: Uuid) {
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Selects or deselects every row on the current page.
    pub fn toggle_all_on_page(&mut self, selected: bool) {
        let page_ids: Vec<Uuid> = self.visible_rows().iter().map(|r| r.row_id()).collect();
        for id in page_ids {
            if selected {
                self.selection.insert(id);
            } else {
                self.selection.remove(&id);
            }
        }
    }

    /// Clears the whole selection.
    ///
    /// Called after any bulk action resolves, success or failure, so the
    /// same ids cannot be operated on twice.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.contains(&id)
    }

    /// Returns the selected ids in row order.
    pub fn selected_ids(&self) -> Vec<Uuid> {
        self.rows
            .iter()
            .map(TableRow::row_id)
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    /// Number of selected rows.
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    // =========================================================================
    // Column visibility
    // =========================================================================

    /// Shows or hides a column. Only hideable columns can be hidden.
    pub fn set_column_visibility(&mut self, key: &str, visible: bool) {
        let hideable = self
            .columns
            .iter()
            .any(|c| c.key() == key && c.is_hideable());
        if visible {
            self.hidden_columns.remove(key);
        } else if hideable {
            self.hidden_columns.insert(key.to_string());
        }
    }

    /// Returns `true` if the column is currently shown.
    pub fn is_column_visible(&self, key: &str) -> bool {
        !self.hidden_columns.contains(key)
    }

    /// All configured columns.
    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    /// The currently visible columns, in configuration order.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<R>> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(c.key()))
            .collect()
    }

    // =========================================================================
    // The pipeline
    // =========================================================================

    /// Indices of rows surviving search and filters, in row order.
    fn filtered_indices(&self) -> Vec<usize> {
        let query = self.search_text.trim().to_lowercase();

        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                query.is_empty() || {
                    self.search_columns.iter().any(|key| {
                        self.columns
                            .iter()
                            .find(|c| c.key() == key.as_str())
                            .map(|c| c.search_matches(row, &query))
                            .unwrap_or_else(|| {
                                row.field_display(key).to_lowercase().contains(&query)
                            })
                    })
                }
            })
            .filter(|(_, row)| row_passes(*row, &self.filter_descriptors, &self.filters))
            .map(|(i, _)| i)
            .collect()
    }

    /// The current page's row slice: search → filters → sort → paginate.
    pub fn visible_rows(&self) -> Vec<&R> {
        let mut indices = self.filtered_indices();

        if let Some(sort) = &self.sort {
            // Stable sort keeps row order for equal keys.
            indices.sort_by(|&a, &b| {
                let left = self.rows[a].field(&sort.column).unwrap_or(crate::model::Value::Null);
                let right = self.rows[b].field(&sort.column).unwrap_or(crate::model::Value::Null);
                let ordering = left.compare(&right);
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        indices
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .map(|i| &self.rows[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::model::Record;
    use crate::table::FilterDescriptor;
    use crate::table::FilterOption;
    use crate::table::FilterValue;
    use crate::table::FilterValues;

    use super::*;

    fn clinic(id: u128, name: &str) -> Record {
        Record::with_id("clinic", Uuid::from_u128(id)).set("name", name)
    }

    fn columns() -> Vec<ColumnDescriptor<Record>> {
        vec![
            ColumnDescriptor::new("name", "Name").sortable(),
            ColumnDescriptor::new("gender", "Gender").hideable(),
        ]
    }

    fn engine_with(rows: Vec<Record>) -> TableEngine<Record> {
        let mut engine = TableEngine::new(columns()).with_search_columns(["name"]);
        engine.set_rows(rows);
        engine
    }

    #[test]
    fn empty_rows_produce_empty_window() {
        let engine = engine_with(Vec::new());
        assert!(engine.visible_rows().is_empty());
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn search_matches_designated_columns_case_insensitively() {
        let mut engine = engine_with(vec![
            clinic(1, "Blue Clinic"),
            clinic(2, "Red Clinic"),
        ]);

        engine.set_search_text("blue");

        let visible = engine.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].get_string("name").unwrap(), Some("Blue Clinic"));
    }

    #[test]
    fn empty_search_is_a_no_op_stage() {
        let mut engine = engine_with(vec![clinic(1, "A"), clinic(2, "B")]);
        engine.set_search_text("   ");
        assert_eq!(engine.visible_rows().len(), 2);
    }

    #[test]
    fn sort_toggle_cycles_asc_then_desc_never_unsorted() {
        let mut engine = engine_with(vec![
            clinic(1, "Cedar"),
            clinic(2, "Alder"),
            clinic(3, "Birch"),
        ]);

        engine.sort_by("name");
        assert_eq!(engine.sort().unwrap().direction, Direction::Asc);
        let names: Vec<_> = engine
            .visible_rows()
            .iter()
            .map(|r| r.field_display("name"))
            .collect();
        assert_eq!(names, ["Alder", "Birch", "Cedar"]);

        engine.sort_by("name");
        assert_eq!(engine.sort().unwrap().direction, Direction::Desc);
        let names: Vec<_> = engine
            .visible_rows()
            .iter()
            .map(|r| r.field_display("name"))
            .collect();
        assert_eq!(names, ["Cedar", "Birch", "Alder"]);

        engine.sort_by("name");
        assert!(engine.sort().is_some(), "sort never returns to none");
        assert_eq!(engine.sort().unwrap().direction, Direction::Asc);
    }

    #[test]
    fn unsortable_columns_are_ignored() {
        let mut engine = engine_with(vec![clinic(1, "A")]);
        engine.sort_by("gender");
        assert!(engine.sort().is_none());
    }

    #[test]
    fn page_index_is_clamped_and_page_size_resets_it() {
        let rows: Vec<Record> = (1..=45)
            .map(|i| clinic(i, &format!("Clinic {i:02}")))
            .collect();
        let mut engine = engine_with(rows);

        assert_eq!(engine.page_count(), 3);

        engine.set_page(99);
        assert_eq!(engine.page_index(), 2);
        assert_eq!(engine.visible_rows().len(), 5);

        engine.set_page_size(10);
        assert_eq!(engine.page_index(), 0);
        assert_eq!(engine.page_count(), 5);
    }

    #[test]
    fn page_count_reflects_filtered_cardinality() {
        let mut rows: Vec<Record> = (1..=30)
            .map(|i| clinic(i, &format!("Blue {i:02}")))
            .collect();
        rows.extend((31..=60).map(|i| clinic(i, &format!("Red {i:02}"))));
        let mut engine = engine_with(rows);

        assert_eq!(engine.page_count(), 3);

        engine.set_search_text("blue");
        assert_eq!(engine.total_filtered(), 30);
        assert_eq!(engine.page_count(), 2);
        assert_eq!(
            engine.page_count(),
            engine.total_filtered().div_ceil(engine.page_size())
        );
    }

    #[test]
    fn selection_survives_page_navigation() {
        let rows: Vec<Record> = (1..=45)
            .map(|i| clinic(i, &format!("Clinic {i:02}")))
            .collect();
        let mut engine = engine_with(rows);

        let id = Uuid::from_u128(5);
        engine.toggle_row_selection(id);

        engine.set_page(1);
        engine.set_page(0);

        assert!(engine.is_selected(id));
    }

    #[test]
    fn toggle_all_on_page_only_touches_current_page() {
        let rows: Vec<Record> = (1..=45)
            .map(|i| clinic(i, &format!("Clinic {i:02}")))
            .collect();
        let mut engine = engine_with(rows);

        engine.toggle_all_on_page(true);
        assert_eq!(engine.selection_len(), 20);

        engine.set_page(1);
        assert_eq!(engine.selection_len(), 20, "page change keeps selection");

        engine.toggle_all_on_page(true);
        assert_eq!(engine.selection_len(), 40);

        engine.toggle_all_on_page(false);
        assert_eq!(engine.selection_len(), 20);
    }

    #[test]
    fn set_rows_prunes_selection_of_vanished_rows() {
        let mut engine = engine_with(vec![
            clinic(1, "A"),
            clinic(2, "B"),
            clinic(3, "C"),
        ]);
        engine.toggle_row_selection(Uuid::from_u128(1));
        engine.toggle_row_selection(Uuid::from_u128(3));

        // Refetch after "a" and "c" were bulk deleted.
        engine.set_rows(vec![clinic(2, "B")]);

        assert_eq!(engine.selection_len(), 0);
    }

    #[test]
    fn filters_feed_the_pipeline_before_sort_and_pagination() {
        let rows = vec![
            Record::with_id("patient", Uuid::from_u128(1))
                .set("name", "Zul")
                .set("gender", "male"),
            Record::with_id("patient", Uuid::from_u128(2))
                .set("name", "Ana")
                .set("gender", "female"),
            Record::with_id("patient", Uuid::from_u128(3))
                .set("name", "Mia")
                .set("gender", "female"),
        ];
        let mut engine = TableEngine::new(columns())
            .with_search_columns(["name"])
            .with_filters(vec![FilterDescriptor::single_select(
                "gender",
                "Gender",
                vec![FilterOption::plain("male"), FilterOption::plain("female")],
            )]);
        engine.set_rows(rows);

        let mut values = FilterValues::new();
        values.set("gender", FilterValue::Single("female".into()));
        engine.set_filters(values);
        engine.sort_by("name");

        let names: Vec<_> = engine
            .visible_rows()
            .iter()
            .map(|r| r.field_display("name"))
            .collect();
        assert_eq!(names, ["Ana", "Mia"]);
        assert_eq!(engine.total_filtered(), 2);
    }

    #[test]
    fn hidden_columns_are_dropped_from_visible_columns() {
        let mut engine = engine_with(vec![clinic(1, "A")]);

        engine.set_column_visibility("gender", false);
        let keys: Vec<_> = engine.visible_columns().iter().map(|c| c.key().to_string()).collect();
        assert_eq!(keys, ["name"]);

        // Fixed columns cannot be hidden.
        engine.set_column_visibility("name", false);
        assert!(engine.is_column_visible("name"));

        engine.set_column_visibility("gender", true);
        assert_eq!(engine.visible_columns().len(), 2);
    }
}
