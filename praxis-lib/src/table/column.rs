//! Column descriptors

use std::sync::Arc;

use super::row::TableRow;

type RenderFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;
type SearchFn<R> = Arc<dyn Fn(&R, &str) -> bool + Send + Sync>;

/// Metadata and behavior for one table column.
///
/// The default cell rendering stringifies the row field named by the
/// column key; `render` overrides it. A column can also carry a custom
/// search predicate, used instead of the substring match when the column
/// is one of the engine's search columns.
///
/// # Example
///
/// ```
/// use praxis_lib::model::Record;
/// use praxis_lib::table::ColumnDescriptor;
///
/// let name: ColumnDescriptor<Record> = ColumnDescriptor::new("name", "Name")
///     .sortable()
///     .width(24);
///
/// let age: ColumnDescriptor<Record> = ColumnDescriptor::new("age", "Age")
///     .sortable()
///     .hideable()
///     .render(|r: &Record| {
///         r.get_i64("age").ok().flatten().map(|a| format!("{a} y")).unwrap_or_default()
///     });
/// ```
pub struct ColumnDescriptor<R> {
    key: String,
    label: String,
    sortable: bool,
    hideable: bool,
    width: u16,
    render: Option<RenderFn<R>>,
    search: Option<SearchFn<R>>,
}

impl<R: TableRow> ColumnDescriptor<R> {
    /// Creates a column over the row field named `key`.
    ///
    /// Columns start fixed (not hideable), unsorted and 16 cells wide.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            hideable: false,
            width: 16,
            render: None,
            search: None,
        }
    }

    /// Marks the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Allows the user to hide the column.
    pub fn hideable(mut self) -> Self {
        self.hideable = true;
        self
    }

    /// Sets the display width in cells.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Overrides the cell rendering.
    pub fn render(mut self, f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(f));
        self
    }

    /// Sets a custom search predicate for this column.
    pub fn search_with(mut self, f: impl Fn(&R, &str) -> bool + Send + Sync + 'static) -> Self {
        self.search = Some(Arc::new(f));
        self
    }

    /// The row field key this column displays.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The header label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if the user may sort by this column.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if the user may hide this column.
    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    /// The display width in cells.
    pub fn display_width(&self) -> u16 {
        self.width
    }

    /// Renders the cell for one row.
    pub fn cell(&self, row: &R) -> String {
        match &self.render {
            Some(render) => render(row),
            None => row.field_display(&self.key),
        }
    }

    /// Case-insensitive search match against this column.
    ///
    /// The query must already be trimmed and lowercased.
    pub(crate) fn search_matches(&self, row: &R, query: &str) -> bool {
        match &self.search {
            Some(predicate) => predicate(row, query),
            None => row.field_display(&self.key).to_lowercase().contains(query),
        }
    }
}

// Manual impl: the derive would demand `R: Clone`, which cloning the
// Arc-backed callbacks never needs.
impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            hideable: self.hideable,
            width: self.width,
            render: self.render.clone(),
            search: self.search.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("width", &self.width)
            .finish()
    }
}
