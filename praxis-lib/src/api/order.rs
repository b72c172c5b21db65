//! Ordering types for list queries

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Specifies the server-side ordering of list results.
///
/// Multiple fields can be chained for secondary sorting. The wire format
/// is the comma-separated `ordering` parameter with a leading `-` marking
/// descending fields.
///
/// # Example
///
/// ```
/// use praxis_lib::api::OrderBy;
///
/// let order = OrderBy::desc("created_at").then_asc("name");
/// assert_eq!(order.to_query_param(), "-created_at,name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Renders the `ordering` query parameter value.
    pub fn to_query_param(&self) -> String {
        self.fields
            .iter()
            .map(|(field, direction)| match direction {
                Direction::Asc => field.clone(),
                Direction::Desc => format!("-{field}"),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
