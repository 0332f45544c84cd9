use crate::StoredRecord;

/// A filter on one top-level payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Name of the payload field.
    pub field: String,

    /// Accepted textual values (any of these).
    pub values: Vec<String>,
}

/// Builder for record queries within one key space.
///
/// Filters compare against the textual form of a top-level payload field,
/// so `field_eq("owner_id", user_id)` matches a record whose serialized
/// `owner_id` is that id. All filters must match.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Field filters, combined with AND.
    pub filters: Vec<FieldFilter>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,

    /// Number of records to skip.
    pub offset: Option<usize>,
}

impl RecordQuery {
    /// Creates a query matching every record of the kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a field to equal a value.
    pub fn field_eq(self, field: impl Into<String>, value: impl ToString) -> Self {
        self.field_in(field, [value])
    }

    /// Requires a field to equal any of the given values.
    ///
    /// An empty value list matches nothing.
    pub fn field_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.filters.push(FieldFilter {
            field: field.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips a number of results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if the row satisfies every filter.
    pub fn matches(&self, row: &StoredRecord) -> bool {
        self.filters.iter().all(|filter| {
            row.field_text(&filter.field)
                .is_some_and(|text| filter.values.iter().any(|v| *v == text))
        })
    }
}
