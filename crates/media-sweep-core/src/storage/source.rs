use crate::error::Error;

/// A text value read from the data store, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextValue {
    pub value: String,
    pub locator: String,
}

impl RawTextValue {
    pub fn new(value: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            locator: locator.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Row predicate. Filters on one query are AND'd together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Column is neither NULL nor the empty string.
    NotEmpty(String),
    /// Column contains at least one of the needles (case-insensitive substring).
    ContainsAny { column: String, needles: Vec<String> },
    /// Column matches at least one raw LIKE pattern.
    LikeAny { column: String, patterns: Vec<String> },
    /// Column equals one of the values. An empty list matches nothing.
    In { column: String, values: Vec<String> },
}

/// Single-column read from one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub table: String,
    pub column: String,
    pub filters: Vec<Filter>,
}

impl SourceQuery {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            filters: Vec::new(),
        }
    }

    pub fn for_column(column: &ColumnRef) -> Self {
        Self::new(column.table.clone(), column.column.clone())
    }

    pub fn not_empty(mut self) -> Self {
        self.filters.push(Filter::NotEmpty(self.column.clone()));
        self
    }

    pub fn contains_any(mut self, needles: &[&str]) -> Self {
        self.filters.push(Filter::ContainsAny {
            column: self.column.clone(),
            needles: needles.iter().map(|n| n.to_string()).collect(),
        });
        self
    }

    pub fn like_any(mut self, column: &str, patterns: &[&str]) -> Self {
        self.filters.push(Filter::LikeAny {
            column: column.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn in_values<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        self.filters.push(Filter::In {
            column: column.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        });
        self
    }
}

/// Read-only access to the application's data store.
pub trait TextSource {
    fn tables(&self) -> Result<Vec<String>, Error>;

    /// Columns of `table` that can hold text.
    fn text_columns(&self, table: &str) -> Result<Vec<ColumnRef>, Error>;

    /// Streams matching non-empty values one row at a time. Returns the number
    /// of values visited.
    fn stream(
        &self,
        query: &SourceQuery,
        visit: &mut dyn FnMut(RawTextValue),
    ) -> Result<usize, Error>;

    fn has_table(&self, table: &str) -> Result<bool, Error> {
        Ok(self.tables()?.iter().any(|t| t == table))
    }
}
