use crate::{database::Row, error::{DashError, DashResult}};

/// A named, ordered collection of rows loaded from one source.
///
/// `columns` keeps the header in source order; every row carries exactly
/// those keys when the table comes from the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Self { name: name.to_string(), columns, rows: Vec::new() }
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`DashError::MissingColumn`] unless `column` is in the header.
    /// Empty tables pass: there is nothing to join against anyway.
    pub fn require_column(&self, column: &str) -> DashResult<()> {
        if self.is_empty() || self.has_column(column) {
            Ok(())
        } else {
            Err(DashError::MissingColumn { table: self.name.clone(), column: column.to_string() })
        }
    }
}
