//! Database Driver Boundary
//!
//! This module defines the capabilities the exporter needs from a database driver.
//! Any driver adapter implements [`DatabaseConnection`] and [`Cursor`].
//!
//! # Contract
//! - `execute` runs the query once and returns a cursor
//! - the cursor describes its columns (the name is used as the header)
//! - `fetch_all` returns every row, fully materialized
//!
//! Transactions, retries, and connection lifecycle stay with the caller. Driver errors are
//! wrapped in [`ExportError::Driver`](crate::ExportError::Driver) without being altered.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::value::CellValue;

// Engine-specific adapters
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// One row of a result set, one value per column
pub type Row = Vec<CellValue>;

/// Column metadata exposed by a cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    /// Column name as reported by the driver
    pub name: String,

    /// Declared type (engine-specific), when the driver knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ColumnDescription {
    /// Create a description with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), type_name: None }
    }

    /// Create a description with a declared type
    pub fn with_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { name: name.into(), type_name: Some(type_name.into()) }
    }
}

/// Cursor over the results of an executed query
pub trait Cursor {
    /// Ordered column metadata
    fn description(&self) -> &[ColumnDescription];

    /// Fetch every remaining row
    fn fetch_all(&mut self) -> Result<Vec<Row>>;
}

/// Connection able to execute a query
pub trait DatabaseConnection {
    /// Cursor type, which may borrow from the connection
    type Cursor<'conn>: Cursor
    where
        Self: 'conn;

    /// Execute a query and return a cursor over its results
    fn execute<'conn>(&'conn self, query: &str) -> Result<Self::Cursor<'conn>>;
}

/// Fully materialized query result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Column names, one per value in each row
    pub headers: Vec<String>,

    /// Rows in driver order
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Build a result set, checking that every row has one value per header
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != headers.len()) {
            return Err(ExportError::invalid_input(format!(
                "Row {idx} has {} values but the result set has {} columns",
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result set has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Execute `query` once, fetch every row once, and derive headers from the cursor
pub fn fetch_result_set<C>(conn: &C, query: &str) -> Result<ResultSet>
where
    C: DatabaseConnection,
{
    tracing::debug!(query, "executing export query");

    let mut cursor = conn.execute(query)?;
    let rows = cursor.fetch_all()?;
    let headers = cursor.description().iter().map(|column| column.name.clone()).collect();

    ResultSet::new(headers, rows)
}
