//! `SQLite` Driver Adapter
//!
//! Implements [`DatabaseConnection`] directly for [`rusqlite::Connection`], so any open
//! connection can be handed to the exporters.
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver)
//! - Columns are described by name and declared type (`decltype`) when available
//! - BLOB data is Base64-encoded so it survives text output formats
//! - `SQLite` has no boolean type: booleans come back as `0`/`1` integers and are exported as is
//! - Driver errors are wrapped unchanged in [`ExportError::Driver`]

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row as SqliteRow, Statement};

use crate::engine::{ColumnDescription, Cursor, DatabaseConnection, Row};
use crate::error::{ExportError, Result};
use crate::value::CellValue;

const DRIVER: &str = "sqlite";

/// Open a `SQLite` database file with appropriate flags
///
/// `:memory:` opens a fresh in-memory database.
pub fn open(path: &Path, read_only: bool) -> Result<Connection> {
    let flags = if read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
    };

    Connection::open_with_flags(path, flags).map_err(|e| {
        ExportError::connection_failed(format!(
            "Failed to open SQLite database '{}': {e}",
            path.display()
        ))
    })
}

/// Cursor over a prepared `SQLite` statement
pub struct SqliteCursor<'conn> {
    stmt: Statement<'conn>,
    description: Vec<ColumnDescription>,
}

impl DatabaseConnection for Connection {
    type Cursor<'conn> = SqliteCursor<'conn>;

    fn execute<'conn>(&'conn self, query: &str) -> Result<SqliteCursor<'conn>> {
        let stmt = self.prepare(query).map_err(|e| ExportError::driver(DRIVER, e))?;

        let description = stmt
            .columns()
            .iter()
            .map(|column| match column.decl_type() {
                Some(decl_type) => ColumnDescription::with_type(column.name(), decl_type),
                None => ColumnDescription::new(column.name()),
            })
            .collect();

        Ok(SqliteCursor { stmt, description })
    }
}

impl Cursor for SqliteCursor<'_> {
    fn description(&self) -> &[ColumnDescription] {
        &self.description
    }

    fn fetch_all(&mut self) -> Result<Vec<Row>> {
        let column_count = self.description.len();
        let rows = self
            .stmt
            .query_map([], |row| row_to_cells(row, column_count))
            .map_err(|e| ExportError::driver(DRIVER, e))?;

        rows.collect::<std::result::Result<Vec<_>, _>>().map_err(|e| ExportError::driver(DRIVER, e))
    }
}

/// Convert a `SQLite` row to cells
fn row_to_cells(row: &SqliteRow, column_count: usize) -> rusqlite::Result<Row> {
    (0..column_count).map(|idx| sqlite_value_to_cell(row, idx)).collect()
}

/// Convert `SQLite` value to a cell
fn sqlite_value_to_cell(row: &SqliteRow, idx: usize) -> rusqlite::Result<CellValue> {
    let value_ref = row.get_ref(idx)?;

    Ok(match value_ref {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            CellValue::Text(text.to_string())
        }
        ValueRef::Blob(b) => {
            use base64::Engine;
            CellValue::Text(base64::engine::general_purpose::STANDARD.encode(b))
        }
    })
}
