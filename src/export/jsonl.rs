//! JSON-Lines export of query result sets.
//!
//! Every line is one JSON array: the first holds the column names, each following line holds
//! one row. Every line, including the last, ends with `\n`.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::atomic::write_atomic;
use crate::engine::{fetch_result_set, DatabaseConnection, ResultSet};
use crate::error::{ExportError, Result};
use crate::marshal::{DefaultJsonEncoder, JsonEncoder};
use crate::output::{ExportFormat, ExportSummary};

/// Run `query` and write its result set to `destination` as JSON-Lines
pub fn export_to_jsonl<C>(conn: &C, query: &str, destination: impl AsRef<Path>) -> Result<ExportSummary>
where
    C: DatabaseConnection,
{
    export_to_jsonl_with(conn, query, destination, &DefaultJsonEncoder)
}

/// Run `query` and write its result set to `destination` with a custom value encoder
pub fn export_to_jsonl_with<C>(
    conn: &C,
    query: &str,
    destination: impl AsRef<Path>,
    encoder: &dyn JsonEncoder,
) -> Result<ExportSummary>
where
    C: DatabaseConnection,
{
    let destination = destination.as_ref();
    let result = fetch_result_set(conn, query)?;

    tracing::info!(
        rows = result.len(),
        destination = %destination.display(),
        format = "jsonl",
        "writing result set"
    );
    write_jsonl(&result, destination, encoder)?;

    Ok(ExportSummary::new(ExportFormat::Jsonl, destination, result.len(), result.headers))
}

/// Write an already fetched result set to `destination` as JSON-Lines, atomically
pub fn write_jsonl(result: &ResultSet, destination: &Path, encoder: &dyn JsonEncoder) -> Result<()> {
    write_atomic(destination, |out| {
        let headers = Value::Array(result.headers.iter().cloned().map(Value::String).collect());
        write_line(out, &headers, destination)?;

        for row in &result.rows {
            write_line(out, &encoder.encode_row(row)?, destination)?;
        }
        Ok(())
    })
}

fn write_line(out: &mut dyn Write, value: &Value, destination: &Path) -> Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(|e| {
        if e.is_io() {
            ExportError::io(destination, e.into())
        } else {
            ExportError::encoding(format!("Failed to serialize row: {e}"))
        }
    })?;
    out.write_all(b"\n").map_err(|e| ExportError::io(destination, e))
}
