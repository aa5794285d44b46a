//! Database Exporter - Query Result Sets to Flat Files
//!
//! Runs a SQL query through any driver implementing [`DatabaseConnection`] and writes the
//! result set to a CSV or JSON-Lines file.
//!
//! # Core Principles
//! - One query execution and one fetch per export; results are held in memory
//! - Atomic writes: the destination is never observed half-written
//! - Driver errors reach the caller unchanged
//! - Formatting is pluggable through strategy traits with sensible defaults
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`value`] - Cell value kinds
//! - [`engine`] - Driver boundary traits and adapters
//! - [`marshal`] - Per-format value marshalling
//! - [`atomic`] - Write-to-temp-then-rename file writer
//! - [`export`] - CSV and JSON-Lines entry points
//! - [`output`] - Export formats and summaries
//! - [`config`] - Export jobs loaded from JSON
//!
//! # Example
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # fn main() -> database_exporter::Result<()> {
//! let conn = rusqlite::Connection::open_in_memory().expect("in-memory database");
//! let summary = database_exporter::export_to_csv(&conn, "SELECT 1 AS one", "out/one.csv")?;
//! assert_eq!(summary.rows_written, 1);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sqlite"))]
//! # fn main() {}
//! ```

pub mod atomic;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod marshal;
pub mod output;
pub mod value;

// Re-export commonly used types for convenience
pub use config::{load_jobs, run_job, run_jobs, CsvOptions, ExportJob, JobFile};
pub use engine::{fetch_result_set, ColumnDescription, Cursor, DatabaseConnection, ResultSet, Row};
pub use error::{ExportError, Result};
pub use export::{
    export_to_csv, export_to_csv_with, export_to_jsonl, export_to_jsonl_with, write_csv,
    write_jsonl, CsvRowWriterFactory, RowWriter, RowWriterFactory,
};
pub use marshal::{DefaultJsonEncoder, JsonEncoder};
pub use output::{ExportFormat, ExportSummary};
pub use value::{CellValue, Decimal};
