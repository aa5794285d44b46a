//! Export Entry Points
//!
//! Both exporters share one pipeline:
//! execute query → fetch all rows and headers → marshal values → write atomically.
//!
//! Each format has a default entry point and a `_with` variant that accepts a strategy:
//! - [`export_to_csv_with`] takes a [`RowWriterFactory`] that controls how records are written
//! - [`export_to_jsonl_with`] takes a [`JsonEncoder`](crate::marshal::JsonEncoder) that controls how
//!   cells become JSON
//!
//! The `write_*` functions skip the query step for callers that already hold a [`ResultSet`](crate::ResultSet).

pub mod csv;
pub mod jsonl;

pub use self::csv::{
    export_to_csv, export_to_csv_with, write_csv, CsvRowWriter, CsvRowWriterFactory, RowWriter,
    RowWriterFactory,
};
pub use self::jsonl::{export_to_jsonl, export_to_jsonl_with, write_jsonl};
