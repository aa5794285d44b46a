//! CSV export of query result sets.
//!
//! The header record holds the column names; each data record holds one marshalled row.
//! Fields are quoted only when they contain the delimiter, the quote character, or a line break.
//! Records end with CRLF, as in RFC 4180.
//!
//! Rows are marshalled before they reach a [`RowWriter`], so custom writers receive field text
//! and never see raw [`CellValue`](crate::CellValue)s.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::atomic::write_atomic;
use crate::config::CsvOptions;
use crate::engine::{fetch_result_set, DatabaseConnection, ResultSet};
use crate::error::{ExportError, Result};
use crate::marshal::csv_fields;
use crate::output::{ExportFormat, ExportSummary};

/// Writes header and data records to an output stream
pub trait RowWriter {
    /// Write the header record
    fn write_header(&mut self, headers: &[String]) -> Result<()>;

    /// Write one data record of already marshalled fields
    fn write_row(&mut self, fields: &[Cow<'_, str>]) -> Result<()>;

    /// Flush buffered output; called once after the last row
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Strategy that creates a [`RowWriter`] over the temporary output file
///
/// Pass a custom factory to [`export_to_csv_with`] to change how records are formatted
/// without touching the atomic write.
pub trait RowWriterFactory {
    /// Create a writer borrowing `out` for the duration of the export
    fn create<'w>(&self, out: &'w mut dyn Write) -> Box<dyn RowWriter + 'w>;
}

/// Default CSV row writer factory: minimal quoting, CRLF record terminator
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRowWriterFactory {
    options: CsvOptions,
}

impl CsvRowWriterFactory {
    /// Create a factory with custom delimiter and quote options
    #[must_use]
    pub const fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Options used by writers from this factory
    #[must_use]
    pub const fn options(&self) -> &CsvOptions {
        &self.options
    }
}

impl RowWriterFactory for CsvRowWriterFactory {
    fn create<'w>(&self, out: &'w mut dyn Write) -> Box<dyn RowWriter + 'w> {
        let inner = WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(out);
        Box::new(CsvRowWriter { inner })
    }
}

/// CSV row writer backed by [`csv::Writer`]
pub struct CsvRowWriter<'w> {
    inner: csv::Writer<&'w mut dyn Write>,
}

impl RowWriter for CsvRowWriter<'_> {
    fn write_header(&mut self, headers: &[String]) -> Result<()> {
        self.inner.write_record(headers)?;
        Ok(())
    }

    fn write_row(&mut self, fields: &[Cow<'_, str>]) -> Result<()> {
        self.inner.write_record(fields.iter().map(|field| field.as_bytes()))?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.inner.flush().map_err(|e| ExportError::from(csv::Error::from(e)))
    }
}

/// Run `query` and write its result set to `destination` as CSV
pub fn export_to_csv<C>(conn: &C, query: &str, destination: impl AsRef<Path>) -> Result<ExportSummary>
where
    C: DatabaseConnection,
{
    export_to_csv_with(conn, query, destination, &CsvRowWriterFactory::default())
}

/// Run `query` and write its result set to `destination` with a custom row writer
pub fn export_to_csv_with<C>(
    conn: &C,
    query: &str,
    destination: impl AsRef<Path>,
    factory: &dyn RowWriterFactory,
) -> Result<ExportSummary>
where
    C: DatabaseConnection,
{
    let destination = destination.as_ref();
    let result = fetch_result_set(conn, query)?;

    tracing::info!(
        rows = result.len(),
        destination = %destination.display(),
        format = "csv",
        "writing result set"
    );
    write_csv(&result, destination, factory)?;

    Ok(ExportSummary::new(ExportFormat::Csv, destination, result.len(), result.headers))
}

/// Write an already fetched result set to `destination` as CSV, atomically
pub fn write_csv(result: &ResultSet, destination: &Path, factory: &dyn RowWriterFactory) -> Result<()> {
    write_atomic(destination, |out| {
        let mut writer = factory.create(out);
        writer.write_header(&result.headers)?;
        for row in &result.rows {
            writer.write_row(&csv_fields(row))?;
        }
        writer.finish()
    })
}
