//! Export Job Configuration
//!
//! Export jobs can be described in a JSON file and run against a connection in order.
//!
//! # Job File Format
//! ```json
//! {
//!   "jobs": [
//!     { "query": "SELECT * FROM users", "destination": "out/users.csv", "format": "csv" },
//!     { "query": "SELECT * FROM orders", "destination": "out/orders.jsonl", "format": "jsonl" }
//!   ]
//! }
//! ```
//!
//! `csv` options are optional and default to comma delimiting with double-quote quoting.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::DatabaseConnection;
use crate::error::{ExportError, Result};
use crate::export::{export_to_csv_with, export_to_jsonl, CsvRowWriterFactory};
use crate::output::{ExportFormat, ExportSummary};

/// Options for the default CSV row writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter (single ASCII character)
    #[serde(with = "ascii_char")]
    pub delimiter: u8,

    /// Quote character (single ASCII character)
    #[serde(with = "ascii_char")]
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',', quote: b'"' }
    }
}

/// A single export: which query to run and where to write it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJob {
    /// SQL query to run
    pub query: String,

    /// Output file path
    pub destination: PathBuf,

    /// Output format
    pub format: ExportFormat,

    /// CSV writer options (ignored for JSON-Lines)
    #[serde(default, skip_serializing_if = "is_default_csv")]
    pub csv: CsvOptions,
}

impl ExportJob {
    /// Create a job with default CSV options
    pub fn new(query: impl Into<String>, destination: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self { query: query.into(), destination: destination.into(), format, csv: CsvOptions::default() }
    }

    /// Check that the job can be run
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(ExportError::config_error("Export job has an empty query"));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(ExportError::config_error("Export job has an empty destination"));
        }
        if self.csv.delimiter == self.csv.quote {
            return Err(ExportError::config_error(
                "CSV delimiter and quote character must differ",
            ));
        }
        Ok(())
    }
}

/// Job file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFile {
    /// Jobs in the order they run
    pub jobs: Vec<ExportJob>,
}

fn is_default_csv(options: &CsvOptions) -> bool {
    *options == CsvOptions::default()
}

/// Load and validate export jobs from a JSON file
pub fn load_jobs(path: &Path) -> Result<Vec<ExportJob>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::config_error(format!("Failed to read job file {}: {e}", path.display()))
    })?;

    let file: JobFile = serde_json::from_str(&contents).map_err(|e| {
        ExportError::config_error(format!("Failed to parse job file {}: {e}", path.display()))
    })?;

    for (idx, job) in file.jobs.iter().enumerate() {
        job.validate().map_err(|e| {
            ExportError::config_error(format!("Job {idx} in {}: {}", path.display(), e.message()))
        })?;
    }

    Ok(file.jobs)
}

/// Run a single job against a connection
pub fn run_job<C: DatabaseConnection>(conn: &C, job: &ExportJob) -> Result<ExportSummary> {
    job.validate()?;

    match job.format {
        ExportFormat::Csv => {
            export_to_csv_with(conn, &job.query, &job.destination, &CsvRowWriterFactory::new(job.csv))
        }
        ExportFormat::Jsonl => export_to_jsonl(conn, &job.query, &job.destination),
    }
}

/// Run jobs in order, stopping at the first failure
pub fn run_jobs<C: DatabaseConnection>(conn: &C, jobs: &[ExportJob]) -> Result<Vec<ExportSummary>> {
    jobs.iter().map(|job| run_job(conn, job)).collect()
}

/// Serde helper: a `u8` written as a one-character string
mod ascii_char {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&char::from(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(D::Error::custom(format!("expected a single ASCII character, got {s:?}"))),
        }
    }
}
