//! Export Output Types
//!
//! Every export returns an [`ExportSummary`] describing what was written. Summaries serialize
//! to JSON so embedding programs can report them directly.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with minimal quoting
    Csv,
    /// One JSON array per line, header line first
    Jsonl,
}

impl ExportFormat {
    /// Get the format name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Jsonl => "jsonl",
        }
    }

    /// Conventional file extension for the format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a completed export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Format that was written
    pub format: ExportFormat,

    /// Destination file
    pub destination: PathBuf,

    /// Number of data rows written (the header line is not counted)
    pub rows_written: usize,

    /// Column names written as the header
    pub columns: Vec<String>,
}

impl ExportSummary {
    /// Create a new summary
    pub fn new(
        format: ExportFormat,
        destination: impl Into<PathBuf>,
        rows_written: usize,
        columns: Vec<String>,
    ) -> Self {
        Self { format, destination: destination.into(), rows_written, columns }
    }
}
