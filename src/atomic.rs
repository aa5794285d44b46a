//! Atomic File Writes
//!
//! Output is written to a sibling temporary file and renamed onto the destination only after
//! every byte has been written and synced. Readers of the destination path therefore see either
//! the previous contents (or nothing) or one complete new file.
//!
//! Every write gets its own uniquely named temporary file (`<name>.<random>.tmp`), so concurrent
//! writers to the same destination never share one. They only race at the rename, and the
//! destination ends up holding the output of whichever renamed last.
//!
//! # Failure Behavior
//! If writing fails, the destination is left untouched and the error propagates. The temporary
//! file is kept on disk so the partial output can be inspected.

use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::error::{ExportError, Result};

/// Suffix of every temporary file
pub const TEMP_SUFFIX: &str = ".tmp";

/// Prefix of the temporary files used while writing `destination`
///
/// `out/report.csv` gives `report.csv.`, so exports of the same stem in different formats never
/// share temporary files.
#[must_use]
pub fn temp_prefix_for(destination: &Path) -> OsString {
    let mut prefix = destination.file_name().map_or_else(OsString::new, ToOwned::to_owned);
    prefix.push(".");
    prefix
}

/// Temporary files left next to `destination` by failed writes
pub fn leftover_temp_files(destination: &Path) -> Result<Vec<PathBuf>> {
    let dir = parent_dir(destination);
    let prefix = temp_prefix_for(destination);
    let prefix = prefix.to_string_lossy();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ExportError::io(dir, e)),
    };

    let mut leftovers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExportError::io(dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&*prefix) && name.ends_with(TEMP_SUFFIX) {
            leftovers.push(entry.path());
        }
    }
    leftovers.sort();
    Ok(leftovers)
}

/// Create the parent directory chain of `destination` if it is missing
pub fn ensure_parent_dir(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
        }
    }
    Ok(())
}

fn parent_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `destination` atomically
///
/// `write` receives a buffered writer over a fresh temporary file. When it returns `Ok`, the
/// buffer is flushed, the file is synced, and it is renamed onto `destination`.
pub fn write_atomic<F>(destination: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    if destination.file_name().is_none() {
        return Err(ExportError::invalid_input(format!(
            "Destination '{}' does not name a file",
            destination.display()
        )));
    }

    ensure_parent_dir(destination)?;

    let dir = parent_dir(destination);
    let mut temp = Builder::new()
        .prefix(&temp_prefix_for(destination))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| ExportError::io(dir, e))?;

    if let Err(err) = write_temp_file(&mut temp, write) {
        // Keep the partial output on disk instead of deleting it on drop
        let temp_file = match temp.into_temp_path().keep() {
            Ok(path) => path,
            Err(e) => e.path.to_path_buf(),
        };
        tracing::warn!(
            temp_file = %temp_file.display(),
            error = %err,
            "export failed, destination left unchanged"
        );
        return Err(err);
    }

    let temp_path = temp.path().to_path_buf();
    temp.persist(destination).map_err(|e| ExportError::io(destination, e.error))?;
    tracing::debug!(
        from = %temp_path.display(),
        to = %destination.display(),
        "renamed temporary file onto destination"
    );

    Ok(())
}

fn write_temp_file<F>(temp: &mut NamedTempFile, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let temp_path = temp.path().to_path_buf();
    let mut out = BufWriter::new(temp.as_file_mut());

    write(&mut out)?;

    let file = out.into_inner().map_err(|e| ExportError::io(&temp_path, e.into_error()))?;
    file.sync_all().map_err(|e| ExportError::io(&temp_path, e))?;
    Ok(())
}
