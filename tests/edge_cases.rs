//! Edge Case Testing
//!
//! This module tests failure paths and boundary conditions:
//! - Writer failures midway through an export
//! - Driver errors reaching the caller intact
//! - Unicode, empty strings vs NULL, BLOBs
//! - Large result sets
//! - Concurrent exports to different and to shared destinations
//! - Export jobs loaded from a JSON file

#![cfg(feature = "sqlite")]

use database_exporter::atomic::leftover_temp_files;
use database_exporter::engine::sqlite;
use database_exporter::{
    export_to_csv, export_to_csv_with, export_to_jsonl, load_jobs, run_jobs, ExportError,
    ExportFormat, RowWriter, RowWriterFactory,
};
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use std::borrow::Cow;
use std::error::Error as _;
use std::io::Write;
use std::path::Path;

// ============================================================================
// Test Helpers
// ============================================================================

fn numbers_db(count: i64) -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
    conn.execute("CREATE TABLE numbers (n INTEGER, label TEXT)", []).unwrap();
    let mut stmt = conn.prepare("INSERT INTO numbers VALUES (?1, ?2)").unwrap();
    for n in 1..=count {
        stmt.execute(rusqlite::params![n, format!("row {n}")]).unwrap();
    }
    drop(stmt);
    conn
}

/// Row writer that fails after a fixed number of data rows
struct FailingWriterFactory {
    fail_after: usize,
}

struct FailingWriter<'w> {
    out: &'w mut dyn Write,
    written: usize,
    fail_after: usize,
}

impl RowWriterFactory for FailingWriterFactory {
    fn create<'w>(&self, out: &'w mut dyn Write) -> Box<dyn RowWriter + 'w> {
        Box::new(FailingWriter { out, written: 0, fail_after: self.fail_after })
    }
}

impl RowWriter for FailingWriter<'_> {
    fn write_header(&mut self, headers: &[String]) -> database_exporter::Result<()> {
        writeln!(self.out, "{}", headers.join("|")).map_err(|e| ExportError::io("test", e))
    }

    fn write_row(&mut self, fields: &[Cow<'_, str>]) -> database_exporter::Result<()> {
        if self.written == self.fail_after {
            return Err(ExportError::encoding("simulated failure"));
        }
        self.written += 1;
        writeln!(self.out, "{}", fields.join("|")).map_err(|e| ExportError::io("test", e))
    }

    fn finish(self: Box<Self>) -> database_exporter::Result<()> {
        Ok(())
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ============================================================================
// Atomicity Tests
// ============================================================================

#[test]
fn test_failure_mid_write_leaves_no_destination() {
    let conn = numbers_db(10);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("numbers.csv");

    let result = export_to_csv_with(
        &conn,
        "SELECT * FROM numbers",
        &destination,
        &FailingWriterFactory { fail_after: 5 },
    );

    assert!(matches!(result, Err(ExportError::Encoding(_))));
    assert!(!destination.exists(), "destination must not appear half-written");
    let leftovers = leftover_temp_files(&destination).unwrap();
    assert_eq!(leftovers.len(), 1, "temporary file is left for diagnosis");
    assert_eq!(read(&leftovers[0]), "n|label\n1|row 1\n2|row 2\n3|row 3\n4|row 4\n5|row 5\n");
}

#[test]
fn test_failure_mid_write_keeps_previous_contents() {
    let conn = numbers_db(10);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("numbers.csv");

    export_to_csv(&conn, "SELECT n FROM numbers WHERE n <= 2", &destination).unwrap();
    let before = read(&destination);

    let result = export_to_csv_with(
        &conn,
        "SELECT * FROM numbers",
        &destination,
        &FailingWriterFactory { fail_after: 3 },
    );

    assert!(result.is_err());
    assert_eq!(read(&destination), before);
    assert_eq!(before, "n\r\n1\r\n2\r\n");
}

#[test]
fn test_stale_temp_file_does_not_interfere() {
    let conn = numbers_db(2);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("numbers.csv");
    let stale = dir.path().join("numbers.csv.stale.tmp");
    std::fs::write(&stale, "garbage from an earlier crash\n").unwrap();

    export_to_csv(&conn, "SELECT n FROM numbers", &destination).unwrap();

    assert_eq!(read(&destination), "n\r\n1\r\n2\r\n");
    assert_eq!(leftover_temp_files(&destination).unwrap(), vec![stale]);
}

#[test]
fn test_destination_is_a_directory() {
    let conn = numbers_db(1);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("taken");
    std::fs::create_dir(&destination).unwrap();

    let err = export_to_csv(&conn, "SELECT n FROM numbers", &destination).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(destination.is_dir());
}

// ============================================================================
// Driver Error Tests
// ============================================================================

#[test]
fn test_driver_error_is_downcastable() {
    let conn = numbers_db(1);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("out.jsonl");

    let err = export_to_jsonl(&conn, "SELECT nope FROM numbers", &destination).unwrap_err();

    let source = err.source().expect("driver error keeps its source");
    assert!(source.downcast_ref::<rusqlite::Error>().is_some());
    assert!(!destination.exists());
    assert!(
        leftover_temp_files(&destination).unwrap().is_empty(),
        "query failures happen before any file is created"
    );
}

#[test]
fn test_closed_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = sqlite::open(&dir.path().join("absent.db"), true).unwrap_err();
    assert_eq!(err.error_code(), "CONNECTION_FAILED");
}

// ============================================================================
// Value Edge Cases
// ============================================================================

#[test]
fn test_unicode_and_empty_strings() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE t (id INTEGER, value TEXT);
         INSERT INTO t VALUES (1, 'héllo wörld 🚀'), (2, ''), (3, NULL);",
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("t.csv");
    export_to_csv(&conn, "SELECT * FROM t ORDER BY id", &csv_path).unwrap();
    // Empty string and NULL are indistinguishable in CSV
    assert_eq!(read(&csv_path), "id,value\r\n1,héllo wörld 🚀\r\n2,\r\n3,\r\n");

    let jsonl_path = dir.path().join("t.jsonl");
    export_to_jsonl(&conn, "SELECT * FROM t ORDER BY id", &jsonl_path).unwrap();
    assert_eq!(
        read(&jsonl_path),
        "[\"id\",\"value\"]\n[1,\"héllo wörld 🚀\"]\n[2,\"\"]\n[3,null]\n"
    );
}

#[test]
fn test_blob_is_base64() {
    let conn = Connection::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("blob.csv");

    export_to_csv(&conn, "SELECT x'DEADBEEF' AS data", &destination).unwrap();

    assert_eq!(read(&destination), "data\r\n3q2+7w==\r\n");
}

#[test]
fn test_large_result_set() {
    let conn = numbers_db(5000);
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("large.jsonl");

    let summary = export_to_jsonl(&conn, "SELECT * FROM numbers", &destination).unwrap();

    assert_eq!(summary.rows_written, 5000);
    assert_eq!(read(&destination).lines().count(), 5001);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[test]
fn test_concurrent_exports_to_different_paths() {
    let dir = tempfile::tempdir().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let destination = dir.path().join(format!("part-{i}.csv"));
            std::thread::spawn(move || {
                let conn = numbers_db(100);
                export_to_csv(&conn, "SELECT n FROM numbers", &destination).unwrap();
                destination
            })
        })
        .collect();

    for handle in handles {
        let destination = handle.join().unwrap();
        assert_eq!(read(&destination).lines().count(), 101);
    }
}

#[test]
fn test_concurrent_exports_to_same_destination() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("shared.csv");

    let expected = |prefix: &str, rows: i64| {
        let mut text = String::from("label\r\n");
        for n in 1..=rows {
            text.push_str(&format!("{prefix}{n}\r\n"));
        }
        text
    };
    let outputs = [expected("A", 5000), expected("B", 5000)];

    for _ in 0..10 {
        let handles: Vec<_> = ["A", "B"]
            .into_iter()
            .map(|prefix| {
                let destination = destination.clone();
                std::thread::spawn(move || {
                    let conn = numbers_db(5000);
                    let query = format!("SELECT '{prefix}' || n AS label FROM numbers ORDER BY n");
                    export_to_csv(&conn, &query, &destination)
                })
            })
            .collect();

        for handle in handles {
            let summary = handle.join().unwrap().expect("every concurrent export succeeds");
            assert_eq!(summary.rows_written, 5000);
        }

        let contents = read(&destination);
        assert!(
            outputs.contains(&contents),
            "destination must hold one complete output, got {} bytes",
            contents.len()
        );
    }

    assert!(leftover_temp_files(&destination).unwrap().is_empty());
}

// ============================================================================
// Job File Tests
// ============================================================================

#[test]
fn test_run_jobs_from_file() {
    let conn = numbers_db(3);
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("out").join("numbers.csv");
    let jsonl_path = dir.path().join("out").join("numbers.jsonl");

    let job_file = dir.path().join("jobs.json");
    let jobs = serde_json::json!({
        "jobs": [
            {"query": "SELECT n FROM numbers", "destination": csv_path, "format": "csv"},
            {"query": "SELECT n FROM numbers", "destination": jsonl_path, "format": "jsonl"}
        ]
    });
    std::fs::write(&job_file, jobs.to_string()).unwrap();

    let jobs = load_jobs(&job_file).unwrap();
    let summaries = run_jobs(&conn, &jobs).unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].format, ExportFormat::Csv);
    assert_eq!(summaries[1].format, ExportFormat::Jsonl);
    assert_eq!(read(&csv_path), "n\r\n1\r\n2\r\n3\r\n");
    assert_eq!(read(&jsonl_path), "[\"n\"]\n[1]\n[2]\n[3]\n");
}

#[test]
fn test_run_jobs_stops_at_first_failure() {
    let conn = numbers_db(1);
    let dir = tempfile::tempdir().unwrap();
    let jobs = vec![
        database_exporter::ExportJob::new("SELECT broken", dir.path().join("a.csv"), ExportFormat::Csv),
        database_exporter::ExportJob::new("SELECT n FROM numbers", dir.path().join("b.csv"), ExportFormat::Csv),
    ];

    assert!(run_jobs(&conn, &jobs).is_err());
    assert!(!dir.path().join("b.csv").exists());
}
