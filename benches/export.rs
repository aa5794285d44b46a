//! Export Performance Benchmarks
//!
//! Benchmarks for full export runs against `SQLite`:
//! - CSV export of a medium result set
//! - JSON-Lines export of the same result set
//! - Marshalling of structured cells without file I/O

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use database_exporter::{export_to_csv, export_to_jsonl, marshal, CellValue, DefaultJsonEncoder, JsonEncoder};
use rusqlite::Connection;

fn sample_db(rows: i64) -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL, prefs TEXT)", [])
        .expect("Failed to create table");

    let mut stmt = conn
        .prepare("INSERT INTO users (name, score, prefs) VALUES (?1, ?2, ?3)")
        .expect("Failed to prepare insert");
    for i in 1..=rows {
        stmt.execute(rusqlite::params![format!("User {i}"), i as f64 / 3.0, r#"{"theme":"dark"}"#])
            .expect("Failed to insert");
    }
    drop(stmt);
    conn
}

fn bench_csv_export(c: &mut Criterion) {
    let conn = sample_db(1000);
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let destination = dir.path().join("users.csv");

    c.bench_function("sqlite_export_csv_1000", |b| {
        b.iter(|| {
            export_to_csv(black_box(&conn), black_box("SELECT * FROM users"), &destination)
                .expect("Export failed")
        });
    });
}

fn bench_jsonl_export(c: &mut Criterion) {
    let conn = sample_db(1000);
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let destination = dir.path().join("users.jsonl");

    c.bench_function("sqlite_export_jsonl_1000", |b| {
        b.iter(|| {
            export_to_jsonl(black_box(&conn), black_box("SELECT * FROM users"), &destination)
                .expect("Export failed")
        });
    });
}

fn bench_marshal_structured(c: &mut Criterion) {
    let row = vec![
        CellValue::Integer(1),
        CellValue::from(serde_json::json!({"a": [1, 2, 3], "b": {"c": "d"}})),
        CellValue::from(serde_json::json!(["x", "y", "z"])),
        CellValue::Bool(true),
    ];

    c.bench_function("marshal_csv_row", |b| b.iter(|| marshal::csv_fields(black_box(&row)).len()));
    c.bench_function("marshal_json_row", |b| {
        b.iter(|| DefaultJsonEncoder.encode_row(black_box(&row)).expect("Encoding failed"))
    });
}

criterion_group!(benches, bench_csv_export, bench_jsonl_export, bench_marshal_structured);
criterion_main!(benches);
