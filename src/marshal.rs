//! Value Marshalling
//!
//! Converts [`CellValue`]s into representations safe for each output format.
//!
//! # CSV
//! Booleans, sequences and mappings are replaced by their JSON text. Other kinds pass through
//! as plain text; the CSV writer applies its own quoting afterwards.
//!
//! # JSON-Lines
//! Cells are converted to [`serde_json::Value`] through a [`JsonEncoder`]. The default encoder
//! turns decimals into floats and rejects values JSON cannot represent.
//!
//! Marshalling is shallow: only the top-level kind of a cell is inspected. Nested mappings keep
//! the key order the driver produced.

use std::borrow::Cow;

use serde_json::{Number, Value};

use crate::error::{ExportError, Result};
use crate::value::CellValue;

/// Render a cell as CSV field text
#[must_use]
pub fn csv_field(value: &CellValue) -> Cow<'_, str> {
    match value {
        CellValue::Null => Cow::Borrowed(""),
        CellValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        CellValue::Integer(i) => Cow::Owned(i.to_string()),
        CellValue::Float(f) => Cow::Owned(float_text(*f)),
        CellValue::Decimal(d) => Cow::Owned(d.to_string()),
        CellValue::Text(s) => Cow::Borrowed(s.as_str()),
        CellValue::Sequence(items) => Cow::Owned(Value::Array(items.clone()).to_string()),
        CellValue::Mapping(map) => Cow::Owned(Value::Object(map.clone()).to_string()),
    }
}

/// Render a whole row as CSV field text
#[must_use]
pub fn csv_fields(row: &[CellValue]) -> Vec<Cow<'_, str>> {
    row.iter().map(csv_field).collect()
}

/// Shortest text that round-trips the float, in the same notation as JSON output
fn float_text(f: f64) -> String {
    Number::from_f64(f).map_or_else(|| f.to_string(), |n| n.to_string())
}

/// Strategy for converting cells into JSON values
///
/// Implement this to customize JSON-Lines output, e.g. to keep decimals as exact strings.
pub trait JsonEncoder {
    /// Encode a single cell
    ///
    /// Returns [`ExportError::Encoding`] when the value has no JSON representation.
    fn encode(&self, value: &CellValue) -> Result<Value>;

    /// Encode a full row as a JSON array
    fn encode_row(&self, row: &[CellValue]) -> Result<Value> {
        row.iter().map(|value| self.encode(value)).collect::<Result<Vec<_>>>().map(Value::Array)
    }
}

/// Default JSON encoder
///
/// Decimals become `f64`, accepting precision loss. Non-finite floats are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultJsonEncoder;

impl JsonEncoder for DefaultJsonEncoder {
    fn encode(&self, value: &CellValue) -> Result<Value> {
        Ok(match value {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Integer(i) => Value::Number((*i).into()),
            CellValue::Float(f) => finite_number(*f, value)?,
            CellValue::Decimal(d) => finite_number(d.to_f64(), value)?,
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Sequence(items) => Value::Array(items.clone()),
            CellValue::Mapping(map) => Value::Object(map.clone()),
        })
    }
}

fn finite_number(f: f64, value: &CellValue) -> Result<Value> {
    Number::from_f64(f).map(Value::Number).ok_or_else(|| {
        ExportError::encoding(format!(
            "{} value {f} is not representable in JSON",
            value.kind()
        ))
    })
}
