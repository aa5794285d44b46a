//! Cell Value Types
//!
//! Every value fetched from a driver is represented as a [`CellValue`], a closed set of kinds
//! the exporters know how to marshal. Adding a kind forces every marshalling rule to be updated.
//!
//! # Kinds
//! - Scalars: `Null`, `Bool`, `Integer`, `Float`, `Text`
//! - Fixed-point: [`Decimal`], stored as `(mantissa, scale)`
//! - Structured: `Sequence` and `Mapping`, whose contents are plain JSON values

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{ExportError, Result};

/// A single cell of a result set row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating point number (may be non-finite)
    Float(f64),
    /// Exact fixed-point number
    Decimal(Decimal),
    /// Text value
    Text(String),
    /// Nested sequence (e.g. array or list column)
    Sequence(Vec<Value>),
    /// Nested mapping (e.g. struct, map, or JSON object column)
    Mapping(Map<String, Value>),
}

impl CellValue {
    /// Name of the value kind, used in error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Check if the value is SQL NULL
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Drivers that hand back JSON documents can map them straight into cells.
///
/// Unsigned integers beyond `i64::MAX` become a zero-scale [`Decimal`] so no digits are lost.
impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Decimal(Decimal::new(i128::from(u), 0))
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
        }
    }
}

/// Exact fixed-point number: `mantissa * 10^-scale`
///
/// `Decimal::new(1250, 2)` is `12.50`. The scale is preserved when printed, matching how
/// databases render `NUMERIC(p, s)` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

/// Largest scale accepted; `10^38` still fits in an `i128`
pub const MAX_DECIMAL_SCALE: u8 = 38;

impl Decimal {
    /// Create a decimal from its unscaled value and scale
    ///
    /// Scales above [`MAX_DECIMAL_SCALE`] are clamped.
    #[must_use]
    pub const fn new(mantissa: i128, scale: u8) -> Self {
        let scale = if scale > MAX_DECIMAL_SCALE { MAX_DECIMAL_SCALE } else { scale };
        Self { mantissa, scale }
    }

    /// Unscaled integer value
    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Number of digits after the decimal point
    #[must_use]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Nearest `f64`; digits beyond `f64` precision are lost
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        // Parsing the exact text gives a correctly rounded result, unlike dividing by 10^scale.
        self.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = usize::from(self.scale);

        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }

        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl FromStr for Decimal {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || ExportError::invalid_input(format!("'{s}' is not a decimal number"));

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let scale = u8::try_from(frac_part.len())
            .ok()
            .filter(|scale| *scale <= MAX_DECIMAL_SCALE)
            .ok_or_else(|| {
                ExportError::invalid_input(format!("'{s}' has more than {MAX_DECIMAL_SCALE} fractional digits"))
            })?;

        let magnitude = format!("{int_part}{frac_part}")
            .parse::<i128>()
            .map_err(|e| ExportError::invalid_input(format!("'{s}' does not fit a decimal: {e}")))?;

        Ok(Self::new(if negative { -magnitude } else { magnitude }, scale))
    }
}
