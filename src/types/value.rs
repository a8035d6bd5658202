//! Scalar cell values and column data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cell in a column. `Absent` covers nulls and empties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Numeric view of the cell. Text cells are parsed on demand so that
    /// numeric columns delivered as strings still feed the kernels.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Stringified form used for fingerprint samples and pattern analysis.
    ///
    /// Floats that carry an integral value print without a fractional part
    /// so that int/float sources produce identical samples.
    pub fn display_string(&self) -> Option<String> {
        match self {
            CellValue::Absent => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::Float(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    Some(format!("{}", *v as i64))
                } else {
                    Some(v.to_string())
                }
            }
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Timestamp(ts) => Some(ts.to_rfc3339()),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

/// Column data type, declared by the caller or inferred from cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int,
    Float,
    Bool,
    Datetime,
    Text,
    Unknown,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int | DType::Float)
    }

    /// Wire-format name (used in the anchor key=value serialization).
    pub fn as_str(self) -> &'static str {
        match self {
            DType::Int => "int",
            DType::Float => "float",
            DType::Bool => "bool",
            DType::Datetime => "datetime",
            DType::Text => "text",
            DType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "int64" => Ok(DType::Int),
            "float" | "double" | "float64" | "number" => Ok(DType::Float),
            "bool" | "boolean" => Ok(DType::Bool),
            "datetime" | "date" | "timestamp" => Ok(DType::Datetime),
            "text" | "string" | "str" => Ok(DType::Text),
            "unknown" => Ok(DType::Unknown),
            other => Err(format!("unknown dtype: {other}")),
        }
    }
}
