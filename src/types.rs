//! Core types for ClickHouse tabular results.

use std::convert::Infallible;
use std::str::FromStr;

use crate::value::Value;

/// Column type as declared in the second header line of a
/// `TabSeparatedWithNamesAndTypes` response.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Date,
    String,
    /// Any other declared type; values are passed through as text.
    Other(std::string::String),
}

impl WireType {
    /// Returns true for the unsigned integer widths.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            WireType::UInt8 | WireType::UInt16 | WireType::UInt32 | WireType::UInt64
        )
    }

    /// Returns true for the signed integer widths.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            WireType::Int8 | WireType::Int16 | WireType::Int32 | WireType::Int64
        )
    }
}

impl FromStr for WireType {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(match input {
            "UInt8" => Self::UInt8,
            "UInt16" => Self::UInt16,
            "UInt32" => Self::UInt32,
            "UInt64" => Self::UInt64,
            "Int8" => Self::Int8,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "Date" => Self::Date,
            "String" => Self::String,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for WireType {
    fn from(input: &str) -> Self {
        match input.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WireType::UInt8 => "UInt8",
            WireType::UInt16 => "UInt16",
            WireType::UInt32 => "UInt32",
            WireType::UInt64 => "UInt64",
            WireType::Int8 => "Int8",
            WireType::Int16 => "Int16",
            WireType::Int32 => "Int32",
            WireType::Int64 => "Int64",
            WireType::Date => "Date",
            WireType::String => "String",
            WireType::Other(name) => name.as_str(),
        };
        write!(f, "{}", s)
    }
}

/// Name and declared type of one result column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared wire type.
    pub wire_type: WireType,
}

impl Column {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, wire_type: impl Into<WireType>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.into(),
        }
    }
}

/// Pair up the two header lines positionally.
///
/// Columns without a matching type entry are treated as `Other("")`, which
/// decodes as text.
pub fn columns_from_headers(names: &str, types: &str) -> Vec<Column> {
    let mut types = types.split('\t');
    names
        .split('\t')
        .map(|name| Column::new(name, types.next().unwrap_or_default()))
        .collect()
}

/// A single decoded row, keyed by column name in header order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    /// Column name to value mapping, in header order.
    pub values: Vec<(String, Value)>,
}

impl Row {
    /// Get a value by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Get value as string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Get value as i64.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_i64())
    }

    /// Get value as u64.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(|v| v.as_u64())
    }

    /// Column names in header order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
