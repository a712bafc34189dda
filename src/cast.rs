//! Conversion of raw field text into values according to the declared column type.

use crate::types::WireType;
use crate::value::Value;

/// Maps a declared column type to the conversion applied to its fields.
///
/// Integer widths are parsed as base-10; everything else is passed through
/// as text. The table holds no state, so a single instance can be shared
/// freely between decoders.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeCast;

impl TypeCast {
    /// Create a new cast table.
    pub fn new() -> Self {
        Self
    }

    /// Convert `raw` according to `wire_type`.
    ///
    /// Integer text that does not parse yields [`Value::NaN`] rather than an
    /// error; callers must treat it as a possible failure value.
    pub fn cast(&self, wire_type: &WireType, raw: &str) -> Value {
        if wire_type.is_unsigned() {
            raw.parse::<u64>().map_or(Value::NaN, Value::UInt)
        } else if wire_type.is_signed() {
            raw.parse::<i64>().map_or(Value::NaN, Value::Int)
        } else {
            Value::String(raw.to_string())
        }
    }
}
