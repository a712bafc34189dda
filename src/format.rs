//! Serialization of rows into ClickHouse's `TabSeparated` text format.

use crate::value::Value;

/// Token ClickHouse reads as NULL in tab-separated input.
pub const NULL_SENTINEL: &str = "\\N";

/// Escape a string for use as a single tab-separated field.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out
}

/// Write one field. `Null` and `NaN` become the NULL sentinel and strings
/// are escaped.
fn write_field(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::NaN => out.push_str(NULL_SENTINEL),
        Value::String(s) => out.push_str(&escape(s)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Float(f) => out.push_str(&float_text(f.into_inner())),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::UInt(u) => out.push_str(&u.to_string()),
    }
}

/// Float text in the spelling ClickHouse parses (`nan`, `inf`, `-inf`).
fn float_text(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f == f64::INFINITY {
        "inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        f.to_string()
    }
}

/// Serialize rows as tab-separated fields, one row per line.
///
/// Rows are joined with `\n`; no trailing newline is written.
pub fn serialize_rows<R: AsRef<[Value]>>(rows: &[R]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for (j, value) in row.as_ref().iter().enumerate() {
            if j > 0 {
                out.push('\t');
            }
            write_field(&mut out, value);
        }
    }
    out
}
