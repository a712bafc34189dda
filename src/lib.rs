//! # clickhouse-stream
//!
//! Async client for the ClickHouse HTTP interface that decodes
//! `TabSeparatedWithNamesAndTypes` results row by row, without holding the
//! whole response in memory.
//!
//! ## Quick Start
//!
//! ```ignore
//! use clickhouse_stream::{Client, ClientConfig, Value};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::default())?;
//!
//!     client
//!         .execute("CREATE TABLE IF NOT EXISTS visits (id UInt32, page String) ENGINE = Memory")
//!         .await?;
//!     client
//!         .insert_many("visits", &[vec![Value::from(1u32), Value::from("/home")]])
//!         .await?;
//!
//!     // Buffered: all rows at once
//!     let rows = client.query("SELECT id, page FROM visits").await?;
//!     println!("{} rows", rows.len());
//!
//!     // Streaming: rows arrive as their lines complete
//!     let mut stream = client.query_stream("SELECT id, page FROM visits")?;
//!     while let Some(row) = stream.next().await {
//!         let row = row?;
//!         println!("{:?} {:?}", row.get_u64("id"), row.get_str("page"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding rules
//!
//! - Integer columns (`Int8`..`Int64`, `UInt8`..`UInt64`) decode to
//!   [`Value::Int`] / [`Value::UInt`]; text that is not a number decodes to
//!   [`Value::NaN`] instead of failing.
//! - Every other column type is passed through as [`Value::String`] in its
//!   escaped wire form: a tab arrives as `\t` and NULL as `\N`.
//! - A data line with fewer fields than columns gets [`Value::Null`] for the
//!   missing ones; extra fields are ignored.
//! - Text after the final newline of a response is not a complete row and is
//!   dropped.

pub mod cast;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod parser;
pub mod request;
pub mod types;
pub mod value;

// Re-export main types at crate root
pub use client::{Client, RowStream};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use request::{PreparedRequest, QuerySpec};
pub use types::{Column, Row, WireType};
pub use value::Value;

// Re-export decoder for advanced use cases
pub use cast::TypeCast;
pub use parser::{TsvDecoder, decode_stream, parse};
