//! Decoder for ClickHouse's `TabSeparatedWithNamesAndTypes` format.
//!
//! The response starts with two header lines (column names, then column
//! types), followed by one tab-separated line per row. Every line, including
//! the last, is terminated by `\n`.
//!
//! [`TsvDecoder`] is the incremental decoder: it is fed chunks as they arrive
//! and only emits rows whose terminating newline has been seen, so chunk
//! boundaries never need to line up with row boundaries. [`parse`] decodes a
//! complete body and [`decode_stream`] adapts a byte stream.

use std::sync::Arc;

use async_stream::stream;
use futures::{Stream, StreamExt};

use crate::cast::TypeCast;
use crate::error::{Error, Result};
use crate::types::{Column, Row, columns_from_headers};

/// Where the decoder is in the header sequence.
#[derive(Debug)]
enum HeaderState {
    /// Waiting for the column-name line.
    Names,
    /// Names seen, waiting for the column-type line.
    Types(String),
    /// Both header lines consumed.
    Done(Arc<[Column]>),
}

/// Incremental decoder state for one response.
///
/// Holds the bytes after the last newline seen so far and, once both header
/// lines have arrived, the column descriptors. The descriptors are built once
/// and never rebuilt for the rest of the stream.
///
/// # Example
///
/// ```
/// use clickhouse_stream::TsvDecoder;
///
/// let mut decoder = TsvDecoder::new();
/// assert!(decoder.feed(b"id\tname\nUInt8\tString\n1\ta").is_empty());
///
/// let rows = decoder.feed(b"lice\n");
/// assert_eq!(rows[0].get_str("name"), Some("alice"));
/// ```
#[derive(Debug)]
pub struct TsvDecoder {
    pending: Vec<u8>,
    header: HeaderState,
    cast: TypeCast,
    debug: bool,
}

impl Default for TsvDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TsvDecoder {
    /// Create a decoder with debug logging disabled.
    pub fn new() -> Self {
        Self::with_debug(false)
    }

    /// Create a decoder that logs captured columns, raw chunks and dropped
    /// trailing text when `debug` is set.
    pub fn with_debug(debug: bool) -> Self {
        Self {
            pending: Vec::new(),
            header: HeaderState::Names,
            cast: TypeCast::new(),
            debug,
        }
    }

    /// Column descriptors, once both header lines have been received.
    pub fn columns(&self) -> Option<&[Column]> {
        match &self.header {
            HeaderState::Done(columns) => Some(columns),
            _ => None,
        }
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append a chunk and return every row completed by it, in order.
    ///
    /// Returns an empty vector when the accumulated text still contains no
    /// newline.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Row> {
        if self.debug {
            tracing::trace!(raw = %String::from_utf8_lossy(chunk), "raw data");
        }

        // Pending bytes never hold a newline, so only the new chunk is searched.
        let Some(offset) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.pending.extend_from_slice(chunk);
            return Vec::new();
        };
        let last_newline = self.pending.len() + offset;
        self.pending.extend_from_slice(chunk);

        let remainder = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);
        // Drop the final '\n' so split yields exactly the terminated lines.
        let text = String::from_utf8_lossy(&complete[..last_newline]);

        let mut rows = Vec::new();
        for line in text.split('\n') {
            if let Some(row) = self.line(line) {
                rows.push(row);
            }
        }
        rows
    }

    /// End the stream.
    ///
    /// Text after the last newline is not a complete row and is dropped.
    pub fn finish(self) {
        if self.debug && !self.pending.is_empty() {
            tracing::debug!(
                bytes = self.pending.len(),
                "dropping unterminated trailing text at end of stream"
            );
        }
    }

    fn line(&mut self, line: &str) -> Option<Row> {
        match &self.header {
            HeaderState::Names => {
                self.header = HeaderState::Types(line.to_string());
                None
            }
            HeaderState::Types(names) => {
                let columns: Arc<[Column]> = columns_from_headers(names, line).into();
                if self.debug {
                    tracing::debug!(?columns, "captured column descriptors");
                }
                self.header = HeaderState::Done(columns);
                None
            }
            HeaderState::Done(columns) => Some(build_row(&self.cast, columns, line)),
        }
    }
}

/// Split one data line and convert each field by its column type.
///
/// Fields beyond the declared columns are ignored; missing fields become
/// [`Value::Null`](crate::Value::Null).
fn build_row(cast: &TypeCast, columns: &[Column], line: &str) -> Row {
    let mut fields = line.split('\t');
    let values = columns
        .iter()
        .map(|col| {
            let value = match fields.next() {
                Some(raw) => cast.cast(&col.wire_type, raw),
                None => crate::Value::Null,
            };
            (col.name.clone(), value)
        })
        .collect();
    Row { values }
}

/// Decode a complete `TabSeparatedWithNamesAndTypes` body.
///
/// Returns one row per data line. Empty input yields no rows.
pub fn parse(body: &[u8]) -> Vec<Row> {
    TsvDecoder::new().decode_all(body)
}

/// Decode a stream of response chunks into a stream of rows.
///
/// A chunk error is yielded once and ends the stream. Rows already decoded
/// from earlier chunks have been yielded by then.
pub fn decode_stream<S, B, E>(chunks: S) -> impl Stream<Item = Result<Row>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<Error> + Send,
{
    TsvDecoder::new().into_stream(chunks)
}

impl TsvDecoder {
    /// Decode a complete body with this decoder and finish it.
    pub fn decode_all(mut self, body: &[u8]) -> Vec<Row> {
        if body.is_empty() {
            return Vec::new();
        }
        let rows = self.feed(body);
        self.finish();
        rows
    }

    /// Drive this decoder from a stream of chunks. See [`decode_stream`].
    pub fn into_stream<S, B, E>(self, chunks: S) -> impl Stream<Item = Result<Row>> + Send
    where
        S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send,
        E: Into<Error> + Send,
    {
        let mut decoder = self;
        stream! {
            let mut chunks = Box::pin(chunks);

            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(bytes) => {
                        for row in decoder.feed(bytes.as_ref()) {
                            yield Ok(row);
                        }
                    }
                    Err(e) => {
                        let err: Error = e.into();
                        yield Err(err);
                        return;
                    }
                }
            }

            decoder.finish();
        }
    }
}
