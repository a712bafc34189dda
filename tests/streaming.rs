//! Streaming decode tests.
//!
//! These feed `decode_stream` from in-memory chunk streams, so no server is
//! needed.
//!
//! Run tests with: `cargo test --test streaming`

use clickhouse_stream::{Error, Row, Value, decode_stream, parse};
use futures::StreamExt;
use futures::stream;

/// Build a `TabSeparatedWithNamesAndTypes` body with `count` rows.
fn generate_body(count: usize) -> String {
    let mut body = String::from("id\tname\tday\tscore\nUInt64\tString\tDate\tInt32\n");
    for i in 0..count {
        body.push_str(&format!(
            "{}\tuser{}\t2015-10-{:02}\t{}\n",
            i,
            i % 10,
            i % 28 + 1,
            i as i64 - 50
        ));
    }
    body
}

/// Split `body` into chunks of `size` bytes.
fn chunked(body: &str, size: usize) -> Vec<Result<Vec<u8>, Error>> {
    body.as_bytes()
        .chunks(size)
        .map(|c| Ok(c.to_vec()))
        .collect()
}

async fn collect(chunks: Vec<Result<Vec<u8>, Error>>) -> Vec<Result<Row, Error>> {
    decode_stream(stream::iter(chunks)).collect().await
}

// ============================================================================
// Chunking
// ============================================================================

#[tokio::test]
async fn test_stream_matches_buffered_for_any_chunk_size() {
    let body = generate_body(100);
    let expected = parse(body.as_bytes());
    assert_eq!(expected.len(), 100);

    for size in [1, 2, 3, 7, 16, 64, 1000, body.len()] {
        let rows: Vec<Row> = collect(chunked(&body, size))
            .await
            .into_iter()
            .map(|r| r.expect("decode should not fail"))
            .collect();
        assert_eq!(rows, expected, "chunk size {}", size);
    }
}

#[tokio::test]
async fn test_row_values_and_order() {
    let body = generate_body(3);
    let rows: Vec<Row> = collect(chunked(&body, 5))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["id", "name", "day", "score"]
        );
        assert_eq!(row.get("id"), Some(&Value::UInt(i as u64)));
        assert_eq!(row.get_str("name"), Some(format!("user{}", i).as_str()));
        assert_eq!(row.get("score"), Some(&Value::Int(i as i64 - 50)));
    }
}

#[tokio::test]
async fn test_empty_stream() {
    assert!(collect(Vec::new()).await.is_empty());
}

#[tokio::test]
async fn test_unterminated_trailing_row_is_dropped() {
    let chunks = vec![Ok(b"id\nUInt8\n1\n2".to_vec())];
    let rows = collect(chunks).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_ref().unwrap().get_u64("id"), Some(1));
}

// ============================================================================
// Incremental emission
// ============================================================================

#[tokio::test]
async fn test_rows_emitted_before_stream_ends() {
    let (tx, rx) = futures::channel::mpsc::unbounded::<Result<Vec<u8>, Error>>();
    let mut rows = Box::pin(decode_stream(rx));

    tx.unbounded_send(Ok(b"n\nInt64\n1\n2".to_vec())).unwrap();
    let first = rows.next().await.unwrap().unwrap();
    assert_eq!(first.get_i64("n"), Some(1));

    // "2" is still waiting for its newline.
    tx.unbounded_send(Ok(b"\n".to_vec())).unwrap();
    let second = rows.next().await.unwrap().unwrap();
    assert_eq!(second.get_i64("n"), Some(2));

    drop(tx);
    assert!(rows.next().await.is_none());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_chunk_error_ends_stream() {
    let chunks = vec![
        Ok(b"n\nInt64\n1\n".to_vec()),
        Err(Error::Io(std::io::Error::other("connection reset"))),
        Ok(b"2\n".to_vec()),
    ];
    let items = collect(chunks).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().get_i64("n"), Some(1));
    assert!(matches!(items[1], Err(Error::Io(_))));
}

#[tokio::test]
async fn test_io_errors_convert() {
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
        vec![Err(std::io::Error::other("broken pipe"))];
    let items: Vec<_> = decode_stream(stream::iter(chunks)).collect().await;
    assert!(matches!(items.as_slice(), [Err(Error::Io(_))]));
}

#[tokio::test]
async fn test_non_numeric_integer_is_nan_not_error() {
    let chunks = vec![Ok(b"n\tok\nInt64\tUInt8\nabc\t1\n".to_vec())];
    let items = collect(chunks).await;
    let row = items[0].as_ref().unwrap();
    assert!(row.get("n").unwrap().is_nan());
    assert_eq!(row.get_u64("ok"), Some(1));
}
