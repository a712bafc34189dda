//! Integration tests for clickhouse-stream.
//!
//! These tests require a running ClickHouse instance.
//! Start one with: `docker run -d -p 8123:8123 clickhouse/clickhouse-server`
//!
//! Run tests with: `cargo test --test integration`

use clickhouse_stream::{Client, ClientConfig, Error, QuerySpec, Value};
use futures::StreamExt;
use std::time::Duration;

// Test configuration
const CLICKHOUSE_URL: &str = "http://localhost";
const CLICKHOUSE_PORT: u16 = 8123;

/// Helper to check if ClickHouse is available
async fn clickhouse_available() -> bool {
    let client = reqwest::Client::new();
    client
        .get(format!("{}:{}/ping", CLICKHOUSE_URL, CLICKHOUSE_PORT))
        .timeout(Duration::from_secs(2))
        .send()
        .await
        .map(|r| r.status().is_success())
        .unwrap_or(false)
}

fn client() -> Client {
    Client::new(ClientConfig::new(CLICKHOUSE_URL).port(CLICKHOUSE_PORT).debug(true)).unwrap()
}

/// Helper to (re)create a Memory table
async fn recreate_table(client: &Client, table: &str) {
    client
        .execute(format!("DROP TABLE IF EXISTS {}", table))
        .await
        .unwrap();
    client
        .execute(format!(
            "CREATE TABLE {} (id UInt32, name Nullable(String), day Date) ENGINE = Memory",
            table
        ))
        .await
        .unwrap();
}

/// Generate N rows for the test table
fn generate_rows(count: usize) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            vec![
                Value::from(i as u32),
                Value::from(format!("user\t{}", i % 10)),
                Value::from("2015-10-11"),
            ]
        })
        .collect()
}

// ============================================================================
// Basic Integration Tests
// ============================================================================

#[tokio::test]
async fn test_select_buffered() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let rows = client()
        .query("SELECT toUInt32(number) AS n, toString(number) AS s FROM system.numbers LIMIT 5")
        .await
        .unwrap();

    assert_eq!(rows.len(), 5);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["n", "s"]);
        assert_eq!(row.get("n"), Some(&Value::UInt(i as u64)));
        assert_eq!(row.get_str("s"), Some(i.to_string().as_str()));
    }
}

#[tokio::test]
async fn test_select_stream_large() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let mut stream = client()
        .query_stream("SELECT number, toInt64(number) - 1000 AS signed FROM system.numbers LIMIT 100000")
        .unwrap();

    let mut count = 0u64;
    while let Some(result) = stream.next().await {
        let row = result.expect("Failed to decode row");
        assert_eq!(row.get_u64("number"), Some(count));
        assert_eq!(row.get_i64("signed"), Some(count as i64 - 1000));
        count += 1;
    }

    assert_eq!(count, 100_000, "Expected 100000 rows, got {}", count);
}

#[tokio::test]
async fn test_empty_result() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let rows = client()
        .query("SELECT number FROM system.numbers LIMIT 0")
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_insert_many_and_read_back() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let client = client();
    recreate_table(&client, "cs_insert_many").await;

    let mut rows = generate_rows(50);
    rows.push(vec![Value::from(50u32), Value::Null, Value::from("2015-02-28")]);
    client.insert_many("cs_insert_many", &rows).await.unwrap();

    let read = client
        .query("SELECT id, name, day FROM cs_insert_many ORDER BY id")
        .await
        .unwrap();
    assert_eq!(read.len(), 51);
    assert_eq!(read[0].get_u64("id"), Some(0));
    // Strings come back in their escaped wire form.
    assert_eq!(read[3].get_str("name"), Some("user\\t3"));
    assert_eq!(read[50].get_str("name"), Some("\\N"));
    assert_eq!(read[50].get_str("day"), Some("2015-02-28"));
}

#[tokio::test]
async fn test_insert_with_query_body() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let client = client();
    recreate_table(&client, "cs_insert_body").await;

    let spec = QuerySpec::new("INSERT INTO cs_insert_body").with_body(vec![
        vec![Value::from(1u32), Value::from("a"), Value::from("2015-10-11")],
        vec![Value::from(2u32), Value::from("b"), Value::from("2015-10-12")],
    ]);
    client.execute(spec).await.unwrap();

    let rows = client
        .query("SELECT count() AS c FROM cs_insert_body")
        .await
        .unwrap();
    assert_eq!(rows[0].get_u64("c"), Some(2));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_invalid_query_buffered() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let result = client().query("SELECT * FROM table_that_does_not_exist").await;
    match result {
        Err(Error::Server { status, message }) => {
            assert_ne!(status, 200);
            assert!(!message.is_empty());
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_query_stream() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let mut stream = client()
        .query_stream("SELECT * FROM table_that_does_not_exist")
        .unwrap();

    assert!(matches!(stream.next().await, Some(Err(Error::Server { .. }))));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_insert_into_missing_table_fails() {
    if !clickhouse_available().await {
        eprintln!("Skipping test: ClickHouse not available");
        return;
    }

    let result = client()
        .insert_many("table_that_does_not_exist", &[vec![Value::from(1)]])
        .await;
    assert!(matches!(result, Err(Error::Server { .. })));
}
