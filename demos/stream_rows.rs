//! Stream rows from a local ClickHouse server.
//!
//! Start one with: `docker run -d -p 8123:8123 clickhouse/clickhouse-server`
//!
//! Run with: `RUST_LOG=debug cargo run --example stream_rows`

use clickhouse_stream::{Client, ClientConfig, Value};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::new(ClientConfig::default().debug(true))?;

    client
        .execute("CREATE TABLE IF NOT EXISTS demo_visits (id UInt32, page Nullable(String)) ENGINE = Memory")
        .await?;
    let ack = client
        .insert_many(
            "demo_visits",
            &[
                vec![Value::from(1u32), Value::from("/home")],
                vec![Value::from(2u32), Value::Null],
            ],
        )
        .await?;
    println!("insert acknowledged: {:?}", ack);

    let mut stream = client.query_stream("SELECT id, page FROM demo_visits ORDER BY id")?;
    let mut count = 0;
    while let Some(row) = stream.next().await {
        let row = row?;
        println!("{:?} {:?}", row.get_u64("id"), row.get_str("page"));
        count += 1;
    }
    println!("streamed {} rows", count);

    client.execute("DROP TABLE demo_visits").await?;
    Ok(())
}
