//! ClickHouse HTTP client.
//!
//! This module provides the main `Client` type for running queries and
//! inserting row batches against a ClickHouse server's HTTP interface.

use std::pin::Pin;

use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Method, StatusCode, Url};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::parser::TsvDecoder;
use crate::request::{PreparedRequest, QuerySpec, prepare, prepare_insert};
use crate::types::Row;
use crate::value::Value;

/// A live stream of decoded rows.
pub type RowStream = Pin<Box<dyn Stream<Item = Result<Row>> + Send>>;

/// ClickHouse HTTP client.
///
/// # Example
///
/// ```ignore
/// use clickhouse_stream::{Client, ClientConfig};
/// use futures::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new(ClientConfig::default())?;
///
///     let mut rows = client.query_stream("SELECT number FROM system.numbers LIMIT 10")?;
///     while let Some(row) = rows.next().await {
///         println!("{:?}", row?.get_u64("number"));
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    host: Url,
    debug: bool,
}

impl Client {
    /// Create a new client.
    ///
    /// Returns `Error::InvalidUrl` if `{url}:{port}` is not a valid URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a new client with a custom reqwest client.
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Result<Self> {
        let host_str = config.host();
        let host = Url::parse(&host_str)
            .map_err(|e| Error::InvalidUrl(format!("'{}': {}", host_str, e)))?;

        Ok(Self {
            http,
            host,
            debug: config.debug,
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &Url {
        &self.host
    }

    /// Build the URL and body that `spec` would be sent as.
    pub fn prepare(&self, spec: &QuerySpec) -> Result<PreparedRequest> {
        let request = prepare(&self.host, spec)?;
        if self.debug {
            tracing::debug!(url = %request.url, body_len = request.body.len(), "prepared request");
        }
        Ok(request)
    }

    async fn send(&self, request: PreparedRequest) -> Result<reqwest::Response> {
        let response = self
            .http
            .request(Method::POST, request.url)
            .header("Content-Type", "text/plain")
            .body(request.body)
            .send()
            .await?;
        Ok(response)
    }

    /// Send `spec` and return the raw response body.
    ///
    /// Useful for statements that do not produce a tabular result, such as
    /// `CREATE TABLE` or `INSERT ... VALUES`.
    pub async fn execute(&self, spec: impl Into<QuerySpec>) -> Result<String> {
        let request = self.prepare(&spec.into())?;
        let response = self.send(request).await?;
        let body = read_success(response).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Run a query and collect all rows into a Vec.
    ///
    /// **Warning**: This loads all results into memory. For large result sets,
    /// use `query_stream()` instead to process rows one at a time.
    pub async fn query(&self, spec: impl Into<QuerySpec>) -> Result<Vec<Row>> {
        let request = self.prepare(&spec.into())?;
        let response = self.send(request).await?;
        let body = read_success(response).await?;
        if self.debug {
            tracing::debug!(bytes = body.len(), "received response");
        }
        Ok(TsvDecoder::with_debug(self.debug).decode_all(&body))
    }

    /// Run a query and return its rows as a live stream.
    ///
    /// The stream is returned immediately; the request is sent when it is
    /// first polled. Rows are yielded as soon as their line is complete. A
    /// non-200 response yields one `Error::Server` carrying the response body
    /// and ends the stream.
    ///
    /// An empty query is rejected here, before any request is made.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::StreamExt;
    ///
    /// let mut stream = client.query_stream("SELECT * FROM hits")?;
    ///
    /// let mut count = 0;
    /// while let Some(result) = stream.next().await {
    ///     let row = result?;
    ///     count += 1;
    /// }
    /// println!("Processed {} rows", count);
    /// ```
    pub fn query_stream(&self, spec: impl Into<QuerySpec>) -> Result<RowStream> {
        let request = self.prepare(&spec.into())?;
        let client = self.clone();

        let s = stream! {
            let response = match client.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            if response.status() != StatusCode::OK {
                yield Err(server_error(response).await);
                return;
            }

            let decoder = TsvDecoder::with_debug(client.debug);
            let mut rows = Box::pin(decoder.into_stream(response.bytes_stream()));
            while let Some(row) = rows.next().await {
                yield row;
            }
        };

        Ok(Box::pin(s))
    }

    /// Insert rows into `table` with a single request.
    ///
    /// Each row is a list of values in the table's column order. `Null`
    /// and `NaN` values are sent as `\N`. The table name is interpolated into the
    /// query verbatim and must come from a trusted source.
    ///
    /// Returns the server's acknowledgement body.
    pub async fn insert_many<R: AsRef<[Value]>>(&self, table: &str, rows: &[R]) -> Result<String> {
        let request = prepare_insert(&self.host, table, rows);
        if self.debug {
            tracing::debug!(table, rows = rows.len(), "inserting batch");
        }

        let response = self.send(request).await?;
        let body = read_success(response).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Read the full body of a 200 response, or turn any other status into an error.
async fn read_success(response: reqwest::Response) -> Result<Bytes> {
    if response.status() != StatusCode::OK {
        return Err(server_error(response).await);
    }
    Ok(response.bytes().await?)
}

/// Build an `Error::Server` from a non-200 response.
///
/// The message is the response body, or the status reason when the body is
/// empty or unreadable.
async fn server_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };
    Error::Server {
        status: status.as_u16(),
        message,
    }
}
