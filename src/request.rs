//! Shaping of outgoing query requests.
//!
//! ClickHouse accepts the query either as the POST body or as the `query`
//! URL parameter. When tabular data accompanies the query, the data is the
//! body and the query moves to the URL.

use reqwest::Url;

use crate::error::{Error, Result};
use crate::format::serialize_rows;
use crate::value::Value;

/// Output format for reads: header lines with names and types, then rows.
pub const FORMAT_WITH_NAMES_AND_TYPES: &str = "TabSeparatedWithNamesAndTypes";

/// Plain tab-separated format, used for inserted data.
pub const FORMAT_TAB_SEPARATED: &str = "TabSeparated";

const WRITE_PREFIXES: [&str; 5] = ["insert", "create", "drop", "alter", "use"];

/// A query, optionally with rows of data to send alongside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    /// Query text.
    pub query: String,
    /// Rows sent as the request body.
    pub body: Option<Vec<Vec<Value>>>,
}

impl QuerySpec {
    /// A query without a body.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            body: None,
        }
    }

    /// Attach rows to send as the request body.
    pub fn with_body(mut self, body: Vec<Vec<Value>>) -> Self {
        self.body = Some(body);
        self
    }
}

impl From<&str> for QuerySpec {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for QuerySpec {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

impl From<&String> for QuerySpec {
    fn from(query: &String) -> Self {
        Self::new(query.as_str())
    }
}

/// A request ready to be POSTed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Target URL, carrying the `query` parameter when the body holds data.
    pub url: Url,
    /// Text/plain request body.
    pub body: String,
}

impl PreparedRequest {
    /// The query text sent as the URL parameter, if any.
    pub fn query_param(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value.into_owned())
    }
}

/// Case-insensitive ASCII prefix match, ignoring leading whitespace.
fn starts_with_keyword(query: &str, keyword: &str) -> bool {
    query
        .trim_start()
        .get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

fn is_insert(query: &str) -> bool {
    starts_with_keyword(query, "insert")
}

fn is_write(query: &str) -> bool {
    WRITE_PREFIXES
        .iter()
        .any(|keyword| starts_with_keyword(query, keyword))
}

fn with_format(query: &str, format: &str) -> String {
    format!("{} FORMAT {}", query, format)
}

/// Build the URL and body for `spec` against `host`.
///
/// - query with body, `INSERT ...`: rows as body, `query FORMAT TabSeparated` in the URL
/// - query with body, anything else: rows as body,
///   `query FORMAT TabSeparatedWithNamesAndTypes` in the URL
/// - query alone, not a write: `query FORMAT TabSeparatedWithNamesAndTypes` as body
/// - query alone, `INSERT/CREATE/DROP/ALTER/USE`: query as body, unchanged
///
/// An empty query is rejected before anything is built.
pub fn prepare(host: &Url, spec: &QuerySpec) -> Result<PreparedRequest> {
    if spec.query.trim().is_empty() {
        return Err(Error::InvalidArgument("query must not be empty".to_string()));
    }

    let mut url = host.clone();
    let body = match &spec.body {
        Some(rows) => {
            let format = if is_insert(&spec.query) {
                FORMAT_TAB_SEPARATED
            } else {
                FORMAT_WITH_NAMES_AND_TYPES
            };
            url.query_pairs_mut()
                .append_pair("query", &with_format(&spec.query, format));
            serialize_rows(rows)
        }
        None if is_write(&spec.query) => spec.query.clone(),
        None => with_format(&spec.query, FORMAT_WITH_NAMES_AND_TYPES),
    };

    Ok(PreparedRequest { url, body })
}

/// Build the request for a batch insert into `table`.
///
/// The table name is interpolated verbatim; it is not escaped or quoted.
pub fn prepare_insert<R: AsRef<[Value]>>(host: &Url, table: &str, rows: &[R]) -> PreparedRequest {
    let mut url = host.clone();
    url.query_pairs_mut().append_pair(
        "query",
        &format!("INSERT INTO {} FORMAT {}", table, FORMAT_TAB_SEPARATED),
    );
    PreparedRequest {
        url,
        body: serialize_rows(rows),
    }
}
