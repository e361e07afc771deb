//! Outbound data-center transport
//!
//! The router talks to the three backing nodes through this trait so tests
//! can substitute a double for the real HTTP client. Every call is attempted
//! exactly once; retries and backoff are deliberately absent.

use crate::common::{Error, Result};
use futures_util::future::BoxFuture;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Percent-encoding set for query parameters (space, &, ?, #, %, /)
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'&')
    .add(b'?')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'+')
    .add(b'=');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Client side of the legacy data-center protocol.
pub trait DataCenterTransport: Send + Sync {
    /// Store `value` under `key` on the node at `endpoint`.
    fn put<'a>(&'a self, endpoint: &'a str, key: &'a str, value: &'a str)
        -> BoxFuture<'a, Result<()>>;

    /// Fetch the value stored under `key` on the node at `endpoint`.
    fn get<'a>(&'a self, endpoint: &'a str, key: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// HTTP implementation speaking the data-center nodes' query-string API:
/// `GET {endpoint}/put?key=K&value=V` and `GET {endpoint}/get?key=K`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, endpoint: &str, url: String) -> Result<String> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        if !response.status().is_success() {
            return Err(Error::transport(
                endpoint,
                format!("status {}", response.status()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(endpoint, e))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCenterTransport for HttpTransport {
    fn put<'a>(
        &'a self,
        endpoint: &'a str,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let url = format!(
                "{}/put?key={}&value={}",
                endpoint,
                encode(key),
                encode(value)
            );
            self.fetch(endpoint, url).await?;
            Ok(())
        })
    }

    fn get<'a>(&'a self, endpoint: &'a str, key: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let url = format!("{}/get?key={}", endpoint, encode(key));
            self.fetch(endpoint, url).await
        })
    }
}
