//! The seam between the runner and the network.
//!
//! A [`Fetch`] performs exactly one blocking request against a target and hands back the full
//! response body. [`HttpFetcher`] does that with a blocking [`reqwest`] client.
//!
//! [`reqwest`]: https://docs.rs/reqwest/latest/reqwest/blocking/index.html
use reqwest::blocking::Client;
use tracing::debug;

use crate::{BatchConfig, FanoutError, Result};

/// Something that can perform a single blocking request against a target.
///
/// Every worker of a batch gets its own clone of the fetcher.
pub trait Fetch: Clone + Send + 'static {
    /// Performs one request against `target` and returns the full response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be made, the target did not answer with a
    /// success status, or the body could not be read.
    fn fetch(&self, target: &str) -> Result<Vec<u8>>;
}

/// Issues a plain `GET` (no custom headers, auth or body) for every fetch.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// builds a fetcher, applying the config's per-request timeout if it has one
    pub fn new(config: &BatchConfig) -> Result<Self> {
        // no idle connections are kept, every request opens (and closes) its own
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HttpFetcher {
            client: builder.build()?,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, target: &str) -> Result<Vec<u8>> {
        // the response owns the connection, it is released when dropped on any return path
        let response = self.client.get(target).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FanoutError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?;
        debug!("read {} bytes from {}", body.len(), target);
        Ok(body.to_vec())
    }
}
