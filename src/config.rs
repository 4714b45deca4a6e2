//! Explicit configuration for a batch run.
//!
//! Everything the runner needs to know is carried in a [`BatchConfig`]; there are no process wide
//! defaults. A config can be built in code, starting from [`BatchConfig::new`], or read from a JSON
//! file with [`BatchConfig::from_file`].
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{FanoutError, Result};

/// number of requests made by a batch when no count is given
pub const DEFAULT_COUNT: u32 = 10;

/// how long the collector waits for each result entry when no timeout is given
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// The kind of [`ThreadPool`](crate::ThreadPool) used to cap concurrency when a
/// `concurrency_limit` is set
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// one thread per request, the limit is ignored
    Naive,
    /// a fixed set of threads pulling requests off a shared queue
    #[default]
    Shared,
    /// a rayon work-stealing pool
    Rayon,
}

impl PoolKind {
    /// the names accepted by [`PoolKind::from_str`]
    pub const NAMES: [&'static str; 3] = ["naive", "shared", "rayon"];
}

impl FromStr for PoolKind {
    type Err = FanoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(PoolKind::Naive),
            "shared" => Ok(PoolKind::Shared),
            "rayon" => Ok(PoolKind::Rayon),
            other => Err(FanoutError::Parsing(format!("unknown pool kind: {}", other))),
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolKind::Naive => "naive",
            PoolKind::Shared => "shared",
            PoolKind::Rayon => "rayon",
        };
        write!(f, "{}", name)
    }
}

/// Describes one batch: where to send requests, how many, and how long to wait for them.
///
/// A config is created once per run and never mutated by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// the endpoint every request is sent to, e.g. `http://localhost:37337`
    pub target: String,

    /// number of requests in the batch
    pub count: u32,

    /// how long the collector waits for each result entry before giving up
    #[serde(with = "secs")]
    pub wait_timeout: Duration,

    /// maximum number of requests in flight at once, `None` means one thread per request
    pub concurrency_limit: Option<u32>,

    /// the pool used when `concurrency_limit` is set
    pub pool: PoolKind,

    /// timeout applied by the HTTP client to each request, `None` keeps the client's default
    #[serde(with = "opt_secs")]
    pub request_timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            target: String::new(),
            count: DEFAULT_COUNT,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            concurrency_limit: None,
            pool: PoolKind::default(),
            request_timeout: None,
        }
    }
}

impl BatchConfig {
    /// a config for `count` requests against `target`, everything else at its default
    pub fn new(target: impl Into<String>, count: u32) -> Self {
        BatchConfig {
            target: target.into(),
            count,
            ..BatchConfig::default()
        }
    }

    /// reads a config from the JSON file at `path`. Missing fields take their default values
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: BatchConfig = serde_json::from_str(&contents)?;
        debug!(?config, "loaded batch config from {:?}", path);
        config.validate()?;
        Ok(config)
    }

    /// sets the per-entry wait timeout
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// caps the number of requests in flight at `limit`, using the given `pool`
    pub fn with_concurrency_limit(mut self, limit: u32, pool: PoolKind) -> Self {
        self.concurrency_limit = Some(limit);
        self.pool = pool;
        self
    }

    /// sets the HTTP client's per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// checks the values that can't be expressed by the field types alone
    ///
    /// # Errors
    /// returns [`FanoutError::Config`] for a zero concurrency limit or a zero wait timeout
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == Some(0) {
            return Err(FanoutError::Config("concurrency limit must be at least 1".to_string()));
        }
        if self.wait_timeout.is_zero() {
            return Err(FanoutError::Config("wait timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// (de)serializes a [`Duration`] as a number of seconds
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        if secs.is_finite() && secs >= 0.0 {
            Ok(Duration::from_secs_f64(secs))
        } else {
            Err(serde::de::Error::custom(format!("invalid number of seconds: {}", secs)))
        }
    }
}

mod opt_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        match Option::<f64>::deserialize(d)? {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some(Duration::from_secs_f64(secs))),
            Some(secs) => Err(serde::de::Error::custom(format!("invalid number of seconds: {}", secs))),
            None => Ok(None),
        }
    }
}
