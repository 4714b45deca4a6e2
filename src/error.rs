use std::time::Duration;
use thiserror::Error;

/// type alias for all operations in this crate that could fail with a [`FanoutError`]
pub type Result<T> = std::result::Result<T, FanoutError>;

/// The Error variants used throughout the crate.
/// It wraps any lower level errors from third party crates so they can be propagated with `?`
#[derive(Error, Debug)]
pub enum FanoutError {
    /// variant for errors caused from file or socket IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// variant for errors raised by the HTTP client (connect, timeout, body read...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// the target answered, but not with a success status
    #[error("target responded with status {status}")]
    Status {
        /// the HTTP status code that was returned
        status: u16,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    /// error while writing the literal (TOML) form of a book
    #[error("literal serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// error while reading the literal (TOML) form of a book
    #[error("literal parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// errors coming from the sled database that backs a shelf
    #[error("shelf error: {0}")]
    Sled(#[from] sled::Error),

    /// the collector gave up waiting for a result entry
    #[error("timed out after {waited:?} waiting for a result: received {received} of {expected}")]
    Timeout {
        /// number of entries that did arrive
        received: usize,
        /// number of entries the batch expected
        expected: usize,
        /// how long the collector waited for the missing entry
        waited: Duration,
    },

    /// every worker stopped (e.g. panicked) before all result entries arrived
    #[error("workers stopped before reporting: received {received} of {expected} results")]
    Incomplete {
        /// number of entries that did arrive
        received: usize,
        /// number of entries the batch expected
        expected: usize,
    },

    /// a job was handed to a pool that has no threads left to run it
    #[error("there are no threads left in the pool")]
    PoolClosed,

    /// invalid configuration values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// command line (or config file) values that could not be parsed
    #[error("parse error: {0}")]
    Parsing(String),
}
