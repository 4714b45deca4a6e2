//! The fan-out request runner.
//!
//! A batch is a single linear sequence: dispatch every request onto a [`ThreadPool`], then
//! collect one [`Outcome`] per request from a shared channel, then report. There are no
//! intermediate states and no cancellation: when the collector gives up waiting, any request
//! still in flight keeps running, detached from the report.
use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::config::{BatchConfig, PoolKind};
use crate::fetch::{Fetch, HttpFetcher};
use crate::thread_pool::{NaiveThreadPool, RayonThreadPool, SharedQueueThreadPool, ThreadPool};
use crate::{FanoutError, Result};

/// The result of a single request, produced by exactly one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// the request succeeded, this is the full response body
    Success(Vec<u8>),
    /// the request failed, this describes why
    Failure(String),
}

impl Outcome {
    /// true if this is a [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// the response body, if the request succeeded
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Outcome::Success(body) => Some(body),
            Outcome::Failure(_) => None,
        }
    }

    /// the response body as (lossy) UTF-8 text, if the request succeeded
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.payload().map(String::from_utf8_lossy)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(body) => write!(f, "{}", String::from_utf8_lossy(body)),
            Outcome::Failure(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// What a completed batch hands back to the caller.
///
/// The order of `results` is the order entries arrived in, which is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// one entry per request
    pub results: Vec<Outcome>,
    /// wall clock time from just before the first dispatch to just after the last entry arrived
    pub elapsed: Duration,
}

impl BatchReport {
    /// number of entries collected
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// true if the batch had no requests
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// the bodies of every successful request
    pub fn successes(&self) -> impl Iterator<Item = &[u8]> {
        self.results.iter().filter_map(Outcome::payload)
    }

    /// the reasons of every failed request
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter_map(|o| match o {
            Outcome::Failure(reason) => Some(reason.as_str()),
            Outcome::Success(_) => None,
        })
    }

    /// number of successful requests
    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    /// number of failed requests
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Runs batches described by a [`BatchConfig`] using a [`Fetch`] implementation.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use fanout::{BatchConfig, BatchRunner, PoolKind};
/// # fn main() -> fanout::Result<()> {
/// let config = BatchConfig::new("http://localhost:37337", 10)
///     .with_wait_timeout(Duration::from_secs(2))
///     .with_concurrency_limit(4, PoolKind::Shared);
/// let runner = BatchRunner::http(config)?;
/// // let report = runner.run()?;
/// # Ok(())
/// # }
/// ```
pub struct BatchRunner<F: Fetch> {
    config: BatchConfig,
    fetcher: F,
}

impl BatchRunner<HttpFetcher> {
    /// a runner that makes real HTTP requests, configured from `config`
    pub fn http(config: BatchConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        BatchRunner::new(config, fetcher)
    }
}

impl<F: Fetch> BatchRunner<F> {
    /// Create a runner from a config and a fetcher.
    ///
    /// # Errors
    /// returns [`FanoutError::Config`] if the config is invalid
    pub fn new(config: BatchConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(BatchRunner { config, fetcher })
    }

    /// the config this runner was built with
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs one batch: fans out `count` requests, then collects exactly `count` entries.
    ///
    /// The pool is picked from the config: one thread per request when there is no concurrency
    /// limit, otherwise a pool of `limit` threads of the configured kind.
    ///
    /// # Errors
    /// - [`FanoutError::Timeout`] if an entry does not arrive within the wait timeout
    /// - [`FanoutError::Incomplete`] if every worker stopped before all entries arrived
    /// - any error from building the thread pool
    pub fn run(&self) -> Result<BatchReport> {
        match (self.config.concurrency_limit, self.config.pool) {
            (None, _) | (Some(_), PoolKind::Naive) => {
                self.run_on(NaiveThreadPool::new(self.config.count)?)
            }
            (Some(limit), PoolKind::Shared) => self.run_on(SharedQueueThreadPool::new(limit)?),
            (Some(limit), PoolKind::Rayon) => self.run_on(RayonThreadPool::new(limit)?),
        }
    }

    /// Runs one batch with every request dispatched onto `pool`, ignoring the config's
    /// concurrency limit and pool kind.
    ///
    /// A request the pool refuses to start is recorded as an [`Outcome::Failure`], so the batch
    /// still collects exactly `count` entries.
    ///
    /// # Errors
    /// same as [`BatchRunner::run`]
    pub fn run_on<P: ThreadPool>(&self, pool: P) -> Result<BatchReport> {
        let expected = self.config.count as usize;
        debug!(url = %self.config.target, expected, "starting batch");
        let start = Instant::now();
        if expected == 0 {
            return Ok(BatchReport {
                results: Vec::new(),
                elapsed: start.elapsed(),
            });
        }

        let (tx, rx) = channel::unbounded::<Outcome>();
        self.dispatch(pool, &tx);
        // only the workers hold senders now, so a disconnect means they are all gone
        drop(tx);

        let mut results = Vec::with_capacity(expected);
        while results.len() < expected {
            match rx.recv_timeout(self.config.wait_timeout) {
                Ok(outcome) => results.push(outcome),
                Err(RecvTimeoutError::Timeout) => {
                    warn!("gave up after receiving {} of {} results", results.len(), expected);
                    return Err(FanoutError::Timeout {
                        received: results.len(),
                        expected,
                        waited: self.config.wait_timeout,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(FanoutError::Incomplete {
                        received: results.len(),
                        expected,
                    });
                }
            }
        }
        let elapsed = start.elapsed();

        let report = BatchReport { results, elapsed };
        info!(
            "made {} requests in {:?}: {} succeeded, {} failed",
            expected,
            elapsed,
            report.success_count(),
            report.failure_count()
        );
        Ok(report)
    }

    /// spawns one job per request on `pool`. The pool is dropped on return, which lets the
    /// capped pools wind down once their queue is drained
    fn dispatch<P: ThreadPool>(&self, pool: P, tx: &Sender<Outcome>) {
        for _ in 0..self.config.count {
            let fetcher = self.fetcher.clone();
            let target = self.config.target.clone();
            let worker_tx = tx.clone();
            let spawned = pool.spawn(move || {
                let outcome = match fetcher.fetch(&target) {
                    Ok(body) => Outcome::Success(body),
                    Err(e) => {
                        debug!("request to {} failed: {}", target, e);
                        Outcome::Failure(e.to_string())
                    }
                };
                if worker_tx.send(outcome).is_err() {
                    debug!("collector is gone, result discarded");
                }
            });
            if let Err(e) = spawned {
                // the job never ran, report it in its place; the collector holds the receiver
                let _ = tx.send(Outcome::Failure(format!("could not start worker: {}", e)));
            }
        }
        debug!("dispatched {} requests", self.config.count);
    }
}

/// Makes `count` concurrent GET requests against `target` with every other setting at its
/// default, and returns the collected results along with the elapsed time.
pub fn run_batch(target: &str, count: u32) -> Result<BatchReport> {
    BatchRunner::http(BatchConfig::new(target, count))?.run()
}
