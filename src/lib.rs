#![deny(missing_docs)]
//! Fires a batch of concurrent requests at a single target, collects every result and times the
//! whole batch. A handful of address-book persistence helpers live alongside it.
//!
//! This crate provides the [`BatchRunner`] itself, as well as a [`fanout`] client executable, a
//! [`fanout-server`] executable that acts as a local target, and an [`addrbook`] executable that
//! demonstrates the persistence formats.
//!
//! ## Fan-out
//! A batch is described by a [`BatchConfig`]: the target URL, how many requests to make, how long
//! to wait for each result, and optionally a cap on how many requests may be in flight at once.
//!
//! Running a batch is a single linear sequence:
//! - every request is dispatched onto a [`ThreadPool`] as its own job. Each job performs one
//!   blocking GET against the target (through a [`Fetch`] implementation), reads the whole body
//!   and sends an [`Outcome`] down a crossbeam channel
//! - once everything has been dispatched, the collector pulls one entry per request off the
//!   channel, waiting at most `wait_timeout` for each one
//! - the entries, in arrival order, and the elapsed wall clock time are returned as a
//!   [`BatchReport`]
//!
//! A failed request does not abort the batch, it shows up as an [`Outcome::Failure`] so the caller
//! can tell how many requests succeeded and why the others failed. If an entry never shows up,
//! the batch fails with [`FanoutError::Timeout`] rather than returning a short collection.
//!
//! ## Thread pools
//! - [`NaiveThreadPool`] starts a thread for every request; concurrency is unbounded
//! - [`SharedQueueThreadPool`] runs a fixed number of threads over a shared crossbeam job queue
//! - [`RayonThreadPool`] wraps a rayon work-stealing pool
//!
//! ## Address book persistence
//! An [`AddressBook`] is a list of [`Person`] records. It can be written and read back as JSON
//! ([`JsonFormat`]), as a literal TOML document ([`LiteralFormat`]), or onto a sled backed
//! key-value [`Shelf`] ([`ShelfFormat`]).
//!
//! [`fanout`]: ./bin/fanout.rs
//! [`fanout-server`]: ./bin/fanout-server.rs
//! [`addrbook`]: ./bin/addrbook.rs

pub use error::{Result, FanoutError};
pub use config::{BatchConfig, PoolKind, DEFAULT_COUNT, DEFAULT_WAIT_TIMEOUT};
pub use fetch::{Fetch, HttpFetcher};
pub use runner::{run_batch, BatchReport, BatchRunner, Outcome};
pub use server::BodyServer;
pub use thread_pool::{ThreadPool, NaiveThreadPool, SharedQueueThreadPool, RayonThreadPool};
pub use book::{AddressBook, BookFormat, FormatKind, JsonFormat, LiteralFormat, Person, Shelf, ShelfFormat};

pub mod book;
mod config;
mod error;
mod fetch;
mod runner;
mod server;
pub mod thread_pool;
