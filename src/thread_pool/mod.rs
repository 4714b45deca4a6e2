//! Thread pools that the runner (and the body server) dispatch their jobs onto.
//!
//! The pool decides how much concurrency a batch gets:
//! - [`NaiveThreadPool`] starts a thread for every job, so concurrency equals the number of jobs
//! - [`SharedQueueThreadPool`] and [`RayonThreadPool`] cap concurrency at the number of threads
//! they were built with, extra jobs wait in a queue
use crate::Result;

mod naive;
mod rayon_pool;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;

/// The basic functionality of a pool of threads that runs jobs
pub trait ThreadPool {
    /// Creates a new pool with the given number of `threads`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool could not be built, or if `threads` makes no sense for the
    /// pool implementation.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Runs `job` on the pool. This never blocks on the job itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the job could not be handed to a thread; the job is dropped unrun.
    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static;
}
