use crate::{ThreadPool, Result, FanoutError};
use tracing::{debug, error};
use rayon;

/// A thread pool that uses a work stealing strategy as implemented by the [`Rayon`] library.
/// At most `threads` jobs run at once; the rest wait in rayon's queues.
///
/// [`Rayon`]: https://docs.rs/rayon/latest/rayon/index.html
pub struct RayonThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {

    fn new(threads: u32) -> Result<Self> where Self: Sized {
        if threads == 0 {
            return Err(FanoutError::Config("a rayon pool needs at least one thread".to_string()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .thread_name(|i| format!("rayon-worker-{}", i))
            // without a handler a panicking job aborts the whole process
            .panic_handler(|_| error!("a job panicked on the rayon pool"))
            .build()
            .map_err(|e|
                FanoutError::Config(format!("could not build thread pool: {:?}", &e)))?;
        debug!("created rayon pool with {} threads", &threads);

        Ok(
            Self { pool }
        )
    }

    fn spawn<F>(&self, job: F) -> Result<()> where F: FnOnce() + Send + 'static {
        // `install` would run the job on the caller's schedule, `spawn` fires and forgets
        self.pool.spawn(job);
        Ok(())
    }
}
