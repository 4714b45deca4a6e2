use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use tracing::{error, info};
use crate::Result;
use super::ThreadPool;

/// a "pool" that is not actually a pool. It starts a new thread on every spawn request, so
/// the number of jobs running at once is unbounded
pub struct NaiveThreadPool {
    // counts spawned threads, used to give each thread a name
    spawned: AtomicU64,
}

impl ThreadPool for NaiveThreadPool {

    /// `threads` is ignored, every job gets its own thread
    fn new(_threads: u32) -> Result<Self> {
        Ok(NaiveThreadPool {
            spawned: AtomicU64::new(0),
        })
    }

    fn spawn<F>(&self, job: F) -> Result<()> where F: FnOnce() + Send + 'static {
        let n = self.spawned.fetch_add(1, Ordering::Relaxed);
        let name = format!("worker-{}", n);
        match thread::Builder::new().name(name.clone()).spawn(job) {
            Ok(_) => {
                info!("Thread {} started", name);
                Ok(())
            }
            Err(e) => {
                error!("failed to start thread {}: {}", name, e);
                Err(e.into())
            }
        }
    }
}
