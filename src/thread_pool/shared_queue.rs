use std::thread;
use crossbeam::channel;
use crossbeam::channel::{Sender, Receiver};
use crate::{ThreadPool, Result, FanoutError};
use tracing::{error, debug, instrument};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool implemented with a shared job queue (i.e. channel).
///
/// This implementation uses the MPMC [`channel`] provided by the crossbeam crate as a single
/// producer, multiple consumer queue. The pool itself is the producer and its threads are the
/// consumers, so at most `threads` jobs run at once and the rest wait in the queue.
///
/// If a job panics, the thread running it is replaced by a new one.
/// Once the pool is dropped, the threads finish whatever is left in the queue and then exit.
///
/// [`channel`]: https://docs.rs/crossbeam/0.8.1/crossbeam/channel/index.html
pub struct SharedQueueThreadPool {
    /// the sending part of the job queue
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {

    /// create a new thread pool with the given number of `threads`.
    /// Every thread created will have a handle to the receiving end of the channel
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(FanoutError::Config("a shared queue pool needs at least one thread".to_string()));
        }
        let (tx, rx) = channel::unbounded::<Job>();
        for i in 0..threads {
            let task_rx = TaskReceiver(rx.clone());
            thread::Builder::new()
                .name(format!("queue-worker-{}", i))
                .spawn(move || run_tasks(task_rx))?;
        }
        debug!("created shared queue pool with {} threads", threads);
        Ok(SharedQueueThreadPool { tx })
    }

    /// Queues a job on the pool.
    ///
    /// # Errors
    /// returns [`FanoutError::PoolClosed`] if every pool thread has died, the job is dropped
    fn spawn<F>(&self, job: F) -> Result<()>
        where
            F: FnOnce() + Send + 'static,
    {
        self.tx.send(Box::new(job)).map_err(|_| {
            error!("there are no threads left in the pool, job dropped");
            FanoutError::PoolClosed
        })
    }
}

/// A type that can receive jobs from a channel and run them.
/// Additionally, this type is responsible for restarting any thread that panicked
#[derive(Clone, Debug)]
struct TaskReceiver(Receiver<Job>);

impl Drop for TaskReceiver {
    fn drop(&mut self) {
        if thread::panicking() {
            debug!("thread panicked, starting a new thread");
            let task_rx = self.clone();
            if let Err(e) = thread::Builder::new().spawn(move || run_tasks(task_rx)) {
                error!("Failed to spawn a thread: {}", e);
            }
        }
    }
}

/// waits for a job to arrive on the (wrapped) receiver and runs it, until the pool is gone
#[instrument(skip(rx))]
fn run_tasks(rx: TaskReceiver) {
    while let Ok(task) = rx.0.recv() {
        task();
    }
    debug!("thread exited because the thread pool was destroyed");
}
