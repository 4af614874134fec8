use std::{
    collections::VecDeque,
    io,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error};

use crate::{ExecutionContext, Task};

/// A fixed-size pool of worker threads draining a shared task queue.
///
/// Tasks run in submission order relative to queue removal, but on whichever
/// worker picks them up, so no cross-task ordering should be assumed. A
/// panic inside a task is caught and logged; the worker keeps serving.
///
/// Dropping the pool shuts it down gracefully: already-queued tasks are
/// drained, then every worker is joined. Tasks submitted through a
/// still-alive [`SharedContext`](crate::SharedContext) clone after that
/// point are discarded.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, mpsc};
///
/// use accrue_executor::{ExecutionContext, ThreadPool};
///
/// let pool = ThreadPool::builder().workers(2).build().unwrap();
/// let (tx, rx) = mpsc::channel();
///
/// for i in 0..4 {
///     let tx = tx.clone();
///     pool.execute(Box::new(move || tx.send(i * i).unwrap()));
/// }
///
/// let mut squares: Vec<i32> = rx.iter().take(4).collect();
/// squares.sort();
/// assert_eq!(squares, vec![0, 1, 4, 9]);
/// # drop(pool);
/// ```
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

/// Configuration for a [`ThreadPool`], created by [`ThreadPool::builder`].
#[derive(Debug, Clone)]
pub struct ThreadPoolBuilder {
    workers: usize,
    thread_name: String,
}

struct PoolShared {
    queue: Mutex<PoolQueue>,
    task_ready: Condvar,
}

struct PoolQueue {
    tasks: VecDeque<Task>,
    shutdown: bool,
}

impl ThreadPoolBuilder {
    fn new() -> Self {
        Self {
            workers: thread::available_parallelism().map(usize::from).unwrap_or(1),
            thread_name: "accrue-worker".to_owned(),
        }
    }

    /// Sets the number of worker threads. Zero is clamped to one.
    ///
    /// Defaults to the available parallelism of the host.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the name prefix for worker threads.
    ///
    /// Workers are named `{prefix}-{index}`. Defaults to `accrue-worker`.
    #[must_use]
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Spawns the workers and returns the running pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn a worker
    /// thread.
    pub fn build(self) -> io::Result<ThreadPool> {
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(PoolQueue {
                tasks: VecDeque::new(),
                shutdown: false,
            }),
            task_ready: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let shared = Arc::clone(&shared);
            let name = format!("{}-{index}", self.thread_name);
            let handle = thread::Builder::new()
                .name(name)
                .spawn(move || worker_loop(&shared))?;
            workers.push(handle);
        }

        debug!(workers = self.workers, "thread pool started");
        Ok(ThreadPool { shared, workers })
    }
}

impl ThreadPool {
    /// Starts configuring a new pool.
    pub fn builder() -> ThreadPoolBuilder {
        ThreadPoolBuilder::new()
    }

    /// Builds a pool with `workers` threads and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn a worker
    /// thread.
    pub fn new(workers: usize) -> io::Result<ThreadPool> {
        Self::builder().workers(workers).build()
    }
}

impl ExecutionContext for ThreadPool {
    fn execute(&self, task: Task) {
        let mut queue = self.shared.queue.lock();
        queue.tasks.push_back(task);
        drop(queue);
        self.shared.task_ready.notify_one();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        {
            let mut queue = self.shared.queue.lock();
            queue.shutdown = true;
        }
        self.shared.task_ready.notify_all();
        for handle in self.workers.drain(..) {
            // A worker that panicked outside a task has already been logged;
            // there is nothing further to do with the result.
            let _ = handle.join();
        }
        debug!("thread pool stopped");
    }
}

fn worker_loop(shared: &PoolShared) {
    debug!("worker started");
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break task;
                }
                if queue.shutdown {
                    debug!("worker stopping");
                    return;
                }
                shared.task_ready.wait(&mut queue);
            }
        };
        run_isolated(task);
    }
}

pub(crate) fn run_isolated(task: Task) {
    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
        error!("task panicked; the panic was contained");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    };

    use super::*;

    #[test]
    fn runs_all_submitted_tasks() {
        let pool = ThreadPool::new(3).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn survives_a_panicking_task() {
        let pool = ThreadPool::new(1).unwrap();
        let (tx, rx) = mpsc::channel();
        pool.execute(Box::new(|| panic!("deliberate")));
        pool.execute(Box::new(move || tx.send("still alive").unwrap()));
        assert_eq!(rx.recv().unwrap(), "still alive");
    }

    #[test]
    fn drop_drains_the_queue() {
        let pool = ThreadPool::new(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
