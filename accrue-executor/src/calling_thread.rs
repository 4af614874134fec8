use crate::{ExecutionContext, Task, pool::run_isolated};

/// An execution context that runs every task inline, on the submitting
/// thread, before `execute` returns.
///
/// Task order is exactly submission order and nothing runs concurrently,
/// which makes this the context of choice for deterministic tests of
/// completion-cell code. Panics inside a task are contained and logged, the
/// same as on a [`ThreadPool`](crate::ThreadPool) worker, so a failing task
/// cannot skip the tasks submitted after it.
///
/// # Examples
///
/// ```
/// use std::sync::{
///     Arc,
///     atomic::{AtomicBool, Ordering},
/// };
///
/// use accrue_executor::{CallingThread, ExecutionContext};
///
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&ran);
/// CallingThread.execute(Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// // The task already ran: execution was inline.
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingThread;

impl ExecutionContext for CallingThread {
    fn execute(&self, task: Task) {
        run_isolated(task);
    }
}
