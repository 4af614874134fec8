#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![forbid(unsafe_code)]

//! Execution contexts for the [`accrue`] crate.
//!
//! An *execution context* is the narrow collaborator the asynchronous half
//! of `accrue` runs on: anything that can accept a boxed, zero-argument unit
//! of work and run it somewhere, sometime. Completion cells dispatch their
//! callbacks through this interface and never spawn threads themselves, so
//! swapping the context swaps the concurrency behavior of everything built
//! on top.
//!
//! Two implementations are provided:
//!
//! - [`ThreadPool`]: a fixed set of worker threads draining a shared queue —
//!   the ordinary production choice.
//! - [`CallingThread`]: runs every task inline on the thread that submitted
//!   it — fully deterministic, which is exactly what tests want.
//!
//! There is deliberately no process-wide default context. Code that needs
//! one takes an explicit [`SharedContext`] argument, so tests can always
//! inject a sequential executor.
//!
//! [`accrue`]: https://docs.rs/accrue

use std::sync::Arc;

mod calling_thread;
mod pool;

pub use self::{
    calling_thread::CallingThread,
    pool::{ThreadPool, ThreadPoolBuilder},
};

/// A boxed, zero-argument unit of work, ready to run anywhere.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A shared, dynamically-typed execution context.
///
/// This is the form in which contexts are passed around and stored: cheap to
/// clone, usable from any thread.
pub type SharedContext = Arc<dyn ExecutionContext>;

/// Something that can run a [`Task`] for later or asynchronous execution.
///
/// # Contract
///
/// - `execute` must not run the task *before* returning control flow
///   decisions to the implementation — inline execution (as
///   [`CallingThread`] does) is allowed, and callers must not rely on
///   `execute` returning before the task runs.
/// - A panic escaping a task must be contained by the implementation: it
///   must not take down a worker, and it must not prevent subsequently
///   submitted tasks from running. Both provided implementations catch and
///   log such panics.
/// - Every submitted task is run at most once. Implementations may discard
///   tasks submitted during their own teardown.
pub trait ExecutionContext: Send + Sync {
    /// Submits a task for execution.
    fn execute(&self, task: Task);
}

impl<C> ExecutionContext for Arc<C>
where
    C: ExecutionContext + ?Sized,
{
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::{assert_impl_all, assert_obj_safe};

    use super::*;

    assert_obj_safe!(ExecutionContext);
    assert_impl_all!(SharedContext: ExecutionContext, Send, Sync, Clone);
}
