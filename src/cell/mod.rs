//! A write-once completion cell carrying an [`Outcome`].
//!
//! A [`CompletionCell`] is the asynchronous counterpart of a plain
//! [`Outcome`]: a slot that starts empty, is completed with an outcome
//! exactly once, and notifies everyone who registered interest. It is a
//! single-shot coordination point, not a scheduler — all actual running of
//! work happens on an [`ExecutionContext`] supplied by the caller.
//!
//! # Lifecycle
//!
//! A cell is created empty, optionally starts a task via
//! [`spawn`](CompletionCell::spawn), and transitions at most once from
//! *pending* to *completed*. The first completion wins;
//! [`try_complete`](CompletionCell::try_complete) reports whether this call
//! was the winner, and [`complete`](CompletionCell::complete) turns a loss
//! into an [`AlreadyCompleted`] error. After the transition the stored
//! outcome never changes.
//!
//! Callbacks registered with [`on_complete`](CompletionCell::on_complete)
//! before completion are queued; the completing thread drains the queue
//! exactly once, in registration order, handing each callback to its
//! execution context as its own unit of work so a misbehaving callback
//! cannot block or skip the others. Callbacks registered after completion
//! are dispatched immediately.
//!
//! There is no cancellation: a spawned task always runs to its end and its
//! outcome (or converted panic) is stored. To abandon a result, drop the
//! handles; nothing is leaked beyond the bounded callback queue.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use accrue::{cell::CompletionCell, executor::ThreadPool, prelude::*};
//!
//! let pool: accrue::executor::SharedContext =
//!     std::sync::Arc::new(ThreadPool::new(2).unwrap());
//!
//! let cell: CompletionCell<i32, String> = CompletionCell::spawn(
//!     pool.clone(),
//!     |_| "the task panicked".to_string(),
//!     || Outcome::Good(6 * 7),
//! );
//!
//! let result = cell.get(Duration::from_secs(5)).unwrap();
//! assert_eq!(*result, Outcome::Good(42));
//! ```
//!
//! [`ExecutionContext`]: accrue_executor::ExecutionContext

use alloc::{boxed::Box, vec::Vec};
use core::{any::Any, fmt, mem, time::Duration};
use std::{
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use accrue_executor::SharedContext;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use triomphe::Arc;

use crate::Outcome;

pub mod accumulate;

/// The error of [`complete`](CompletionCell::complete) losing the
/// completion race: the cell already held an outcome.
///
/// Completing twice is a programming error on the caller's side; use
/// [`try_complete`](CompletionCell::try_complete) when racing completers is
/// expected and losing is fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the completion cell was already completed")]
pub struct AlreadyCompleted;

/// The error of a blocking [`get`](CompletionCell::get) running out of
/// patience.
///
/// Distinct from a completed [`Bad`](Outcome::Bad): the cell is still
/// pending, and the background computation — if any — keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the completion cell was still pending after {timeout:?}")]
pub struct WaitTimeout {
    /// How long the caller was prepared to wait.
    pub timeout: Duration,
}

type Callback<G, B> = Box<dyn FnOnce(&Outcome<G, B>) + Send>;

struct QueuedCallback<G, B> {
    callback: Callback<G, B>,
    /// The context the callback was registered with; rebinding a handle via
    /// [`CompletionCell::with_context`] does not retarget callbacks that
    /// were already queued.
    context: SharedContext,
}

enum State<G, B> {
    Pending(Vec<QueuedCallback<G, B>>),
    Completed(Arc<Outcome<G, B>>),
}

struct Shared<G, B> {
    state: Mutex<State<G, B>>,
    completed: Condvar,
}

/// A single-assignment slot for an [`Outcome`], shared between producers
/// and consumers.
///
/// Handles are cheap to clone and all point at the same underlying slot;
/// each handle additionally remembers the execution context on which
/// callbacks registered *through it* will be dispatched (see
/// [`with_context`](Self::with_context)).
pub struct CompletionCell<G, B> {
    shared: Arc<Shared<G, B>>,
    context: SharedContext,
}

impl<G, B> Clone for CompletionCell<G, B> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            context: self.context.clone(),
        }
    }
}

impl<G, B> fmt::Debug for CompletionCell<G, B>
where
    G: fmt::Debug,
    B: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cell = f.debug_struct("CompletionCell");
        match &*self.shared.state.lock() {
            State::Pending(queue) => cell
                .field("state", &"pending")
                .field("queued_callbacks", &queue.len()),
            State::Completed(value) => cell.field("state", &**value),
        }
        .finish()
    }
}

impl<G, B> CompletionCell<G, B>
where
    G: Send + Sync + 'static,
    B: Send + Sync + 'static,
{
    /// Creates an empty cell whose callbacks dispatch on `context`.
    pub fn new(context: SharedContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Pending(Vec::new())),
                completed: Condvar::new(),
            }),
            context,
        }
    }

    /// Creates a cell already holding `outcome`.
    ///
    /// Useful as the unit value when mixing ready results with running
    /// computations.
    pub fn completed(context: SharedContext, outcome: Outcome<G, B>) -> Self {
        let cell = Self::new(context);
        let _ = cell.try_complete(outcome);
        cell
    }

    /// Starts `task` on `context` and returns the cell its outcome will
    /// land in.
    ///
    /// A panic inside `task` does not escape: its payload is handed to
    /// `on_panic`, on the same context, and the converted [`Bad`] value is
    /// stored as the cell's outcome. There is no way to cancel a spawned
    /// task; dropping every handle merely abandons the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::{sync::Arc, time::Duration};
    ///
    /// use accrue::{cell::CompletionCell, executor::CallingThread, prelude::*};
    ///
    /// let inline: accrue::executor::SharedContext = Arc::new(CallingThread);
    ///
    /// let cell: CompletionCell<i32, String> = CompletionCell::spawn(
    ///     inline,
    ///     |_| "the task panicked".to_string(),
    ///     || panic!("boom"),
    /// );
    ///
    /// let result = cell.get(Duration::ZERO).unwrap();
    /// assert_eq!(*result, Outcome::Bad("the task panicked".to_string()));
    /// ```
    ///
    /// [`Bad`]: Outcome::Bad
    pub fn spawn<T, F>(context: SharedContext, on_panic: F, task: T) -> Self
    where
        T: FnOnce() -> Outcome<G, B> + Send + 'static,
        F: FnOnce(Box<dyn Any + Send>) -> B + Send + 'static,
    {
        let cell = Self::new(context.clone());
        let completer = cell.clone();
        context.execute(Box::new(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(outcome) => outcome,
                Err(payload) => Outcome::Bad(on_panic(payload)),
            };
            let _ = completer.try_complete(outcome);
        }));
        cell
    }

    /// Attempts to complete the cell, returning whether *this* call won.
    ///
    /// Exactly one completion attempt per cell succeeds; every later
    /// attempt returns `false` and the losing outcome is dropped. On the
    /// winning call, every queued callback is dispatched — each as its own
    /// unit of work, in registration order — and blocked
    /// [`get`](Self::get) callers wake up.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accrue::{cell::CompletionCell, executor::CallingThread, prelude::*};
    ///
    /// let cell: CompletionCell<i32, String> = CompletionCell::new(Arc::new(CallingThread));
    /// assert!(cell.try_complete(Outcome::Good(1)));
    /// assert!(!cell.try_complete(Outcome::Good(2)));
    /// ```
    pub fn try_complete(&self, outcome: Outcome<G, B>) -> bool {
        let mut state = self.shared.state.lock();
        let callbacks = match &mut *state {
            State::Completed(_) => return false,
            State::Pending(queue) => mem::take(queue),
        };
        let value = Arc::new(outcome);
        *state = State::Completed(value.clone());
        drop(state);
        self.shared.completed.notify_all();

        for QueuedCallback { callback, context } in callbacks {
            let value = value.clone();
            context.execute(Box::new(move || callback(&value)));
        }
        true
    }

    /// Completes the cell, or reports [`AlreadyCompleted`] if it lost the
    /// race.
    ///
    /// Identical to [`try_complete`](Self::try_complete) except that losing
    /// is treated as an error rather than an expected answer.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyCompleted`] if the cell already held an outcome.
    pub fn complete(&self, outcome: Outcome<G, B>) -> Result<(), AlreadyCompleted> {
        if self.try_complete(outcome) {
            Ok(())
        } else {
            Err(AlreadyCompleted)
        }
    }

    /// Registers a callback to run with the completed outcome.
    ///
    /// If the cell is still pending the callback is queued; the completing
    /// thread later dispatches it on the context this handle carries. If the
    /// cell is already completed the callback is dispatched immediately.
    /// Either way it runs exactly once, and a registration racing the
    /// completion transition can neither be lost nor invoked twice — the
    /// two sides synchronize on the cell's internal state.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, mpsc};
    ///
    /// use accrue::{cell::CompletionCell, executor::CallingThread, prelude::*};
    ///
    /// let cell: CompletionCell<i32, String> = CompletionCell::new(Arc::new(CallingThread));
    /// let (tx, rx) = mpsc::channel();
    ///
    /// cell.on_complete(move |outcome| {
    ///     tx.send(outcome.clone()).unwrap();
    /// });
    ///
    /// cell.try_complete(Outcome::Good(7));
    /// assert_eq!(rx.recv().unwrap(), Outcome::Good(7));
    /// ```
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(&Outcome<G, B>) + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        match &mut *state {
            State::Pending(queue) => queue.push(QueuedCallback {
                callback: Box::new(callback),
                context: self.context.clone(),
            }),
            State::Completed(value) => {
                let value = value.clone();
                drop(state);
                self.context
                    .execute(Box::new(move || callback(&value)));
            }
        }
    }

    /// Blocks the calling thread until the cell completes, or `timeout`
    /// elapses.
    ///
    /// This accessor exists for synchronous interop and tests; none of the
    /// combinators in [`accumulate`] need it. A timeout leaves the cell —
    /// and any background task feeding it — untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WaitTimeout`] if the cell was still pending when the
    /// deadline passed. That is not the same thing as a completed
    /// [`Bad`](Outcome::Bad), which comes back as `Ok`.
    pub fn get(&self, timeout: Duration) -> Result<Arc<Outcome<G, B>>, WaitTimeout> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        loop {
            if let State::Completed(value) = &*state {
                return Ok(value.clone());
            }
            if self
                .shared
                .completed
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return match &*state {
                    State::Completed(value) => Ok(value.clone()),
                    State::Pending(_) => Err(WaitTimeout { timeout }),
                };
            }
        }
    }

    /// Blocks like [`get`](Self::get), but substitutes `fallback` on
    /// timeout instead of reporting an error.
    pub fn get_or_else(&self, timeout: Duration, fallback: Outcome<G, B>) -> Arc<Outcome<G, B>> {
        match self.get(timeout) {
            Ok(value) => value,
            Err(WaitTimeout { .. }) => Arc::new(fallback),
        }
    }

    /// Returns the completed outcome without blocking, or [`None`] while
    /// pending.
    pub fn peek(&self) -> Option<Arc<Outcome<G, B>>> {
        match &*self.shared.state.lock() {
            State::Completed(value) => Some(value.clone()),
            State::Pending(_) => None,
        }
    }

    /// Returns `true` once the cell holds an outcome.
    pub fn is_completed(&self) -> bool {
        matches!(&*self.shared.state.lock(), State::Completed(_))
    }

    /// Returns a handle to the same cell that dispatches *subsequently*
    /// registered callbacks on `context`.
    ///
    /// Callbacks already queued through other handles keep the context they
    /// were registered with, and a completion already in flight is
    /// unaffected.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, mpsc};
    ///
    /// use accrue::{cell::CompletionCell, executor::{CallingThread, ThreadPool}, prelude::*};
    ///
    /// let pool = Arc::new(ThreadPool::new(1).unwrap());
    /// let cell: CompletionCell<i32, String> = CompletionCell::new(pool);
    ///
    /// // Later callbacks run inline instead of on the pool.
    /// let inline = cell.with_context(Arc::new(CallingThread));
    /// cell.try_complete(Outcome::Good(1));
    ///
    /// let (tx, rx) = mpsc::channel();
    /// inline.on_complete(move |outcome| tx.send(outcome.is_good()).unwrap());
    /// assert_eq!(rx.recv().unwrap(), true);
    /// ```
    #[must_use]
    pub fn with_context(&self, context: SharedContext) -> Self {
        Self {
            shared: self.shared.clone(),
            context,
        }
    }
}
