//! Integration tests for the completion cell: exactly-once completion,
//! exactly-once callback delivery under races, the timeout/failure
//! distinction, context rebinding, and panic conversion.


#![cfg(feature = "std")]
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use accrue::{
    cell::{AlreadyCompleted, CompletionCell, WaitTimeout},
    executor::{CallingThread, ExecutionContext, SharedContext, Task, ThreadPool},
    nonempty,
    prelude::*,
};
use static_assertions::assert_impl_all;

assert_impl_all!(CompletionCell<i32, String>: Send, Sync);

fn inline() -> SharedContext {
    Arc::new(CallingThread)
}

/// Counts submissions, then runs each task inline.
struct Counting {
    submitted: AtomicUsize,
}

impl Counting {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            submitted: AtomicUsize::new(0),
        })
    }
}

impl ExecutionContext for Counting {
    fn execute(&self, task: Task) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        CallingThread.execute(task);
    }
}

#[test]
fn the_first_completion_wins() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    assert!(cell.try_complete(Outcome::Good(1)));
    assert!(!cell.try_complete(Outcome::Good(2)));
    assert!(!cell.try_complete(Outcome::Bad("late".to_string())));

    let value = cell.get(Duration::ZERO).unwrap();
    assert_eq!(*value, Outcome::Good(1));
}

#[test]
fn complete_reports_the_loss_as_an_error() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    assert_eq!(cell.complete(Outcome::Good(1)), Ok(()));
    assert_eq!(cell.complete(Outcome::Good(2)), Err(AlreadyCompleted));
}

#[test]
fn queued_callbacks_fire_in_registration_order() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    let order = Arc::new(Mutex::new(Vec::new()));

    for index in 0..3 {
        let order = Arc::clone(&order);
        cell.on_complete(move |_| order.lock().unwrap().push(index));
    }

    cell.try_complete(Outcome::Good(7));
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn callbacks_registered_after_completion_fire_immediately() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    cell.try_complete(Outcome::Good(7));

    let (tx, rx) = mpsc::channel();
    cell.on_complete(move |outcome| tx.send(outcome.clone()).unwrap());
    assert_eq!(rx.try_recv().unwrap(), Outcome::Good(7));
}

#[test]
fn racing_completers_produce_exactly_one_winner() {
    for _ in 0..50 {
        let cell: CompletionCell<usize, String> = CompletionCell::new(inline());
        let handles: Vec<_> = (0..4)
            .map(|index| {
                let cell = cell.clone();
                thread::spawn(move || cell.try_complete(Outcome::Good(index)))
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);

        // The stored value is the winner's, one of the candidates.
        let value = cell.get(Duration::from_secs(1)).unwrap();
        assert!(matches!(*value, Outcome::Good(index) if index < 4));
    }
}

#[test]
fn every_callback_fires_exactly_once_under_a_registration_race() {
    for _ in 0..20 {
        let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
        let fired = Arc::new(AtomicUsize::new(0));

        let registrar = {
            let cell = cell.clone();
            let fired = Arc::clone(&fired);
            thread::spawn(move || {
                for _ in 0..100 {
                    let fired = Arc::clone(&fired);
                    cell.on_complete(move |_| {
                        fired.fetch_add(1, Ordering::SeqCst);
                    });
                }
            })
        };
        let completer = {
            let cell = cell.clone();
            thread::spawn(move || cell.try_complete(Outcome::Good(1)))
        };

        registrar.join().unwrap();
        completer.join().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 100);
    }
}

#[test]
fn a_timeout_is_not_a_completed_failure() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());

    let waited = cell.get(Duration::from_millis(20));
    assert_eq!(
        waited,
        Err(WaitTimeout {
            timeout: Duration::from_millis(20)
        }),
    );

    // A completed Bad, by contrast, comes back as Ok.
    cell.try_complete(Outcome::Bad("a domain failure".to_string()));
    let value = cell.get(Duration::ZERO).unwrap();
    assert_eq!(*value, Outcome::Bad("a domain failure".to_string()));
}

#[test]
fn get_or_else_substitutes_the_fallback_on_timeout() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    let value = cell.get_or_else(Duration::from_millis(10), Outcome::Good(0));
    assert_eq!(*value, Outcome::Good(0));

    cell.try_complete(Outcome::Good(9));
    let value = cell.get_or_else(Duration::ZERO, Outcome::Good(0));
    assert_eq!(*value, Outcome::Good(9));
}

#[test]
fn get_wakes_up_when_another_thread_completes() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    let completer = {
        let cell = cell.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            cell.try_complete(Outcome::Good(5));
        })
    };

    let value = cell.get(Duration::from_secs(5)).unwrap();
    assert_eq!(*value, Outcome::Good(5));
    completer.join().unwrap();
}

#[test]
fn peek_never_blocks() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    assert!(cell.peek().is_none());
    assert!(!cell.is_completed());

    cell.try_complete(Outcome::Good(3));
    assert_eq!(*cell.peek().unwrap(), Outcome::Good(3));
    assert!(cell.is_completed());
}

#[test]
fn with_context_retargets_later_registrations_only() {
    let counting = Counting::new();
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    let rebound = cell.with_context(counting.clone());

    // Registered through the original handle: dispatched inline, not
    // through the counting context.
    cell.on_complete(|_| {});
    // Registered through the rebound handle: dispatched via the counter.
    rebound.on_complete(|_| {});

    cell.try_complete(Outcome::Good(1));
    assert_eq!(counting.submitted.load(Ordering::SeqCst), 1);
}

#[test]
fn spawn_stores_the_task_outcome() {
    let pool = Arc::new(ThreadPool::new(2).unwrap());
    let cell: CompletionCell<i32, String> = CompletionCell::spawn(
        pool.clone(),
        |_| "panicked".to_string(),
        || Outcome::Good(6 * 7),
    );
    let value = cell.get(Duration::from_secs(5)).unwrap();
    assert_eq!(*value, Outcome::Good(42));
}

#[test]
fn spawn_converts_a_panic_into_a_bad_payload() {
    let cell: CompletionCell<i32, String> = CompletionCell::spawn(
        inline(),
        |payload| match payload.downcast::<&str>() {
            Ok(message) => format!("task panicked: {message}"),
            Err(_) => "task panicked".to_string(),
        },
        || panic!("boom"),
    );
    let value = cell.get(Duration::ZERO).unwrap();
    assert_eq!(*value, Outcome::Bad("task panicked: boom".to_string()));
}

#[test]
fn a_panicking_callback_cannot_block_the_next_one() {
    let cell: CompletionCell<i32, String> = CompletionCell::new(inline());
    let (tx, rx) = mpsc::channel();

    cell.on_complete(|_| panic!("misbehaving callback"));
    cell.on_complete(move |outcome| tx.send(outcome.clone()).unwrap());

    cell.try_complete(Outcome::Good(2));
    assert_eq!(rx.try_recv().unwrap(), Outcome::Good(2));
}

#[test]
fn accumulating_spawned_work_end_to_end() {
    // Realistic shape: three background parses fan in through the async
    // combinators; every failure is reported.
    let pool = Arc::new(ThreadPool::new(3).unwrap());

    let parse = |input: &'static str| -> CompletionCell<i32, NonEmpty<String>> {
        CompletionCell::spawn(
            pool.clone(),
            |_| nonempty!["parser panicked".to_string()],
            move || match input.parse::<i32>() {
                Ok(age) if age >= 0 => Outcome::Good(age),
                _ => Outcome::Bad(format!("{input:?} is not a valid age")).accumulating(),
            },
        )
    };

    let merged: CompletionCell<Vec<i32>, _> = accrue::cell::accumulate::combined(
        pool.clone(),
        ["29", "-30", "31"].map(parse),
    );

    let value = merged.get(Duration::from_secs(5)).unwrap();
    assert_eq!(
        *value,
        Outcome::Bad(nonempty!["\"-30\" is not a valid age".to_string()]),
    );
}
