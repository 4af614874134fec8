//! Integration tests for the asynchronous combinators: content determinism
//! of the barrier-based merges under every completion order, the deliberate
//! completion-order dependence of `sequence`, and the racing semantics of
//! `first_completed_of`.

#![cfg(feature = "std")]

use std::{sync::Arc, thread, time::Duration};

use accrue::{
    cell::{CompletionCell, accumulate},
    executor::{CallingThread, SharedContext, ThreadPool},
    nonempty,
    prelude::*,
};

fn inline() -> SharedContext {
    Arc::new(CallingThread)
}

/// All orderings of `0..n`, for exhaustively permuting completion order.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn go(prefix: &mut Vec<usize>, remaining: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(prefix.clone());
            return;
        }
        for index in 0..remaining.len() {
            let chosen = remaining.remove(index);
            prefix.push(chosen);
            go(prefix, remaining, out);
            prefix.pop();
            remaining.insert(index, chosen);
        }
    }
    let mut out = Vec::new();
    go(&mut Vec::new(), &mut (0..n).collect(), &mut out);
    out
}

fn fixtures() -> Vec<Outcome<i32, NonEmpty<String>>> {
    vec![
        Outcome::Good(1),
        Outcome::Bad(nonempty!["b1".to_string()]),
        Outcome::Good(3),
        Outcome::Bad(nonempty!["d1".to_string(), "d2".to_string()]),
    ]
}

#[test]
fn combined_content_is_independent_of_completion_order() {
    let outcomes = fixtures();
    let expected: Outcome<Vec<i32>, _> = combined(outcomes.clone());

    for order in permutations(outcomes.len()) {
        let ctx = inline();
        let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
            outcomes.iter().map(|_| CompletionCell::new(ctx.clone())).collect();
        let merged: CompletionCell<Vec<i32>, _> =
            accumulate::combined(ctx.clone(), cells.iter().cloned());

        for index in order {
            cells[index].try_complete(outcomes[index].clone());
        }

        let result = merged.get(Duration::ZERO).unwrap();
        assert_eq!(*result, expected);
    }
}

#[test]
fn combined_waits_for_every_input_even_after_a_failure() {
    let ctx = inline();
    let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
        (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
    let merged: CompletionCell<Vec<i32>, _> =
        accumulate::combined(ctx.clone(), cells.iter().cloned());

    cells[0].try_complete(Outcome::Bad(nonempty!["early failure".to_string()]));
    cells[1].try_complete(Outcome::Good(2));
    assert!(!merged.is_completed());

    cells[2].try_complete(Outcome::Bad(nonempty!["late failure".to_string()]));
    let result = merged.get(Duration::ZERO).unwrap();
    assert_eq!(
        *result,
        Outcome::Bad(nonempty![
            "early failure".to_string(),
            "late failure".to_string(),
        ]),
    );
}

#[test]
fn combined_over_no_cells_completes_at_once() {
    let merged: CompletionCell<Vec<i32>, NonEmpty<String>> =
        accumulate::combined(inline(), Vec::new());
    let result = merged.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Good(vec![]));
}

#[test]
fn with_good_cells_merges_by_position_not_arrival() {
    for order in permutations(3) {
        let ctx = inline();
        let age: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
        let name: CompletionCell<String, NonEmpty<String>> = CompletionCell::new(ctx.clone());
        let active: CompletionCell<bool, NonEmpty<String>> = CompletionCell::new(ctx.clone());

        let record = (&age, &name, &active)
            .with_good(ctx.clone(), |(age, name, active)| (age, name, active));

        // Positions 0 and 2 fail, position 1 succeeds, in arbitrary order.
        for index in order {
            match index {
                0 => {
                    age.try_complete(Outcome::Bad(nonempty!["bad age".to_string()]));
                }
                1 => {
                    name.try_complete(Outcome::Good("Ada".to_string()));
                }
                _ => {
                    active.try_complete(Outcome::Bad(nonempty!["bad flag".to_string()]));
                }
            }
        }

        let result = record.get(Duration::ZERO).unwrap();
        assert_eq!(
            *result,
            Outcome::Bad(nonempty!["bad age".to_string(), "bad flag".to_string()]),
        );
    }
}

#[test]
fn zipped_cells_produce_the_tuple_on_all_good() {
    let ctx = inline();
    let a: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
    let b: CompletionCell<char, NonEmpty<String>> = CompletionCell::new(ctx.clone());

    let pair = (&a, &b).zipped(ctx.clone());
    b.try_complete(Outcome::Good('x'));
    a.try_complete(Outcome::Good(1));

    let result = pair.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Good((1, 'x')));
}

#[test]
fn sequence_fails_fast_without_waiting_for_pending_cells() {
    let ctx = inline();
    let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
        (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
    let sequenced: CompletionCell<Vec<i32>, _> =
        accumulate::sequence(ctx.clone(), cells.iter().cloned());

    cells[0].try_complete(Outcome::Good(1));
    cells[1].try_complete(Outcome::Bad(nonempty!["first observed".to_string()]));

    // The output is already complete while cells[2] has not resolved.
    assert!(sequenced.is_completed());
    assert!(!cells[2].is_completed());

    let result = sequenced.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Bad(nonempty!["first observed".to_string()]));
}

#[test]
fn sequence_reports_the_first_failure_in_completion_order() {
    // Input order says cells[1] comes first, but completion order decides.
    let ctx = inline();
    let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
        (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
    let sequenced: CompletionCell<Vec<i32>, _> =
        accumulate::sequence(ctx.clone(), cells.iter().cloned());

    cells[2].try_complete(Outcome::Bad(nonempty!["observed first".to_string()]));
    cells[1].try_complete(Outcome::Bad(nonempty!["observed second".to_string()]));

    let result = sequenced.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Bad(nonempty!["observed first".to_string()]));
}

#[test]
fn sequence_agrees_with_combined_when_everything_succeeds() {
    for order in permutations(3) {
        let ctx = inline();
        let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
            (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
        let sequenced: CompletionCell<Vec<i32>, _> =
            accumulate::sequence(ctx.clone(), cells.iter().cloned());

        for index in order {
            cells[index].try_complete(Outcome::Good(index as i32 * 10));
        }

        let result = sequenced.get(Duration::ZERO).unwrap();
        assert_eq!(*result, Outcome::Good(vec![0, 10, 20]));
    }
}

#[test]
fn first_completed_of_copies_the_winner_verbatim() {
    let ctx = inline();
    let a: CompletionCell<i32, String> = CompletionCell::new(ctx.clone());
    let b: CompletionCell<i32, String> = CompletionCell::new(ctx.clone());

    let winner = accumulate::first_completed_of(ctx.clone(), [a.clone(), b.clone()]);
    b.try_complete(Outcome::Bad("fastest was a failure".to_string()));
    a.try_complete(Outcome::Good(1));

    let result = winner.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Bad("fastest was a failure".to_string()));
}

#[test]
fn when_applies_every_validator_to_the_resolved_value() {
    fn positive(i: &i32) -> Validation<String> {
        if *i > 0 {
            Validation::Pass
        } else {
            Validation::Fail(format!("{i} is not positive"))
        }
    }
    fn even(i: &i32) -> Validation<String> {
        if i % 2 == 0 {
            Validation::Fail(format!("{i} is even"))
        } else {
            Validation::Pass
        }
    }

    let ctx = inline();
    let cell: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
    let checked = accumulate::when(
        ctx.clone(),
        &cell,
        [positive as fn(&i32) -> Validation<String>, even],
    );

    cell.try_complete(Outcome::Good(-4));

    let result = checked.get(Duration::ZERO).unwrap();
    assert_eq!(
        *result,
        Outcome::Bad(nonempty![
            "-4 is not positive".to_string(),
            "-4 is even".to_string(),
        ]),
    );
}

#[test]
fn when_leaves_a_failed_cell_untouched() {
    fn never(_: &i32) -> Validation<String> {
        panic!("validator must not run for a Bad outcome");
    }

    let ctx = inline();
    let cell: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
    let checked = accumulate::when(ctx.clone(), &cell, [never as fn(&i32) -> Validation<String>]);

    cell.try_complete(Outcome::Bad(nonempty!["already bad".to_string()]));

    let result = checked.get(Duration::ZERO).unwrap();
    assert_eq!(*result, Outcome::Bad(nonempty!["already bad".to_string()]));
}

#[test]
fn pooled_completions_match_the_synchronous_merge() {
    // Workers complete out of input order; the merged content must not care.
    let pool: SharedContext = Arc::new(ThreadPool::new(4).unwrap());
    let outcomes = fixtures();
    let expected: Outcome<Vec<i32>, _> = combined(outcomes.clone());

    for round in 0..10 {
        let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
            outcomes.iter().map(|_| CompletionCell::new(pool.clone())).collect();
        let merged: CompletionCell<Vec<i32>, _> =
            accumulate::combined(pool.clone(), cells.iter().cloned());

        for (index, cell) in cells.iter().enumerate() {
            let cell = cell.clone();
            let outcome = outcomes[index].clone();
            // Stagger completions differently every round.
            let delay = Duration::from_millis(((index + round) % 4) as u64 * 5);
            thread::spawn(move || {
                thread::sleep(delay);
                cell.try_complete(outcome);
            });
        }

        let result = merged.get(Duration::from_secs(5)).unwrap();
        assert_eq!(*result, expected);
    }
}
