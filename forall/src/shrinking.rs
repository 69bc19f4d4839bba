//! Greedy search for a smaller falsifying value.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use crate::config::{PropertyConfig, ShrinkingMode};
use crate::falsifier::{FalsificationResult, Falsifier, TryExecutionResult};
use crate::shrinkable::RcShrinkable;

/// Cursor over an in-progress shrinking search.
///
/// Each call to [`next`](ShrinkingSequence::next) walks the candidates of the
/// current best value and moves to the first one that still falsifies.
pub struct ShrinkingSequence<T> {
    current: FalsificationResult<T>,
    falsifier: Falsifier<T>,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl<T: Clone + 'static> ShrinkingSequence<T> {
    pub fn new(shrinkable: RcShrinkable<T>, falsifier: Falsifier<T>) -> Self {
        Self::starting_from(FalsificationResult::new(shrinkable, None), falsifier)
    }

    pub fn starting_from(result: FalsificationResult<T>, falsifier: Falsifier<T>) -> Self {
        Self {
            current: result,
            falsifier,
            deadline: None,
            timed_out: false,
        }
    }

    /// Stop evaluating candidates once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Best falsifying result found so far
    pub fn current(&self) -> &FalsificationResult<T> {
        &self.current
    }

    pub fn into_result(self) -> FalsificationResult<T> {
        self.current
    }

    /// Whether the last step was cut short by the deadline
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Advance by one accepted candidate.
    ///
    /// `count` is called for every evaluated candidate that did not falsify,
    /// `on_shrunk` for the accepted one. Returns `false` when no candidate
    /// of the current value falsifies.
    pub fn next(
        &mut self,
        count: &mut dyn FnMut(),
        on_shrunk: &mut dyn FnMut(&FalsificationResult<T>),
    ) -> bool {
        let distance = self.current.shrinkable.distance();
        for candidate in self.current.shrinkable.shrink_candidates() {
            if let Some(deadline) = self.deadline
                && Instant::now() >= deadline
            {
                self.timed_out = true;
                return false;
            }
            if candidate.distance() >= distance {
                log::trace!(
                    "skipping candidate at distance {} (current {})",
                    candidate.distance(),
                    distance
                );
                continue;
            }
            match self.falsifier.execute(&candidate.value()) {
                TryExecutionResult::Falsified(cause) => {
                    self.current = FalsificationResult::new(candidate, cause);
                    on_shrunk(&self.current);
                    return true;
                }
                TryExecutionResult::Satisfied | TryExecutionResult::Invalid => count(),
            }
        }
        false
    }
}

/// What a finished shrinking search produced
#[derive(Debug)]
pub struct ShrinkOutcome<T> {
    pub result: FalsificationResult<T>,
    /// Accepted candidates
    pub steps: usize,
    /// Evaluated candidates that did not falsify
    pub attempts: usize,
    /// The search stopped at the step cap or the time bound
    pub bounded_out: bool,
}

/// Runs a [`ShrinkingSequence`] according to a [`ShrinkingMode`]
#[derive(Debug, Clone)]
pub struct PropertyShrinker {
    mode: ShrinkingMode,
    max_steps: usize,
    bound: Duration,
}

impl PropertyShrinker {
    pub fn new(mode: ShrinkingMode, max_steps: usize, bound: Duration) -> Self {
        Self {
            mode,
            max_steps,
            bound,
        }
    }

    pub fn from_config(config: &PropertyConfig) -> Self {
        Self::new(
            config.shrinking,
            config.max_shrink_steps,
            config.bounded_shrinking,
        )
    }

    pub fn shrink<T: Clone + Debug + 'static>(
        &self,
        original: FalsificationResult<T>,
        falsifier: &Falsifier<T>,
    ) -> ShrinkOutcome<T> {
        if self.mode == ShrinkingMode::Off {
            return ShrinkOutcome {
                result: original,
                steps: 0,
                attempts: 0,
                bounded_out: false,
            };
        }

        let started = Instant::now();
        let mut sequence = ShrinkingSequence::starting_from(original, falsifier.clone());
        if self.mode == ShrinkingMode::Bounded {
            sequence = sequence.with_deadline(started + self.bound);
        }

        let mut steps = 0;
        let mut attempts = 0;
        let bounded_out = loop {
            if self.mode == ShrinkingMode::Bounded && steps >= self.max_steps {
                break true;
            }
            let mut on_shrunk = |result: &FalsificationResult<T>| {
                log::trace!("shrunk to {:?}", result.shrinkable.value());
            };
            let shrunk = sequence.next(&mut || attempts += 1, &mut on_shrunk);
            if !shrunk {
                break sequence.timed_out();
            }
            steps += 1;
        };

        if bounded_out {
            log::warn!(
                "shrinking bounded after {} steps in {:?}; the reported sample may not be minimal",
                steps,
                started.elapsed()
            );
        }
        log::info!(
            "shrinking finished: {} steps, {} attempts, {:?}",
            steps,
            attempts,
            started.elapsed()
        );

        ShrinkOutcome {
            result: sequence.into_result(),
            steps,
            attempts,
            bounded_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Cause;
    use crate::range::Range;
    use crate::shrinkable::{IntegralShrinkable, ShrinkableExt};
    use num_bigint::BigInt;
    use std::rc::Rc;

    fn integral(value: i64, min: i64, max: i64) -> RcShrinkable<i64> {
        let range = Range::of(BigInt::from(min), BigInt::from(max)).unwrap();
        let shrinkable: RcShrinkable<BigInt> =
            Rc::new(IntegralShrinkable::new(BigInt::from(value), range, BigInt::from(0)));
        shrinkable.map(|v| i64::try_from(v).unwrap_or_default())
    }

    fn shrink_fully(
        shrinkable: RcShrinkable<i64>,
        falsifier: &Falsifier<i64>,
    ) -> ShrinkOutcome<i64> {
        PropertyShrinker::new(ShrinkingMode::Full, 0, Duration::ZERO)
            .shrink(FalsificationResult::new(shrinkable, None), falsifier)
    }

    #[test]
    fn test_shrinks_to_smallest_falsifying_value() {
        let falsifier = Falsifier::new(|v: &i64| *v < 17);
        let outcome = shrink_fully(integral(900, 0, 1000), &falsifier);
        assert_eq!(outcome.result.value(), 17);
        assert!(outcome.steps > 0);
        assert!(outcome.attempts > 0);
        assert!(!outcome.bounded_out);
    }

    #[test]
    fn test_always_false_shrinks_to_target() {
        let falsifier = Falsifier::new(|_: &i64| false);
        let outcome = shrink_fully(integral(-77, -100, 100), &falsifier);
        assert_eq!(outcome.result.value(), 0);
    }

    #[test]
    fn test_sequence_reports_callbacks() {
        let falsifier = Falsifier::new(|v: &i64| *v < 5);
        let mut sequence = integral(40, 0, 100).shrink(&falsifier);
        let mut rejected = 0;
        let mut accepted = Vec::new();
        assert!(sequence.next(&mut || rejected += 1, &mut |r: &FalsificationResult<i64>| {
            accepted.push(r.value())
        }));
        // 0 is rejected first, then 20 falsifies
        assert_eq!(rejected, 1);
        assert_eq!(accepted, vec![20]);
        assert_eq!(sequence.current().value(), 20);
    }

    #[test]
    fn test_invalid_candidates_are_not_progress() {
        let falsifier = Falsifier::new(|_: &i64| false).with_filter(|v| *v > 10);
        let outcome = shrink_fully(integral(50, 0, 100), &falsifier);
        assert_eq!(outcome.result.value(), 11);
    }

    #[test]
    fn test_different_cause_still_falsifies() {
        let falsifier = Falsifier::new(|v: &i64| -> bool {
            if *v < 10 {
                panic!("small value {}", v);
            }
            false
        });
        let outcome = shrink_fully(integral(60, 0, 100), &falsifier);
        assert_eq!(outcome.result.value(), 0);
        assert!(matches!(outcome.result.cause, Some(Cause::Panic(_))));
    }

    #[test]
    fn test_off_mode_keeps_original() {
        let falsifier = Falsifier::new(|_: &i64| false);
        let outcome = PropertyShrinker::new(ShrinkingMode::Off, 1000, Duration::from_secs(1))
            .shrink(FalsificationResult::new(integral(60, 0, 100), None), &falsifier);
        assert_eq!(outcome.result.value(), 60);
        assert_eq!(outcome.steps, 0);
    }

    #[test]
    fn test_bounded_mode_caps_steps() {
        let falsifier = Falsifier::new(|v: &i64| *v < 1);
        let outcome = PropertyShrinker::new(ShrinkingMode::Bounded, 2, Duration::from_secs(60))
            .shrink(FalsificationResult::new(integral(1000, 0, 1000), None), &falsifier);
        assert_eq!(outcome.steps, 2);
        assert!(outcome.bounded_out);
        assert!(outcome.result.value() > 1);
    }
}
