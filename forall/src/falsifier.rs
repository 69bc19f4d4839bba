//! Evaluating a property against a single value.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::Cause;
use crate::shrinkable::RcShrinkable;

/// Outcome of checking one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryExecutionResult {
    /// The property holds for the value
    Satisfied,
    /// The value is a counterexample
    Falsified(Option<Cause>),
    /// The value was rejected by an assumption or filter
    Invalid,
}

impl TryExecutionResult {
    pub fn is_falsified(&self) -> bool {
        matches!(self, TryExecutionResult::Falsified(_))
    }
}

/// Values a property check may return
pub trait CheckOutcome {
    fn into_try_result(self) -> TryExecutionResult;
}

impl CheckOutcome for bool {
    fn into_try_result(self) -> TryExecutionResult {
        if self {
            TryExecutionResult::Satisfied
        } else {
            TryExecutionResult::Falsified(None)
        }
    }
}

impl CheckOutcome for () {
    fn into_try_result(self) -> TryExecutionResult {
        TryExecutionResult::Satisfied
    }
}

impl<E: fmt::Display> CheckOutcome for Result<(), E> {
    fn into_try_result(self) -> TryExecutionResult {
        match self {
            Ok(()) => TryExecutionResult::Satisfied,
            Err(err) => TryExecutionResult::Falsified(Some(Cause::Assertion(err.to_string()))),
        }
    }
}

impl CheckOutcome for TryExecutionResult {
    fn into_try_result(self) -> TryExecutionResult {
        self
    }
}

/// Panic payload marking the current value as invalid, see [`assume`]
#[derive(Debug, Clone, Copy)]
pub struct Rejection;

/// Panic payload that is never treated as a falsification.
///
/// It escapes trying and shrinking unchanged, see [`fatal`].
#[derive(Debug, Clone)]
pub struct Fatal(pub String);

/// Reject the current value unless `condition` holds
pub fn assume(condition: bool) {
    if !condition {
        panic::panic_any(Rejection);
    }
}

/// Abort the whole property run with a fatal error
pub fn fatal(message: impl Into<String>) -> ! {
    panic::panic_any(Fatal(message.into()))
}

/// A property bound to a value type, with panics mapped to results
pub struct Falsifier<T> {
    check: Rc<dyn Fn(&T) -> TryExecutionResult>,
}

impl<T> Clone for Falsifier<T> {
    fn clone(&self) -> Self {
        Self {
            check: self.check.clone(),
        }
    }
}

impl<T: 'static> Falsifier<T> {
    pub fn new<F, R>(check: F) -> Self
    where
        F: Fn(&T) -> R + 'static,
        R: CheckOutcome,
    {
        Self {
            check: Rc::new(move |value| check(value).into_try_result()),
        }
    }

    /// Check `value`.
    ///
    /// Panics become falsifications, except [`Rejection`] (invalid) and
    /// [`Fatal`] (resumed).
    pub fn execute(&self, value: &T) -> TryExecutionResult {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.check)(value))) {
            Ok(result) => result,
            Err(payload) => classify_panic(payload),
        }
    }

    /// Treat values failing `predicate` as invalid
    pub fn with_filter<F>(&self, predicate: F) -> Falsifier<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let check = self.check.clone();
        Falsifier {
            check: Rc::new(move |value| {
                if predicate(value) {
                    check(value)
                } else {
                    TryExecutionResult::Invalid
                }
            }),
        }
    }
}

fn classify_panic(payload: Box<dyn Any + Send>) -> TryExecutionResult {
    if payload.is::<Rejection>() {
        return TryExecutionResult::Invalid;
    }
    if payload.is::<Fatal>() {
        panic::resume_unwind(payload);
    }
    TryExecutionResult::Falsified(Some(Cause::Panic(panic_message(payload.as_ref()))))
}

/// Best effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(Fatal(message)) = payload.downcast_ref::<Fatal>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// A falsifying shrinkable together with what falsified it.
///
/// Results are ordered by the distance of their shrinkable.
pub struct FalsificationResult<T> {
    pub shrinkable: RcShrinkable<T>,
    pub cause: Option<Cause>,
}

impl<T> FalsificationResult<T> {
    pub fn new(shrinkable: RcShrinkable<T>, cause: Option<Cause>) -> Self {
        Self { shrinkable, cause }
    }

    pub fn value(&self) -> T {
        self.shrinkable.value()
    }
}

impl<T> Clone for FalsificationResult<T> {
    fn clone(&self) -> Self {
        Self {
            shrinkable: self.shrinkable.clone(),
            cause: self.cause.clone(),
        }
    }
}

impl<T> PartialEq for FalsificationResult<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shrinkable.distance() == other.shrinkable.distance()
    }
}

impl<T> PartialOrd for FalsificationResult<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.shrinkable.distance().cmp(&other.shrinkable.distance()))
    }
}

impl<T: fmt::Debug> fmt::Debug for FalsificationResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalsificationResult")
            .field("value", &self.shrinkable.value())
            .field("distance", &self.shrinkable.distance())
            .field("cause", &self.cause)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ShrinkingDistance;
    use crate::shrinkable::{unshrinkable, unshrinkable_at};

    #[test]
    fn test_bool_and_result_outcomes() {
        let positive = Falsifier::new(|v: &i32| *v > 0);
        assert_eq!(positive.execute(&1), TryExecutionResult::Satisfied);
        assert_eq!(positive.execute(&0), TryExecutionResult::Falsified(None));

        let checked = Falsifier::new(|v: &i32| {
            if *v < 10 {
                Ok(())
            } else {
                Err(format!("{} is too big", v))
            }
        });
        assert_eq!(
            checked.execute(&12),
            TryExecutionResult::Falsified(Some(Cause::Assertion("12 is too big".to_string())))
        );
    }

    #[test]
    fn test_panics_are_falsifications() {
        let falsifier = Falsifier::new(|v: &Vec<i32>| v[3] == 0);
        match falsifier.execute(&vec![1]) {
            TryExecutionResult::Falsified(Some(Cause::Panic(message))) => {
                assert!(message.contains("index out of bounds"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_assume_marks_invalid() {
        let falsifier = Falsifier::new(|v: &i32| {
            assume(*v % 2 == 0);
            *v < 100
        });
        assert_eq!(falsifier.execute(&3), TryExecutionResult::Invalid);
        assert_eq!(falsifier.execute(&4), TryExecutionResult::Satisfied);
        assert!(falsifier.execute(&200).is_falsified());
    }

    #[test]
    fn test_fatal_panics_escape() {
        let falsifier = Falsifier::new(|_: &i32| -> bool { fatal("out of memory") });
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| falsifier.execute(&1)));
        let payload = outcome.expect_err("fatal must not be swallowed");
        assert_eq!(panic_message(payload.as_ref()), "out of memory");
    }

    #[test]
    fn test_with_filter() {
        let falsifier = Falsifier::new(|_: &i32| false).with_filter(|v| *v > 0);
        assert_eq!(falsifier.execute(&-1), TryExecutionResult::Invalid);
        assert!(falsifier.execute(&1).is_falsified());
    }

    #[test]
    fn test_results_ordered_by_distance() {
        let near = FalsificationResult::new(unshrinkable(1), None);
        let far = FalsificationResult::new(unshrinkable_at(2, ShrinkingDistance::of(&[5])), None);
        assert!(near < far);
        assert_eq!(far.value(), 2);
    }
}
