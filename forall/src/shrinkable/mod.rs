//! Generated values together with their shrink candidates.
//!
//! A [`Shrinkable`] knows its value, how far that value is from the simplest
//! one ([`ShrinkingDistance`]) and which simpler values to try next. Every
//! candidate must be strictly closer than its parent, so any chain of
//! accepted candidates terminates.

mod container;
mod decimal;
mod flat_map;
mod integral;
mod pair;

pub use container::{Collector, ContainerShrinkable};
pub use decimal::DecimalShrinkable;
pub use flat_map::{FlatMappedShrinkable, GeneratorMapper};
pub use integral::{IntegralShrinkable, shrink_towards};
pub use pair::{PairShrinkable, pair};

use std::iter;
use std::rc::Rc;

use crate::distance::ShrinkingDistance;
use crate::falsifier::Falsifier;
use crate::shrinking::ShrinkingSequence;

/// Shared handle to a shrinkable
pub type RcShrinkable<T> = Rc<dyn Shrinkable<T>>;

/// Lazily produced shrink candidates
pub type Candidates<T> = Box<dyn Iterator<Item = RcShrinkable<T>>>;

/// How many levels below a rejected candidate a filter keeps looking
const FILTER_LOOKAHEAD_DEPTH: usize = 2;

/// A value that can be shrunk toward simpler values
pub trait Shrinkable<T> {
    /// The generated value
    fn value(&self) -> T;

    /// Distance from the simplest possible value
    fn distance(&self) -> ShrinkingDistance;

    /// Simpler variants to try, most promising first
    fn shrink_candidates(&self) -> Candidates<T>;
}

/// Combinators available on every shared shrinkable
pub trait ShrinkableExt<T> {
    /// Transform the value and, lazily, every candidate
    fn map<U, F>(&self, mapper: F) -> RcShrinkable<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static;

    /// Offer only candidates whose value satisfies `predicate`
    fn filter<F>(&self, predicate: F) -> RcShrinkable<T>
    where
        F: Fn(&T) -> bool + 'static;

    /// Start a shrinking search from this (falsifying) shrinkable
    fn shrink(&self, falsifier: &Falsifier<T>) -> ShrinkingSequence<T>;
}

impl<T: Clone + 'static> ShrinkableExt<T> for RcShrinkable<T> {
    fn map<U, F>(&self, mapper: F) -> RcShrinkable<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Rc::new(MappedShrinkable {
            inner: self.clone(),
            mapper: Rc::new(mapper),
        })
    }

    fn filter<F>(&self, predicate: F) -> RcShrinkable<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Rc::new(FilteredShrinkable {
            inner: self.clone(),
            predicate: Rc::new(predicate),
        })
    }

    fn shrink(&self, falsifier: &Falsifier<T>) -> ShrinkingSequence<T> {
        ShrinkingSequence::new(self.clone(), falsifier.clone())
    }
}

/// A fixed value without candidates
#[derive(Debug, Clone)]
pub struct Unshrinkable<T> {
    value: T,
    distance: ShrinkingDistance,
}

impl<T: Clone + 'static> Shrinkable<T> for Unshrinkable<T> {
    fn value(&self) -> T {
        self.value.clone()
    }

    fn distance(&self) -> ShrinkingDistance {
        self.distance.clone()
    }

    fn shrink_candidates(&self) -> Candidates<T> {
        Box::new(iter::empty())
    }
}

/// Wrap a value that cannot be shrunk
pub fn unshrinkable<T: Clone + 'static>(value: T) -> RcShrinkable<T> {
    unshrinkable_at(value, ShrinkingDistance::MIN)
}

/// Wrap a value that cannot be shrunk but reports a given distance
pub fn unshrinkable_at<T: Clone + 'static>(
    value: T,
    distance: ShrinkingDistance,
) -> RcShrinkable<T> {
    Rc::new(Unshrinkable { value, distance })
}

struct MappedShrinkable<T, U> {
    inner: RcShrinkable<T>,
    mapper: Rc<dyn Fn(T) -> U>,
}

impl<T: 'static, U: 'static> Shrinkable<U> for MappedShrinkable<T, U> {
    fn value(&self) -> U {
        (self.mapper)(self.inner.value())
    }

    fn distance(&self) -> ShrinkingDistance {
        self.inner.distance()
    }

    fn shrink_candidates(&self) -> Candidates<U> {
        let mapper = self.mapper.clone();
        Box::new(self.inner.shrink_candidates().map(move |candidate| {
            Rc::new(MappedShrinkable {
                inner: candidate,
                mapper: mapper.clone(),
            }) as RcShrinkable<U>
        }))
    }
}

struct FilteredShrinkable<T> {
    inner: RcShrinkable<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T: 'static> Shrinkable<T> for FilteredShrinkable<T> {
    fn value(&self) -> T {
        self.inner.value()
    }

    fn distance(&self) -> ShrinkingDistance {
        self.inner.distance()
    }

    fn shrink_candidates(&self) -> Candidates<T> {
        filtered_candidates(&self.inner, self.predicate.clone(), FILTER_LOOKAHEAD_DEPTH)
    }
}

// Rejected candidates are not offered but their own candidates are, down to `depth`.
fn filtered_candidates<T: 'static>(
    source: &RcShrinkable<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
    depth: usize,
) -> Candidates<T> {
    Box::new(
        source
            .shrink_candidates()
            .flat_map(move |candidate| -> Candidates<T> {
                if predicate(&candidate.value()) {
                    Box::new(iter::once(Rc::new(FilteredShrinkable {
                        inner: candidate,
                        predicate: predicate.clone(),
                    }) as RcShrinkable<T>))
                } else if depth > 0 {
                    filtered_candidates(&candidate, predicate.clone(), depth - 1)
                } else {
                    Box::new(iter::empty())
                }
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use num_bigint::BigInt;

    fn integral(value: i64, min: i64, max: i64) -> RcShrinkable<i64> {
        let range = Range::of(BigInt::from(min), BigInt::from(max)).unwrap();
        let shrinkable: RcShrinkable<BigInt> =
            Rc::new(IntegralShrinkable::new(BigInt::from(value), range, BigInt::from(0)));
        shrinkable.map(|v| i64::try_from(v).unwrap_or_default())
    }

    #[test]
    fn test_unshrinkable_has_no_candidates() {
        let shrinkable = unshrinkable("fixed".to_string());
        assert_eq!(shrinkable.value(), "fixed");
        assert_eq!(shrinkable.distance(), ShrinkingDistance::MIN);
        assert_eq!(shrinkable.shrink_candidates().count(), 0);
    }

    #[test]
    fn test_map_keeps_distance_and_maps_candidates() {
        let shrinkable = integral(10, 0, 100).map(|v| format!("#{}", v));
        assert_eq!(shrinkable.value(), "#10");
        assert_eq!(shrinkable.distance(), ShrinkingDistance::of(&[10]));
        let values: Vec<String> = shrinkable.shrink_candidates().map(|c| c.value()).collect();
        assert_eq!(values, vec!["#0", "#5", "#8", "#9"]);
    }

    #[test]
    fn test_filter_skips_rejected_candidates() {
        let shrinkable = integral(10, 0, 100).filter(|v| v % 2 == 0);
        let values: Vec<i64> = shrinkable.shrink_candidates().map(|c| c.value()).collect();
        assert!(values.iter().all(|v| v % 2 == 0));
        assert_eq!(values.first(), Some(&0));
        assert!(values.contains(&8));
    }

    #[test]
    fn test_filter_looks_below_rejected_candidates() {
        // the target is clipped to 1; candidates of 9 are 1, 5, 7, 8 and
        // 4 only appears below the rejected 5
        let shrinkable = integral(9, 1, 100).filter(|v| v % 4 == 0);
        let values: Vec<i64> = shrinkable.shrink_candidates().map(|c| c.value()).collect();
        assert!(values.contains(&8));
        assert!(values.contains(&4));
        assert!(values.iter().all(|v| v % 4 == 0));
    }

    #[test]
    fn test_candidates_are_strictly_closer() {
        let shrinkable = integral(-37, -100, 100);
        let distance = shrinkable.distance();
        for candidate in shrinkable.shrink_candidates() {
            assert!(candidate.distance() < distance);
        }
    }
}
