//! Exhaustive generation for small domains.
//!
//! An [`ExhaustiveGenerator`] enumerates every value of a finite domain in a
//! fixed order. Its `max_count` is exact when built from a domain and an
//! upper bound after [`filter`](ExhaustiveGenerator::filter).

use std::collections::BTreeSet;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::combinatorics::{
    Iterable, iterable, list_combinations, list_count, list_permutations, permutation_count,
    restartable, set_combinations, set_count,
};
use crate::range::Range;

/// A restartable, ordered enumeration with a known size
pub struct ExhaustiveGenerator<T> {
    max_count: u64,
    source: Iterable<T>,
}

impl<T> Clone for ExhaustiveGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            max_count: self.max_count,
            source: self.source.clone(),
        }
    }
}

impl<T: Clone + 'static> ExhaustiveGenerator<T> {
    pub fn new(max_count: u64, source: Iterable<T>) -> Self {
        Self { max_count, source }
    }

    /// Enumerate `values` in order, unless there are more than `max_samples`
    pub fn from_values(values: Vec<T>, max_samples: u64) -> Option<Self>
    where
        T: Send + Sync,
    {
        let count = values.len() as u64;
        within(count, max_samples)?;
        Some(Self::new(count, iterable(values)))
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn source(&self) -> Iterable<T> {
        self.source.clone()
    }

    /// A fresh pass over all values
    pub fn iter(&self) -> Box<dyn Iterator<Item = T>> {
        (self.source)()
    }

    pub fn map<U, F>(&self, mapper: F) -> ExhaustiveGenerator<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.source.clone();
        let mapper = Arc::new(mapper);
        ExhaustiveGenerator::new(
            self.max_count,
            restartable(move || {
                let mapper = mapper.clone();
                source().map(move |value| mapper(value))
            }),
        )
    }

    /// Skip values failing `predicate`; `max_count` stays unchanged
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.source.clone();
        let predicate = Arc::new(predicate);
        Self::new(
            self.max_count,
            restartable(move || {
                let predicate = predicate.clone();
                source().filter(move |value| predicate(value))
            }),
        )
    }

    /// For each value, all values of the generator it maps to.
    ///
    /// The count is computed by building every inner generator once.
    pub fn flat_map<U, F>(&self, mapper: F, max_samples: u64) -> Option<ExhaustiveGenerator<U>>
    where
        U: Clone + 'static,
        F: Fn(T) -> Option<ExhaustiveGenerator<U>> + Send + Sync + 'static,
    {
        let mut count = 0u64;
        for value in self.iter() {
            count = count.checked_add(mapper(value)?.max_count)?;
            within(count, max_samples)?;
        }
        let source = self.source.clone();
        let mapper = Arc::new(mapper);
        Some(ExhaustiveGenerator::new(
            count,
            restartable(move || {
                let mapper = mapper.clone();
                source()
                    .filter_map(move |value| mapper(value))
                    .flat_map(|inner| inner.iter())
            }),
        ))
    }
}

fn within(count: u64, max_samples: u64) -> Option<()> {
    (count <= max_samples).then_some(())
}

/// All integers of `range` in ascending order
pub fn integral_range(
    range: &Range<BigInt>,
    max_samples: u64,
) -> Option<ExhaustiveGenerator<BigInt>> {
    let count = (range.max() - range.min() + 1u32).to_u64()?;
    within(count, max_samples)?;
    let min = range.min().clone();
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || {
            let min = min.clone();
            (0..count).map(move |offset| &min + offset)
        }),
    ))
}

/// Lists of `min_size..=max_size` elements, shorter lists first
pub fn list<T>(
    element: &ExhaustiveGenerator<T>,
    min_size: usize,
    max_size: usize,
    max_samples: u64,
) -> Option<ExhaustiveGenerator<Vec<T>>>
where
    T: Clone + 'static,
{
    let count = list_count(element.max_count, min_size, max_size)?;
    within(count, max_samples)?;
    let elements = element.source();
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || list_combinations(elements.clone(), min_size, max_size)),
    ))
}

/// Sets of `min_size..=max_size` distinct elements, smaller sets first
pub fn set<T>(
    element: &ExhaustiveGenerator<T>,
    min_size: usize,
    max_size: usize,
    max_samples: u64,
) -> Option<ExhaustiveGenerator<BTreeSet<T>>>
where
    T: Clone + Ord + 'static,
{
    let count = set_count(element.max_count, min_size, max_size)?;
    within(count, max_samples)?;
    let elements = element.source();
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || set_combinations(elements.clone(), min_size, max_size)),
    ))
}

/// Every ordering of `values`
pub fn permutations<T>(values: Vec<T>, max_samples: u64) -> Option<ExhaustiveGenerator<Vec<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    let count = permutation_count(values.len() as u64)?;
    within(count, max_samples)?;
    let values = Arc::new(values);
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || list_permutations(values.as_ref().clone())),
    ))
}

/// Cartesian product; the second component varies fastest
pub fn pair<A, B>(
    first: &ExhaustiveGenerator<A>,
    second: &ExhaustiveGenerator<B>,
    max_samples: u64,
) -> Option<ExhaustiveGenerator<(A, B)>>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let count = first.max_count.checked_mul(second.max_count)?;
    within(count, max_samples)?;
    let (first, second) = (first.source(), second.source());
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || {
            let second = second.clone();
            first().flat_map(move |a| second().map(move |b| (a.clone(), b)))
        }),
    ))
}
