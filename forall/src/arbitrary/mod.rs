//! Composable descriptions of how to produce values.
//!
//! An [`Arbitrary`] is an immutable descriptor. It creates a
//! [`RandomGenerator`] for a given `gen_size`, can optionally enumerate its
//! domain exhaustively and declares edge cases. Descriptors are combined with
//! the methods of [`ArbitraryExt`].

mod choice;
mod collections;
mod numbers;
mod registry;
mod text;
mod tuples;

pub use choice::{
    ChooseArbitrary, FrequencyArbitrary, JustArbitrary, OneOfArbitrary, ShuffleArbitrary, bools,
    frequency, frequency_of, just, of, one_of, shuffle,
};
pub use collections::{ListArbitrary, SetArbitrary};
pub use numbers::{
    DecimalArbitrary, DoubleArbitrary, IntegralArbitrary, IntegralValue, big_integers, decimals,
    doubles, integers,
};
pub use registry::{ArbitraryRegistry, DefaultArbitrary, any};
pub use text::{CharArbitrary, StringArbitrary, chars, strings};

use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PropertyError;
use crate::exhaustive::ExhaustiveGenerator;
use crate::generator::{EdgeCase, RandomGenerator, edge_case};
use crate::shrinkable::{ShrinkableExt, unshrinkable};

/// Describes how to generate values of one type
pub trait Arbitrary: Send + Sync {
    type Value: Clone + Debug + Send + Sync + 'static;

    /// Random generator for a generation size hint
    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Self::Value>, PropertyError>;

    /// All values in a fixed order, if there are at most `max_samples`
    fn exhaustive(&self, _max_samples: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        None
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Self::Value>> {
        Vec::new()
    }

    /// Random generator with this arbitrary's edge cases mixed in
    fn generator_with_embedded_edge_cases(
        &self,
        gen_size: usize,
    ) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        Ok(self
            .generator(gen_size)?
            .with_edge_cases(gen_size, self.edge_cases()))
    }
}

/// Stable identity of a boxed arbitrary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArbitraryId(u64);

impl ArbitraryId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ArbitraryId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArbitraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arbitrary#{}", self.0)
    }
}

/// Type-erased arbitrary; equality and hashing use its [`ArbitraryId`]
pub struct BoxedArbitrary<T> {
    id: ArbitraryId,
    inner: Arc<dyn Arbitrary<Value = T>>,
}

impl<T> Clone for BoxedArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> BoxedArbitrary<T> {
    pub fn new<A>(arbitrary: A) -> Self
    where
        A: Arbitrary<Value = T> + 'static,
    {
        Self {
            id: ArbitraryId::next(),
            inner: Arc::new(arbitrary),
        }
    }

    pub fn id(&self) -> ArbitraryId {
        self.id
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for BoxedArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        self.inner.generator(gen_size)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        self.inner.exhaustive(max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        self.inner.edge_cases()
    }

    fn generator_with_embedded_edge_cases(
        &self,
        gen_size: usize,
    ) -> Result<RandomGenerator<T>, PropertyError> {
        self.inner.generator_with_embedded_edge_cases(gen_size)
    }
}

impl<T> PartialEq for BoxedArbitrary<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for BoxedArbitrary<T> {}

impl<T> Hash for BoxedArbitrary<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Debug for BoxedArbitrary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedArbitrary").field("id", &self.id).finish()
    }
}

/// Combinators for every arbitrary
pub trait ArbitraryExt: Arbitrary + Sized + 'static {
    fn boxed(self) -> BoxedArbitrary<Self::Value> {
        BoxedArbitrary::new(self)
    }

    fn map<U, F>(self, mapper: F) -> MappedArbitrary<Self::Value, U>
    where
        U: Clone + Debug + Send + Sync + 'static,
        F: Fn(Self::Value) -> U + Send + Sync + 'static,
    {
        MappedArbitrary {
            source: self.boxed(),
            mapper: Arc::new(mapper),
        }
    }

    fn filter<F>(self, predicate: F) -> FilteredArbitrary<Self::Value>
    where
        F: Fn(&Self::Value) -> bool + Send + Sync + 'static,
    {
        FilteredArbitrary {
            source: self.boxed(),
            predicate: Arc::new(predicate),
        }
    }

    /// Use each value to choose the arbitrary of the final value
    fn flat_map<A, F>(self, mapper: F) -> FlatMappedArbitrary<Self::Value, A::Value>
    where
        A: Arbitrary + 'static,
        F: Fn(Self::Value) -> A + Send + Sync + 'static,
    {
        FlatMappedArbitrary {
            source: self.boxed(),
            mapper: Arc::new(move |value: Self::Value| mapper(value).boxed()),
        }
    }

    fn list(self) -> ListArbitrary<Self::Value>
    where
        Self::Value: PartialEq,
    {
        ListArbitrary::new(self.boxed())
    }

    fn set(self) -> SetArbitrary<Self::Value>
    where
        Self::Value: Ord,
    {
        SetArbitrary::new(self.boxed())
    }

    /// Keep only the edge cases whose value is one of `values`
    fn include_only_edge_cases(self, values: Vec<Self::Value>) -> EdgeCasesArbitrary<Self::Value>
    where
        Self::Value: PartialEq,
    {
        EdgeCasesArbitrary {
            source: self.boxed(),
            include_only: Some(Arc::new(move |value: &Self::Value| values.contains(value))),
            added: Vec::new(),
        }
    }

    /// Declare `value` as an additional edge case
    fn add_edge_case(self, value: Self::Value) -> EdgeCasesArbitrary<Self::Value> {
        EdgeCasesArbitrary {
            source: self.boxed(),
            include_only: None,
            added: vec![value],
        }
    }

    fn without_edge_cases(self) -> EdgeCasesArbitrary<Self::Value> {
        EdgeCasesArbitrary {
            source: self.boxed(),
            include_only: Some(Arc::new(|_: &Self::Value| false)),
            added: Vec::new(),
        }
    }
}

impl<A: Arbitrary + 'static> ArbitraryExt for A {}

type Mapper<T, U> = Arc<dyn Fn(T) -> U + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Values of another arbitrary passed through a function
pub struct MappedArbitrary<T, U> {
    source: BoxedArbitrary<T>,
    mapper: Mapper<T, U>,
}

impl<T, U> Arbitrary for MappedArbitrary<T, U>
where
    T: Clone + Debug + Send + Sync + 'static,
    U: Clone + Debug + Send + Sync + 'static,
{
    type Value = U;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<U>, PropertyError> {
        let mapper = self.mapper.clone();
        Ok(self.source.generator(gen_size)?.map(move |value| mapper(value)))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<U>> {
        let mapper = self.mapper.clone();
        Some(self.source.exhaustive(max_samples)?.map(move |value| mapper(value)))
    }

    fn edge_cases(&self) -> Vec<EdgeCase<U>> {
        self.source
            .edge_cases()
            .into_iter()
            .map(|source| {
                let mapper = self.mapper.clone();
                edge_case(move || {
                    let mapper = mapper.clone();
                    source().map(move |value| mapper(value))
                })
            })
            .collect()
    }
}

/// Values of another arbitrary that satisfy a predicate
pub struct FilteredArbitrary<T> {
    source: BoxedArbitrary<T>,
    predicate: Predicate<T>,
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for FilteredArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        let predicate = self.predicate.clone();
        Ok(self
            .source
            .generator(gen_size)?
            .filter(move |value| predicate(value)))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        let predicate = self.predicate.clone();
        Some(
            self.source
                .exhaustive(max_samples)?
                .filter(move |value| predicate(value)),
        )
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        self.source
            .edge_cases()
            .into_iter()
            .filter(|source| (self.predicate)(&source().value()))
            .map(|source| {
                let predicate = self.predicate.clone();
                edge_case(move || {
                    let predicate = predicate.clone();
                    source().filter(move |value| predicate(value))
                })
            })
            .collect()
    }
}

/// Values drawn from an arbitrary chosen by another value
pub struct FlatMappedArbitrary<T, U> {
    source: BoxedArbitrary<T>,
    mapper: Mapper<T, BoxedArbitrary<U>>,
}

impl<T, U> Arbitrary for FlatMappedArbitrary<T, U>
where
    T: Clone + Debug + Send + Sync + 'static,
    U: Clone + Debug + Send + Sync + 'static,
{
    type Value = U;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<U>, PropertyError> {
        let mapper = self.mapper.clone();
        Ok(self.source.generator(gen_size)?.flat_map(move |value| {
            mapper(value)
                .generator(gen_size)
                .unwrap_or_else(RandomGenerator::failing)
        }))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<U>> {
        let mapper = self.mapper.clone();
        self.source.exhaustive(max_samples)?.flat_map(
            move |value| mapper(value).exhaustive(max_samples),
            max_samples,
        )
    }
}

/// Another arbitrary with reconfigured edge cases
pub struct EdgeCasesArbitrary<T> {
    source: BoxedArbitrary<T>,
    include_only: Option<Predicate<T>>,
    added: Vec<T>,
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for EdgeCasesArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        self.source.generator(gen_size)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        self.source.exhaustive(max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        let mut edge_cases: Vec<EdgeCase<T>> = self
            .source
            .edge_cases()
            .into_iter()
            .filter(|source| match &self.include_only {
                Some(include) => include(&source().value()),
                None => true,
            })
            .collect();
        for value in &self.added {
            let value = value.clone();
            edge_cases.push(edge_case(move || unshrinkable(value.clone())));
        }
        edge_cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn edge_values<A: Arbitrary>(arbitrary: &A) -> Vec<A::Value> {
        arbitrary.edge_cases().iter().map(|e| e().value()).collect()
    }

    #[test]
    fn test_boxed_identity() {
        let first = integers::<i32>().boxed();
        let second = integers::<i32>().boxed();
        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_map_filter_generation() {
        let mut rng = StdRng::seed_from_u64(17);
        let arbitrary = integers::<i32>()
            .between(0, 100)
            .unwrap()
            .filter(|v| v % 2 == 0)
            .map(|v| format!("#{}", v));
        let generator = arbitrary.generator(100).unwrap();
        for _ in 0..100 {
            let value = generator.next(&mut rng).unwrap().value();
            let number: i32 = value[1..].parse().unwrap();
            assert_eq!(number % 2, 0);
        }
    }

    #[test]
    fn test_mapped_and_filtered_edge_cases() {
        let arbitrary = integers::<i32>().between(-5, 5).unwrap();
        let evens = edge_values(&arbitrary.boxed().filter(|v| v % 2 == 0));
        assert!(evens.iter().all(|v| v % 2 == 0));
        assert!(evens.contains(&0));

        let doubled = edge_values(&integers::<i32>().between(1, 3).unwrap().map(|v| v * 2));
        assert!(doubled.contains(&2));
        assert!(doubled.contains(&6));
    }

    #[test]
    fn test_flat_map_generation_and_exhaustion() {
        let mut rng = StdRng::seed_from_u64(3);
        let arbitrary = integers::<usize>()
            .between(1, 3)
            .unwrap()
            .flat_map(|len| integers::<usize>().between(0, 10).unwrap().list().of_size(len));
        let generator = arbitrary.generator(100).unwrap();
        for _ in 0..50 {
            let list = generator.next(&mut rng).unwrap().value();
            assert!((1..=3).contains(&list.len()));
        }

        let small = integers::<u8>()
            .between(1, 2)
            .unwrap()
            .flat_map(|n| integers::<u8>().between(0, n).unwrap());
        let all: Vec<u8> = small.exhaustive(100).unwrap().iter().collect();
        assert_eq!(all, vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_edge_case_configuration() {
        let only_zero = integers::<i32>()
            .between(-10, 10)
            .unwrap()
            .include_only_edge_cases(vec![0]);
        assert_eq!(edge_values(&only_zero), vec![0]);

        let added = integers::<i32>()
            .between(-10, 10)
            .unwrap()
            .without_edge_cases()
            .add_edge_case(7);
        assert_eq!(edge_values(&added), vec![7]);
    }
}
