//! Randomized generation of shrinkable values.
//!
//! A [`RandomGenerator`] is a pure function from a random source to a
//! [`Shrinkable`](crate::shrinkable::Shrinkable). Generators hold no mutable
//! state and can be shared between threads; the shrinkables they produce are
//! confined to the executing thread.

mod container;
mod numeric;

pub use container::{
    DEFAULT_COLLECTION_SIZE, choose_size, container_generator, default_max_size,
};
pub use numeric::{
    decimal_generator, default_partition_points, integral_generator, partitioned_ranges,
    sample_uniform,
};

use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::error::PropertyError;
use crate::shrinkable::{
    FlatMappedShrinkable, GeneratorMapper, RcShrinkable, ShrinkableExt, unshrinkable,
};

/// Consecutive misses after which a filtering generator gives up
pub const MAX_FILTER_MISSES: usize = 10_000;

type GenerateFn<T> =
    dyn Fn(&mut dyn RngCore) -> Result<RcShrinkable<T>, PropertyError> + Send + Sync;

/// An edge case, created fresh for every use
pub type EdgeCase<T> = Arc<dyn Fn() -> RcShrinkable<T> + Send + Sync>;

/// Wrap a shrinkable factory as an edge case
pub fn edge_case<T, F>(factory: F) -> EdgeCase<T>
where
    F: Fn() -> RcShrinkable<T> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// Produces shrinkable values from a random source
pub struct RandomGenerator<T> {
    generate: Arc<GenerateFn<T>>,
}

impl<T> Clone for RandomGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            generate: self.generate.clone(),
        }
    }
}

impl<T: Clone + 'static> RandomGenerator<T> {
    pub fn new<F>(generate: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Result<RcShrinkable<T>, PropertyError> + Send + Sync + 'static,
    {
        Self {
            generate: Arc::new(generate),
        }
    }

    /// Always produce `value`, unshrinkable
    pub fn constant(value: T) -> Self
    where
        T: Send + Sync,
    {
        Self::new(move |_| Ok(unshrinkable(value.clone())))
    }

    /// Fail every draw with `error`
    pub fn failing(error: PropertyError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Draw the next value
    pub fn next(&self, rng: &mut dyn RngCore) -> Result<RcShrinkable<T>, PropertyError> {
        (self.generate)(rng)
    }

    pub fn map<U, F>(&self, mapper: F) -> RandomGenerator<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let mapper = Arc::new(mapper);
        RandomGenerator::new(move |rng| {
            let mapper = mapper.clone();
            Ok(source.next(rng)?.map(move |value| mapper(value)))
        })
    }

    /// Keep drawing until `predicate` holds, at most [`MAX_FILTER_MISSES`]
    /// times in a row
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Self::new(move |rng| {
            for _ in 0..MAX_FILTER_MISSES {
                let shrinkable = source.next(rng)?;
                if predicate(&shrinkable.value()) {
                    let predicate = predicate.clone();
                    return Ok(shrinkable.filter(move |value| predicate(value)));
                }
            }
            Err(PropertyError::too_many_filter_misses(
                MAX_FILTER_MISSES,
                None::<String>,
            ))
        })
    }

    /// Use each value to pick the generator of the final value.
    ///
    /// The inner generator is driven by a recorded seed so that shrinking the
    /// outer value can regenerate an inner one.
    pub fn flat_map<U, F>(&self, mapper: F) -> RandomGenerator<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> RandomGenerator<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let mapper: GeneratorMapper<T, U> = Arc::new(mapper);
        RandomGenerator::new(move |rng| {
            let base = source.next(rng)?;
            let seed = rng.next_u64();
            FlatMappedShrinkable::generate(base, mapper.clone(), seed).ok_or_else(|| {
                PropertyError::generation_failed_with_context(
                    "inner generator of a flat-mapped value failed",
                    None::<String>,
                )
            })
        })
    }

    /// Mix in `edge_cases` with probability `1 / ratio`.
    ///
    /// The ratio is `clamp(gen_size / count, 3, 100) + 1`, so a few edge cases
    /// for a large `gen_size` are injected rarely.
    pub fn with_edge_cases(&self, gen_size: usize, edge_cases: Vec<EdgeCase<T>>) -> Self {
        if edge_cases.is_empty() {
            return self.clone();
        }
        let ratio = (gen_size / edge_cases.len()).clamp(3, 100) + 1;
        let source = self.clone();
        Self::new(move |rng| {
            if rng.gen_range(0..ratio) == 0 {
                let pick = rng.gen_range(0..edge_cases.len());
                Ok((edge_cases[pick])())
            } else {
                source.next(rng)
            }
        })
    }
}

/// Pick one of `generators` uniformly for each value
pub fn one_of<T: Clone + 'static>(
    generators: Vec<RandomGenerator<T>>,
) -> Result<RandomGenerator<T>, PropertyError> {
    frequency(generators.into_iter().map(|g| (1, g)).collect())
}

/// Pick a generator with probability proportional to its weight
pub fn frequency<T: Clone + 'static>(
    weighted: Vec<(u32, RandomGenerator<T>)>,
) -> Result<RandomGenerator<T>, PropertyError> {
    let weighted: Vec<(u32, RandomGenerator<T>)> =
        weighted.into_iter().filter(|(weight, _)| *weight > 0).collect();
    let total: u64 = weighted.iter().map(|(weight, _)| u64::from(*weight)).sum();
    if total == 0 {
        return Err(PropertyError::generation_failed_with_context(
            "at least one choice with a positive weight is required",
            None::<String>,
        ));
    }
    Ok(RandomGenerator::new(move |rng| {
        let mut roll = rng.gen_range(0..total);
        for (weight, generator) in &weighted {
            let weight = u64::from(*weight);
            if roll < weight {
                return generator.next(rng);
            }
            roll -= weight;
        }
        Err(PropertyError::internal_error(
            "frequency roll exceeded the total weight",
            None::<String>,
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use num_bigint::BigInt;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_ints() -> RandomGenerator<i64> {
        let range = Range::of(BigInt::from(0), BigInt::from(100)).unwrap();
        integral_generator(range, 100, BigInt::from(0))
            .map(|v| i64::try_from(v).unwrap_or_default())
    }

    #[test]
    fn test_constant() {
        let mut rng = StdRng::seed_from_u64(1);
        let shrinkable = RandomGenerator::constant("x").next(&mut rng).unwrap();
        assert_eq!(shrinkable.value(), "x");
        assert_eq!(shrinkable.shrink_candidates().count(), 0);
    }

    #[test]
    fn test_map_and_filter() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = small_ints().filter(|v| v % 2 == 0).map(|v| v * 10);
        for _ in 0..100 {
            let value = generator.next(&mut rng).unwrap().value();
            assert_eq!(value % 20, 0);
            assert!((0..=1000).contains(&value));
        }
    }

    #[test]
    fn test_filter_gives_up() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = small_ints().filter(|v| *v > 1000);
        assert!(matches!(
            generator.next(&mut rng),
            Err(PropertyError::TooManyFilterMisses { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_values() {
        let generator = small_ints();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| generator.next(&mut rng).unwrap().value())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_edge_cases_are_mixed_in() {
        let mut rng = StdRng::seed_from_u64(3);
        let generator =
            RandomGenerator::constant(5).with_edge_cases(0, vec![edge_case(|| unshrinkable(-1))]);
        let values: Vec<i32> = (0..200)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect();
        assert!(values.contains(&-1));
        assert!(values.contains(&5));
    }

    #[test]
    fn test_flat_map_regenerates_inner_value() {
        let mut rng = StdRng::seed_from_u64(11);
        let lengths = small_ints().filter(|v| *v > 0);
        let generator = lengths.flat_map(|len| {
            let range = Range::of(BigInt::from(0), BigInt::from(len)).unwrap();
            integral_generator(range, 100, BigInt::from(0))
                .map(move |v| (len, i64::try_from(v).unwrap_or_default()))
        });
        let shrinkable = generator.next(&mut rng).unwrap();
        let (len, value) = shrinkable.value();
        assert!(value <= len);
        for candidate in shrinkable.shrink_candidates() {
            let (len, value) = candidate.value();
            assert!((0..=len).contains(&value));
            assert!(candidate.distance() < shrinkable.distance());
        }
    }

    #[test]
    fn test_frequency_ignores_zero_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = frequency(vec![
            (0, RandomGenerator::constant('a')),
            (3, RandomGenerator::constant('b')),
        ])
        .unwrap();
        for _ in 0..50 {
            assert_eq!(generator.next(&mut rng).unwrap().value(), 'b');
        }
        assert!(frequency::<char>(Vec::new()).is_err());
    }
}
