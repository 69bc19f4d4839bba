use std::fmt::Debug;
use std::sync::Arc;

use rand::seq::SliceRandom;

use super::{Arbitrary, ArbitraryExt, BoxedArbitrary, integers};
use crate::combinatorics::{ConcatIterator, restartable};
use crate::error::PropertyError;
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{self, EdgeCase, RandomGenerator, edge_case};
use crate::shrinkable::unshrinkable;

/// Always the same value
#[derive(Debug, Clone)]
pub struct JustArbitrary<T> {
    value: T,
}

pub fn just<T: Clone + Debug + Send + Sync + 'static>(value: T) -> JustArbitrary<T> {
    JustArbitrary { value }
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for JustArbitrary<T> {
    type Value = T;

    fn generator(&self, _gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        Ok(RandomGenerator::constant(self.value.clone()))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        ExhaustiveGenerator::from_values(vec![self.value.clone()], max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        let value = self.value.clone();
        vec![edge_case(move || unshrinkable(value.clone()))]
    }
}

/// One of a fixed list of values; shrinks toward earlier entries
#[derive(Debug, Clone)]
pub struct ChooseArbitrary<T> {
    values: Arc<Vec<T>>,
}

/// Choose uniformly from `values`
pub fn of<T: Clone + Debug + Send + Sync + 'static>(
    values: Vec<T>,
) -> Result<ChooseArbitrary<T>, PropertyError> {
    if values.is_empty() {
        return Err(PropertyError::generation_failed_with_context(
            "cannot choose from an empty list of values",
            None::<String>,
        ));
    }
    Ok(ChooseArbitrary {
        values: Arc::new(values),
    })
}

/// `false` or `true`; shrinks toward `false`
pub fn bools() -> ChooseArbitrary<bool> {
    ChooseArbitrary {
        values: Arc::new(vec![false, true]),
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> ChooseArbitrary<T> {
    fn indices(&self) -> Result<super::IntegralArbitrary<usize>, PropertyError> {
        integers::<usize>().between(0, self.values.len().saturating_sub(1))
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for ChooseArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        let values = self.values.clone();
        Ok(self
            .indices()?
            .generator(gen_size)?
            .map(move |index| values[index].clone()))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        ExhaustiveGenerator::from_values(self.values.as_ref().clone(), max_samples)
    }

    /// The first and the last value
    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        let Ok(indices) = self.indices() else {
            return Vec::new();
        };
        let values = self.values.clone();
        indices
            .include_only_edge_cases(vec![0, self.values.len() - 1])
            .map(move |index| values[index].clone())
            .edge_cases()
    }
}

/// A value of one of several arbitraries, each picked with equal probability
pub struct OneOfArbitrary<T> {
    choices: Vec<BoxedArbitrary<T>>,
}

pub fn one_of<T: Clone + Debug + Send + Sync + 'static>(
    choices: Vec<BoxedArbitrary<T>>,
) -> Result<OneOfArbitrary<T>, PropertyError> {
    if choices.is_empty() {
        return Err(PropertyError::generation_failed_with_context(
            "one_of requires at least one arbitrary",
            None::<String>,
        ));
    }
    Ok(OneOfArbitrary { choices })
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for OneOfArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        let generators = self
            .choices
            .iter()
            .map(|choice| choice.generator_with_embedded_edge_cases(gen_size))
            .collect::<Result<Vec<_>, _>>()?;
        generator::one_of(generators)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        concatenated(&self.choices, max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        self.choices.iter().flat_map(|c| c.edge_cases()).collect()
    }
}

/// A value of one of several arbitraries, picked proportionally to a weight
pub struct FrequencyArbitrary<T> {
    choices: Vec<(u32, BoxedArbitrary<T>)>,
}

/// Choose among fixed values by weight
pub fn frequency<T: Clone + Debug + Send + Sync + 'static>(
    weighted: Vec<(u32, T)>,
) -> Result<FrequencyArbitrary<T>, PropertyError> {
    frequency_of(
        weighted
            .into_iter()
            .map(|(weight, value)| (weight, just(value).boxed()))
            .collect(),
    )
}

/// Choose among arbitraries by weight; zero weights are never picked
pub fn frequency_of<T: Clone + Debug + Send + Sync + 'static>(
    weighted: Vec<(u32, BoxedArbitrary<T>)>,
) -> Result<FrequencyArbitrary<T>, PropertyError> {
    let choices: Vec<(u32, BoxedArbitrary<T>)> =
        weighted.into_iter().filter(|(weight, _)| *weight > 0).collect();
    if choices.is_empty() {
        return Err(PropertyError::generation_failed_with_context(
            "at least one choice with a positive weight is required",
            None::<String>,
        ));
    }
    Ok(FrequencyArbitrary { choices })
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for FrequencyArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        let weighted = self
            .choices
            .iter()
            .map(|(weight, choice)| {
                Ok((*weight, choice.generator_with_embedded_edge_cases(gen_size)?))
            })
            .collect::<Result<Vec<_>, PropertyError>>()?;
        generator::frequency(weighted)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        let choices: Vec<BoxedArbitrary<T>> =
            self.choices.iter().map(|(_, choice)| choice.clone()).collect();
        concatenated(&choices, max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        self.choices
            .iter()
            .flat_map(|(_, choice)| choice.edge_cases())
            .collect()
    }
}

fn concatenated<T: Clone + Debug + Send + Sync + 'static>(
    choices: &[BoxedArbitrary<T>],
    max_samples: u64,
) -> Option<ExhaustiveGenerator<T>> {
    let mut count = 0u64;
    let mut sources = Vec::with_capacity(choices.len());
    for choice in choices {
        let exhaustive = choice.exhaustive(max_samples)?;
        count = count.checked_add(exhaustive.max_count())?;
        if count > max_samples {
            return None;
        }
        sources.push(exhaustive.source());
    }
    Some(ExhaustiveGenerator::new(
        count,
        restartable(move || ConcatIterator::new(sources.iter().map(|source| source()).collect())),
    ))
}

/// Random orderings of a list; not shrinkable
#[derive(Debug, Clone)]
pub struct ShuffleArbitrary<T> {
    values: Vec<T>,
}

pub fn shuffle<T: Clone + Debug + Send + Sync + 'static>(values: Vec<T>) -> ShuffleArbitrary<T> {
    ShuffleArbitrary { values }
}

impl<T: Clone + Debug + Send + Sync + 'static> Arbitrary for ShuffleArbitrary<T> {
    type Value = Vec<T>;

    fn generator(&self, _gen_size: usize) -> Result<RandomGenerator<Vec<T>>, PropertyError> {
        let values = self.values.clone();
        Ok(RandomGenerator::new(move |rng| {
            let mut shuffled = values.clone();
            shuffled.shuffle(rng);
            Ok(unshrinkable(shuffled))
        }))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<Vec<T>>> {
        exhaustive::permutations(self.values.clone(), max_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrinkable::Shrinkable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn edge_values<A: Arbitrary>(arbitrary: &A) -> Vec<A::Value> {
        arbitrary.edge_cases().iter().map(|e| e().value()).collect()
    }

    #[test]
    fn test_just() {
        let mut rng = StdRng::seed_from_u64(1);
        let arbitrary = just("constant");
        let value = arbitrary.generator(10).unwrap().next(&mut rng).unwrap();
        assert_eq!(value.value(), "constant");
        assert_eq!(value.shrink_candidates().count(), 0);
        assert_eq!(arbitrary.exhaustive(1).unwrap().max_count(), 1);
    }

    #[test]
    fn test_choose_shrinks_toward_first_value() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = of(vec!["north", "east", "south", "west"])
            .unwrap()
            .generator(100)
            .unwrap();
        let seen: HashSet<&str> = (0..200)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect();
        assert_eq!(seen.len(), 4);

        let mut shrinkable = generator.next(&mut rng).unwrap();
        while shrinkable.value() == "north" {
            shrinkable = generator.next(&mut rng).unwrap();
        }
        let first = shrinkable.shrink_candidates().next().unwrap();
        assert_eq!(first.value(), "north");
    }

    #[test]
    fn test_choose_from_nothing_fails() {
        assert!(of(Vec::<i32>::new()).is_err());
    }

    #[test]
    fn test_bools() {
        let all: Vec<bool> = bools().exhaustive(10).unwrap().iter().collect();
        assert_eq!(all, vec![false, true]);
        assert_eq!(edge_values(&bools()), vec![false, true]);
    }

    #[test]
    fn test_one_of_covers_all_choices() {
        let mut rng = StdRng::seed_from_u64(9);
        let arbitrary = one_of(vec![
            integers::<i32>().between(0, 9).unwrap().boxed(),
            integers::<i32>().between(100, 109).unwrap().boxed(),
        ])
        .unwrap();
        let generator = arbitrary.generator(100).unwrap();
        let values: Vec<i32> = (0..200)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect();
        assert!(values.iter().any(|v| *v < 10));
        assert!(values.iter().any(|v| *v >= 100));
        assert!(values.iter().all(|v| *v < 10 || (100..110).contains(v)));

        let exhaustive = arbitrary.exhaustive(100).unwrap();
        assert_eq!(exhaustive.max_count(), 20);
        assert_eq!(exhaustive.iter().count(), 20);
        assert!(arbitrary.exhaustive(10).is_none());
    }

    #[test]
    fn test_frequency_skips_zero_weights() {
        let mut rng = StdRng::seed_from_u64(13);
        let arbitrary = frequency(vec![(0, 'x'), (3, 'a'), (1, 'b')]).unwrap();
        let generator = arbitrary.generator(100).unwrap();
        let values: Vec<char> = (0..400)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect();
        assert!(!values.contains(&'x'));
        let a = values.iter().filter(|c| **c == 'a').count();
        assert!(a > 200);

        let all: Vec<char> = arbitrary.exhaustive(10).unwrap().iter().collect();
        assert_eq!(all, vec!['a', 'b']);
        assert!(frequency(vec![(0, 1)]).is_err());
    }

    #[test]
    fn test_shuffle() {
        let mut rng = StdRng::seed_from_u64(2);
        let arbitrary = shuffle(vec![1, 2, 3, 4]);
        let generator = arbitrary.generator(10).unwrap();
        for _ in 0..20 {
            let mut value = generator.next(&mut rng).unwrap().value();
            value.sort();
            assert_eq!(value, vec![1, 2, 3, 4]);
        }
        assert_eq!(arbitrary.exhaustive(100).unwrap().max_count(), 24);
    }
}
