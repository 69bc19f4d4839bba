//! Tuples of arbitraries, used for properties with several parameters.
//!
//! With embedded edge cases each component mixes in its own edge cases; the
//! tuple's edge cases are all combinations of its components' edge cases.
//! Shrinking works on one component after the other.

use super::Arbitrary;
use crate::error::PropertyError;
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{EdgeCase, RandomGenerator, edge_case};
use crate::shrinkable::{ShrinkableExt, pair};

fn component<A: Arbitrary>(
    arbitrary: &A,
    gen_size: usize,
    embedded: bool,
) -> Result<RandomGenerator<A::Value>, PropertyError> {
    if embedded {
        arbitrary.generator_with_embedded_edge_cases(gen_size)
    } else {
        arbitrary.generator(gen_size)
    }
}

fn pair_generator<A, B>(
    first: RandomGenerator<A>,
    second: RandomGenerator<B>,
) -> RandomGenerator<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    RandomGenerator::new(move |rng| Ok(pair(first.next(rng)?, second.next(rng)?)))
}

fn pair_edge_cases<A, B>(
    first: Vec<EdgeCase<A>>,
    second: Vec<EdgeCase<B>>,
) -> Vec<EdgeCase<(A, B)>>
where
    A: 'static,
    B: 'static,
{
    let mut edge_cases = Vec::with_capacity(first.len() * second.len());
    for a in &first {
        for b in &second {
            let (a, b) = (a.clone(), b.clone());
            edge_cases.push(edge_case(move || pair(a(), b())));
        }
    }
    edge_cases
}

fn map_edge_cases<T, U, F>(edge_cases: Vec<EdgeCase<T>>, mapper: F) -> Vec<EdgeCase<U>>
where
    T: Clone + 'static,
    U: 'static,
    F: Fn(T) -> U + Copy + Send + Sync + 'static,
{
    edge_cases
        .into_iter()
        .map(move |source| edge_case(move || source().map(mapper)))
        .collect()
}

fn generator2<A: Arbitrary, B: Arbitrary>(
    (a, b): &(A, B),
    gen_size: usize,
    embedded: bool,
) -> Result<RandomGenerator<(A::Value, B::Value)>, PropertyError> {
    Ok(pair_generator(
        component(a, gen_size, embedded)?,
        component(b, gen_size, embedded)?,
    ))
}

fn generator3<A: Arbitrary, B: Arbitrary, C: Arbitrary>(
    (a, b, c): &(A, B, C),
    gen_size: usize,
    embedded: bool,
) -> Result<RandomGenerator<(A::Value, B::Value, C::Value)>, PropertyError> {
    let first_two = pair_generator(
        component(a, gen_size, embedded)?,
        component(b, gen_size, embedded)?,
    );
    let third = component(c, gen_size, embedded)?;
    Ok(pair_generator(first_two, third).map(|((a, b), c)| (a, b, c)))
}

fn generator4<A: Arbitrary, B: Arbitrary, C: Arbitrary, D: Arbitrary>(
    (a, b, c, d): &(A, B, C, D),
    gen_size: usize,
    embedded: bool,
) -> Result<RandomGenerator<(A::Value, B::Value, C::Value, D::Value)>, PropertyError> {
    let first_two = pair_generator(
        component(a, gen_size, embedded)?,
        component(b, gen_size, embedded)?,
    );
    let last_two = pair_generator(
        component(c, gen_size, embedded)?,
        component(d, gen_size, embedded)?,
    );
    Ok(pair_generator(first_two, last_two).map(|((a, b), (c, d))| (a, b, c, d)))
}

impl<A, B> Arbitrary for (A, B)
where
    A: Arbitrary,
    B: Arbitrary,
{
    type Value = (A::Value, B::Value);

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator2(self, gen_size, false)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        exhaustive::pair(
            &self.0.exhaustive(max_samples)?,
            &self.1.exhaustive(max_samples)?,
            max_samples,
        )
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Self::Value>> {
        pair_edge_cases(self.0.edge_cases(), self.1.edge_cases())
    }

    fn generator_with_embedded_edge_cases(
        &self,
        gen_size: usize,
    ) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator2(self, gen_size, true)
    }
}

impl<A, B, C> Arbitrary for (A, B, C)
where
    A: Arbitrary,
    B: Arbitrary,
    C: Arbitrary,
{
    type Value = (A::Value, B::Value, C::Value);

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator3(self, gen_size, false)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        let first_two = exhaustive::pair(
            &self.0.exhaustive(max_samples)?,
            &self.1.exhaustive(max_samples)?,
            max_samples,
        )?;
        let all = exhaustive::pair(&first_two, &self.2.exhaustive(max_samples)?, max_samples)?;
        Some(all.map(|((a, b), c)| (a, b, c)))
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Self::Value>> {
        let first_two = pair_edge_cases(self.0.edge_cases(), self.1.edge_cases());
        map_edge_cases(
            pair_edge_cases(first_two, self.2.edge_cases()),
            |((a, b), c)| (a, b, c),
        )
    }

    fn generator_with_embedded_edge_cases(
        &self,
        gen_size: usize,
    ) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator3(self, gen_size, true)
    }
}

impl<A, B, C, D> Arbitrary for (A, B, C, D)
where
    A: Arbitrary,
    B: Arbitrary,
    C: Arbitrary,
    D: Arbitrary,
{
    type Value = (A::Value, B::Value, C::Value, D::Value);

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator4(self, gen_size, false)
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        let first_two = exhaustive::pair(
            &self.0.exhaustive(max_samples)?,
            &self.1.exhaustive(max_samples)?,
            max_samples,
        )?;
        let last_two = exhaustive::pair(
            &self.2.exhaustive(max_samples)?,
            &self.3.exhaustive(max_samples)?,
            max_samples,
        )?;
        let all = exhaustive::pair(&first_two, &last_two, max_samples)?;
        Some(all.map(|((a, b), (c, d))| (a, b, c, d)))
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Self::Value>> {
        let first_two = pair_edge_cases(self.0.edge_cases(), self.1.edge_cases());
        let last_two = pair_edge_cases(self.2.edge_cases(), self.3.edge_cases());
        map_edge_cases(
            pair_edge_cases(first_two, last_two),
            |((a, b), (c, d))| (a, b, c, d),
        )
    }

    fn generator_with_embedded_edge_cases(
        &self,
        gen_size: usize,
    ) -> Result<RandomGenerator<Self::Value>, PropertyError> {
        generator4(self, gen_size, true)
    }
}
