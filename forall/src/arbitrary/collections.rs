use std::collections::BTreeSet;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

use super::{Arbitrary, BoxedArbitrary};
use crate::error::PropertyError;
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{
    DEFAULT_COLLECTION_SIZE, EdgeCase, RandomGenerator, container_generator, default_max_size,
    edge_case,
};
use crate::shrinkable::{Collector, ContainerShrinkable, RcShrinkable};

/// Bounds shared by lists and sets
#[derive(Debug, Clone, Copy)]
struct SizeBounds {
    min_size: usize,
    max_size: Option<usize>,
}

impl SizeBounds {
    fn max_for(&self, gen_size: usize) -> usize {
        self.max_size
            .unwrap_or_else(|| default_max_size(self.min_size, gen_size))
    }

    fn exhaustive_max(&self) -> usize {
        self.max_size.unwrap_or(DEFAULT_COLLECTION_SIZE)
    }
}

/// Edge cases of a container: the empty one, then one container per element
/// edge case holding that element as often as the minimum size requires.
fn container_edge_cases<E, C>(
    element_edge_cases: Vec<EdgeCase<E>>,
    bounds: SizeBounds,
    unique: bool,
    collector: Collector<E, C>,
) -> Vec<EdgeCase<C>>
where
    E: Clone + PartialEq + 'static,
    C: Clone + 'static,
{
    let mut edge_cases = Vec::new();
    let max_size = bounds.max_size.unwrap_or(usize::MAX);
    if bounds.min_size == 0 {
        let collector = collector.clone();
        edge_cases.push(edge_case(move || {
            Rc::new(ContainerShrinkable::new(Vec::new(), 0, unique, collector.clone()))
                as RcShrinkable<C>
        }));
    }
    let repeat = bounds.min_size.max(1);
    if repeat > max_size || (unique && repeat > 1) {
        return edge_cases;
    }
    for element in element_edge_cases {
        let collector = collector.clone();
        let min_size = bounds.min_size;
        edge_cases.push(edge_case(move || {
            let elements = (0..repeat).map(|_| element()).collect();
            Rc::new(ContainerShrinkable::new(elements, min_size, unique, collector.clone()))
                as RcShrinkable<C>
        }));
    }
    edge_cases
}

/// Lists of elements from another arbitrary
pub struct ListArbitrary<T> {
    element: BoxedArbitrary<T>,
    bounds: SizeBounds,
    unique: bool,
}

impl<T: Clone + Debug + PartialEq + Send + Sync + 'static> ListArbitrary<T> {
    pub fn new(element: BoxedArbitrary<T>) -> Self {
        Self {
            element,
            bounds: SizeBounds {
                min_size: 0,
                max_size: None,
            },
            unique: false,
        }
    }

    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.bounds.min_size = min_size;
        self
    }

    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.bounds.max_size = Some(max_size);
        self
    }

    pub fn of_size(self, size: usize) -> Self {
        self.of_min_size(size).of_max_size(size)
    }

    /// No element appears twice
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn collector() -> Collector<T, Vec<T>> {
        Arc::new(|elements: Vec<T>| elements)
    }
}

impl<T: Clone + Debug + PartialEq + Send + Sync + 'static> Arbitrary for ListArbitrary<T> {
    type Value = Vec<T>;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Vec<T>>, PropertyError> {
        container_generator(
            self.element.generator_with_embedded_edge_cases(gen_size)?,
            self.bounds.min_size,
            self.bounds.max_for(gen_size),
            self.unique,
            Self::collector(),
        )
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<Vec<T>>> {
        let elements = self.element.exhaustive(max_samples)?;
        let lists = exhaustive::list(
            &elements,
            self.bounds.min_size,
            self.bounds.exhaustive_max(),
            max_samples,
        )?;
        if self.unique {
            Some(lists.filter(|list| {
                list.iter()
                    .enumerate()
                    .all(|(i, element)| !list[i + 1..].contains(element))
            }))
        } else {
            Some(lists)
        }
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Vec<T>>> {
        container_edge_cases(
            self.element.edge_cases(),
            self.bounds,
            self.unique,
            Self::collector(),
        )
    }
}

/// Sets of distinct elements from another arbitrary
pub struct SetArbitrary<T> {
    element: BoxedArbitrary<T>,
    bounds: SizeBounds,
}

impl<T: Clone + Debug + Ord + Send + Sync + 'static> SetArbitrary<T> {
    pub fn new(element: BoxedArbitrary<T>) -> Self {
        Self {
            element,
            bounds: SizeBounds {
                min_size: 0,
                max_size: None,
            },
        }
    }

    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.bounds.min_size = min_size;
        self
    }

    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.bounds.max_size = Some(max_size);
        self
    }

    pub fn of_size(self, size: usize) -> Self {
        self.of_min_size(size).of_max_size(size)
    }

    fn collector() -> Collector<T, BTreeSet<T>> {
        Arc::new(|elements: Vec<T>| elements.into_iter().collect())
    }
}

impl<T: Clone + Debug + Ord + Send + Sync + 'static> Arbitrary for SetArbitrary<T> {
    type Value = BTreeSet<T>;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<BTreeSet<T>>, PropertyError> {
        container_generator(
            self.element.generator_with_embedded_edge_cases(gen_size)?,
            self.bounds.min_size,
            self.bounds.max_for(gen_size),
            true,
            Self::collector(),
        )
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<BTreeSet<T>>> {
        let elements = self.element.exhaustive(max_samples)?;
        let max_size = self
            .bounds
            .exhaustive_max()
            .min(elements.max_count() as usize);
        exhaustive::set(&elements, self.bounds.min_size, max_size, max_samples)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<BTreeSet<T>>> {
        container_edge_cases(self.element.edge_cases(), self.bounds, true, Self::collector())
    }
}
