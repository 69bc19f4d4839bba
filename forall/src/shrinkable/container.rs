use std::rc::Rc;
use std::sync::Arc;

use super::{Candidates, RcShrinkable, Shrinkable};
use crate::combinatorics::distinct_pairs;
use crate::distance::ShrinkingDistance;

/// Builds a container value from element values
pub type Collector<E, C> = Arc<dyn Fn(Vec<E>) -> C + Send + Sync>;

/// A container of element shrinkables with a minimum size.
///
/// Candidates, in order:
/// 1. fewer elements (first `min_size` only, back half dropped, front half
///    dropped, one element dropped at each position)
/// 2. one element shrunk in place
/// 3. two elements shrunk together
///
/// No candidate has fewer than `min_size` elements. When `unique` is set,
/// elements that became equal are collapsed before the size check.
pub struct ContainerShrinkable<E, C> {
    elements: Vec<RcShrinkable<E>>,
    min_size: usize,
    unique: bool,
    collector: Collector<E, C>,
}

impl<E, C> Clone for ContainerShrinkable<E, C> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            min_size: self.min_size,
            unique: self.unique,
            collector: self.collector.clone(),
        }
    }
}

impl<E, C> ContainerShrinkable<E, C>
where
    E: Clone + PartialEq + 'static,
    C: 'static,
{
    pub fn new(
        elements: Vec<RcShrinkable<E>>,
        min_size: usize,
        unique: bool,
        collector: Collector<E, C>,
    ) -> Self {
        Self {
            elements,
            min_size,
            unique,
            collector,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn candidate(&self, mut elements: Vec<RcShrinkable<E>>) -> Option<RcShrinkable<C>> {
        if self.unique {
            elements = collapse_duplicates(elements);
        }
        if elements.len() < self.min_size {
            return None;
        }
        Some(Rc::new(ContainerShrinkable {
            elements,
            min_size: self.min_size,
            unique: self.unique,
            collector: self.collector.clone(),
        }))
    }

    fn size_reductions(&self) -> Vec<Vec<RcShrinkable<E>>> {
        let len = self.elements.len();
        if len <= self.min_size {
            return Vec::new();
        }
        let half = len / 2;
        let mut reductions = vec![self.elements[..self.min_size].to_vec()];
        if half > self.min_size {
            reductions.push(self.elements[..half].to_vec());
        }
        if len - half >= self.min_size && len - half < len && half > 0 {
            reductions.push(self.elements[half..].to_vec());
        }
        reductions
    }

    fn without(&self, index: usize) -> Vec<RcShrinkable<E>> {
        let mut elements = self.elements.clone();
        elements.remove(index);
        elements
    }

    fn replaced(&self, replacements: &[(usize, RcShrinkable<E>)]) -> Vec<RcShrinkable<E>> {
        let mut elements = self.elements.clone();
        for (index, element) in replacements {
            elements[*index] = element.clone();
        }
        elements
    }
}

impl<E, C> Shrinkable<C> for ContainerShrinkable<E, C>
where
    E: Clone + PartialEq + 'static,
    C: 'static,
{
    fn value(&self) -> C {
        (self.collector)(self.elements.iter().map(|e| e.value()).collect())
    }

    fn distance(&self) -> ShrinkingDistance {
        let distances: Vec<ShrinkingDistance> =
            self.elements.iter().map(|e| e.distance()).collect();
        ShrinkingDistance::for_collection(&distances)
    }

    fn shrink_candidates(&self) -> Candidates<C> {
        let this = Rc::new(self.clone());
        let len = self.elements.len();

        let smaller = {
            let this = this.clone();
            let removals = if len > self.min_size { len } else { 0 };
            self.size_reductions()
                .into_iter()
                .chain((0..removals).map(move |index| this.without(index)))
        };

        let single = {
            let this = this.clone();
            (0..len).flat_map(move |index| {
                let this = this.clone();
                this.elements[index]
                    .shrink_candidates()
                    .map(move |element| this.replaced(&[(index, element)]))
            })
        };

        let pairs = {
            let this = this.clone();
            distinct_pairs(len).flat_map(move |(i, j)| {
                let this = this.clone();
                this.elements[i]
                    .shrink_candidates()
                    .zip(this.elements[j].shrink_candidates())
                    .map(move |(first, second)| this.replaced(&[(i, first), (j, second)]))
            })
        };

        Box::new(
            smaller
                .chain(single)
                .chain(pairs)
                .filter_map(move |elements| this.candidate(elements)),
        )
    }
}

fn collapse_duplicates<E: PartialEq>(elements: Vec<RcShrinkable<E>>) -> Vec<RcShrinkable<E>> {
    let mut kept: Vec<RcShrinkable<E>> = Vec::with_capacity(elements.len());
    let mut values: Vec<E> = Vec::with_capacity(elements.len());
    for element in elements {
        let value = element.value();
        if !values.contains(&value) {
            values.push(value);
            kept.push(element);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use crate::shrinkable::{IntegralShrinkable, ShrinkableExt};
    use num_bigint::BigInt;
    use std::collections::BTreeSet;

    fn element(value: i64) -> RcShrinkable<i64> {
        let range = Range::of(BigInt::from(-1000), BigInt::from(1000)).unwrap();
        let shrinkable: RcShrinkable<BigInt> =
            Rc::new(IntegralShrinkable::new(BigInt::from(value), range, BigInt::from(0)));
        shrinkable.map(|v| i64::try_from(v).unwrap_or_default())
    }

    fn list(values: &[i64], min_size: usize) -> ContainerShrinkable<i64, Vec<i64>> {
        ContainerShrinkable::new(
            values.iter().map(|&v| element(v)).collect(),
            min_size,
            false,
            Arc::new(|values: Vec<i64>| values),
        )
    }

    #[test]
    fn test_value_and_distance() {
        let container = list(&[3, -4], 0);
        assert_eq!(container.value(), vec![3, -4]);
        assert_eq!(container.distance(), ShrinkingDistance::of(&[2, 7]));
    }

    #[test]
    fn test_size_reductions_come_first() {
        let container = list(&[1, 2, 3, 4], 0);
        let values: Vec<Vec<i64>> = container
            .shrink_candidates()
            .take(7)
            .map(|c| c.value())
            .collect();
        assert_eq!(
            values,
            vec![
                vec![],
                vec![1, 2],
                vec![3, 4],
                vec![2, 3, 4],
                vec![1, 3, 4],
                vec![1, 2, 4],
                vec![1, 2, 3],
            ]
        );
    }

    #[test]
    fn test_candidates_respect_min_size() {
        let container = list(&[5, 6, 7], 2);
        for candidate in container.shrink_candidates() {
            assert!(candidate.value().len() >= 2);
        }
    }

    #[test]
    fn test_fixed_size_only_shrinks_elements() {
        let container = list(&[5, 6], 2);
        let candidates: Vec<Vec<i64>> = container.shrink_candidates().map(|c| c.value()).collect();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.len() == 2));
        assert_eq!(candidates[0], vec![0, 6]);
        assert!(candidates.contains(&vec![0, 0]));
    }

    #[test]
    fn test_candidates_are_strictly_closer() {
        let container = list(&[10, -20, 30], 1);
        let distance = container.distance();
        for candidate in container.shrink_candidates() {
            assert!(candidate.distance() < distance);
        }
    }

    #[test]
    fn test_set_candidates_collapse_duplicates() {
        let set = ContainerShrinkable::new(
            vec![element(0), element(4)],
            1,
            true,
            Arc::new(|values: Vec<i64>| values.into_iter().collect::<BTreeSet<i64>>()),
        );
        let candidates: Vec<BTreeSet<i64>> = set.shrink_candidates().map(|c| c.value()).collect();
        // shrinking 4 to 0 collapses the set to a single element
        assert!(candidates.contains(&BTreeSet::from([0])));
        assert!(candidates.iter().all(|c| !c.is_empty()));

        let strict = ContainerShrinkable::new(
            vec![element(0), element(4)],
            2,
            true,
            Arc::new(|values: Vec<i64>| values.into_iter().collect::<BTreeSet<i64>>()),
        );
        assert!(strict.shrink_candidates().all(|c| c.value().len() == 2));
    }

    #[test]
    fn test_string_collector() {
        let string = ContainerShrinkable::new(
            vec![element(98), element(99)],
            0,
            false,
            Arc::new(|codes: Vec<i64>| {
                codes
                    .into_iter()
                    .filter_map(|c| char::from_u32(c as u32))
                    .collect::<String>()
            }),
        );
        assert_eq!(string.value(), "bc");
        assert_eq!(string.shrink_candidates().next().map(|c| c.value()), Some(String::new()));
    }
}
