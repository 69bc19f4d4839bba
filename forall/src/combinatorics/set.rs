use std::collections::BTreeSet;

use super::{CombinedIterator, Iterable};

/// All subsets of a fixed size drawn from an iterable.
///
/// Drives a `size`-ary [`CombinedIterator`] over the same source and skips
/// tuples that contain duplicates or whose set was already produced.
pub struct SetIterator<T> {
    combinations: CombinedIterator<T>,
    size: usize,
    seen: BTreeSet<BTreeSet<T>>,
}

impl<T: Clone + Ord> SetIterator<T> {
    pub fn new(elements: Iterable<T>, size: usize) -> Self {
        Self {
            combinations: CombinedIterator::new(vec![elements; size]),
            size,
            seen: BTreeSet::new(),
        }
    }
}

impl<T: Clone + Ord> Iterator for SetIterator<T> {
    type Item = BTreeSet<T>;

    fn next(&mut self) -> Option<Self::Item> {
        for combination in self.combinations.by_ref() {
            let set: BTreeSet<T> = combination.into_iter().collect();
            if set.len() == self.size && self.seen.insert(set.clone()) {
                return Some(set);
            }
        }
        None
    }
}
