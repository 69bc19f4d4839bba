//! Enumerators used by exhaustive generation.
//!
//! Every enumerator is built from [`Iterable`]s, factories that create a fresh
//! iterator on each call. Restarting an enumeration means building it again.

mod combined;
mod concat;
mod permutation;
mod set;

pub use combined::CombinedIterator;
pub use concat::ConcatIterator;
pub use permutation::PermutationIterator;
pub use set::SetIterator;

use std::collections::BTreeSet;
use std::iter;
use std::sync::Arc;

/// A restartable source of values
pub type Iterable<T> = Arc<dyn Fn() -> Box<dyn Iterator<Item = T>> + Send + Sync>;

/// An iterable over a fixed list of values
pub fn iterable<T>(values: Vec<T>) -> Iterable<T>
where
    T: Clone + Send + Sync + 'static,
{
    let values = Arc::new(values);
    restartable(move || {
        let values = values.clone();
        (0..values.len()).map(move |i| values[i].clone())
    })
}

/// An iterable calling `factory` for every pass
pub fn restartable<T, I, F>(factory: F) -> Iterable<T>
where
    I: Iterator<Item = T> + 'static,
    F: Fn() -> I + Send + Sync + 'static,
{
    Arc::new(move || Box::new(factory()) as Box<dyn Iterator<Item = T>>)
}

/// Cartesian product of `iterables` in odometer order
pub fn combine<T: Clone>(iterables: Vec<Iterable<T>>) -> CombinedIterator<T> {
    CombinedIterator::new(iterables)
}

/// All lists of length `min_size..=max_size` built from `elements`
pub fn list_combinations<T>(
    elements: Iterable<T>,
    min_size: usize,
    max_size: usize,
) -> ConcatIterator<Vec<T>>
where
    T: Clone + 'static,
{
    let per_size = (min_size..=max_size)
        .map(|size| {
            Box::new(CombinedIterator::new(vec![elements.clone(); size]))
                as Box<dyn Iterator<Item = Vec<T>>>
        })
        .collect();
    ConcatIterator::new(per_size)
}

/// All sets of size `min_size..=max_size` drawn from `elements`
pub fn set_combinations<T>(
    elements: Iterable<T>,
    min_size: usize,
    max_size: usize,
) -> ConcatIterator<BTreeSet<T>>
where
    T: Clone + Ord + 'static,
{
    let per_size = (min_size..=max_size)
        .map(|size| {
            Box::new(SetIterator::new(elements.clone(), size))
                as Box<dyn Iterator<Item = BTreeSet<T>>>
        })
        .collect();
    ConcatIterator::new(per_size)
}

/// All orderings of `values`; an empty list has exactly one (empty) ordering
pub fn list_permutations<T>(values: Vec<T>) -> Box<dyn Iterator<Item = Vec<T>>>
where
    T: Clone + 'static,
{
    if values.is_empty() {
        return Box::new(iter::once(Vec::new()));
    }
    Box::new(PermutationIterator::new(values))
}

/// Index pairs `(i, j)` with `i < j < n`
pub fn distinct_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Number of lists of length `min_size..=max_size` over `element_count`
/// elements, or `None` on overflow.
pub fn list_count(element_count: u64, min_size: usize, max_size: usize) -> Option<u64> {
    (min_size..=max_size).try_fold(0u64, |total, size| {
        let exponent = u32::try_from(size).ok()?;
        total.checked_add(element_count.checked_pow(exponent)?)
    })
}

/// Number of sets of size `min_size..=max_size` over `element_count` elements,
/// or `None` on overflow.
pub fn set_count(element_count: u64, min_size: usize, max_size: usize) -> Option<u64> {
    (min_size..=max_size).try_fold(0u64, |total, size| {
        total.checked_add(binomial(element_count, size as u64)?)
    })
}

/// Number of orderings of `n` values, or `None` on overflow
pub fn permutation_count(n: u64) -> Option<u64> {
    (1..=n).try_fold(1u64, |product, factor| product.checked_mul(factor))
}

fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * u128::from(n - i) / u128::from(i + 1);
        if result > u128::from(u64::MAX) {
            return None;
        }
    }
    u64::try_from(result).ok()
}
