use std::rc::Rc;

use rand::{Rng, RngCore};

use super::RandomGenerator;
use crate::error::PropertyError;
use crate::shrinkable::{Collector, ContainerShrinkable, RcShrinkable};

/// Upper bound for container sizes when none is configured
pub const DEFAULT_COLLECTION_SIZE: usize = 255;

// Consecutive duplicate elements tolerated while filling a unique container
const MAX_UNIQUE_MISSES: usize = 100;

/// Default maximum size: `gen_size` capped at [`DEFAULT_COLLECTION_SIZE`],
/// but never below `2 * min_size`
pub fn default_max_size(min_size: usize, gen_size: usize) -> usize {
    gen_size
        .min(DEFAULT_COLLECTION_SIZE)
        .max(min_size.saturating_mul(2))
}

/// Pick a container size in `[min_size, max_size]`, favoring small sizes.
///
/// Nine in ten sizes come from `[min_size, min_size + 10]`.
pub fn choose_size(rng: &mut dyn RngCore, min_size: usize, max_size: usize) -> usize {
    let small_max = max_size.min(min_size.saturating_add(10));
    if small_max < max_size && rng.gen_range(0..10) > 0 {
        rng.gen_range(min_size..=small_max)
    } else {
        rng.gen_range(min_size..=max_size)
    }
}

/// Containers of elements from `element`.
///
/// With `unique` set, duplicate elements are redrawn; when duplicates keep
/// coming the container is cut short, or generation fails if it is still
/// below `min_size`.
pub fn container_generator<E, C>(
    element: RandomGenerator<E>,
    min_size: usize,
    max_size: usize,
    unique: bool,
    collector: Collector<E, C>,
) -> Result<RandomGenerator<C>, PropertyError>
where
    E: Clone + PartialEq + 'static,
    C: Clone + 'static,
{
    if min_size > max_size {
        return Err(PropertyError::invalid_range(min_size, max_size));
    }
    Ok(RandomGenerator::new(move |rng| {
        let size = choose_size(rng, min_size, max_size);
        let mut elements: Vec<RcShrinkable<E>> = Vec::with_capacity(size);
        let mut misses = 0;
        while elements.len() < size {
            let candidate = element.next(rng)?;
            if unique {
                let value = candidate.value();
                if elements.iter().any(|e| e.value() == value) {
                    misses += 1;
                    if misses < MAX_UNIQUE_MISSES {
                        continue;
                    }
                    if elements.len() >= min_size {
                        break;
                    }
                    return Err(PropertyError::too_many_filter_misses(
                        misses,
                        Some(format!("{} unique elements required", min_size)),
                    ));
                }
                misses = 0;
            }
            elements.push(candidate);
        }
        Ok(Rc::new(ContainerShrinkable::new(
            elements,
            min_size,
            unique,
            collector.clone(),
        )) as RcShrinkable<C>)
    }))
}
