use std::rc::Rc;

use num_bigint::{BigInt, RandBigInt};
use num_traits::{Signed, ToPrimitive};
use rand::{Rng, RngCore};

use super::RandomGenerator;
use crate::decimal::{Decimal, pow10};
use crate::error::PropertyError;
use crate::range::Range;
use crate::shrinkable::{DecimalShrinkable, IntegralShrinkable, RcShrinkable, unshrinkable};

/// Partition points `-p` and `p` with `p = max(gen_size / 2, 10)`
pub fn default_partition_points(gen_size: usize) -> Vec<BigInt> {
    let point = BigInt::from((gen_size / 2).max(10));
    vec![-point.clone(), point]
}

/// Split `range` at every partition point strictly inside it.
///
/// A point `p` closes the sub-range `[lower, p - 1]` and opens the next one at
/// `p`; the last sub-range ends at the range maximum.
pub fn partitioned_ranges(range: &Range<BigInt>, points: &[BigInt]) -> Vec<Range<BigInt>> {
    let mut points = points.to_vec();
    points.sort();
    points.dedup();

    let mut ranges = Vec::new();
    let mut lower = range.min().clone();
    for point in points {
        if point > lower && point < *range.max() {
            ranges.push(Range::new_unchecked(lower, &point - 1));
            lower = point;
        }
    }
    ranges.push(Range::new_unchecked(lower, range.max().clone()));
    ranges
}

/// Uniform value in `range`.
///
/// Bounds that fit into `i64` use the bounded sampler of `rand`; wider ranges
/// draw `bits(max - min)` random bits until the result fits.
pub fn sample_uniform(rng: &mut dyn RngCore, range: &Range<BigInt>) -> BigInt {
    if let (Some(min), Some(max)) = (range.min().to_i64(), range.max().to_i64()) {
        return BigInt::from(rng.gen_range(min..=max));
    }
    let span = (range.max() - range.min()).abs();
    let bits = span.bits();
    loop {
        let candidate = BigInt::from(rng.gen_biguint(bits));
        if candidate <= span {
            return range.min() + candidate;
        }
    }
}

/// Integers in `range`, drawn from a uniformly chosen partition.
///
/// Values shrink toward `target`, clipped into the range.
pub fn integral_generator(
    range: Range<BigInt>,
    gen_size: usize,
    target: BigInt,
) -> RandomGenerator<BigInt> {
    if range.is_singular() {
        return RandomGenerator::constant(range.min().clone());
    }
    let partitions = partitioned_ranges(&range, &default_partition_points(gen_size));
    RandomGenerator::new(move |rng| {
        let partition = &partitions[rng.gen_range(0..partitions.len())];
        let value = sample_uniform(rng, partition);
        Ok(Rc::new(IntegralShrinkable::new(value, range.clone(), target.clone()))
            as RcShrinkable<BigInt>)
    })
}

/// Decimals with exactly `scale` decimal places inside `range`.
///
/// The range is scaled to unscaled integers (minimum rounded up, maximum
/// rounded down) and sampled like an integral range. Fails when no value of
/// that scale lies inside the range.
pub fn decimal_generator(
    range: Range<Decimal>,
    scale: u32,
    gen_size: usize,
    target: Decimal,
) -> Result<RandomGenerator<Decimal>, PropertyError> {
    let min = range.min().rescale_ceil(scale).unscaled().clone();
    let max = range.max().rescale_floor(scale).unscaled().clone();
    let unscaled = Range::of(min, max).map_err(|_| {
        PropertyError::invalid_range(range.min().to_string(), range.max().to_string())
    })?;

    if unscaled.is_singular() {
        let value = Decimal::new(unscaled.min().clone(), scale);
        return Ok(RandomGenerator::new(move |_| Ok(unshrinkable(value.clone()))));
    }

    let factor = pow10(scale);
    let points: Vec<BigInt> = default_partition_points(gen_size)
        .into_iter()
        .map(|point| point * &factor)
        .collect();
    let partitions = partitioned_ranges(&unscaled, &points);
    Ok(RandomGenerator::new(move |rng| {
        let partition = &partitions[rng.gen_range(0..partitions.len())];
        let value = Decimal::new(sample_uniform(rng, partition), scale);
        Ok(Rc::new(DecimalShrinkable::new(value, range.clone(), scale, target.clone()))
            as RcShrinkable<Decimal>)
    }))
}
