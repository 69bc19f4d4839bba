use std::iter;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Zero;

use super::{Candidates, RcShrinkable, Shrinkable};
use crate::distance::ShrinkingDistance;
use crate::range::Range;

/// An integer that shrinks toward a target inside its range.
///
/// All integral types are generated as [`BigInt`] and mapped afterwards, so
/// one implementation serves `u8` as well as unbounded integers.
#[derive(Debug, Clone)]
pub struct IntegralShrinkable {
    value: BigInt,
    range: Range<BigInt>,
    target: BigInt,
}

impl IntegralShrinkable {
    /// Create a shrinkable; `target` is clipped into `range`
    pub fn new(value: BigInt, range: Range<BigInt>, target: BigInt) -> Self {
        let target = range.clip(target);
        Self {
            value,
            range,
            target,
        }
    }

    pub fn target(&self) -> &BigInt {
        &self.target
    }
}

impl Shrinkable<BigInt> for IntegralShrinkable {
    fn value(&self) -> BigInt {
        self.value.clone()
    }

    fn distance(&self) -> ShrinkingDistance {
        let gap = &self.value - &self.target;
        ShrinkingDistance::of_magnitude(gap.magnitude().clone())
    }

    fn shrink_candidates(&self) -> Candidates<BigInt> {
        let bounds = self.range.clone();
        let range = self.range.clone();
        let target = self.target.clone();
        Box::new(
            shrink_towards(&self.value, &self.target)
                .filter(move |candidate| bounds.includes(candidate))
                .map(move |candidate| {
                    Rc::new(IntegralShrinkable {
                        value: candidate,
                        range: range.clone(),
                        target: target.clone(),
                    }) as RcShrinkable<BigInt>
                }),
        )
    }
}

/// Values between `target` and `value`, starting at `target` and halving the
/// remaining gap each step. `value` itself is never produced.
pub fn shrink_towards(value: &BigInt, target: &BigInt) -> impl Iterator<Item = BigInt> + use<> {
    let value = value.clone();
    let gap = &value - target;
    let first = if gap.is_zero() { None } else { Some(gap) };
    iter::successors(first, |step| {
        let half: BigInt = step / 2u32;
        if half.is_zero() { None } else { Some(half) }
    })
    .map(move |step| &value - step)
}
