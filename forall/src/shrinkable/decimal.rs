use std::rc::Rc;

use num_bigint::BigUint;

use super::{Candidates, RcShrinkable, Shrinkable, shrink_towards};
use crate::decimal::Decimal;
use crate::distance::ShrinkingDistance;
use crate::range::Range;

/// A decimal of fixed scale that shrinks toward a target.
///
/// Candidates with fewer decimal places come first, followed by the integral
/// candidates of the unscaled value. Both stay inside the range.
#[derive(Debug, Clone)]
pub struct DecimalShrinkable {
    value: Decimal,
    range: Range<Decimal>,
    scale: u32,
    target: Decimal,
}

impl DecimalShrinkable {
    /// Create a shrinkable; `target` is clipped into `range`
    pub fn new(value: Decimal, range: Range<Decimal>, scale: u32, target: Decimal) -> Self {
        let target = range.clip(target);
        Self {
            value,
            range,
            scale,
            target,
        }
    }

    fn with_value(&self, value: Decimal) -> RcShrinkable<Decimal> {
        Rc::new(DecimalShrinkable {
            value,
            range: self.range.clone(),
            scale: self.scale,
            target: self.target.clone(),
        })
    }

    fn distance_of(&self, value: &Decimal) -> BigUint {
        value
            .scaled_distance(&self.target, self.scale)
            .magnitude()
            .clone()
    }

    fn fewer_decimals(&self) -> Vec<Decimal> {
        let current = self.distance_of(&self.value);
        (0..self.value.decimal_places())
            .map(|places| self.value.truncate_toward(places, &self.target))
            .filter(|candidate| {
                self.range.includes(candidate)
                    && *candidate != self.value
                    && self.distance_of(candidate) < current
            })
            .collect()
    }
}

impl Shrinkable<Decimal> for DecimalShrinkable {
    fn value(&self) -> Decimal {
        self.value.clone()
    }

    fn distance(&self) -> ShrinkingDistance {
        ShrinkingDistance::of_magnitude(self.distance_of(&self.value))
    }

    fn shrink_candidates(&self) -> Candidates<Decimal> {
        let this = self.clone();
        let scale = self.scale;
        let fewer_decimals = self.fewer_decimals().into_iter();
        let unscaled = self.value.rescale_floor(scale).unscaled().clone();
        let target = self.target.rescale_ceil(scale).unscaled().clone();
        let integral = shrink_towards(&unscaled, &target).map(move |u| Decimal::new(u, scale));
        let range = self.range.clone();
        Box::new(
            fewer_decimals
                .chain(integral.filter(move |candidate| range.includes(candidate)))
                .map(move |candidate| this.with_value(candidate)),
        )
    }
}
