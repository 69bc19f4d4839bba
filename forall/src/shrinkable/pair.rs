use std::rc::Rc;

use super::{Candidates, RcShrinkable, Shrinkable};
use crate::distance::ShrinkingDistance;

/// Two independently shrinkable values.
///
/// The first component is shrunk before the second; the distance is the sum
/// of both. Larger tuples nest pairs.
pub struct PairShrinkable<A, B> {
    first: RcShrinkable<A>,
    second: RcShrinkable<B>,
}

/// Combine two shrinkables into one for the tuple of their values
pub fn pair<A, B>(first: RcShrinkable<A>, second: RcShrinkable<B>) -> RcShrinkable<(A, B)>
where
    A: 'static,
    B: 'static,
{
    Rc::new(PairShrinkable { first, second })
}

impl<A: 'static, B: 'static> Shrinkable<(A, B)> for PairShrinkable<A, B> {
    fn value(&self) -> (A, B) {
        (self.first.value(), self.second.value())
    }

    fn distance(&self) -> ShrinkingDistance {
        self.first.distance().plus(&self.second.distance())
    }

    fn shrink_candidates(&self) -> Candidates<(A, B)> {
        let second = self.second.clone();
        let first = self.first.clone();
        let shrink_first = self
            .first
            .shrink_candidates()
            .map(move |candidate| pair(candidate, second.clone()));
        let shrink_second = self
            .second
            .shrink_candidates()
            .map(move |candidate| pair(first.clone(), candidate));
        Box::new(shrink_first.chain(shrink_second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrinkable::{IntegralShrinkable, ShrinkableExt, unshrinkable};
    use crate::range::Range;
    use num_bigint::BigInt;

    fn int(value: i64) -> RcShrinkable<i64> {
        let range = Range::of(BigInt::from(-100), BigInt::from(100)).unwrap();
        let shrinkable: RcShrinkable<BigInt> =
            Rc::new(IntegralShrinkable::new(BigInt::from(value), range, BigInt::from(0)));
        shrinkable.map(|v| i64::try_from(v).unwrap_or_default())
    }

    #[test]
    fn test_distance_is_sum() {
        let both = pair(int(4), int(-6));
        assert_eq!(both.value(), (4, -6));
        assert_eq!(both.distance(), ShrinkingDistance::of(&[10]));
    }

    #[test]
    fn test_first_component_is_shrunk_first() {
        let both = pair(int(2), int(3));
        let candidates: Vec<(i64, i64)> = both.shrink_candidates().map(|c| c.value()).collect();
        assert_eq!(candidates, vec![(0, 3), (1, 3), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_unshrinkable_component_is_kept() {
        let both = pair(unshrinkable("name"), int(1));
        let candidates: Vec<(&str, i64)> = both.shrink_candidates().map(|c| c.value()).collect();
        assert_eq!(candidates, vec![("name", 0)]);
    }
}
