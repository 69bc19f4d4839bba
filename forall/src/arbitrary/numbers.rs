use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::{Arbitrary, ArbitraryExt, MappedArbitrary};
use crate::decimal::Decimal;
use crate::error::PropertyError;
use crate::exhaustive::{ExhaustiveGenerator, integral_range};
use crate::generator::{
    EdgeCase, RandomGenerator, decimal_generator, edge_case, integral_generator,
};
use crate::range::Range;
use crate::shrinkable::{DecimalShrinkable, IntegralShrinkable, RcShrinkable, ShrinkableExt};

/// Integer types generated through [`BigInt`]
pub trait IntegralValue: Clone + Debug + Ord + Send + Sync + 'static {
    /// Bounds used when no range is given
    fn default_range() -> (BigInt, BigInt);

    fn to_big(&self) -> BigInt;

    /// Convert back, saturating at the type's bounds
    fn from_big(value: &BigInt) -> Self;
}

macro_rules! impl_integral_value {
    ($($t:ty),*) => {
        $(
            impl IntegralValue for $t {
                fn default_range() -> (BigInt, BigInt) {
                    (BigInt::from(<$t>::MIN), BigInt::from(<$t>::MAX))
                }

                fn to_big(&self) -> BigInt {
                    BigInt::from(*self)
                }

                fn from_big(value: &BigInt) -> Self {
                    <$t>::try_from(value).unwrap_or(if value.is_negative() {
                        <$t>::MIN
                    } else {
                        <$t>::MAX
                    })
                }
            }
        )*
    };
}

impl_integral_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl IntegralValue for BigInt {
    fn default_range() -> (BigInt, BigInt) {
        (BigInt::from(i64::MIN), BigInt::from(i64::MAX))
    }

    fn to_big(&self) -> BigInt {
        self.clone()
    }

    fn from_big(value: &BigInt) -> Self {
        value.clone()
    }
}

/// Integers of type `T` inside a range, shrinking toward a target
pub struct IntegralArbitrary<T> {
    range: Range<BigInt>,
    target: BigInt,
    _marker: PhantomData<fn() -> T>,
}

/// All values of an integer type
pub fn integers<T: IntegralValue>() -> IntegralArbitrary<T> {
    let (min, max) = T::default_range();
    IntegralArbitrary {
        range: Range::new_unchecked(min, max),
        target: BigInt::zero(),
        _marker: PhantomData,
    }
}

/// Integers without fixed width, by default within the bounds of `i64`
pub fn big_integers() -> IntegralArbitrary<BigInt> {
    integers()
}

impl<T: IntegralValue> IntegralArbitrary<T> {
    pub fn between(self, min: T, max: T) -> Result<Self, PropertyError> {
        Ok(Self {
            range: Range::of(min.to_big(), max.to_big())?,
            ..self
        })
    }

    pub fn greater_or_equal(self, min: T) -> Result<Self, PropertyError> {
        let max = self.range.max().clone();
        Ok(Self {
            range: Range::of(min.to_big(), max)?,
            ..self
        })
    }

    pub fn less_or_equal(self, max: T) -> Result<Self, PropertyError> {
        let min = self.range.min().clone();
        Ok(Self {
            range: Range::of(min, max.to_big())?,
            ..self
        })
    }

    /// Shrink toward `target` instead of zero; clipped into the range
    pub fn shrink_towards(self, target: T) -> Self {
        Self {
            target: target.to_big(),
            ..self
        }
    }

    fn shrinkable(&self, value: BigInt) -> RcShrinkable<T> {
        let shrinkable: RcShrinkable<BigInt> = Rc::new(IntegralShrinkable::new(
            value,
            self.range.clone(),
            self.target.clone(),
        ));
        shrinkable.map(|v| T::from_big(&v))
    }

    fn edge_values(&self) -> Vec<BigInt> {
        let target = self.range.clip(self.target.clone());
        let candidates = [
            self.range.min().clone(),
            self.range.max().clone(),
            &target - 1,
            target.clone(),
            &target + 1,
        ];
        let mut values: Vec<BigInt> = Vec::new();
        for value in candidates {
            if self.range.includes(&value) && !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }
}

impl<T: IntegralValue> Arbitrary for IntegralArbitrary<T> {
    type Value = T;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<T>, PropertyError> {
        Ok(
            integral_generator(self.range.clone(), gen_size, self.target.clone())
                .map(|v| T::from_big(&v)),
        )
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<T>> {
        Some(integral_range(&self.range, max_samples)?.map(|v| T::from_big(&v)))
    }

    fn edge_cases(&self) -> Vec<EdgeCase<T>> {
        self.edge_values()
            .into_iter()
            .map(|value| {
                let this = IntegralArbitrary::<T> {
                    range: self.range.clone(),
                    target: self.target.clone(),
                    _marker: PhantomData,
                };
                edge_case(move || this.shrinkable(value.clone()))
            })
            .collect()
    }
}

const DEFAULT_DECIMAL_SCALE: u32 = 2;

/// Decimals with a fixed number of decimal places
#[derive(Debug, Clone)]
pub struct DecimalArbitrary {
    range: Range<Decimal>,
    scale: u32,
    target: Decimal,
}

/// Decimals between -1e9 and 1e9 with two decimal places
pub fn decimals() -> DecimalArbitrary {
    let bound = Decimal::from_integer(1_000_000_000);
    DecimalArbitrary {
        range: Range::new_unchecked(Decimal::from_integer(-1_000_000_000), bound),
        scale: DEFAULT_DECIMAL_SCALE,
        target: Decimal::zero(),
    }
}

impl DecimalArbitrary {
    pub fn between(self, min: Decimal, max: Decimal) -> Result<Self, PropertyError> {
        Ok(Self {
            range: Range::of(min, max)?,
            ..self
        })
    }

    pub fn of_scale(self, scale: u32) -> Self {
        Self { scale, ..self }
    }

    pub fn shrink_towards(self, target: Decimal) -> Self {
        Self { target, ..self }
    }

    fn scaled_bounds(&self) -> (Decimal, Decimal) {
        (
            self.range.min().rescale_ceil(self.scale),
            self.range.max().rescale_floor(self.scale),
        )
    }
}

impl Arbitrary for DecimalArbitrary {
    type Value = Decimal;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<Decimal>, PropertyError> {
        decimal_generator(self.range.clone(), self.scale, gen_size, self.target.clone())
    }

    fn edge_cases(&self) -> Vec<EdgeCase<Decimal>> {
        let (min, max) = self.scaled_bounds();
        let target = self.range.clip(self.target.clone()).rescale_ceil(self.scale);
        let mut values: Vec<Decimal> = Vec::new();
        for value in [min, max, target] {
            if self.range.includes(&value) && !values.contains(&value) {
                values.push(value);
            }
        }
        values
            .into_iter()
            .map(|value| {
                let this = self.clone();
                edge_case(move || {
                    Rc::new(DecimalShrinkable::new(
                        value.clone(),
                        this.range.clone(),
                        this.scale,
                        this.target.clone(),
                    )) as RcShrinkable<Decimal>
                })
            })
            .collect()
    }
}

/// Floating point values generated as decimals of a fixed scale
pub struct DoubleArbitrary {
    decimals: DecimalArbitrary,
}

pub fn doubles() -> DoubleArbitrary {
    DoubleArbitrary {
        decimals: decimals(),
    }
}

impl DoubleArbitrary {
    /// Restrict to `[min, max]`; fails for non-finite bounds or `min > max`
    pub fn between(self, min: f64, max: f64) -> Result<Self, PropertyError> {
        let (Some(low), Some(high)) = (Decimal::from_f64(min), Decimal::from_f64(max)) else {
            return Err(PropertyError::invalid_range(min, max));
        };
        Ok(Self {
            decimals: self.decimals.between(low, high)?,
        })
    }

    pub fn of_scale(self, scale: u32) -> Self {
        Self {
            decimals: self.decimals.of_scale(scale),
        }
    }

    fn as_f64(&self) -> MappedArbitrary<Decimal, f64> {
        self.decimals.clone().map(|d| d.to_f64())
    }
}

impl Arbitrary for DoubleArbitrary {
    type Value = f64;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<f64>, PropertyError> {
        self.as_f64().generator(gen_size)
    }

    fn edge_cases(&self) -> Vec<EdgeCase<f64>> {
        self.as_f64().edge_cases()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_values_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = integers::<i16>().between(-300, 40).unwrap().generator(1000).unwrap();
        for _ in 0..1000 {
            let value = generator.next(&mut rng).unwrap().value();
            assert!((-300..=40).contains(&value));
        }
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            integers::<u8>().between(10, 1),
            Err(PropertyError::InvalidRange { .. })
        ));
        assert!(integers::<i32>().greater_or_equal(5).unwrap().less_or_equal(4).is_err());
    }

    #[test]
    fn test_full_width_types() {
        let mut rng = StdRng::seed_from_u64(6);
        let generator = integers::<u64>().generator(1000).unwrap();
        let values: Vec<u64> = (0..200)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect();
        assert!(values.iter().any(|v| *v > 1_000_000));
        assert!(values.iter().any(|v| *v <= 500));
    }

    #[test]
    fn test_integral_edge_cases() {
        let edges: Vec<i32> = integers::<i32>()
            .between(-10, 10)
            .unwrap()
            .edge_cases()
            .iter()
            .map(|e| e().value())
            .collect();
        assert_eq!(edges, vec![-10, 10, -1, 0, 1]);

        let shifted: Vec<u8> = integers::<u8>()
            .between(5, 9)
            .unwrap()
            .edge_cases()
            .iter()
            .map(|e| e().value())
            .collect();
        assert_eq!(shifted, vec![5, 9, 6]);
    }

    #[test]
    fn test_shrink_target() {
        let arbitrary = integers::<i32>().between(0, 100).unwrap().shrink_towards(50);
        let shrinkable = arbitrary.shrinkable(BigInt::from(80));
        let first = shrinkable.shrink_candidates().next().map(|c| c.value());
        assert_eq!(first, Some(50));
    }

    #[test]
    fn test_exhaustive_integers() {
        let arbitrary = integers::<i8>().between(-2, 2).unwrap();
        let values: Vec<i8> = arbitrary.exhaustive(100).unwrap().iter().collect();
        assert_eq!(values, vec![-2, -1, 0, 1, 2]);
        assert!(integers::<i32>().exhaustive(1000).is_none());
    }

    #[test]
    fn test_saturating_conversion() {
        assert_eq!(u8::from_big(&BigInt::from(300)), u8::MAX);
        assert_eq!(u8::from_big(&BigInt::from(-3)), u8::MIN);
        assert_eq!(i64::from_big(&BigInt::from(-3)), -3);
    }

    #[test]
    fn test_decimals_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let min: Decimal = "0.5".parse().unwrap();
        let max: Decimal = "2.75".parse().unwrap();
        let generator = decimals()
            .between(min.clone(), max.clone())
            .unwrap()
            .of_scale(3)
            .generator(100)
            .unwrap();
        for _ in 0..300 {
            let value = generator.next(&mut rng).unwrap().value();
            assert!(value >= min && value <= max);
        }
    }

    #[test]
    fn test_doubles() {
        let mut rng = StdRng::seed_from_u64(2);
        let generator = doubles().between(-1.5, 1.5).unwrap().generator(100).unwrap();
        for _ in 0..300 {
            let value = generator.next(&mut rng).unwrap().value();
            assert!((-1.5..=1.5).contains(&value));
        }
        assert!(doubles().between(f64::NAN, 1.0).is_err());
    }
}
