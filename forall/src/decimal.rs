//! Arbitrary precision decimal numbers.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

/// `10^exponent` as a big integer
pub fn pow10(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u32), exponent as usize)
}

/// A decimal number `unscaled * 10^-scale`.
///
/// Equality and ordering are numeric, so `1.50 == 1.5`.
#[derive(Debug, Clone)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

/// Error returned when parsing a [`Decimal`] fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError {
    input: String,
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal literal '{}'", self.input)
    }
}

impl std::error::Error for ParseDecimalError {}

impl Decimal {
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self::new(value.into(), 0)
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    /// Number of decimal places once trailing zeros are dropped
    pub fn decimal_places(&self) -> u32 {
        self.stripped().scale
    }

    /// Same value with trailing zeros in the fraction removed
    pub fn stripped(&self) -> Decimal {
        let ten = BigInt::from(10u32);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        while scale > 0 && !unscaled.is_zero() && (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        if unscaled.is_zero() {
            scale = 0;
        }
        Decimal::new(unscaled, scale)
    }

    /// Rescale rounding toward negative infinity
    pub fn rescale_floor(&self, scale: u32) -> Decimal {
        Decimal::new(self.unscaled_at(scale, Rounding::Floor), scale)
    }

    /// Rescale rounding toward positive infinity
    pub fn rescale_ceil(&self, scale: u32) -> Decimal {
        Decimal::new(self.unscaled_at(scale, Rounding::Ceil), scale)
    }

    /// Cut the value to `places` decimals, rounding toward `target`
    pub fn truncate_toward(&self, places: u32, target: &Decimal) -> Decimal {
        if self > target {
            self.rescale_floor(places)
        } else {
            self.rescale_ceil(places)
        }
    }

    /// Absolute difference expressed in units of `10^-scale`
    pub fn scaled_distance(&self, other: &Decimal, scale: u32) -> BigInt {
        let common = scale.max(self.scale).max(other.scale);
        let difference = (self.unscaled_at(common, Rounding::Floor)
            - other.unscaled_at(common, Rounding::Floor))
        .abs();
        difference / pow10(common - scale)
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Exact decimal form of a finite float
    pub fn from_f64(value: f64) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        value.to_string().parse().ok()
    }

    fn unscaled_at(&self, scale: u32, rounding: Rounding) -> BigInt {
        if scale >= self.scale {
            return &self.unscaled * pow10(scale - self.scale);
        }
        let divisor = pow10(self.scale - scale);
        let quotient = &self.unscaled / &divisor;
        let remainder = &self.unscaled % &divisor;
        if remainder.is_zero() {
            return quotient;
        }
        match rounding {
            Rounding::Floor if self.is_negative() => quotient - 1u32,
            Rounding::Ceil if !self.is_negative() => quotient + 1u32,
            _ => quotient,
        }
    }
}

#[derive(Clone, Copy)]
enum Rounding {
    Floor,
    Ceil,
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.unscaled_at(scale, Rounding::Floor)
            .cmp(&other.unscaled_at(scale, Rounding::Floor))
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let stripped = self.stripped();
        stripped.unscaled.hash(state);
        stripped.scale.hash(state);
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.abs().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (integral, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, integral, fraction)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseDecimalError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (integral, fraction) = match body.split_once('.') {
            Some((integral, fraction)) => (integral, fraction),
            None => (body, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (integral.is_empty() && fraction.is_empty())
            || !all_digits(integral)
            || !all_digits(fraction)
        {
            return Err(error());
        }
        let digits = format!("{}{}", integral, fraction);
        let mut unscaled: BigInt = digits.parse().map_err(|_| error())?;
        if negative {
            unscaled = -unscaled;
        }
        let scale = u32::try_from(fraction.len()).map_err(|_| error())?;
        Ok(Decimal::new(unscaled, scale))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::from_integer(value)
    }
}
