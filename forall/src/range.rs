//! Inclusive value ranges.

use std::fmt::Debug;

use crate::error::PropertyError;

/// An inclusive range `[min, max]` with `min <= max`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T> {
    min: T,
    max: T,
}

impl<T: Ord + Debug> Range<T> {
    /// Create a range, failing when `min > max`
    pub fn of(min: T, max: T) -> Result<Self, PropertyError> {
        if min > max {
            return Err(PropertyError::invalid_range(min, max));
        }
        Ok(Self { min, max })
    }

    // Callers guarantee `min <= max`
    pub(crate) fn new_unchecked(min: T, max: T) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// A range containing exactly one value
    pub fn singular(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            min: value.clone(),
            max: value,
        }
    }

    pub fn min(&self) -> &T {
        &self.min
    }

    pub fn max(&self) -> &T {
        &self.max
    }

    pub fn is_singular(&self) -> bool {
        self.min == self.max
    }

    pub fn includes(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }

    /// Clamp `value` into the range
    pub fn clip(&self, value: T) -> T
    where
        T: Clone,
    {
        if value < self.min {
            self.min.clone()
        } else if value > self.max {
            self.max.clone()
        } else {
            value
        }
    }

    /// Map both bounds with an order preserving function
    pub fn map<U, F>(&self, f: F) -> Result<Range<U>, PropertyError>
    where
        U: Ord + Debug,
        F: Fn(&T) -> U,
    {
        Range::of(f(&self.min), f(&self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_construction() {
        let range = Range::of(1, 10).unwrap();
        assert_eq!(*range.min(), 1);
        assert_eq!(*range.max(), 10);
        assert!(!range.is_singular());

        assert!(Range::of(5, 5).unwrap().is_singular());
        assert!(matches!(
            Range::of(10, 1),
            Err(PropertyError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_includes_and_clip() {
        let range = Range::of(-3, 3).unwrap();
        assert!(range.includes(&-3));
        assert!(range.includes(&3));
        assert!(!range.includes(&4));
        assert_eq!(range.clip(100), 3);
        assert_eq!(range.clip(-100), -3);
        assert_eq!(range.clip(0), 0);
    }

    #[test]
    fn test_map() {
        let range = Range::of(1, 4).unwrap().map(|v| v * 10).unwrap();
        assert_eq!(range, Range::of(10, 40).unwrap());
        assert!(Range::of(1, 4).unwrap().map(|v| -v).is_err());
    }
}
