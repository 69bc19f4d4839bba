//! Simplicity metric used to order shrink candidates.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;
use num_traits::Zero;

/// A vector of non-negative dimensions compared lexicographically.
///
/// Missing trailing dimensions count as zero, so `[3]` equals `[3, 0]`.
/// Containers put their length in the first dimension and the summed
/// element distances after it, which makes fewer elements always simpler.
/// Dimensions are unbounded integers: a value `2^100` away from its target
/// reports exactly that, and sums never saturate.
#[derive(Debug, Clone)]
pub struct ShrinkingDistance {
    dimensions: Vec<BigUint>,
    unbounded: bool,
}

impl ShrinkingDistance {
    /// Smallest possible distance
    pub const MIN: ShrinkingDistance = ShrinkingDistance {
        dimensions: Vec::new(),
        unbounded: false,
    };

    pub fn of(dimensions: &[u64]) -> Self {
        Self {
            dimensions: dimensions.iter().map(|&d| BigUint::from(d)).collect(),
            unbounded: false,
        }
    }

    /// Single-dimension distance of arbitrary magnitude
    pub fn of_magnitude(magnitude: BigUint) -> Self {
        Self {
            dimensions: vec![magnitude],
            unbounded: false,
        }
    }

    /// Distance greater than any distance a shrinkable reports
    pub fn max() -> Self {
        Self {
            dimensions: Vec::new(),
            unbounded: true,
        }
    }

    /// Distance of a container: its length followed by the sum of its element distances
    pub fn for_collection<'a, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = &'a ShrinkingDistance>,
    {
        let mut len = 0u64;
        let mut sum = ShrinkingDistance::MIN;
        for element in elements {
            len += 1;
            sum = sum.plus(element);
        }
        ShrinkingDistance::of(&[len]).append(&sum)
    }

    /// Dimension-wise sum; [`max`](Self::max) absorbs everything
    pub fn plus(&self, other: &ShrinkingDistance) -> Self {
        if self.unbounded || other.unbounded {
            return Self::max();
        }
        let len = self.dimensions.len().max(other.dimensions.len());
        let dimensions = (0..len)
            .map(|i| {
                let mut sum = self.dimensions.get(i).cloned().unwrap_or_default();
                if let Some(d) = other.dimensions.get(i) {
                    sum += d;
                }
                sum
            })
            .collect();
        Self {
            dimensions,
            unbounded: false,
        }
    }

    /// Concatenate the dimensions of `other` after those of `self`
    pub fn append(&self, other: &ShrinkingDistance) -> Self {
        if self.unbounded || other.unbounded {
            return Self::max();
        }
        let mut dimensions = self.dimensions.clone();
        if dimensions.is_empty() {
            dimensions.push(BigUint::zero());
        }
        dimensions.extend_from_slice(&other.dimensions);
        Self {
            dimensions,
            unbounded: false,
        }
    }

    pub fn dimensions(&self) -> &[BigUint] {
        &self.dimensions
    }

    pub fn is_max(&self) -> bool {
        self.unbounded
    }

    fn significant(&self) -> &[BigUint] {
        let end = self
            .dimensions
            .iter()
            .rposition(|d| !d.is_zero())
            .map_or(0, |i| i + 1);
        &self.dimensions[..end]
    }
}

fn compare_dimension(left: Option<&BigUint>, right: Option<&BigUint>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(r),
        (Some(l), None) if !l.is_zero() => Ordering::Greater,
        (None, Some(r)) if !r.is_zero() => Ordering::Less,
        _ => Ordering::Equal,
    }
}

impl Default for ShrinkingDistance {
    fn default() -> Self {
        Self::MIN
    }
}

impl Ord for ShrinkingDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.unbounded, other.unbounded) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        let len = self.dimensions.len().max(other.dimensions.len());
        for i in 0..len {
            match compare_dimension(self.dimensions.get(i), other.dimensions.get(i)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ShrinkingDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ShrinkingDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ShrinkingDistance {}

impl Hash for ShrinkingDistance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unbounded.hash(state);
        self.significant().hash(state);
    }
}

impl fmt::Display for ShrinkingDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unbounded {
            return write!(f, "[MAX]");
        }
        let dimensions: Vec<String> = self.significant().iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]", dimensions.join(", "))
    }
}
