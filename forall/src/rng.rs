//! Seeds and the per-execution random source.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ConfigError;

/// A reproducible seed, kept in the decimal form it was given in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seed {
    text: String,
    value: u64,
}

impl Seed {
    /// Parse a decimal seed.
    ///
    /// Accepts the full `u64` range as well as negative `i64` values, which are
    /// reinterpreted bit for bit.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let trimmed = text.trim();
        let value = match trimmed.parse::<u64>() {
            Ok(value) => value,
            Err(_) => trimmed
                .parse::<i64>()
                .map(|value| value as u64)
                .map_err(|_| ConfigError::InvalidSeed(text.to_string()))?,
        };
        Ok(Self {
            text: trimmed.to_string(),
            value,
        })
    }

    /// A freshly drawn seed
    pub fn random() -> Self {
        Self::from_value(rand::random::<u64>())
    }

    pub fn from_value(value: u64) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The random source of one property execution
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
