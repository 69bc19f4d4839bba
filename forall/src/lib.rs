#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]

//! # Forall - Property-Based Testing for Rust
//!
//! Forall checks that a property holds for many generated values. Values come
//! from composable [`Arbitrary`] descriptors, either sampled at random from
//! partitioned ranges or, for small domains, enumerated exhaustively. When a
//! sample falsifies the property it is shrunk greedily toward the simplest
//! value that still fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use forall::prelude::*;
//!
//! let property = Property::new("reverse twice", integers::<i32>().list(), |list: &Vec<i32>| {
//!     let mut reversed = list.clone();
//!     reversed.reverse();
//!     reversed.reverse();
//!     reversed == *list
//! });
//! assert!(property.check().is_successful());
//!
//! let result = Property::new("below 100", integers::<u32>(), |n: &u32| *n < 100).check();
//! assert!(result.is_failed());
//! assert_eq!(result.shrunk_sample, Some(100));
//! ```
//!
//! Runs are reproducible: every result carries its [`Seed`], and
//! [`PropertyConfig::with_seed`] replays it.

pub mod arbitrary;
pub mod combinatorics;
pub mod config;
pub mod database;
pub mod decimal;
pub mod distance;
pub mod error;
pub mod execution;
pub mod exhaustive;
pub mod falsifier;
pub mod generator;
pub mod parallel;
pub mod range;
pub mod rng;
pub mod shrinkable;
pub mod shrinking;

pub use arbitrary::{Arbitrary, ArbitraryExt, ArbitraryRegistry, BoxedArbitrary, any};
pub use config::{
    AfterFailureMode, ConfigError, EdgeCasesMode, GenerationMode, GlobalConfig, PropertyConfig,
    ShrinkingMode,
};
pub use database::{RunDatabase, TestRun};
pub use decimal::Decimal;
pub use error::{Cause, PropertyError};
pub use execution::{CheckStatus, CheckSummary, Property, PropertyCheckResult};
pub use falsifier::{assume, fatal};
pub use parallel::{PropertyJob, check_concurrently};
pub use rng::Seed;

/// Everything needed to write properties
pub mod prelude {
    pub use crate::arbitrary::{
        Arbitrary, ArbitraryExt, BoxedArbitrary, any, big_integers, bools, chars, decimals,
        doubles, frequency, frequency_of, integers, just, of, one_of, shuffle, strings,
    };
    pub use crate::config::{
        AfterFailureMode, EdgeCasesMode, GenerationMode, PropertyConfig, ShrinkingMode,
    };
    pub use crate::decimal::Decimal;
    pub use crate::execution::{CheckStatus, Property, PropertyCheckResult};
    pub use crate::falsifier::{assume, fatal};
    pub use crate::parallel::check_concurrently;
}
