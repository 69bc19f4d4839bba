//! The property trial runner.
//!
//! A [`Property`] couples a name, an arbitrary for its parameters and a check.
//! [`Property::check`] resolves a seed, picks randomized or exhaustive
//! generation, runs the tries and shrinks the first falsifying sample. All
//! mutable state of one check lives in an [`ExecutionContext`].

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use rand::RngCore;
use rand::rngs::StdRng;
#[cfg(feature = "persistence")]
use serde::{Deserialize, Serialize};

use crate::arbitrary::{Arbitrary, ArbitraryExt, ArbitraryId, BoxedArbitrary};
use crate::config::{AfterFailureMode, EdgeCasesMode, GenerationMode, PropertyConfig};
use crate::database::{RunDatabase, TestRun};
use crate::error::{Cause, PropertyError};
use crate::falsifier::{CheckOutcome, FalsificationResult, Falsifier, TryExecutionResult};
use crate::generator::{EdgeCase, RandomGenerator};
use crate::rng::Seed;
use crate::shrinkable::{RcShrinkable, unshrinkable};
use crate::shrinking::PropertyShrinker;

/// Final status of a property check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(Serialize, Deserialize))]
pub enum CheckStatus {
    Successful,
    Failed,
    Aborted,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckStatus::Successful => "SUCCESSFUL",
            CheckStatus::Failed => "FAILED",
            CheckStatus::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Lifecycle of one property check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    NotStarted,
    Running,
    Succeeded,
    Falsified,
    Shrinking,
    Reported,
    Aborted,
}

impl ExecutionState {
    /// Whether `next` may follow this state
    pub fn can_become(self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (NotStarted, Running)
                | (NotStarted, Aborted)
                | (Running, Succeeded)
                | (Running, Falsified)
                | (Running, Aborted)
                | (Falsified, Shrinking)
                | (Shrinking, Reported)
        )
    }
}

/// Mutable state of a single property check.
///
/// Owns the random source and memoizes generators per arbitrary and
/// generation size, so a parameter keeps the same generator across tries.
pub struct ExecutionContext<T> {
    property: String,
    state: ExecutionState,
    seed: Seed,
    rng: StdRng,
    generators: HashMap<(ArbitraryId, usize, bool), RandomGenerator<T>>,
}

impl<T: Clone + Debug + Send + Sync + 'static> ExecutionContext<T> {
    pub fn new(property: impl Into<String>, seed: Seed) -> Self {
        Self {
            property: property.into(),
            state: ExecutionState::NotStarted,
            rng: seed.rng(),
            seed,
            generators: HashMap::new(),
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Move to `next`; illegal transitions are engine defects
    pub fn transition(&mut self, next: ExecutionState) {
        debug_assert!(
            self.state.can_become(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("{}: {:?} -> {:?}", self.property, self.state, next);
        self.state = next;
    }

    /// The generator of `arbitrary` for `gen_size`, built at most once per
    /// edge-case variant
    pub fn generator(
        &mut self,
        arbitrary: &BoxedArbitrary<T>,
        gen_size: usize,
        with_edge_cases: bool,
    ) -> Result<RandomGenerator<T>, PropertyError> {
        let key = (arbitrary.id(), gen_size, with_edge_cases);
        if let Some(generator) = self.generators.get(&key) {
            return Ok(generator.clone());
        }
        let generator = if with_edge_cases {
            arbitrary.generator_with_embedded_edge_cases(gen_size)?
        } else {
            arbitrary.generator(gen_size)?
        };
        self.generators.insert(key, generator.clone());
        Ok(generator)
    }

    /// Number of memoized generators
    pub fn cached_generators(&self) -> usize {
        self.generators.len()
    }
}

/// The outcome of checking a property
#[derive(Debug, Clone)]
pub struct PropertyCheckResult<T> {
    pub property: String,
    pub status: CheckStatus,
    /// Seed the check ran with
    pub seed: Seed,
    /// Generation mode actually used (`Randomized` or `Exhaustive`)
    pub generation: GenerationMode,
    pub edge_cases: EdgeCasesMode,
    /// Samples evaluated, including rejected ones
    pub tries: usize,
    /// Samples that were not rejected
    pub checks: usize,
    /// First falsifying sample
    pub original_sample: Option<T>,
    /// Sample after shrinking
    pub shrunk_sample: Option<T>,
    pub shrink_steps: usize,
    pub shrink_attempts: usize,
    /// Why the reported sample falsified the property
    pub cause: Option<Cause>,
    /// Why the check was aborted
    pub error: Option<PropertyError>,
}

impl<T: Clone + Debug> PropertyCheckResult<T> {
    fn new(property: &str, seed: Seed, config: &PropertyConfig) -> Self {
        Self {
            property: property.to_string(),
            status: CheckStatus::Aborted,
            seed,
            generation: GenerationMode::Randomized,
            edge_cases: config.edge_cases,
            tries: 0,
            checks: 0,
            original_sample: None,
            shrunk_sample: None,
            shrink_steps: 0,
            shrink_attempts: 0,
            cause: None,
            error: None,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status == CheckStatus::Successful
    }

    pub fn is_failed(&self) -> bool {
        self.status == CheckStatus::Failed
    }

    pub fn is_aborted(&self) -> bool {
        self.status == CheckStatus::Aborted
    }

    /// The reported sample: shrunk if available, otherwise the original
    pub fn sample(&self) -> Option<&T> {
        self.shrunk_sample.as_ref().or(self.original_sample.as_ref())
    }

    /// A type-erased copy for reporting
    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            property: self.property.clone(),
            status: self.status,
            seed: self.seed.to_string(),
            generation: self.generation,
            tries: self.tries,
            checks: self.checks,
            sample: self.sample().map(|sample| format!("{:?}", sample)),
            message: self
                .error
                .as_ref()
                .map(|error| error.to_string())
                .or_else(|| self.cause.as_ref().map(|cause| cause.to_string())),
        }
    }
}

impl<T: Debug> fmt::Display for PropertyCheckResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (seed {}, {}, tries {}, checks {})",
            self.property, self.status, self.seed, self.generation, self.tries, self.checks
        )?;
        if let Some(sample) = &self.original_sample {
            write!(f, "\n  original sample: {:?}", sample)?;
        }
        if let Some(sample) = &self.shrunk_sample {
            write!(
                f,
                "\n  shrunk sample ({} steps): {:?}",
                self.shrink_steps, sample
            )?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }
        if let Some(error) = &self.error {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

/// Check result without the sample type, as produced by concurrent checks
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub property: String,
    pub status: CheckStatus,
    pub seed: String,
    pub generation: GenerationMode,
    pub tries: usize,
    pub checks: usize,
    /// Debug rendering of the reported sample
    pub sample: Option<String>,
    /// Error or falsification cause
    pub message: Option<String>,
}

type Check<T> = Arc<dyn Fn(&T) -> TryExecutionResult + Send + Sync>;
type Assumption<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A named check over all values of an arbitrary
pub struct Property<T> {
    name: String,
    arbitrary: BoxedArbitrary<T>,
    check: Check<T>,
    assumption: Option<Assumption<T>>,
    config: PropertyConfig,
    database: Option<Arc<RunDatabase>>,
}

impl<T: Clone + Debug + Send + Sync + 'static> Property<T> {
    /// Property `name`: `check` holds for every value of `arbitrary`.
    ///
    /// `check` may return `bool`, `()` or `Result<(), E>`; panics falsify
    /// the property unless raised by [`assume`](crate::falsifier::assume).
    pub fn new<A, F, R>(name: impl Into<String>, arbitrary: A, check: F) -> Self
    where
        A: Arbitrary<Value = T> + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: CheckOutcome,
    {
        Self {
            name: name.into(),
            arbitrary: arbitrary.boxed(),
            check: Arc::new(move |value| check(value).into_try_result()),
            assumption: None,
            config: PropertyConfig::default(),
            database: None,
        }
    }

    pub fn with_config(mut self, config: PropertyConfig) -> Self {
        self.config = config;
        self
    }

    /// Record outcomes in `database` and replay failed seeds from it
    pub fn with_database(mut self, database: Arc<RunDatabase>) -> Self {
        self.database = Some(database);
        self
    }

    /// Reject samples failing `assumption` instead of checking them
    pub fn with_assumption<F>(mut self, assumption: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.assumption = Some(Arc::new(assumption));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PropertyConfig {
        &self.config
    }

    /// Run the property.
    ///
    /// Falsifications and configuration problems are reported in the result.
    /// Panics carrying [`Fatal`](crate::falsifier::Fatal) are resumed.
    pub fn check(&self) -> PropertyCheckResult<T> {
        let seed = match self.resolve_seed() {
            Ok(seed) => seed,
            Err(error) => {
                log::debug!("{}: not started: {}", self.name, error);
                let mut context = ExecutionContext::<T>::new(self.name.as_str(), Seed::random());
                context.transition(ExecutionState::Aborted);
                let mut result = PropertyCheckResult::new(&self.name, context.seed, &self.config);
                result.error = Some(error);
                return result;
            }
        };

        log::debug!("{}: checking with seed {}", self.name, seed);
        let mut context = ExecutionContext::new(self.name.as_str(), seed);
        let result = self.run(&mut context);
        self.record(&result);
        result
    }

    fn resolve_seed(&self) -> Result<Seed, PropertyError> {
        self.config.validate()?;
        if let Some(text) = &self.config.seed {
            return Ok(Seed::parse(text)?);
        }
        if self.config.after_failure.resolved() == AfterFailureMode::SameSeed
            && let Some(database) = &self.database
            && let Some(run) = database.previous_run(&self.name)
            && run.status == CheckStatus::Failed
        {
            match Seed::parse(&run.seed) {
                Ok(seed) => {
                    log::debug!("{}: replaying seed {} of failed run", self.name, seed);
                    return Ok(seed);
                }
                Err(err) => log::warn!("{}: ignoring recorded seed: {}", self.name, err),
            }
        }
        Ok(Seed::random())
    }

    fn falsifier(&self) -> Falsifier<T> {
        let check = self.check.clone();
        let falsifier = Falsifier::new(move |value: &T| check(value));
        match &self.assumption {
            Some(assumption) => {
                let assumption = assumption.clone();
                falsifier.with_filter(move |value| assumption(value))
            }
            None => falsifier,
        }
    }

    fn samples(&self, context: &mut ExecutionContext<T>) -> Result<Samples<T>, PropertyError> {
        let exhaustive = match self.config.generation {
            GenerationMode::Randomized => None,
            GenerationMode::Exhaustive => {
                let exhaustive = self.arbitrary.exhaustive(self.config.max_exhaustive_samples);
                if exhaustive.is_none() {
                    log::warn!(
                        "{}: cannot enumerate within {} samples, generating randomized",
                        self.name,
                        self.config.max_exhaustive_samples
                    );
                }
                exhaustive
            }
            GenerationMode::Auto => self.arbitrary.exhaustive(self.config.tries as u64),
        };
        if let Some(exhaustive) = exhaustive {
            log::debug!(
                "{}: enumerating up to {} samples",
                self.name,
                exhaustive.max_count()
            );
            return Ok(Samples::Exhaustive(exhaustive.iter()));
        }

        let gen_size = self.config.effective_gen_size();
        let mixin = self.config.edge_cases == EdgeCasesMode::Mixin;
        let generator = context.generator(&self.arbitrary, gen_size, mixin)?;
        let edge_cases = match self.config.edge_cases {
            EdgeCasesMode::First => self.arbitrary.edge_cases(),
            EdgeCasesMode::Mixin | EdgeCasesMode::None => Vec::new(),
        };
        Ok(Samples::Randomized {
            edge_cases: edge_cases.into_iter(),
            generator,
        })
    }

    fn run(&self, context: &mut ExecutionContext<T>) -> PropertyCheckResult<T> {
        let mut result = PropertyCheckResult::new(&self.name, context.seed.clone(), &self.config);
        context.transition(ExecutionState::Running);

        let mut samples = match self.samples(context) {
            Ok(samples) => samples,
            Err(error) => return abort(context, result, error),
        };
        let max_tries = match samples {
            Samples::Exhaustive(_) => {
                result.generation = GenerationMode::Exhaustive;
                usize::MAX
            }
            Samples::Randomized { .. } => self.config.tries,
        };

        let falsifier = self.falsifier();
        while result.tries < max_tries {
            let shrinkable = match samples.next(context.rng()) {
                None => break,
                Some(Ok(shrinkable)) => shrinkable,
                Some(Err(error)) => return abort(context, result, error),
            };
            result.tries += 1;
            match falsifier.execute(&shrinkable.value()) {
                TryExecutionResult::Satisfied => result.checks += 1,
                TryExecutionResult::Invalid => {}
                TryExecutionResult::Falsified(cause) => {
                    result.checks += 1;
                    return self.shrink(context, result, shrinkable, cause, &falsifier);
                }
            }
        }

        let discards = result.tries - result.checks;
        if result.checks == 0 || discards / result.checks > self.config.max_discard_ratio {
            let error = PropertyError::Exhausted {
                tries: result.tries,
                checks: result.checks,
                max_discard_ratio: self.config.max_discard_ratio,
            };
            return abort(context, result, error);
        }

        context.transition(ExecutionState::Succeeded);
        result.status = CheckStatus::Successful;
        result
    }

    fn shrink(
        &self,
        context: &mut ExecutionContext<T>,
        mut result: PropertyCheckResult<T>,
        shrinkable: RcShrinkable<T>,
        cause: Option<Cause>,
        falsifier: &Falsifier<T>,
    ) -> PropertyCheckResult<T> {
        context.transition(ExecutionState::Falsified);
        result.original_sample = Some(shrinkable.value());
        log::debug!(
            "{}: falsified after {} tries by {:?}",
            self.name,
            result.tries,
            shrinkable.value()
        );

        context.transition(ExecutionState::Shrinking);
        let shrinker = PropertyShrinker::from_config(&self.config);
        let outcome = shrinker.shrink(FalsificationResult::new(shrinkable, cause), falsifier);
        result.shrunk_sample = Some(outcome.result.value());
        result.cause = outcome.result.cause;
        result.shrink_steps = outcome.steps;
        result.shrink_attempts = outcome.attempts;

        context.transition(ExecutionState::Reported);
        result.status = CheckStatus::Failed;
        result
    }

    fn record(&self, result: &PropertyCheckResult<T>) {
        let Some(database) = &self.database else {
            return;
        };
        let mut run = TestRun::new(&self.name, result.status, result.seed.as_str());
        if let Some(sample) = result.sample() {
            run = run.with_sample(format!("{:?}", sample));
        }
        database.record(run);
    }
}

fn abort<T: Clone + Debug + Send + Sync + 'static>(
    context: &mut ExecutionContext<T>,
    mut result: PropertyCheckResult<T>,
    error: PropertyError,
) -> PropertyCheckResult<T> {
    log::debug!("{}: aborted: {}", result.property, error);
    context.transition(ExecutionState::Aborted);
    result.status = CheckStatus::Aborted;
    result.error = Some(error);
    result
}

/// Where the samples of one check come from
enum Samples<T> {
    Exhaustive(Box<dyn Iterator<Item = T>>),
    Randomized {
        edge_cases: std::vec::IntoIter<EdgeCase<T>>,
        generator: RandomGenerator<T>,
    },
}

impl<T: Clone + 'static> Samples<T> {
    fn next(&mut self, rng: &mut dyn RngCore) -> Option<Result<RcShrinkable<T>, PropertyError>> {
        match self {
            Samples::Exhaustive(values) => values.next().map(|value| Ok(unshrinkable(value))),
            Samples::Randomized {
                edge_cases,
                generator,
            } => Some(match edge_cases.next() {
                Some(edge_case) => Ok(edge_case()),
                None => generator.next(rng),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{integers, strings};
    use crate::config::ShrinkingMode;
    use crate::falsifier::assume;

    fn config() -> PropertyConfig {
        PropertyConfig::default().with_seed("42")
    }

    #[test]
    fn test_successful_property() {
        let property = Property::new("abs is positive", integers::<i32>(), |v: &i32| {
            (*v as i64).abs() >= 0
        })
        .with_config(config());
        let result = property.check();
        assert!(result.is_successful(), "{}", result);
        assert_eq!(result.tries, 1000);
        assert_eq!(result.checks, 1000);
        assert_eq!(result.seed.as_str(), "42");
        assert_eq!(result.generation, GenerationMode::Randomized);
    }

    #[test]
    fn test_falsified_property_is_shrunk() {
        let property = Property::new("small", integers::<i64>(), |v: &i64| *v < 1000)
            .with_config(config());
        let result = property.check();
        assert!(result.is_failed());
        assert_eq!(result.shrunk_sample, Some(1000));
        assert!(result.original_sample.unwrap() >= 1000);
        assert!(result.shrink_steps > 0);
        assert_eq!(result.cause, None);
    }

    #[test]
    fn test_shrinking_off_reports_original() {
        let property = Property::new("small", integers::<i64>(), |v: &i64| *v < 1000)
            .with_config(config().with_shrinking(ShrinkingMode::Off));
        let result = property.check();
        assert!(result.is_failed());
        assert_eq!(result.shrunk_sample, result.original_sample);
        assert_eq!(result.shrink_steps, 0);
    }

    #[test]
    fn test_panics_are_causes() {
        let property = Property::new("no panic", integers::<u8>(), |v: &u8| {
            assert!(*v < 100, "too big: {}", v);
        })
        .with_config(config());
        let result = property.check();
        assert!(result.is_failed());
        assert_eq!(result.shrunk_sample, Some(100));
        assert!(matches!(result.cause, Some(Cause::Panic(ref m)) if m.contains("too big: 100")));
    }

    #[test]
    fn test_auto_generation_enumerates_small_domains() {
        let arbitrary = integers::<u8>().between(1, 31).unwrap();
        let property = Property::new("days", arbitrary, |day: &u8| (1..=31).contains(day))
            .with_config(config());
        let result = property.check();
        assert!(result.is_successful());
        assert_eq!(result.generation, GenerationMode::Exhaustive);
        assert_eq!(result.tries, 31);
    }

    #[test]
    fn test_exhaustive_falls_back_to_randomized() {
        let property = Property::new("any", integers::<i32>(), |_: &i32| true).with_config(
            config()
                .with_tries(10)
                .with_generation(GenerationMode::Exhaustive),
        );
        let result = property.check();
        assert!(result.is_successful());
        assert_eq!(result.generation, GenerationMode::Randomized);
        assert_eq!(result.tries, 10);
    }

    #[test]
    fn test_too_many_rejections_abort() {
        let property = Property::new("never checked", integers::<i32>(), |v: &i32| {
            assume(*v == 123_456);
            true
        })
        .with_config(config().with_tries(100));
        let result = property.check();
        assert!(result.is_aborted());
        assert!(matches!(
            result.error,
            Some(PropertyError::Exhausted { checks: 0, .. })
        ));
    }

    #[test]
    fn test_assumptions_filter_shrinking() {
        let property = Property::new("odd below 100", integers::<i32>(), |v: &i32| *v < 100)
            .with_assumption(|v| v % 2 != 0)
            .with_config(config().with_max_discard_ratio(10));
        let result = property.check();
        assert!(result.is_failed());
        let shrunk = result.shrunk_sample.unwrap();
        assert!(shrunk >= 101 && shrunk % 2 != 0);
        assert!(shrunk <= result.original_sample.unwrap());
    }

    #[test]
    fn test_invalid_configuration_aborts_before_start() {
        let property = Property::new("any", integers::<i32>(), |_: &i32| true)
            .with_config(PropertyConfig::default().with_tries(0));
        let result = property.check();
        assert!(result.is_aborted());
        assert_eq!(result.tries, 0);
        assert!(result.error.unwrap().is_configuration_error());
    }

    #[test]
    fn test_generation_errors_abort() {
        let arbitrary = integers::<i32>().filter(|_| false);
        let property = Property::new("nothing", arbitrary, |_: &i32| true).with_config(config());
        let result = property.check();
        assert!(result.is_aborted());
        assert!(matches!(
            result.error,
            Some(PropertyError::TooManyFilterMisses { .. })
        ));
        assert!(result.original_sample.is_none());
    }

    #[test]
    fn test_edge_cases_first() {
        let arbitrary = integers::<i32>().between(-50, 50).unwrap();
        let property = Property::new("not the minimum", arbitrary, |v: &i32| *v != -50)
            .with_config(
                config()
                    .with_edge_cases(EdgeCasesMode::First)
                    .with_generation(GenerationMode::Randomized),
            );
        let result = property.check();
        assert!(result.is_failed());
        assert_eq!(result.tries, 1);
        assert_eq!(result.edge_cases, EdgeCasesMode::First);
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            Property::new("strings", strings().alpha(), |s: &String| s.len() < 5)
                .with_config(config())
                .check()
        };
        let (first, second) = (run(), run());
        assert_eq!(first.original_sample, second.original_sample);
        assert_eq!(first.shrunk_sample, second.shrunk_sample);
        assert_eq!(first.shrunk_sample.as_deref(), Some("aaaaa"));
    }

    #[test]
    fn test_failed_seed_is_replayed() {
        let database = Arc::new(RunDatabase::in_memory());
        let failing = Property::new("replay", integers::<i64>(), |v: &i64| *v < 1000)
            .with_database(database.clone());
        let first = failing.check();
        assert!(first.is_failed());

        let second = failing.check();
        assert_eq!(first.seed, second.seed);
        assert_eq!(first.original_sample, second.original_sample);

        let fresh = Property::new("replay", integers::<i64>(), |v: &i64| *v < 1000)
            .with_database(database.clone())
            .with_config(
                PropertyConfig::default().with_after_failure(AfterFailureMode::RandomSeed),
            );
        let third = fresh.check();
        assert_ne!(first.seed, third.seed);

        let run = database.previous_run("replay").unwrap();
        assert_eq!(run.status, CheckStatus::Failed);
        assert_eq!(run.seed, third.seed.as_str());
    }

    #[test]
    fn test_context_memoizes_generators() {
        let mut context = ExecutionContext::new("memo", Seed::from_value(1));
        let first = integers::<i32>().boxed();
        let second = integers::<i32>().boxed();
        context.generator(&first, 100, true).unwrap();
        context.generator(&first, 100, true).unwrap();
        assert_eq!(context.cached_generators(), 1);
        context.generator(&second, 100, true).unwrap();
        context.generator(&first, 10, true).unwrap();
        assert_eq!(context.cached_generators(), 3);
    }

    #[test]
    fn test_context_keeps_edge_case_variants_apart() {
        let mut context = ExecutionContext::new("variants", Seed::from_value(7));
        let arbitrary = integers::<u64>().include_only_edge_cases(vec![u64::MAX]).boxed();
        let plain = context.generator(&arbitrary, 1000, false).unwrap();
        let mixed = context.generator(&arbitrary, 1000, true).unwrap();
        assert_eq!(context.cached_generators(), 2);

        let draw = |generator: &RandomGenerator<u64>, context: &mut ExecutionContext<u64>| {
            (0..2000)
                .map(|_| generator.next(context.rng()).unwrap().value())
                .filter(|v| *v == u64::MAX)
                .count()
        };
        assert_eq!(draw(&plain, &mut context), 0);
        assert!(draw(&mixed, &mut context) > 0);
    }

    #[test]
    fn test_state_transitions() {
        use ExecutionState::*;
        assert!(NotStarted.can_become(Running));
        assert!(Running.can_become(Falsified));
        assert!(Falsified.can_become(Shrinking));
        assert!(!Succeeded.can_become(Running));
        assert!(!NotStarted.can_become(Reported));
    }

    #[test]
    fn test_summary() {
        let result = Property::new("small", integers::<i64>(), |v: &i64| *v < 10)
            .with_config(config())
            .check();
        let summary = result.summary();
        assert_eq!(summary.status, CheckStatus::Failed);
        assert_eq!(summary.sample.as_deref(), Some("10"));
        assert_eq!(summary.seed, "42");
    }
}
