//! Configuration types for controlling how a property is checked.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::rng::Seed;

/// Default number of tries per property
pub const DEFAULT_TRIES: usize = 1000;
/// Default upper bound of rejected tries per successful check
pub const DEFAULT_MAX_DISCARD_RATIO: usize = 5;
/// Default number of accepted shrink steps in bounded mode
pub const DEFAULT_MAX_SHRINK_STEPS: usize = 1000;
/// Default wall-clock bound for bounded shrinking
pub const DEFAULT_BOUNDED_SHRINKING: Duration = Duration::from_secs(10);
/// Default ceiling for explicitly requested exhaustive generation
pub const DEFAULT_MAX_EXHAUSTIVE_SAMPLES: u64 = 10_000;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of tries (must be > 0)
    InvalidTries(usize),
    /// Invalid number of shrink steps (must be > 0)
    InvalidShrinkSteps(usize),
    /// Invalid shrinking bound (must be > 0)
    InvalidTimeout,
    /// Invalid discard ratio (must be > 0)
    InvalidDiscardRatio(usize),
    /// Seed is not a decimal integer
    InvalidSeed(String),
    /// A setting could not be parsed
    InvalidSetting { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTries(n) => write!(f, "Invalid tries count: {} (must be > 0)", n),
            ConfigError::InvalidShrinkSteps(n) => {
                write!(f, "Invalid shrink steps count: {} (must be > 0)", n)
            }
            ConfigError::InvalidTimeout => write!(f, "Invalid shrinking bound (must be > 0)"),
            ConfigError::InvalidDiscardRatio(n) => {
                write!(f, "Invalid max discard ratio: {} (must be > 0)", n)
            }
            ConfigError::InvalidSeed(seed) => {
                write!(f, "Invalid seed '{}' (must be a decimal integer)", seed)
            }
            ConfigError::InvalidSetting { key, value } => {
                write!(f, "Invalid value '{}' for setting {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

/// How a falsified sample is shrunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShrinkingMode {
    /// Report the first falsifying sample as is
    Off,
    /// Shrink until a step count or time bound is reached
    #[default]
    Bounded,
    /// Shrink until no candidate falsifies any more
    Full,
}

impl FromStr for ShrinkingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "off" => Ok(ShrinkingMode::Off),
            "bounded" => Ok(ShrinkingMode::Bounded),
            "full" => Ok(ShrinkingMode::Full),
            _ => Err(ConfigError::InvalidSetting {
                key: "shrinking".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// How samples are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Random sampling
    Randomized,
    /// Enumerate every value when the arbitrary supports it
    Exhaustive,
    /// Exhaustive when the number of values does not exceed `tries`
    #[default]
    Auto,
}

impl FromStr for GenerationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "randomized" => Ok(GenerationMode::Randomized),
            "exhaustive" => Ok(GenerationMode::Exhaustive),
            "auto" => Ok(GenerationMode::Auto),
            _ => Err(ConfigError::InvalidSetting {
                key: "generation".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationMode::Randomized => "RANDOMIZED",
            GenerationMode::Exhaustive => "EXHAUSTIVE",
            GenerationMode::Auto => "AUTO",
        };
        f.write_str(name)
    }
}

/// Which seed is used when a property failed in its previous run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterFailureMode {
    /// Not configured, behaves like `SameSeed`
    #[default]
    NotSet,
    /// Replay the seed of the failing run
    SameSeed,
    /// Always pick a fresh seed
    RandomSeed,
}

impl AfterFailureMode {
    /// Mode with `NotSet` resolved to its effective behaviour
    pub fn resolved(self) -> Self {
        match self {
            AfterFailureMode::NotSet => AfterFailureMode::SameSeed,
            other => other,
        }
    }
}

impl FromStr for AfterFailureMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "not_set" => Ok(AfterFailureMode::NotSet),
            "same_seed" => Ok(AfterFailureMode::SameSeed),
            "random_seed" => Ok(AfterFailureMode::RandomSeed),
            _ => Err(ConfigError::InvalidSetting {
                key: "after_failure".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// How declared edge cases take part in randomized generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeCasesMode {
    /// Try every edge case combination before random samples
    First,
    /// Mix edge cases into random samples with low probability
    #[default]
    Mixin,
    /// Ignore edge cases
    None,
}

impl FromStr for EdgeCasesMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "first" => Ok(EdgeCasesMode::First),
            "mixin" => Ok(EdgeCasesMode::Mixin),
            "none" => Ok(EdgeCasesMode::None),
            _ => Err(ConfigError::InvalidSetting {
                key: "edge_cases".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for checking a single property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyConfig {
    /// Number of tries
    pub tries: usize,
    /// Generation size hint, defaults to `tries`
    pub gen_size: Option<usize>,
    /// Explicit seed as a decimal string
    pub seed: Option<String>,
    pub shrinking: ShrinkingMode,
    pub generation: GenerationMode,
    pub after_failure: AfterFailureMode,
    pub edge_cases: EdgeCasesMode,
    /// Maximum ratio of rejected tries to checks
    pub max_discard_ratio: usize,
    /// Maximum accepted shrink steps in bounded mode
    pub max_shrink_steps: usize,
    /// Wall-clock bound for bounded shrinking
    pub bounded_shrinking: Duration,
    /// Ceiling for exhaustive generation in `Exhaustive` mode
    pub max_exhaustive_samples: u64,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
            gen_size: None,
            seed: None,
            shrinking: ShrinkingMode::default(),
            generation: GenerationMode::default(),
            after_failure: AfterFailureMode::default(),
            edge_cases: EdgeCasesMode::default(),
            max_discard_ratio: DEFAULT_MAX_DISCARD_RATIO,
            max_shrink_steps: DEFAULT_MAX_SHRINK_STEPS,
            bounded_shrinking: DEFAULT_BOUNDED_SHRINKING,
            max_exhaustive_samples: DEFAULT_MAX_EXHAUSTIVE_SAMPLES,
        }
    }
}

impl PropertyConfig {
    /// Create a configuration from global defaults
    pub fn from_global(global: &GlobalConfig) -> Self {
        Self {
            tries: global.default_tries,
            seed: global.default_seed.clone(),
            shrinking: global.shrinking,
            generation: global.generation,
            after_failure: global.after_failure,
            edge_cases: global.edge_cases,
            ..Self::default()
        }
    }

    /// Create a configuration from the `FORALL_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_global(&GlobalConfig::from_env()?))
    }

    pub fn with_tries(mut self, tries: usize) -> Self {
        self.tries = tries;
        self
    }

    pub fn with_gen_size(mut self, gen_size: usize) -> Self {
        self.gen_size = Some(gen_size);
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_shrinking(mut self, shrinking: ShrinkingMode) -> Self {
        self.shrinking = shrinking;
        self
    }

    pub fn with_generation(mut self, generation: GenerationMode) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_after_failure(mut self, after_failure: AfterFailureMode) -> Self {
        self.after_failure = after_failure;
        self
    }

    pub fn with_edge_cases(mut self, edge_cases: EdgeCasesMode) -> Self {
        self.edge_cases = edge_cases;
        self
    }

    pub fn with_max_discard_ratio(mut self, ratio: usize) -> Self {
        self.max_discard_ratio = ratio;
        self
    }

    pub fn with_max_shrink_steps(mut self, steps: usize) -> Self {
        self.max_shrink_steps = steps;
        self
    }

    pub fn with_bounded_shrinking(mut self, bound: Duration) -> Self {
        self.bounded_shrinking = bound;
        self
    }

    pub fn with_max_exhaustive_samples(mut self, max: u64) -> Self {
        self.max_exhaustive_samples = max;
        self
    }

    /// Generation size hint actually used
    pub fn effective_gen_size(&self) -> usize {
        self.gen_size.unwrap_or(self.tries)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tries == 0 {
            return Err(ConfigError::InvalidTries(self.tries));
        }
        if self.max_shrink_steps == 0 {
            return Err(ConfigError::InvalidShrinkSteps(self.max_shrink_steps));
        }
        if self.bounded_shrinking.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_discard_ratio == 0 {
            return Err(ConfigError::InvalidDiscardRatio(self.max_discard_ratio));
        }
        if let Some(seed) = &self.seed {
            Seed::parse(seed)?;
        }
        Ok(())
    }
}

/// Defaults shared by all properties of a test run
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    pub default_tries: usize,
    pub default_seed: Option<String>,
    pub shrinking: ShrinkingMode,
    pub generation: GenerationMode,
    pub after_failure: AfterFailureMode,
    pub edge_cases: EdgeCasesMode,
    /// Location of the run database, if one should be kept
    pub database: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_tries: DEFAULT_TRIES,
            default_seed: None,
            shrinking: ShrinkingMode::default(),
            generation: GenerationMode::default(),
            after_failure: AfterFailureMode::default(),
            edge_cases: EdgeCasesMode::default(),
            database: None,
        }
    }
}

impl GlobalConfig {
    /// Create a global configuration with validation
    pub fn new(default_tries: usize, default_seed: Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            default_tries,
            default_seed,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Read defaults from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read defaults through a lookup function keyed by `FORALL_*` names.
    ///
    /// Unset keys keep their defaults. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(tries) = get("FORALL_TRIES") {
            config.default_tries =
                tries
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSetting {
                        key: "FORALL_TRIES".to_string(),
                        value: tries.clone(),
                    })?;
        }
        if let Some(seed) = get("FORALL_SEED") {
            Seed::parse(&seed)?;
            config.default_seed = Some(seed);
        }
        if let Some(generation) = get("FORALL_GENERATION") {
            config.generation = generation.parse()?;
        }
        if let Some(shrinking) = get("FORALL_SHRINKING") {
            config.shrinking = shrinking.parse()?;
        }
        if let Some(after_failure) = get("FORALL_AFTER_FAILURE") {
            config.after_failure = after_failure.parse()?;
        }
        if let Some(edge_cases) = get("FORALL_EDGE_CASES") {
            config.edge_cases = edge_cases.parse()?;
        }
        config.database = get("FORALL_DATABASE").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_tries == 0 {
            return Err(ConfigError::InvalidTries(self.default_tries));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_property_config_defaults() {
        let config = PropertyConfig::default();
        assert_eq!(config.tries, 1000);
        assert_eq!(config.effective_gen_size(), 1000);
        assert_eq!(config.shrinking, ShrinkingMode::Bounded);
        assert_eq!(config.generation, GenerationMode::Auto);
        assert_eq!(config.after_failure.resolved(), AfterFailureMode::SameSeed);
        assert_eq!(config.edge_cases, EdgeCasesMode::Mixin);
        assert_eq!(config.max_discard_ratio, 5);
        assert_eq!(config.bounded_shrinking, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_property_config_validation() {
        let config = PropertyConfig::default().with_tries(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidTries(0)));

        let config = PropertyConfig::default().with_max_shrink_steps(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidShrinkSteps(0)));

        let config = PropertyConfig::default().with_bounded_shrinking(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));

        let config = PropertyConfig::default().with_max_discard_ratio(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidDiscardRatio(0)));

        let config = PropertyConfig::default().with_seed("not a number");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSeed(_))));
    }

    #[test]
    fn test_gen_size_override() {
        let config = PropertyConfig::default().with_tries(50).with_gen_size(7);
        assert_eq!(config.effective_gen_size(), 7);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("OFF".parse::<ShrinkingMode>(), Ok(ShrinkingMode::Off));
        assert_eq!("full".parse::<ShrinkingMode>(), Ok(ShrinkingMode::Full));
        assert_eq!(
            "EXHAUSTIVE".parse::<GenerationMode>(),
            Ok(GenerationMode::Exhaustive)
        );
        assert_eq!(
            "random-seed".parse::<AfterFailureMode>(),
            Ok(AfterFailureMode::RandomSeed)
        );
        assert_eq!("first".parse::<EdgeCasesMode>(), Ok(EdgeCasesMode::First));
        assert!("sometimes".parse::<ShrinkingMode>().is_err());
    }

    #[test]
    fn test_global_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("FORALL_TRIES", "42"),
            ("FORALL_SEED", "-17"),
            ("FORALL_GENERATION", "randomized"),
            ("FORALL_SHRINKING", "off"),
            ("FORALL_AFTER_FAILURE", "RANDOM_SEED"),
            ("FORALL_DATABASE", "target/forall.json"),
        ]
        .into_iter()
        .collect();

        let global = GlobalConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(global.default_tries, 42);
        assert_eq!(global.default_seed.as_deref(), Some("-17"));
        assert_eq!(global.generation, GenerationMode::Randomized);
        assert_eq!(global.shrinking, ShrinkingMode::Off);
        assert_eq!(global.after_failure, AfterFailureMode::RandomSeed);
        assert_eq!(global.database, Some(PathBuf::from("target/forall.json")));

        let config = PropertyConfig::from_global(&global);
        assert_eq!(config.tries, 42);
        assert_eq!(config.seed.as_deref(), Some("-17"));
        assert_eq!(config.shrinking, ShrinkingMode::Off);
    }

    #[test]
    fn test_global_config_rejects_bad_values() {
        let result = GlobalConfig::from_lookup(|key| {
            (key == "FORALL_TRIES").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidSetting { .. })));

        let result =
            GlobalConfig::from_lookup(|key| (key == "FORALL_TRIES").then(|| "0".to_string()));
        assert_eq!(result, Err(ConfigError::InvalidTries(0)));

        let empty = GlobalConfig::from_lookup(|_| Some(String::new())).unwrap();
        assert_eq!(empty.default_tries, DEFAULT_TRIES);
    }

    #[test]
    fn test_global_config_new() {
        assert!(GlobalConfig::new(100, None).is_ok());
        assert_eq!(GlobalConfig::new(0, None), Err(ConfigError::InvalidTries(0)));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidTries(0).to_string(),
            "Invalid tries count: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidSeed("x".to_string()).to_string(),
            "Invalid seed 'x' (must be a decimal integer)"
        );
    }
}
