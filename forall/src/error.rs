//! Error types and falsification causes.

use std::fmt;

use crate::config::ConfigError;

/// Errors that abort a property before or during generation.
///
/// A falsified property is not an error; see [`Cause`] and
/// [`TryExecutionResult`](crate::falsifier::TryExecutionResult).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// A filtering generator rejected too many values in a row
    TooManyFilterMisses {
        misses: usize,
        context: Option<String>,
    },

    /// No arbitrary is registered for the requested type
    CannotFindArbitrary { type_name: String },

    /// A range was constructed with `min > max`
    InvalidRange { min: String, max: String },

    /// The property configuration is invalid
    InvalidConfiguration(ConfigError),

    /// Too many tries were rejected by assumptions
    Exhausted {
        tries: usize,
        checks: usize,
        max_discard_ratio: usize,
    },

    /// Generation of a value failed for another reason
    GenerationFailed {
        message: String,
        context: Option<String>,
    },

    /// Internal error in the engine
    InternalError {
        message: String,
        source_message: Option<String>,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::TooManyFilterMisses { misses, context } => {
                write!(f, "Filter missed {} times in a row", misses)?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            PropertyError::CannotFindArbitrary { type_name } => {
                write!(f, "Cannot find an arbitrary for type {}", type_name)
            }
            PropertyError::InvalidRange { min, max } => {
                write!(f, "Invalid range: min {} is greater than max {}", min, max)
            }
            PropertyError::InvalidConfiguration(err) => {
                write!(f, "Configuration error: {}", err)
            }
            PropertyError::Exhausted {
                tries,
                checks,
                max_discard_ratio,
            } => write!(
                f,
                "Exhausted after {} tries with only {} checks (max discard ratio {})",
                tries, checks, max_discard_ratio
            ),
            PropertyError::GenerationFailed { message, context } => {
                write!(f, "Generation failed: {}", message)?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            PropertyError::InternalError {
                message,
                source_message,
            } => {
                write!(f, "Internal error: {}", message)?;
                if let Some(src) = source_message {
                    write!(f, " (source: {})", src)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PropertyError::InvalidConfiguration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for PropertyError {
    fn from(err: ConfigError) -> Self {
        PropertyError::InvalidConfiguration(err)
    }
}

impl PropertyError {
    /// Create a filter-miss error with context
    pub fn too_many_filter_misses(misses: usize, context: Option<impl Into<String>>) -> Self {
        Self::TooManyFilterMisses {
            misses,
            context: context.map(|c| c.into()),
        }
    }

    /// Create an invalid-range error from the offending bounds
    pub fn invalid_range(min: impl fmt::Debug, max: impl fmt::Debug) -> Self {
        Self::InvalidRange {
            min: format!("{:?}", min),
            max: format!("{:?}", max),
        }
    }

    /// Create an error for a type without a registered arbitrary
    pub fn cannot_find_arbitrary(type_name: impl Into<String>) -> Self {
        Self::CannotFindArbitrary {
            type_name: type_name.into(),
        }
    }

    /// Create a generation failed error with context
    pub fn generation_failed_with_context(
        message: impl Into<String>,
        context: Option<impl Into<String>>,
    ) -> Self {
        Self::GenerationFailed {
            message: message.into(),
            context: context.map(|c| c.into()),
        }
    }

    /// Create an internal error
    pub fn internal_error(
        message: impl Into<String>,
        source_message: Option<impl Into<String>>,
    ) -> Self {
        Self::InternalError {
            message: message.into(),
            source_message: source_message.map(|s| s.into()),
        }
    }

    /// Whether this error stems from configuration rather than user code.
    ///
    /// Configuration errors are reported before any try runs and never
    /// trigger shrinking.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PropertyError::TooManyFilterMisses { .. }
                | PropertyError::CannotFindArbitrary { .. }
                | PropertyError::InvalidRange { .. }
                | PropertyError::InvalidConfiguration(_)
        )
    }
}

/// Why a single try was falsified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// The check returned `false` or an error value
    Assertion(String),
    /// The check panicked
    Panic(String),
}

impl Cause {
    /// Message carried by the cause
    pub fn message(&self) -> &str {
        match self {
            Cause::Assertion(message) | Cause::Panic(message) => message,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Assertion(message) => write!(f, "assertion failed: {}", message),
            Cause::Panic(message) => write!(f, "panicked: {}", message),
        }
    }
}
