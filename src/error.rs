//! Error types for curl-swarm.
//!
//! Configuration problems are reported as [`ConfigError`] before any particle
//! buffer is touched. Noise evaluation and ticking never fail.

use std::fmt;

/// Errors that can occur while validating or loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The particle count must be at least one.
    InvalidParticleCount,
    /// A numeric field is out of its allowed domain.
    InvalidValue {
        /// Configuration key of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// What the field requires.
        reason: &'static str,
    },
    /// A `min`/`max` pair is inverted.
    InvalidRange {
        /// Configuration key prefix of the pair.
        field: &'static str,
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
    /// Extinction method name not recognized.
    UnknownExtinction(String),
    /// Noise type name not recognized.
    UnknownNoiseType(String),
    /// Palette name not recognized.
    UnknownPalette(String),
    /// Preset name not recognized.
    UnknownPreset(String),
    /// Failed to read or write a config file.
    Io(std::io::Error),
    /// Failed to parse or serialize JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParticleCount => {
                write!(f, "numParticles must be greater than zero")
            }
            ConfigError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid value for {}: {} ({})", field, value, reason)
            }
            ConfigError::InvalidRange { field, min, max } => write!(
                f,
                "Invalid range for {}: min ({}) is greater than max ({})",
                field, min, max
            ),
            ConfigError::UnknownExtinction(name) => write!(
                f,
                "Unknown extinction method '{}'. Expected one of: AGE, MIN_VELOCITY, \
                 MIN_VELOCITY_PER_AXIS, MIN_SOFT_VELOCITY_PER_AXIS, DISTANCE_FROM_CENTER",
                name
            ),
            ConfigError::UnknownNoiseType(name) => write!(
                f,
                "Unknown noise type '{}'. Expected APPROXIMATE_CURL or TRUE_CURL",
                name
            ),
            ConfigError::UnknownPalette(name) => write!(f, "Unknown palette '{}'", name),
            ConfigError::UnknownPreset(name) => write!(f, "Unknown preset '{}'", name),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building or resetting a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}
