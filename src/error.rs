//! Error types.
//!
//! Only input and configuration problems are errors. Deficiencies of a
//! timetable are expressed as cost, never as failures.

use thiserror::Error;

/// Errors raised while building a snapshot or importing records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimetableError {
    #[error("duplicate {kind} code `{code}`")]
    DuplicateCode { kind: &'static str, code: String },

    #[error("duplicate time slot id {0}")]
    DuplicateSlot(u32),

    #[error("no time slots defined")]
    NoTimeSlots,

    #[error("no days defined")]
    NoDays,

    #[error("unknown {kind} `{code}`")]
    UnknownCode { kind: &'static str, code: String },

    #[error("course `{0}` is not schedulable in this snapshot")]
    NotSchedulable(String),

    #[error("course `{0}` has no assignment")]
    MissingCourse(String),

    #[error("course `{0}` appears more than once")]
    RepeatedCourse(String),

    #[error("day index {day} outside 1..={days}")]
    DayOutOfRange { day: usize, days: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid run parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population_size must be at least {min}, got {got}")]
    PopulationTooSmall { min: usize, got: usize },

    #[error("max_generations must be at least 1")]
    ZeroGenerations,

    #[error("elite_count {elite} must be smaller than population_size {population}")]
    TooManyElites { elite: usize, population: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("lambda_lower ({lower}) must not exceed lambda_upper ({upper})")]
    LambdaBounds { lower: f64, upper: f64 },

    #[error("place_usage_cap must be at least 1")]
    ZeroUsageCap,

    #[error("relocation_attempts must be at least 1")]
    ZeroRelocationAttempts,
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
