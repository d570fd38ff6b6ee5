//! GWO configuration.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, ConfigError};

/// Configuration for the leader-following strategy.
///
/// ```
/// use u_timetable::gwo::GwoConfig;
///
/// let config = GwoConfig::default().with_a(1.5);
/// assert_eq!(config.a_decay, 0.995);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwoConfig {
    /// Initial exploration coefficient.
    pub a: f64,

    /// Multiplicative decay of `a` per generation; generation `t` uses
    /// `a · a_decay^t`.
    pub a_decay: f64,

    /// Probability of redrawing the teacher or the place (50/50) of each
    /// assignment after the position update.
    pub redraw_probability: f64,
}

impl Default for GwoConfig {
    fn default() -> Self {
        Self {
            a: 2.0,
            a_decay: 0.995,
            redraw_probability: 0.5,
        }
    }
}

impl GwoConfig {
    pub fn with_a(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn with_a_decay(mut self, decay: f64) -> Self {
        self.a_decay = decay;
        self
    }

    pub fn with_redraw_probability(mut self, p: f64) -> Self {
        self.redraw_probability = p;
        self
    }

    /// Exploration coefficient for a 0-based generation.
    pub fn a_at(&self, generation: usize) -> f64 {
        self.a * self.a_decay.powi(generation.min(i32::MAX as usize) as i32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("a", self.a)?;
        check_probability("a_decay", self.a_decay)?;
        check_probability("redraw_probability", self.redraw_probability)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay() {
        let c = GwoConfig::default();
        assert_eq!(c.a_at(0), 2.0);
        assert!((c.a_at(1) - 1.99).abs() < 1e-12);
        assert!(c.a_at(1000) < 0.02);
    }

    #[test]
    fn test_validation() {
        assert!(GwoConfig::default().with_a_decay(1.2).validate().is_err());
        assert!(GwoConfig::default().with_a(-0.1).validate().is_err());
        assert!(GwoConfig::default().with_redraw_probability(0.0).validate().is_ok());
    }

    #[test]
    fn test_infinite_a_rejected() {
        assert_eq!(
            GwoConfig::default().with_a(f64::INFINITY).validate(),
            Err(ConfigError::Negative {
                name: "a",
                value: f64::INFINITY
            })
        );
        assert!(GwoConfig::default().with_a(f64::NAN).validate().is_err());
    }
}
