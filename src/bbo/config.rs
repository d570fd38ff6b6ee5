//! BBO configuration.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, ConfigError};

/// Configuration for the migration/mutation strategy.
///
/// # Defaults
///
/// ```
/// use u_timetable::bbo::BboConfig;
///
/// let config = BboConfig::default();
/// assert_eq!(config.pmodify, 0.8);
/// assert_eq!(config.pmutate, 0.15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BboConfig {
    /// Probability that a candidate takes part in migration.
    pub pmodify: f64,

    /// Per-assignment mutation probability in the worse half.
    pub pmutate: f64,

    /// Lower bound of the normalized immigration rate.
    pub lambda_lower: f64,

    /// Upper bound of the normalized immigration rate.
    ///
    /// Also used for every candidate when all raw rates are equal.
    pub lambda_upper: f64,

    /// Maximum immigration rate `I`.
    pub immigration_max: f64,

    /// Maximum emigration rate `E`.
    pub emigration_max: f64,
}

impl Default for BboConfig {
    fn default() -> Self {
        Self {
            pmodify: 0.8,
            pmutate: 0.15,
            lambda_lower: 0.0,
            lambda_upper: 1.0,
            immigration_max: 1.0,
            emigration_max: 1.0,
        }
    }
}

impl BboConfig {
    pub fn with_pmodify(mut self, p: f64) -> Self {
        self.pmodify = p;
        self
    }

    pub fn with_pmutate(mut self, p: f64) -> Self {
        self.pmutate = p;
        self
    }

    /// Sets the normalized immigration range.
    pub fn with_lambda_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lambda_lower = lower;
        self.lambda_upper = upper;
        self
    }

    pub fn with_rate_max(mut self, immigration: f64, emigration: f64) -> Self {
        self.immigration_max = immigration;
        self.emigration_max = emigration;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("pmodify", self.pmodify)?;
        check_probability("pmutate", self.pmutate)?;
        check_probability("lambda_lower", self.lambda_lower)?;
        check_probability("lambda_upper", self.lambda_upper)?;
        if self.lambda_lower > self.lambda_upper {
            return Err(ConfigError::LambdaBounds {
                lower: self.lambda_lower,
                upper: self.lambda_upper,
            });
        }
        check_non_negative("immigration_max", self.immigration_max)?;
        check_non_negative("emigration_max", self.emigration_max)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BboConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            BboConfig::default().with_pmodify(1.5).validate(),
            Err(ConfigError::Probability { name: "pmodify", .. })
        ));
        assert_eq!(
            BboConfig::default().with_lambda_bounds(0.9, 0.1).validate(),
            Err(ConfigError::LambdaBounds {
                lower: 0.9,
                upper: 0.1
            })
        );
        assert!(matches!(
            BboConfig::default().with_rate_max(-1.0, 1.0).validate(),
            Err(ConfigError::Negative { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let c: BboConfig = serde_json::from_str(r#"{"pmutate": 0.3}"#).unwrap();
        assert_eq!(c.pmutate, 0.3);
        assert_eq!(c.pmodify, 0.8);
    }
}
