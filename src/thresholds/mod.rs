//! Classification threshold settings.
//!
//! [`ThresholdConfig`] holds the relative deviations that separate the fee bands.
//! [`ThresholdStore`] is the trait for persisting it between runs.
//! [`JsonFileStore`] implements [`ThresholdStore`] on a local JSON file.
//! [`ThresholdManager`] owns the active config and is its only mutator.

mod manager;
mod store;

pub use manager::ThresholdManager;
pub use store::JsonFileStore;

use serde::{Deserialize, Serialize};

use crate::error::{FeeError, Result};

pub const DEFAULT_THRESHOLD: f64 = 0.20;

/// Relative deviations from the mean above/below which a fee is High/Low.
///
/// Serialized as `{"highThreshold": 0.2, "lowThreshold": 0.2}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    pub high_threshold: f64,
    pub low_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high_threshold: DEFAULT_THRESHOLD,
            low_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    /// Builds a config from whole percentages, e.g. `from_percent(10, 15)`.
    pub fn from_percent(high: u8, low: u8) -> Self {
        Self {
            high_threshold: f64::from(high) / 100.0,
            low_threshold: f64::from(low) / 100.0,
        }
    }

    /// Checks both thresholds lie in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_fraction("highThreshold", self.high_threshold)?;
        check_fraction("lowThreshold", self.low_threshold)
    }

    /// Upper and lower fee bounds around `average`.
    pub fn bounds(&self, average: f64) -> (f64, f64) {
        (
            average * (1.0 + self.high_threshold),
            average * (1.0 - self.low_threshold),
        )
    }

    /// Percentages of the average at which the High and Low bands begin,
    /// e.g. `(120, 80)` for the defaults.
    pub fn preview(&self) -> (i64, i64) {
        (
            (100.0 + self.high_threshold * 100.0).round() as i64,
            (100.0 - self.low_threshold * 100.0).round() as i64,
        )
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<()> {
    let reason = if value.is_nan() {
        "not a number"
    } else if value <= 0.0 {
        "must be greater than 0"
    } else if value > 1.0 {
        "must be at most 1"
    } else {
        return Ok(());
    };

    Err(FeeError::InvalidThresholdConfig {
        field,
        value,
        reason: reason.to_string(),
    })
}

/// Persists a [`ThresholdConfig`] between runs.
pub trait ThresholdStore {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<ThresholdConfig>>;
    fn save(&self, config: &ThresholdConfig) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_twenty_percent() {
        let c = ThresholdConfig::default();
        assert_eq!(c.high_threshold, 0.20);
        assert_eq!(c.low_threshold, 0.20);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(ThresholdConfig::from_percent(100, 1).validate().is_ok());
        assert!(ThresholdConfig::from_percent(0, 20).validate().is_err());

        let err = ThresholdConfig {
            high_threshold: 1.5,
            low_threshold: 0.2,
        }
        .validate()
        .unwrap_err();
        match err {
            FeeError::InvalidThresholdConfig { field, value, .. } => {
                assert_eq!(field, "highThreshold");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_nan_and_negative_low() {
        let nan = ThresholdConfig {
            high_threshold: f64::NAN,
            low_threshold: 0.2,
        };
        assert!(nan.validate().is_err());

        let negative = ThresholdConfig {
            high_threshold: 0.2,
            low_threshold: -0.1,
        };
        match negative.validate().unwrap_err() {
            FeeError::InvalidThresholdConfig { field, .. } => assert_eq!(field, "lowThreshold"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_preview() {
        assert_eq!(ThresholdConfig::default().preview(), (120, 80));
        assert_eq!(ThresholdConfig::from_percent(35, 5).preview(), (135, 95));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ThresholdConfig::from_percent(10, 30)).unwrap();
        assert_eq!(json["highThreshold"], 0.1);
        assert_eq!(json["lowThreshold"], 0.3);
    }
}
