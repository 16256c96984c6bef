use serde::Serialize;

use crate::thresholds::ThresholdConfig;

/// Where a fee sits relative to the reference average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeeBand {
    High,
    Medium,
    Low,
}

impl FeeBand {
    pub fn label(&self) -> &'static str {
        match self {
            FeeBand::High => "High",
            FeeBand::Medium => "Medium",
            FeeBand::Low => "Low",
        }
    }

    /// Marker colour for the band.
    pub fn color(&self) -> &'static str {
        match self {
            FeeBand::High => "#e74c3c",
            FeeBand::Medium => "#f39c12",
            FeeBand::Low => "#27ae60",
        }
    }
}

/// Classifies `fee` against `reference_average`.
///
/// | Condition                               | Band   |
/// |-----------------------------------------|--------|
/// | fee > avg * (1 + high)                  | High   |
/// | fee < avg * (1 - low)                   | Low    |
/// | otherwise (boundaries included)         | Medium |
///
/// A zero or negative average has no meaningful relative bounds and always
/// yields [`FeeBand::Medium`].
pub fn classify(fee: f64, reference_average: f64, config: &ThresholdConfig) -> FeeBand {
    if reference_average <= 0.0 {
        return FeeBand::Medium;
    }
    let (upper, lower) = config.bounds(reference_average);
    match fee {
        f if f > upper => FeeBand::High,
        f if f < lower => FeeBand::Low,
        _ => FeeBand::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(high: f64, low: f64) -> ThresholdConfig {
        ThresholdConfig {
            high_threshold: high,
            low_threshold: low,
        }
    }

    #[test]
    fn test_classify_ten_percent() {
        let c = config(0.10, 0.10);
        assert_eq!(classify(115.0, 100.0, &c), FeeBand::High);
        assert_eq!(classify(89.0, 100.0, &c), FeeBand::Low);
        assert_eq!(classify(100.0, 100.0, &c), FeeBand::Medium);
    }

    #[test]
    fn test_classify_boundaries_are_medium() {
        let c = config(0.25, 0.5);
        assert_eq!(classify(125.0, 100.0, &c), FeeBand::Medium);
        assert_eq!(classify(50.0, 100.0, &c), FeeBand::Medium);
        assert_eq!(classify(125.01, 100.0, &c), FeeBand::High);
        assert_eq!(classify(49.99, 100.0, &c), FeeBand::Low);
    }

    #[test]
    fn test_classify_default_thresholds() {
        let c = ThresholdConfig::default();
        assert_eq!(classify(121.0, 100.0, &c), FeeBand::High);
        assert_eq!(classify(120.0, 100.0, &c), FeeBand::Medium);
        assert_eq!(classify(79.0, 100.0, &c), FeeBand::Low);
    }

    #[test]
    fn test_classify_degenerate_average() {
        let c = ThresholdConfig::default();
        assert_eq!(classify(50.0, 0.0, &c), FeeBand::Medium);
        assert_eq!(classify(0.0, 0.0, &c), FeeBand::Medium);
        assert_eq!(classify(50.0, -10.0, &c), FeeBand::Medium);
    }

    #[test]
    fn test_band_hints_are_distinct() {
        let colors = [FeeBand::High, FeeBand::Medium, FeeBand::Low].map(|b| b.color());
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
