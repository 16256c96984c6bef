use crate::analyzers::types::{CitySummary, FeeField, LocationRecord, OverallStats};
use crate::analyzers::utility::{mean, weighted_mean};
use crate::error::Result;

/// Mean of the selected fee across `records`.
///
/// An empty slice yields [`crate::error::FeeError::EmptyAggregateInput`].
pub fn mean_fee(records: &[LocationRecord], field: FeeField) -> Result<f64> {
    let values: Vec<f64> = records.iter().map(|r| r.fee(field)).collect();
    mean(&values, field.as_str())
}

/// Count-weighted mean of the per-city averages for `field`.
pub fn rollup(summaries: &[CitySummary], field: FeeField) -> Result<f64> {
    weighted_mean(
        summaries,
        field.as_str(),
        |s| s.avg(field),
        |s| s.count as f64,
    )
}

/// Rolls every city's pre-aggregated averages up into a single set of
/// headline numbers, weighting each city by its location count.
pub fn overall_stats(summaries: &[CitySummary]) -> Result<OverallStats> {
    Ok(OverallStats {
        avg_installation: rollup(summaries, FeeField::Installation)?,
        avg_quarterly: rollup(summaries, FeeField::Quarterly)?,
        total_count: summaries.iter().map(|s| s.count).sum(),
    })
}

/// Mean installation and quarterly fee of a dataset, used as the reference
/// when classifying its locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAverages {
    pub installation: f64,
    pub quarterly: f64,
}

impl ReferenceAverages {
    pub fn from_records(records: &[LocationRecord]) -> Result<Self> {
        Ok(Self {
            installation: mean_fee(records, FeeField::Installation)?,
            quarterly: mean_fee(records, FeeField::Quarterly)?,
        })
    }

    pub fn get(&self, field: FeeField) -> f64 {
        match field {
            FeeField::Installation => self.installation,
            FeeField::Quarterly => self.quarterly,
        }
    }
}

impl From<CitySummary> for OverallStats {
    fn from(s: CitySummary) -> Self {
        OverallStats {
            avg_installation: s.avg_installation_fee,
            avg_quarterly: s.avg_quarterly_fee,
            total_count: s.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeeError;

    fn record(installation_fee: f64, quarterly_fee: f64) -> LocationRecord {
        LocationRecord {
            id: None,
            name: None,
            city: "Lund".to_string(),
            street: None,
            streetno: None,
            zip: None,
            latitude: 55.7,
            longitude: 13.2,
            installation_fee,
            quarterly_fee,
            supplier: None,
            accesstype: None,
        }
    }

    #[test]
    fn test_mean_fee_per_field() {
        let records = vec![record(1000.0, 300.0), record(500.0, 100.0)];
        assert_eq!(mean_fee(&records, FeeField::Installation).unwrap(), 750.0);
        assert_eq!(mean_fee(&records, FeeField::Quarterly).unwrap(), 200.0);
    }

    #[test]
    fn test_mean_fee_empty_is_no_data() {
        let err = mean_fee(&[], FeeField::Quarterly).unwrap_err();
        match err {
            FeeError::EmptyAggregateInput { what } => assert_eq!(what, "quarterly_fee"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rollup_weights_by_count() {
        let summaries = vec![
            CitySummary::new("Lund", 2, 100.0, 100.0),
            CitySummary::new("Malmö", 3, 200.0, 200.0),
        ];
        assert_eq!(rollup(&summaries, FeeField::Installation).unwrap(), 160.0);
    }

    #[test]
    fn test_overall_stats() {
        let summaries = vec![
            CitySummary::new("Lund", 1, 1000.0, 400.0),
            CitySummary::new("Malmö", 3, 600.0, 200.0),
        ];
        let stats = overall_stats(&summaries).unwrap();
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.avg_installation, 700.0);
        assert_eq!(stats.avg_quarterly, 250.0);
    }

    #[test]
    fn test_overall_stats_without_cities() {
        assert!(overall_stats(&[]).is_err());
    }

    #[test]
    fn test_reference_averages() {
        let records = vec![record(100.0, 90.0), record(300.0, 110.0)];
        let reference = ReferenceAverages::from_records(&records).unwrap();
        assert_eq!(reference.get(FeeField::Installation), 200.0);
        assert_eq!(reference.get(FeeField::Quarterly), 100.0);
    }
}
