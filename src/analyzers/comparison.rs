use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::{CitySummary, ComparisonRow};

/// Quarters per year used for the annual cost figure.
const QUARTERS_PER_YEAR: f64 = 4.0;

/// Ordering applied to comparison rows on request. Building rows never
/// reorders them by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonSort {
    #[default]
    Preserve,
    AnnualCostDesc,
    City,
}

/// Builds one [`ComparisonRow`] per summary, in input order.
pub fn build_comparison(summaries: &[CitySummary]) -> Vec<ComparisonRow> {
    summaries
        .iter()
        .map(|s| ComparisonRow {
            city: s.city.clone(),
            avg_installation_fee: s.avg_installation_fee,
            avg_quarterly_fee: s.avg_quarterly_fee,
            annual_cost: s.avg_installation_fee + s.avg_quarterly_fee * QUARTERS_PER_YEAR,
        })
        .collect()
}

/// Comparison rows stamped with the time they were built, for export.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub cities: Vec<ComparisonRow>,
}

impl ComparisonReport {
    pub fn new(cities: Vec<ComparisonRow>) -> Self {
        Self {
            generated_at: Utc::now(),
            cities,
        }
    }
}

/// Stable sort of `rows` according to `order`.
pub fn sort_comparison(rows: &mut [ComparisonRow], order: ComparisonSort) {
    match order {
        ComparisonSort::Preserve => {}
        ComparisonSort::AnnualCostDesc => {
            rows.sort_by(|a, b| b.annual_cost.total_cmp(&a.annual_cost));
        }
        ComparisonSort::City => rows.sort_by(|a, b| a.city.cmp(&b.city)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<CitySummary> {
        vec![
            CitySummary::new("Uppsala", 4, 500.0, 300.0),
            CitySummary::new("Lund", 2, 2000.0, 100.0),
            CitySummary::new("Malmö", 0, 800.0, 350.0),
        ]
    }

    #[test]
    fn test_annual_cost() {
        let rows = build_comparison(&[CitySummary::new("Lund", 1, 500.0, 300.0)]);
        assert_eq!(rows[0].annual_cost, 1700.0);
    }

    #[test]
    fn test_build_preserves_order_and_length() {
        let rows = build_comparison(&summaries());
        let cities: Vec<_> = rows.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Uppsala", "Lund", "Malmö"]);
    }

    #[test]
    fn test_build_empty() {
        assert!(build_comparison(&[]).is_empty());
    }

    #[test]
    fn test_sort_by_cost() {
        let mut rows = build_comparison(&summaries());
        sort_comparison(&mut rows, ComparisonSort::AnnualCostDesc);
        let cities: Vec<_> = rows.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Lund", "Malmö", "Uppsala"]);
    }

    #[test]
    fn test_sort_by_city_and_preserve() {
        let mut rows = build_comparison(&summaries());
        sort_comparison(&mut rows, ComparisonSort::Preserve);
        assert_eq!(rows[0].city, "Uppsala");

        sort_comparison(&mut rows, ComparisonSort::City);
        let cities: Vec<_> = rows.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Lund", "Malmö", "Uppsala"]);
    }

    #[test]
    fn test_report_serializes_rows() {
        let report = ComparisonReport::new(build_comparison(&summaries()));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["cities"][1]["city"], "Lund");
        assert_eq!(json["cities"][1]["annual_cost"], 2400.0);
    }

    #[test]
    fn test_annual_cost_rounded() {
        let rows = build_comparison(&[CitySummary::new("Lund", 1, 499.6, 100.0)]);
        assert_eq!(rows[0].annual_cost_rounded(), 900.0);
    }
}
