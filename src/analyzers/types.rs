//! Data types shared by the aggregation, classification and comparison code.

use serde::{Deserialize, Serialize};

/// A single fee location as returned by the locations endpoint.
///
/// Records are never mutated after they are fetched; a new fetch replaces the
/// whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub city: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub streetno: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub installation_fee: f64,
    pub quarterly_fee: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub accesstype: Option<String>,
}

impl LocationRecord {
    /// Street and street number joined by a space, skipping missing parts.
    pub fn address(&self) -> String {
        [self.street.as_deref(), self.streetno.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn fee(&self, field: FeeField) -> f64 {
        match field {
            FeeField::Installation => self.installation_fee,
            FeeField::Quarterly => self.quarterly_fee,
        }
    }
}

/// Selects which fee of a record or summary an aggregate is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeField {
    Installation,
    Quarterly,
}

impl FeeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeField::Installation => "installation_fee",
            FeeField::Quarterly => "quarterly_fee",
        }
    }
}

/// Per-city statistics aggregated by the data service.
///
/// The comparison endpoint omits `count` and the min/max columns, so those
/// fall back to `0` and `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    pub city: String,
    #[serde(default)]
    pub count: u64,
    pub avg_installation_fee: f64,
    pub avg_quarterly_fee: f64,
    #[serde(default)]
    pub min_installation_fee: Option<f64>,
    #[serde(default)]
    pub max_installation_fee: Option<f64>,
    #[serde(default)]
    pub min_quarterly_fee: Option<f64>,
    #[serde(default)]
    pub max_quarterly_fee: Option<f64>,
}

impl CitySummary {
    pub fn new(city: &str, count: u64, avg_installation_fee: f64, avg_quarterly_fee: f64) -> Self {
        Self {
            city: city.to_string(),
            count,
            avg_installation_fee,
            avg_quarterly_fee,
            min_installation_fee: None,
            max_installation_fee: None,
            min_quarterly_fee: None,
            max_quarterly_fee: None,
        }
    }

    pub fn avg(&self, field: FeeField) -> f64 {
        match field {
            FeeField::Installation => self.avg_installation_fee,
            FeeField::Quarterly => self.avg_quarterly_fee,
        }
    }

    /// Label used for city pickers, e.g. `Lund (12 locations)`.
    pub fn label(&self) -> String {
        format!("{} ({} locations)", self.city, self.count)
    }
}

/// Headline numbers for the active scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallStats {
    pub avg_installation: f64,
    pub avg_quarterly: f64,
    pub total_count: u64,
}

/// One row of the cross-city comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub city: String,
    pub avg_installation_fee: f64,
    pub avg_quarterly_fee: f64,
    /// Installation plus four quarters of recurring fee.
    pub annual_cost: f64,
}

impl ComparisonRow {
    pub fn annual_cost_rounded(&self) -> f64 {
        self.annual_cost.round()
    }
}
