//! Trait and types for the external fee data service.

use std::fmt;

use anyhow::Result;

use crate::analyzers::types::{CitySummary, LocationRecord};

/// Which locations are being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every location across all cities.
    #[default]
    All,
    /// Locations of one city, matched case-insensitively by the service.
    City(String),
}

impl Scope {
    /// A city scope, or [`Scope::All`] when `name` is blank.
    pub fn city(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            Scope::All
        } else {
            Scope::City(name.to_string())
        }
    }

    pub fn city_name(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::City(name) => Some(name),
        }
    }
}

impl From<Option<String>> for Scope {
    fn from(city: Option<String>) -> Self {
        city.map_or(Scope::All, |c| Scope::city(&c))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all cities"),
            Scope::City(name) => f.write_str(name),
        }
    }
}

/// Abstraction over the service that stores and aggregates fee locations.
#[async_trait::async_trait]
pub trait FeeApi: Send + Sync {
    /// Locations in `scope`.
    async fn locations(&self, scope: &Scope) -> Result<Vec<LocationRecord>>;

    /// Every known city with its location count and averages.
    async fn cities(&self) -> Result<Vec<CitySummary>>;

    /// Aggregated statistics for a single city.
    async fn city_stats(&self, city: &str) -> Result<CitySummary>;

    /// Per-city averages for the comparison view.
    async fn comparison(&self) -> Result<Vec<CitySummary>>;
}
