//! View state for the fee map.
//!
//! The [`Coordinator`] owns the active dataset, the city index, the comparison
//! input and the threshold settings. Every state change ends in a full
//! re-derivation of the fee bands, so the bands always match the current
//! thresholds and reference average.
//!
//! Scope changes are split into [`Coordinator::begin_scope`],
//! [`ScopeRequest::fetch`] and [`Coordinator::complete_scope`]. Each request
//! carries a generation number and only the most recently issued one is
//! applied; responses to older requests are dropped whatever order they
//! arrive in.

use tracing::{debug, info, warn};

use crate::analyzers::aggregate::{ReferenceAverages, overall_stats};
use crate::analyzers::band::{FeeBand, classify};
use crate::analyzers::comparison::build_comparison;
use crate::analyzers::types::{CitySummary, ComparisonRow, FeeField, LocationRecord, OverallStats};
use crate::error::{FeeError, Result};
use crate::services::fee_api::{FeeApi, Scope};
use crate::thresholds::{ThresholdConfig, ThresholdManager, ThresholdStore};

/// Outcome of completing a scope request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The response was current and is now displayed.
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

/// A scope change that has been issued but whose data has not arrived yet.
#[derive(Debug)]
pub struct ScopeRequest {
    generation: u64,
    scope: Scope,
}

impl ScopeRequest {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Fetches the locations of the requested scope and, for a single city,
    /// its statistics. Fetch failures are carried in the response.
    pub async fn fetch<A: FeeApi>(self, api: &A) -> ScopeResponse {
        let ScopeRequest { generation, scope } = self;

        let stats = async {
            match scope.city_name() {
                Some(city) => Some(api.city_stats(city).await),
                None => None,
            }
        };
        let (locations, stats) = tokio::join!(api.locations(&scope), stats);

        ScopeResponse {
            generation,
            scope,
            locations,
            stats,
        }
    }
}

/// Data fetched for a [`ScopeRequest`].
#[derive(Debug)]
pub struct ScopeResponse {
    generation: u64,
    scope: Scope,
    locations: anyhow::Result<Vec<LocationRecord>>,
    stats: Option<anyhow::Result<CitySummary>>,
}

pub struct Coordinator<A, S> {
    api: A,
    thresholds: ThresholdManager<S>,
    band_field: FeeField,

    scope: Scope,
    generation: u64,
    locations: Vec<LocationRecord>,
    reference: Option<ReferenceAverages>,
    bands: Vec<FeeBand>,
    scope_stats: Option<CitySummary>,

    city_index: Vec<CitySummary>,
    comparison: Vec<CitySummary>,
}

impl<A: FeeApi, S: ThresholdStore> Coordinator<A, S> {
    pub fn new(api: A, thresholds: ThresholdManager<S>) -> Self {
        Self {
            api,
            thresholds,
            band_field: FeeField::Quarterly,
            scope: Scope::All,
            generation: 0,
            locations: Vec::new(),
            reference: None,
            bands: Vec::new(),
            scope_stats: None,
            city_index: Vec::new(),
            comparison: Vec::new(),
        }
    }

    /// Loads the city list, then every location, then the comparison.
    ///
    /// Each step degrades on its own; failures are logged and leave the
    /// corresponding view empty.
    pub async fn init(&mut self) {
        if let Err(e) = self.refresh_cities().await {
            warn!(error = %e, "City list unavailable");
        }
        if let Err(e) = self.set_scope(Scope::All).await {
            warn!(error = %e, "Locations unavailable");
        }
        if let Err(e) = self.refresh_comparison().await {
            warn!(error = %e, "Comparison unavailable");
        }
    }

    /// Reloads the city index. On failure the previous index is kept.
    pub async fn refresh_cities(&mut self) -> Result<()> {
        let cities = self
            .api
            .cities()
            .await
            .map_err(|e| FeeError::unavailable("city list", format!("{e:#}")))?;
        info!(cities = cities.len(), "City list loaded");
        self.city_index = cities;
        Ok(())
    }

    /// Reloads the comparison input. On failure the previous one is kept.
    pub async fn refresh_comparison(&mut self) -> Result<()> {
        let comparison = self
            .api
            .comparison()
            .await
            .map_err(|e| FeeError::unavailable("city comparison", format!("{e:#}")))?;
        debug!(cities = comparison.len(), "Comparison loaded");
        self.comparison = comparison;
        Ok(())
    }

    /// Issues a scope change. Any request issued earlier becomes stale.
    pub fn begin_scope(&mut self, scope: Scope) -> ScopeRequest {
        self.generation += 1;
        debug!(generation = self.generation, scope = %scope, "Scope requested");
        ScopeRequest {
            generation: self.generation,
            scope,
        }
    }

    /// Applies a fetched response if it belongs to the latest request.
    ///
    /// A failed location fetch still switches to the requested scope, with no
    /// locations, and reports [`FeeError::DataUnavailable`].
    pub fn complete_scope(&mut self, response: ScopeResponse) -> Result<Refresh> {
        if response.generation != self.generation {
            debug!(
                generation = response.generation,
                latest = self.generation,
                scope = %response.scope,
                "Discarding stale response"
            );
            return Ok(Refresh::Stale);
        }

        self.scope = response.scope;
        self.scope_stats = match response.stats {
            Some(Ok(stats)) => Some(stats),
            Some(Err(e)) => {
                warn!(scope = %self.scope, error = %format!("{e:#}"), "City stats unavailable");
                None
            }
            None => None,
        };

        match response.locations {
            Ok(locations) => {
                info!(scope = %self.scope, locations = locations.len(), "Locations loaded");
                self.locations = locations;
                self.recompute();
                Ok(Refresh::Applied)
            }
            Err(e) => {
                self.locations.clear();
                self.recompute();
                Err(FeeError::unavailable(
                    format!("locations for {}", self.scope),
                    format!("{e:#}"),
                ))
            }
        }
    }

    /// Switches scope and waits for its data.
    #[tracing::instrument(skip(self), fields(scope = %scope))]
    pub async fn set_scope(&mut self, scope: Scope) -> Result<Refresh> {
        let request = self.begin_scope(scope);
        let response = request.fetch(&self.api).await;
        self.complete_scope(response)
    }

    /// Validates, persists and activates new thresholds, then re-derives
    /// every band against the unchanged reference average.
    pub fn apply_thresholds(&mut self, config: ThresholdConfig) -> Result<()> {
        self.thresholds.apply(config)?;
        self.reclassify();
        Ok(())
    }

    /// Re-reads the persisted thresholds and re-derives every band.
    pub fn load_thresholds(&mut self) -> ThresholdConfig {
        let config = self.thresholds.load();
        self.reclassify();
        config
    }

    pub fn reset_thresholds(&mut self) -> ThresholdConfig {
        let config = self.thresholds.reset();
        self.reclassify();
        config
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        self.thresholds.current()
    }

    fn recompute(&mut self) {
        self.reference = match ReferenceAverages::from_records(&self.locations) {
            Ok(reference) => Some(reference),
            Err(e) => {
                debug!(scope = %self.scope, error = %e, "No reference average, bands suppressed");
                None
            }
        };
        self.reclassify();
    }

    fn reclassify(&mut self) {
        let config = self.thresholds.current();
        let field = self.band_field;

        self.bands = match self.reference {
            Some(reference) => {
                let average = reference.get(field);
                self.locations
                    .iter()
                    .map(|l| classify(l.fee(field), average, &config))
                    .collect()
            }
            None => Vec::new(),
        };
    }

    /// Every displayed location with its band. Empty when there is no
    /// reference average to classify against.
    pub fn classified_locations(&self) -> Vec<(&LocationRecord, FeeBand)> {
        self.locations.iter().zip(self.bands.iter().copied()).collect()
    }

    /// Comparison rows in the order the service returned them.
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        build_comparison(&self.comparison)
    }

    /// Headline numbers for the active scope: a count-weighted rollup of the
    /// city index for all cities, the service's own statistics for one city.
    pub fn overall_stats(&self) -> Option<OverallStats> {
        match self.scope {
            Scope::All => overall_stats(&self.city_index).ok(),
            Scope::City(_) => self.scope_stats.clone().map(OverallStats::from),
        }
    }

    /// Mean of the banded fee over the active dataset.
    pub fn reference_average(&self) -> Option<f64> {
        self.reference.map(|r| r.get(self.band_field))
    }

    pub fn reference(&self) -> Option<ReferenceAverages> {
        self.reference
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn cities(&self) -> &[CitySummary] {
        &self.city_index
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
