use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::warn;

use crate::analyzers::types::{CitySummary, LocationRecord};
use crate::fetch::{HttpClient, fetch_json};
use crate::services::fee_api::{FeeApi, Scope};

/// [`FeeApi`] over the service's JSON endpoints:
///
/// | Call          | Endpoint                       |
/// |---------------|--------------------------------|
/// | `locations`   | `GET /api/locations[?city=..]` |
/// | `cities`      | `GET /api/cities`              |
/// | `city_stats`  | `GET /api/stats/{city}`        |
/// | `comparison`  | `GET /api/comparison`          |
pub struct HttpFeeApi<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> HttpFeeApi<C> {
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| anyhow!("Invalid API URL '{base_url}': {e}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API URL '{base_url}' cannot be used as a base"));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API URL cannot be a base"))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn locations_url(&self, scope: &Scope) -> Result<Url> {
        let mut url = self.endpoint(&["locations"])?;
        if let Some(city) = scope.city_name() {
            url.query_pairs_mut().append_pair("city", city);
        }
        Ok(url)
    }

    pub(crate) fn stats_url(&self, city: &str) -> Result<Url> {
        self.endpoint(&["stats", city])
    }
}

/// Decodes location rows one at a time. Rows the service stored with missing
/// fees or coordinates come back as `null` and are skipped.
pub(crate) fn decode_locations(rows: Vec<Value>) -> Vec<LocationRecord> {
    let total = rows.len();
    let locations: Vec<LocationRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(location) => Some(location),
            Err(e) => {
                warn!(row = i, error = %e, "Skipping undecodable location");
                None
            }
        })
        .collect();

    if locations.len() < total {
        warn!(skipped = total - locations.len(), total, "Some locations were skipped");
    }
    locations
}

#[async_trait]
impl<C: HttpClient> FeeApi for HttpFeeApi<C> {
    #[tracing::instrument(skip(self), fields(scope = %scope))]
    async fn locations(&self, scope: &Scope) -> Result<Vec<LocationRecord>> {
        let rows: Vec<Value> = fetch_json(&self.client, self.locations_url(scope)?).await?;
        Ok(decode_locations(rows))
    }

    async fn cities(&self) -> Result<Vec<CitySummary>> {
        fetch_json(&self.client, self.endpoint(&["cities"])?).await
    }

    #[tracing::instrument(skip(self))]
    async fn city_stats(&self, city: &str) -> Result<CitySummary> {
        fetch_json(&self.client, self.stats_url(city)?).await
    }

    async fn comparison(&self) -> Result<Vec<CitySummary>> {
        fetch_json(&self.client, self.endpoint(&["comparison"])?).await
    }
}
