pub mod config;
pub mod enrich;
mod error;
pub mod generative;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use nearby_core::{normalize, RecommendData};
use nearby_observability::AppMetrics;
use nearby_providers::{GenerationClient, MapSearchClient};
use serde_json::Value;
use tracing::{info, instrument};

pub use config::ServiceConfig;
pub use enrich::Enricher;
pub use error::RecommendError;
pub use generative::ReasonGenerator;

/// The whole request path: normalize, validate, search, enrich, assemble.
/// Normalizing and enriching never raise; only the pre-flight checks and
/// the search leg can fail a request.
pub struct RecommendPipeline {
    config: ServiceConfig,
    map_search: Option<MapSearchClient>,
    enricher: Enricher<GenerationClient>,
    metrics: Arc<AppMetrics>,
}

impl RecommendPipeline {
    pub fn new(config: ServiceConfig, metrics: Arc<AppMetrics>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;

        let map_search = config.map_key.clone().map(|key| {
            MapSearchClient::new(
                http.clone(),
                key,
                config.map_endpoint.clone(),
                config.page_size,
            )
        });

        let generator = config.generation_api_key.clone().map(|key| {
            GenerationClient::new(
                http,
                config.generation_endpoint.clone(),
                key,
                config.generation_model.clone(),
            )
        });

        let enricher = Enricher::new(generator, config.reason_deadline, metrics.clone());

        Ok(Self {
            config,
            map_search,
            enricher,
            metrics,
        })
    }

    #[instrument(skip_all)]
    pub async fn recommend(&self, raw: &Value) -> Result<RecommendData, RecommendError> {
        self.metrics.inc_request();
        let started = Instant::now();

        let query = normalize(raw, self.config.default_radius_m);
        info!(
            route = query.route.as_token(),
            keyword = %query.keyword,
            locale = query.locale.as_code(),
            radius = query.radius_m,
            intent = %query.intent,
            "request normalized"
        );

        if !query.has_coordinates() {
            return Err(RecommendError::InvalidInput(
                "missing or invalid lat/lng".to_string(),
            ));
        }
        if !query.coordinates_in_range() {
            return Err(RecommendError::InvalidInput(
                "coordinates out of range".to_string(),
            ));
        }

        let Some(map_search) = &self.map_search else {
            return Err(RecommendError::Configuration(
                "map search provider key is not configured".to_string(),
            ));
        };

        let pois = match map_search.search_around(&query).await {
            Ok(pois) => pois,
            Err(err) => {
                self.metrics.inc_provider_error();
                return Err(err.into());
            }
        };
        info!(hits = pois.len(), "search completed");

        let pois = if query.enable_reasons && !pois.is_empty() {
            self.enricher
                .enrich(pois, &query.intent, query.locale, query.use_generative)
                .await
        } else {
            pois
        };

        let data = RecommendData::assemble(pois, &query);
        self.metrics.observe_latency(started.elapsed());
        info!(total = data.total, has_reasons = data.has_reasons, "response assembled");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline(config: ServiceConfig) -> RecommendPipeline {
        RecommendPipeline::new(config, AppMetrics::shared()).unwrap()
    }

    #[tokio::test]
    async fn rejects_missing_coordinates_before_any_remote_call() {
        let service = pipeline(ServiceConfig::default());
        let err = service.recommend(&json!({"bizType": "yoga"})).await.unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput(_)));
        assert_eq!(err.envelope_code(), 400);
    }

    #[tokio::test]
    async fn rejects_out_of_range_coordinates() {
        let service = pipeline(ServiceConfig::default());
        let err = service
            .recommend(&json!({"lat": 91.0, "lng": 116.4}))
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let service = pipeline(ServiceConfig::default());
        let err = service
            .recommend(&json!({"lat": 39.9, "lng": 116.4}))
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendError::Configuration(_)));
        assert_eq!(err.envelope_code(), 500);
    }
}
