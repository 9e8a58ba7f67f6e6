use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use nearby_core::{build_reason_by_rule, Locale, PoiRecord};
use nearby_observability::AppMetrics;
use tracing::{debug, instrument, warn};

use crate::generative::ReasonGenerator;

/// Runs reason generation across a POI batch: concurrent fan-out, per-item
/// fallback to the rule text, and a batch deadline that degrades to the
/// unenriched input rather than a partial mix.
pub struct Enricher<G> {
    generator: Option<G>,
    deadline: Duration,
    metrics: Arc<AppMetrics>,
}

impl<G: ReasonGenerator> Enricher<G> {
    pub fn new(generator: Option<G>, deadline: Duration, metrics: Arc<AppMetrics>) -> Self {
        Self {
            generator,
            deadline,
            metrics,
        }
    }

    /// Attaches a reason to every record, or to none of them if the batch
    /// deadline elapses first. Output order always equals input order.
    #[instrument(skip_all, fields(batch = pois.len(), generative = use_generative))]
    pub async fn enrich(
        &self,
        mut pois: Vec<PoiRecord>,
        intent: &str,
        locale: Locale,
        use_generative: bool,
    ) -> Vec<PoiRecord> {
        if pois.is_empty() {
            return pois;
        }

        let tasks = pois.iter().enumerate().map(|(index, poi)| async move {
            (index, self.reason_for(poi, intent, locale, use_generative).await)
        });
        let outcome = tokio::time::timeout(self.deadline, join_all(tasks)).await;

        match outcome {
            Ok(reasons) => {
                // Reassemble by original index, not completion order.
                for (index, reason) in reasons {
                    if let Some(poi) = pois.get_mut(index) {
                        poi.recommend_reason = Some(reason);
                    }
                }
                pois
            }
            Err(_) => {
                // In-flight generations are abandoned, not awaited.
                self.metrics.inc_batch_timeout();
                warn!("enrichment deadline elapsed, returning unenriched batch");
                pois
            }
        }
    }

    /// Never fails: any generative problem collapses into the rule text.
    async fn reason_for(
        &self,
        poi: &PoiRecord,
        intent: &str,
        locale: Locale,
        use_generative: bool,
    ) -> String {
        if use_generative {
            if let Some(generator) = &self.generator {
                match generator.generate(poi, intent, locale).await {
                    Ok(reason) => return reason,
                    Err(err) => {
                        self.metrics.inc_generative_fallback();
                        debug!(poi = %poi.id, error = %err, "generative reason failed, using rule text");
                    }
                }
            }
        }

        build_reason_by_rule(poi, intent, locale)
    }
}
