/// Locality enrichment for extracted points
///
/// This module provides the concurrent half of the pipeline:
/// 1. Fire one reverse-geocode lookup per point, all at once
/// 2. Bound each lookup by its own timeout
/// 3. Wait for every lookup to settle
/// 4. Attach the locality (or `None`) to each point by position
use crate::extractor::PointExtractor;
use crate::models::{EnrichedPoint, Point, TimelineResponse};
use crate::services::GeocodingService;
use futures::future::join_all;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

/// Enriches every point with its locality data.
///
/// Output has the same length and order as `points`. A failed, rejected or
/// timed-out lookup leaves `locality_data` as `None` for that point only;
/// siblings keep running and are never cancelled.
pub async fn enrich_points(geocoder: &GeocodingService, points: Vec<Point>) -> Vec<EnrichedPoint> {
    let total = points.len();

    let lookups = points.into_iter().enumerate().map(|(index, point)| async move {
        let locality_data = match geocoder.reverse_geocode(&point.geocode_request_url).await {
            Ok(locality) => {
                tracing::debug!(
                    index,
                    district = ?locality.district_name,
                    country = ?locality.country_name,
                    "Reverse geocode succeeded"
                );
                Some(locality)
            }
            Err(e) => {
                tracing::warn!(
                    index,
                    url = %point.geocode_request_url,
                    timed_out = e.is_timeout(),
                    error = %e,
                    "Reverse geocode failed (per-point error isolation)"
                );
                None
            }
        };

        EnrichedPoint {
            point,
            locality_data,
        }
    });

    let enriched = join_all(lookups).await;

    let resolved = enriched
        .iter()
        .filter(|p| p.locality_data.is_some())
        .count();
    tracing::info!("Enriched {}/{} point(s) with locality data", resolved, total);

    enriched
}

/// Runs extraction and enrichment over one timeline document.
pub struct TimelineService {
    extractor: PointExtractor,
    geocoder: GeocodingService,
}

impl TimelineService {
    pub fn new(extractor: PointExtractor, geocoder: GeocodingService) -> Self {
        Self {
            extractor,
            geocoder,
        }
    }

    /// Extracts, decodes and enriches every point in `document`.
    ///
    /// Never fails: structural gaps drop elements, lookup failures become
    /// `None` slots.
    pub async fn process(&self, document: &Value) -> TimelineResponse {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("timeline", run_id = %run_id);

        async {
            let points = self.extractor.extract(document);
            if points.is_empty() {
                tracing::info!("No decodable points, skipping enrichment");
                return TimelineResponse::from(Vec::new());
            }

            tracing::info!(
                "Dispatching {} reverse geocode lookup(s), timeout {:?} each",
                points.len(),
                self.geocoder.timeout()
            );
            TimelineResponse::from(enrich_points(&self.geocoder, points).await)
        }
        .instrument(span)
        .await
    }
}
