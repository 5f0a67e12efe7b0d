use crate::config::Config;
use crate::enrichment::TimelineService;
use crate::errors::{AppError, ResultExt};
use crate::extractor::PointExtractor;
use crate::models::TimelineResponse;
use crate::services::GeocodingService;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Extraction and enrichment pipeline.
    pub timeline: TimelineService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let geocoder =
            GeocodingService::new(&config).context("Failed to build geocoding client")?;
        let timeline = TimelineService::new(PointExtractor::from_config(&config), geocoder);

        Ok(Self { config, timeline })
    }
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-timeline-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/timeline
///
/// Extracts every point from a timeline export and attaches its locality.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Raw JSON body of the export.
///
/// # Returns
///
/// * `Result<Json<TimelineResponse>, AppError>` - `{count, points}`, or 400 for an
///   empty or unreadable body.
pub async fn process_timeline(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TimelineResponse>, AppError> {
    let document = parse_document(&body)?;
    tracing::info!("POST /timeline - body: {} bytes", body.len());

    let task_state = Arc::clone(&state);
    let response = tokio::spawn(async move { task_state.timeline.process(&document).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Timeline processing aborted: {}", e)))?;

    tracing::info!("Timeline processed: {} point(s)", response.count);
    Ok(Json(response))
}

/// Reads the request body as a timeline document.
///
/// Whitespace-only bodies, `null` and `{}` count as missing.
pub fn parse_document(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }

    let document: Value = serde_json::from_slice(body)?;

    let is_empty = match &document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_rejects_empty_bodies() {
        for body in ["", "   \n", "null", "{}", " { } "] {
            let err = parse_document(body.as_bytes()).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "body: {:?}", body);
        }
    }

    #[test]
    fn test_parse_document_rejects_invalid_json() {
        let err = parse_document(b"{\"timelineEdits\": [").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_parse_document_accepts_unrecognized_fields() {
        let doc = parse_document(b"{\"somethingElse\": 1}").unwrap();
        assert_eq!(doc["somethingElse"], json!(1));

        let doc = parse_document(b"[1, 2]").unwrap();
        assert!(doc.is_array());
    }
}
