use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{LocalityData, ReverseGeocodeXml};
use reqwest::Client;
use std::time::Duration;

/// Client for the Nominatim reverse-geocoding endpoint.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct GeocodingService {
    client: Client,
    timeout: Duration,
}

impl GeocodingService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_timeout(
            &config.geocoder_user_agent,
            Duration::from_secs(config.geocode_timeout_secs),
        )
    }

    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().user_agent(user_agent).build().map_err(|e| {
            AppError::InternalError(format!("Failed to create geocoding client: {}", e))
        })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Looks up the district and country for one reverse-geocode URL.
    ///
    /// The whole exchange, body included, is bounded by the configured
    /// timeout. Expiry cancels only this lookup.
    pub async fn reverse_geocode(&self, url: &str) -> Result<LocalityData, AppError> {
        match tokio::time::timeout(self.timeout, self.fetch_locality(url)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "reverse geocode did not settle within {:?}",
                self.timeout
            ))),
        }
    }

    async fn fetch_locality(&self, url: &str) -> Result<LocalityData, AppError> {
        tracing::debug!("Reverse geocoding: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AppError::from)
            .context("Geocoder request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Geocoder returned status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(AppError::from)
            .context("Failed to read geocoder response")?;

        parse_reverse_geocode(&body)
    }
}

/// Decodes a `<reversegeocode>` XML reply into [`LocalityData`].
///
/// Fails when the body is not XML or carries no `<addressparts>` element,
/// which is how Nominatim answers coordinates it cannot place.
pub fn parse_reverse_geocode(xml: &str) -> Result<LocalityData, AppError> {
    let parsed: ReverseGeocodeXml = quick_xml::de::from_str(xml)?;

    let parts = parsed
        .addressparts
        .ok_or_else(|| AppError::XmlError("Response has no addressparts".to_string()))?;

    Ok(parts.into())
}
