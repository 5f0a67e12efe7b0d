use serde::{Deserialize, Serialize};

// ============ Pipeline Models ============

/// A decoded location from the timeline export.
///
/// Built only when both coordinates decode; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Link to the location on a map search page.
    pub google_maps_url: String,
    /// Reverse-geocoding request for this location.
    pub geocode_request_url: String,
}

/// Human-readable place names for a point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityData {
    pub district_name: Option<String>,
    pub country_name: Option<String>,
}

/// A point plus the outcome of its locality lookup.
///
/// `locality_data` is `None` when the lookup failed, timed out, or returned no
/// address parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPoint {
    #[serde(flatten)]
    pub point: Point,
    pub locality_data: Option<LocalityData>,
}

/// Response body for `POST /api/v1/timeline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub count: usize,
    pub points: Vec<EnrichedPoint>,
}

impl From<Vec<EnrichedPoint>> for TimelineResponse {
    fn from(points: Vec<EnrichedPoint>) -> Self {
        Self {
            count: points.len(),
            points,
        }
    }
}

// ============ Geocoder Models ============

/// Root `<reversegeocode>` element of a Nominatim XML reply.
///
/// Only `addressparts` is read; `<result>`, attributes and `<error>` are ignored.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeXml {
    pub addressparts: Option<AddressPartsXml>,
}

/// `<addressparts>` children that map onto [`LocalityData`].
#[derive(Debug, Default, Deserialize)]
pub struct AddressPartsXml {
    pub city_district: Option<String>,
    pub country: Option<String>,
}

impl From<AddressPartsXml> for LocalityData {
    fn from(parts: AddressPartsXml) -> Self {
        Self {
            district_name: parts.city_district,
            country_name: parts.country,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_point() -> Point {
        Point {
            lat: -25.5982063,
            lng: -54.5841325,
            google_maps_url: "https://www.google.com/maps/search/?api=1&query=-25.5982063,-54.5841325"
                .to_string(),
            geocode_request_url:
                "https://nominatim.openstreetmap.org/reverse?lat=-25.5982063&lon=-54.5841325"
                    .to_string(),
        }
    }

    #[test]
    fn test_enriched_point_serializes_flat_camel_case() {
        let enriched = EnrichedPoint {
            point: sample_point(),
            locality_data: Some(LocalityData {
                district_name: None,
                country_name: Some("Brasil".to_string()),
            }),
        };

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["lat"], json!(-25.5982063));
        assert!(value["googleMapsUrl"].as_str().unwrap().contains("query="));
        assert!(value["geocodeRequestUrl"].as_str().unwrap().contains("/reverse?"));
        assert_eq!(value["localityData"]["districtName"], json!(null));
        assert_eq!(value["localityData"]["countryName"], json!("Brasil"));
    }

    #[test]
    fn test_failed_lookup_serializes_as_null() {
        let enriched = EnrichedPoint {
            point: sample_point(),
            locality_data: None,
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert!(value.get("localityData").unwrap().is_null());
    }

    #[test]
    fn test_response_count_matches_points() {
        let response = TimelineResponse::from(vec![
            EnrichedPoint {
                point: sample_point(),
                locality_data: None,
            };
            3
        ]);
        assert_eq!(response.count, 3);
        assert_eq!(response.points.len(), 3);
    }
}
