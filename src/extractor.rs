//! Point extraction from timeline exports.
//!
//! Every `timelineEdits` element may or may not carry the chain
//! `rawSignal.signal.position.point`. Elements with any missing link, or
//! whose coordinates fail to decode, are skipped without error.

use crate::config::{Config, DEFAULT_GEOCODER_BASE_URL, DEFAULT_MAPS_BASE_URL};
use crate::coordinates::{decode_e7, is_in_range, DecodeSettings};
use crate::models::Point;
use serde_json::Value;

/// Path from a timeline edit to its terminal point object.
pub const POINT_PATH: [&str; 4] = ["rawSignal", "signal", "position", "point"];

/// Walks `path` through nested JSON objects.
///
/// Each step only descends into an object, so a `null`, number, or array in
/// the middle of the chain ends the walk with `None`. Falsy leaf values such
/// as `0` are returned as found.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Base URLs for the two links generated per point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointUrls {
    pub maps_base_url: String,
    pub geocoder_base_url: String,
}

impl Default for PointUrls {
    fn default() -> Self {
        Self {
            maps_base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
        }
    }
}

impl PointUrls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            maps_base_url: config.maps_base_url.clone(),
            geocoder_base_url: config.geocoder_base_url.clone(),
        }
    }

    pub fn maps_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/maps/search/?api=1&query={},{}",
            self.maps_base_url, lat, lng
        )
    }

    pub fn geocode_url(&self, lat: f64, lng: f64) -> String {
        format!("{}/reverse?lat={}&lon={}", self.geocoder_base_url, lat, lng)
    }

    pub fn build_point(&self, lat: f64, lng: f64) -> Point {
        Point {
            lat,
            lng,
            google_maps_url: self.maps_url(lat, lng),
            geocode_request_url: self.geocode_url(lat, lng),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointExtractor {
    settings: DecodeSettings,
    urls: PointUrls,
}

impl PointExtractor {
    pub fn new(settings: DecodeSettings, urls: PointUrls) -> Self {
        Self { settings, urls }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DecodeSettings::from_config(config),
            PointUrls::from_config(config),
        )
    }

    /// Collects every decodable point, in document order.
    pub fn extract(&self, document: &Value) -> Vec<Point> {
        let Some(edits) = document.get("timelineEdits").and_then(Value::as_array) else {
            tracing::debug!("Document has no timelineEdits array");
            return Vec::new();
        };

        let points: Vec<Point> = edits
            .iter()
            .enumerate()
            .filter_map(|(index, edit)| self.extract_one(index, edit))
            .collect();

        tracing::info!(
            "Extracted {} point(s) from {} timeline edit(s)",
            points.len(),
            edits.len()
        );

        points
    }

    fn extract_one(&self, index: usize, edit: &Value) -> Option<Point> {
        let raw = lookup(edit, &POINT_PATH)?.as_object()?;

        // Both keys must exist; their values are judged by the decoder.
        let (Some(lat_e7), Some(lng_e7)) = (raw.get("latE7"), raw.get("lngE7")) else {
            return None;
        };

        let min_digits = self.settings.min_digits;
        let (Some(lat), Some(lng)) = (
            decode_e7(Some(lat_e7), min_digits),
            decode_e7(Some(lng_e7), min_digits),
        ) else {
            tracing::debug!(
                "Dropping edit {}: undecodable coordinates latE7={} lngE7={}",
                index,
                lat_e7,
                lng_e7
            );
            return None;
        };

        if !is_in_range(lat, lng) {
            tracing::warn!(
                "Edit {} decodes outside the globe: lat={}, lng={}",
                index,
                lat,
                lng
            );
            if self.settings.reject_out_of_range {
                return None;
            }
        }

        Some(self.urls.build_point(lat, lng))
    }
}

/// Extracts points with default settings and public service URLs.
pub fn extract_points(document: &Value) -> Vec<Point> {
    PointExtractor::default().extract(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edit(lat: Value, lng: Value) -> Value {
        json!({
            "rawSignal": {"signal": {"position": {"point": {"latE7": lat, "lngE7": lng}}}}
        })
    }

    #[test]
    fn test_lookup_walks_objects_only() {
        let doc = json!({"a": {"b": {"c": 0}}, "n": null, "arr": [1]});
        assert_eq!(lookup(&doc, &["a", "b", "c"]), Some(&json!(0)));
        assert_eq!(lookup(&doc, &["a", "x"]), None);
        assert_eq!(lookup(&doc, &["n", "b"]), None);
        assert_eq!(lookup(&doc, &["arr", "0"]), None);
        assert_eq!(lookup(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_extracts_single_point_with_urls() {
        let doc = json!({"timelineEdits": [edit(json!(-255982063), json!(-545841325))]});
        let points = extract_points(&doc);

        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.lat, -25.5982063);
        assert_eq!(point.lng, -54.5841325);
        assert_eq!(
            point.google_maps_url,
            "https://www.google.com/maps/search/?api=1&query=-25.5982063,-54.5841325"
        );
        assert_eq!(
            point.geocode_request_url,
            "https://nominatim.openstreetmap.org/reverse?lat=-25.5982063&lon=-54.5841325"
        );
    }

    #[test]
    fn test_missing_or_wrong_timeline_edits() {
        assert!(extract_points(&json!({})).is_empty());
        assert!(extract_points(&json!({"timelineEdits": null})).is_empty());
        assert!(extract_points(&json!({"timelineEdits": {"0": 1}})).is_empty());
        assert!(extract_points(&json!({"timelineEdits": []})).is_empty());
        assert!(extract_points(&json!([1, 2, 3])).is_empty());
        assert!(extract_points(&Value::Null).is_empty());
    }

    #[test]
    fn test_missing_links_skip_element() {
        let doc = json!({"timelineEdits": [
            {"rawSignal": {"signal": {}}},
            edit(json!(515074000), json!(-1278000)),
            {"rawSignal": {"signal": {"position": null}}},
            {"rawSignal": null},
            "not an object",
            {"rawSignal": {"signal": {"position": {"point": 42}}}}
        ]});

        let points = extract_points(&doc);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].lat, 51.5074);
        assert_eq!(points[0].lng, -12.78);
    }

    #[test]
    fn test_requires_both_keys() {
        let doc = json!({"timelineEdits": [
            {"rawSignal": {"signal": {"position": {"point": {"latE7": 515074000}}}}},
            {"rawSignal": {"signal": {"position": {"point": {"lngE7": 515074000}}}}}
        ]});
        assert!(extract_points(&doc).is_empty());
    }

    #[test]
    fn test_one_bad_coordinate_drops_whole_point() {
        let doc = json!({"timelineEdits": [
            edit(json!(1234), json!(-545841325)),
            edit(json!(-255982063), json!(null)),
            edit(json!(-255982063), json!(-545841325))
        ]});
        let points = extract_points(&doc);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].lat, -25.5982063);
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let doc = json!({"timelineEdits": [
            edit(json!(111111111), json!(222222222)),
            edit(json!(333333333), json!(444444444)),
            edit(json!(111111111), json!(222222222))
        ]});
        let points = extract_points(&doc);
        let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![11.1111111, 33.3333333, 11.1111111]);
        assert_eq!(points[0], points[2]);
    }

    #[test]
    fn test_out_of_range_kept_by_default_and_rejectable() {
        let doc = json!({"timelineEdits": [edit(json!(955000000), json!(100000000))]});
        assert_eq!(extract_points(&doc).len(), 1);

        let strict = PointExtractor::new(
            DecodeSettings {
                reject_out_of_range: true,
                ..DecodeSettings::default()
            },
            PointUrls::default(),
        );
        assert!(strict.extract(&doc).is_empty());
    }

    #[test]
    fn test_custom_base_urls() {
        let extractor = PointExtractor::new(
            DecodeSettings::default(),
            PointUrls {
                maps_base_url: "http://maps.local".to_string(),
                geocoder_base_url: "http://127.0.0.1:9999".to_string(),
            },
        );
        let doc = json!({"timelineEdits": [edit(json!(12345), json!(-12345))]});
        let points = extractor.extract(&doc);
        assert_eq!(
            points[0].geocode_request_url,
            "http://127.0.0.1:9999/reverse?lat=12.345&lon=-12.345"
        );
        assert_eq!(
            points[0].google_maps_url,
            "http://maps.local/maps/search/?api=1&query=12.345,-12.345"
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = json!({"timelineEdits": [
            edit(json!(-255982063), json!(-545841325)),
            {"rawSignal": {}},
            edit(json!("515074000"), json!("-1278000"))
        ]});
        assert_eq!(extract_points(&doc), extract_points(&doc));
    }
}
