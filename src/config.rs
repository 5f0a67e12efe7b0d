use serde::Deserialize;

use crate::coordinates::DEFAULT_MIN_DIGITS;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_MAPS_BASE_URL: &str = "https://www.google.com";
pub const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the reverse-geocoding service, without trailing slash.
    pub geocoder_base_url: String,
    /// Base URL used for the map-search links, without trailing slash.
    pub maps_base_url: String,
    pub geocode_timeout_secs: u64,
    /// Sent on every outbound lookup; Nominatim rejects anonymous clients.
    pub geocoder_user_agent: String,
    pub max_body_bytes: usize,
    pub min_coordinate_digits: usize,
    pub reject_out_of_range: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            maps_base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            geocode_timeout_secs: DEFAULT_GEOCODE_TIMEOUT_SECS,
            geocoder_user_agent: default_user_agent(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            min_coordinate_digits: DEFAULT_MIN_DIGITS,
            reject_out_of_range: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            geocoder_base_url: base_url_var("GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL)?,
            maps_base_url: base_url_var("MAPS_BASE_URL", DEFAULT_MAPS_BASE_URL)?,
            geocode_timeout_secs: std::env::var("GEOCODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("GEOCODE_TIMEOUT_SECS must be a whole number"))
                .and_then(|secs| {
                    if secs == 0 {
                        anyhow::bail!("GEOCODE_TIMEOUT_SECS must be at least 1");
                    }
                    Ok(secs)
                })?,
            geocoder_user_agent: std::env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent())
                .trim()
                .to_string(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_BODY_BYTES must be a whole number"))
                .and_then(|bytes| {
                    if bytes == 0 {
                        anyhow::bail!("MAX_BODY_BYTES must be at least 1");
                    }
                    Ok(bytes)
                })?,
            min_coordinate_digits: std::env::var("MIN_COORDINATE_DIGITS")
                .unwrap_or_else(|_| DEFAULT_MIN_DIGITS.to_string())
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MIN_COORDINATE_DIGITS must be a whole number"))
                .and_then(|digits| {
                    // The integer part alone takes two digits.
                    if digits < 3 {
                        anyhow::bail!("MIN_COORDINATE_DIGITS must be at least 3");
                    }
                    Ok(digits)
                })?,
            reject_out_of_range: parse_flag(
                "REJECT_OUT_OF_RANGE",
                std::env::var("REJECT_OUT_OF_RANGE").ok(),
            )?,
        };

        if config.geocoder_user_agent.is_empty() {
            anyhow::bail!("GEOCODER_USER_AGENT cannot be empty");
        }

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Geocoder Base URL: {}", config.geocoder_base_url);
        tracing::debug!("Maps Base URL: {}", config.maps_base_url);
        tracing::debug!("Geocode timeout: {}s", config.geocode_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);
        if config.reject_out_of_range {
            tracing::info!("Out-of-range coordinates will be rejected");
        }

        Ok(config)
    }
}

fn default_user_agent() -> String {
    format!("rust-timeline-api/{}", env!("CARGO_PKG_VERSION"))
}

/// Reads a base URL from the environment, falling back to `default`.
fn base_url_var(name: &str, default: &str) -> anyhow::Result<String> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    normalize_base_url(name, &raw)
}

pub(crate) fn normalize_base_url(name: &str, raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    url::Url::parse(trimmed).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;

    Ok(trimmed.trim_end_matches('/').to_string())
}

pub(crate) fn parse_flag(name: &str, raw: Option<String>) -> anyhow::Result<bool> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => anyhow::bail!("{} must be true or false, got '{}'", name, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_strips_trailing_slash() {
        let url = normalize_base_url("X", "https://nominatim.example.org/").unwrap();
        assert_eq!(url, "https://nominatim.example.org");
    }

    #[test]
    fn test_normalize_base_url_rejects_bad_scheme() {
        assert!(normalize_base_url("X", "ftp://example.org").is_err());
        assert!(normalize_base_url("X", "   ").is_err());
        assert!(normalize_base_url("X", "http://").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag("F", None).unwrap());
        assert!(parse_flag("F", Some("TRUE".to_string())).unwrap());
        assert!(parse_flag("F", Some("1".to_string())).unwrap());
        assert!(!parse_flag("F", Some("false".to_string())).unwrap());
        assert!(parse_flag("F", Some("yes".to_string())).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.geocode_timeout_secs, 5);
        assert_eq!(config.min_coordinate_digits, 5);
        assert!(!config.reject_out_of_range);
        assert!(config.geocoder_user_agent.starts_with("rust-timeline-api/"));
    }
}
