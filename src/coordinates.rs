//! Fixed-point coordinate decoding.
//!
//! Timeline exports store degrees as integers with the decimal point implied
//! after the first two digits of the unsigned digit string, so `-545841325`
//! reads as `-54.5841325`. Validity is a digit-count check only; geographic
//! range is handled separately by [`is_in_range`].

use serde_json::Value;

/// Shortest accepted digit string (sign excluded).
pub const DEFAULT_MIN_DIGITS: usize = 5;

/// Digits placed before the implied decimal point.
pub const INTEGER_DIGITS: usize = 2;

/// Knobs for turning raw `latE7`/`lngE7` fields into degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSettings {
    pub min_digits: usize,
    /// Drop points outside ±90 / ±180 instead of passing them through.
    pub reject_out_of_range: bool,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            min_digits: DEFAULT_MIN_DIGITS,
            reject_out_of_range: false,
        }
    }
}

impl DecodeSettings {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            min_digits: config.min_coordinate_digits,
            reject_out_of_range: config.reject_out_of_range,
        }
    }
}

/// Renders a raw field as `(negative, digits)`.
///
/// Integers and integer-valued floats render as their base-10 text; strings
/// must already be an optional `-` followed by ASCII digits. Anything else
/// has no digit form.
pub fn digit_string(value: &Value) -> Option<(bool, String)> {
    let text = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
                    return None;
                }
                (f as i64).to_string()
            }
        }
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((negative, digits.to_string()))
}

/// Decodes one fixed-point field into decimal degrees.
///
/// Returns `None` for absent or `null` input, values with no digit form, and
/// digit strings shorter than `min_digits`.
pub fn decode_e7(value: Option<&Value>, min_digits: usize) -> Option<f64> {
    let value = value.filter(|v| !v.is_null())?;
    let (negative, digits) = digit_string(value)?;

    // The fraction must be non-empty whatever the caller asks for.
    if digits.len() < min_digits.max(INTEGER_DIGITS + 1) {
        return None;
    }

    let (integer, fraction) = digits.split_at(INTEGER_DIGITS);
    let sign = if negative { "-" } else { "" };
    format!("{}{}.{}", sign, integer, fraction).parse::<f64>().ok()
}

/// Whether a decoded pair lies on the globe.
pub fn is_in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}
