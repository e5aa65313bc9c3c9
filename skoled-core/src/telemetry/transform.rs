//! Value normalisation
//!
//! Turns a raw Signal K value into the short string shown after a slot's
//! label. Numbers get the slot's offset and multiplier and are printed with
//! three decimals; positions are printed as longitude/latitude; everything
//! else is shown as-is. Nothing here fails: unexpected shapes fall back to
//! the value's raw text.

use alloc::format;
use alloc::string::{String, ToString};

use serde_json::Value;

/// Paths containing this fragment carry `{longitude, latitude}` objects
pub const POSITION_PATH: &str = "navigation.position";

/// Normalise `raw` for display
///
/// The offset is added first, then the multiplier applied, and only when
/// they differ from their neutral values.
pub fn normalize(raw: &Value, offset: f64, multiplier: f64, path_hint: &str) -> String {
    if let Some(number) = raw.as_f64() {
        return format_number(apply_transform(number, offset, multiplier));
    }

    if is_position_path(path_hint) {
        if let Some(text) = format_position(raw) {
            return text;
        }
    }

    raw_string(raw)
}

/// Whether `path` names a position value
pub fn is_position_path(path: &str) -> bool {
    path.contains(POSITION_PATH)
}

/// `(value + offset) * multiplier`, skipping neutral steps
pub fn apply_transform(value: f64, offset: f64, multiplier: f64) -> f64 {
    let mut result = value;
    if offset != 0.0 {
        result += offset;
    }
    if multiplier != 1.0 {
        result *= multiplier;
    }
    result
}

/// Fixed-point, three decimals
fn format_number(value: f64) -> String {
    // -0.0 prints as "-0.000"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.3}", value)
}

/// `LON: x LAT: y` with five decimals, if both coordinates are present
///
/// Accepts the object itself or its JSON text.
fn format_position(raw: &Value) -> Option<String> {
    let parsed;
    let object = match raw {
        Value::Object(_) => raw,
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).ok()?;
            &parsed
        }
        _ => return None,
    };

    let longitude = object.get("longitude")?.as_f64()?;
    let latitude = object.get("latitude")?.as_f64()?;
    Some(format!("LON: {:.5} LAT: {:.5}", longitude, latitude))
}

/// Natural string form: strings unquoted, everything else as compact JSON
fn raw_string(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
