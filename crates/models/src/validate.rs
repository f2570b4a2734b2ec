//! Field-level checks shared by every entity.
//!
//! All helpers return `ModelError::Validation` naming the offending field so the
//! HTTP layer can hand the message straight back to the client.

use crate::errors::ModelError;

/// Trimmed, non-empty text no longer than `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::invalid(field, "is required"));
    }
    if v.chars().count() > max {
        return Err(ModelError::invalid(field, &format!("must be at most {max} characters")));
    }
    Ok(v.to_string())
}

/// Like `required_text`, but blank input collapses to `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

/// Quantities are stored with gram precision.
pub fn round_quantity(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

pub fn positive(field: &str, v: f64) -> Result<f64, ModelError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ModelError::invalid(field, "must be a positive number"));
    }
    Ok(v)
}

pub fn non_negative(field: &str, v: f64) -> Result<f64, ModelError> {
    if !v.is_finite() || v < 0.0 {
        return Err(ModelError::invalid(field, "must be zero or greater"));
    }
    Ok(v)
}

pub fn non_negative_count(field: &str, v: i32) -> Result<i32, ModelError> {
    if v < 0 {
        return Err(ModelError::invalid(field, "must be zero or greater"));
    }
    Ok(v)
}

pub fn in_range(field: &str, v: f64, min: f64, max: f64) -> Result<f64, ModelError> {
    if !v.is_finite() || v < min || v > max {
        return Err(ModelError::invalid(field, &format!("must be between {min} and {max}")));
    }
    Ok(v)
}

/// Case-insensitive membership check; returns the canonical lowercase value.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<String, ModelError> {
    let v = value.trim().to_ascii_lowercase();
    if !allowed.contains(&v.as_str()) {
        return Err(ModelError::invalid(field, &format!("must be one of: {}", allowed.join(", "))));
    }
    Ok(v)
}
