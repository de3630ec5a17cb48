use crate::utils::error::{MapError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> MapError {
    MapError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The data source must be reachable over plain HTTP(S).
pub fn require_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("not a URL ({})", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, value, format!("scheme '{}' is not http or https", other))),
    }
}

pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "must not be blank"));
    }
    Ok(())
}

pub fn require_path(field: &str, value: &str) -> Result<()> {
    require_text(field, value)?;
    if value.contains('\0') {
        return Err(invalid(field, value.escape_default(), "contains a NUL byte"));
    }
    Ok(())
}

pub fn require_at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

/// Inclusive bounds check. NaN never passes.
pub fn require_within(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(invalid(field, value, format!("must lie in [{}, {}]", min, max)));
    }
    Ok(())
}
