//! Conversions between Kubernetes `Time` and `chrono`
//!
//! k8s-openapi has switched datetime crates across releases, so conversion
//! goes through the RFC 3339 wire form.

use chrono::{DateTime, SecondsFormat, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

/// Converts a Kubernetes timestamp into a UTC `DateTime`
#[must_use]
pub fn to_utc(time: &Time) -> Option<DateTime<Utc>> {
    let value = serde_json::to_value(time).ok()?;
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Converts a UTC `DateTime` into a Kubernetes timestamp (second precision)
pub fn from_utc(dt: DateTime<Utc>) -> Result<Time, serde_json::Error> {
    serde_json::from_value(serde_json::Value::String(
        dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}
