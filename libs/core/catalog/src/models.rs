//! Response payloads produced by the service layer.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::entity::Entity;
use crate::filter::Pagination;

/// Identity reported in health and metrics payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub environment: String,
}

impl ServiceInfo {
    pub fn new(
        service: impl Into<String>,
        version: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            environment: environment.into(),
        }
    }
}

/// A page of summaries.
///
/// Serialized with the summaries under the entity's plural name, e.g.
/// `{"customers": [...], "total": 2, "active_count": 1, "inactive_count": 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<E: Entity> {
    pub items: Vec<E::Summary>,
    /// All matches, ignoring pagination
    pub total: u64,
    pub active_count: Option<u64>,
    pub inactive_count: Option<u64>,
    /// Echoed only when the caller asked for a page
    pub pagination: Option<Pagination>,
}

impl<E: Entity> Serialize for Listing<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(E::PLURAL, &self.items)?;
        map.serialize_entry("total", &self.total)?;
        if let Some(active) = self.active_count {
            map.serialize_entry("active_count", &active)?;
        }
        if let Some(inactive) = self.inactive_count {
            map.serialize_entry("inactive_count", &inactive)?;
        }
        if let Some(pagination) = self.pagination {
            map.serialize_entry("page", &pagination.page)?;
            map.serialize_entry("pageSize", &pagination.page_size)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: String,
    pub environment: String,
    pub metrics: BTreeMap<String, u64>,
    pub dependencies: BTreeMap<String, String>,
    /// Per-vertical totals such as `total_customers`, flattened into the payload
    #[serde(flatten)]
    pub inventory: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

/// Compact uptime rendering: `3s`, `2m5s`, `1h0m12s`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
