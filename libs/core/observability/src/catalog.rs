//! Catalog operation metrics, labelled by entity kind and operation.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Result label attached to every recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Failed in a way the caller caused (missing, duplicate, inactive)
    Rejected,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Rejected => "rejected",
            Outcome::Failure => "failure",
        }
    }
}

/// Catalog metrics recorder
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record one service operation and how long it took.
    pub fn record_operation(entity: &'static str, operation: &'static str, outcome: Outcome, elapsed: Duration) {
        counter!(
            "catalog_operations_total",
            "entity" => entity,
            "operation" => operation,
            "outcome" => outcome.as_str()
        )
        .increment(1);

        histogram!(
            "catalog_operation_duration_seconds",
            "entity" => entity,
            "operation" => operation
        )
        .record(elapsed.as_secs_f64());
    }

    /// Record an injected fault (latency or simulated failure).
    pub fn record_injected_fault(entity: &'static str, fault: &'static str) {
        counter!("catalog_injected_faults_total", "entity" => entity, "fault" => fault).increment(1);
    }

    /// Publish the number of stored entities observed by the last health check.
    pub fn set_entity_count(entity: &'static str, count: u64) {
        gauge!("catalog_entities", "entity" => entity).set(count as f64);
    }
}
