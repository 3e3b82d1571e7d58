//! Catalog service - business rules, counters and health on top of a repository.

use chrono::Utc;
use core_config::features::FeatureFlags;
use observability::{CatalogMetrics, Outcome};
use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;
use validator::Validate;

use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::{CatalogError, CatalogResult};
use crate::filter::EntityFilter;
use crate::models::{format_uptime, HealthSnapshot, HealthStatus, Listing, MetricsSnapshot, ServiceInfo};
use crate::repository::Repository;

/// Base delay added to every injected latency.
const BASE_INJECTED_LATENCY_MS: u64 = 50;
/// Error ratio, in whole percent, above which a reachable service is degraded.
const DEGRADED_ERROR_PERCENT: u64 = 10;

/// Strictly more than [`DEGRADED_ERROR_PERCENT`] of requests failed.
fn exceeds_error_budget(requests: u64, errors: u64) -> bool {
    requests > 0 && errors.saturating_mul(100) > requests.saturating_mul(DEGRADED_ERROR_PERCENT)
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
}

/// Service for one entity vertical.
///
/// Every business operation (`get_one`, `get_many`, `get_active`, `create`,
/// `update`, `delete`) counts one request, and one error when it fails for a
/// reason other than a missing, duplicate or inactive entity. Health and
/// metrics reads are not counted.
pub struct CatalogService<E: Entity, R: Repository<E> + ?Sized = dyn Repository<E>> {
    repository: Arc<R>,
    info: ServiceInfo,
    features: FeatureFlags,
    counters: Arc<Counters>,
    started_at: Instant,
    request_timeout: Option<Duration>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: Repository<E>> CatalogService<E, R> {
    pub fn new(repository: R, info: ServiceInfo, features: FeatureFlags) -> Self {
        Self::from_arc(Arc::new(repository), info, features)
    }
}

impl<E: Entity, R: Repository<E> + ?Sized> CatalogService<E, R> {
    /// Build a service over a shared (possibly type-erased) repository.
    pub fn from_arc(repository: Arc<R>, info: ServiceInfo, features: FeatureFlags) -> Self {
        Self {
            repository,
            info,
            features,
            counters: Arc::new(Counters::default()),
            started_at: Instant::now(),
            request_timeout: None,
            _entity: PhantomData,
        }
    }

    /// Deadline applied to contexts built by [`request_context`](Self::request_context).
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Context for one incoming request, bounded by the configured timeout.
    pub fn request_context(&self, request_id: &str) -> RequestContext {
        let ctx = RequestContext::new(request_id);
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    pub fn total_requests(&self) -> u64 {
        self.counters.requests.load(Ordering::Relaxed)
    }

    pub fn total_errors(&self) -> u64 {
        self.counters.errors.load(Ordering::Relaxed)
    }

    /// Fetch one active entity.
    ///
    /// Subject to injected latency and failures when enabled. Inactive
    /// entities are reported as `Unavailable`.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn get_one(&self, ctx: &RequestContext, key: &str) -> CatalogResult<E> {
        self.track("get_one", async {
            self.inject_faults(ctx).await?;

            let entity = self
                .repository
                .get_by_id(ctx, key)
                .await
                .map_err(|e| e.or_internal(format!("failed to retrieve {}", E::KIND)))?;

            if !entity.is_active() {
                return Err(CatalogError::unavailable(E::KIND, key));
            }

            tracing::info!("Entity retrieved successfully");
            Ok(entity)
        })
        .await
    }

    /// List summaries matching `filter`.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn get_many(&self, ctx: &RequestContext, filter: E::Filter) -> CatalogResult<Listing<E>> {
        self.track("get_many", self.list(ctx, filter)).await
    }

    /// List summaries matching `filter`, restricted to active entities.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn get_active(&self, ctx: &RequestContext, filter: E::Filter) -> CatalogResult<Listing<E>> {
        self.track("get_active", self.list(ctx, filter.only_active()))
            .await
    }

    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND, key = %entity.key()))]
    pub async fn create(&self, ctx: &RequestContext, entity: E) -> CatalogResult<E> {
        self.track("create", async {
            entity.validate()?;

            let created = self
                .repository
                .create(ctx, entity)
                .await
                .map_err(|e| e.or_internal(format!("failed to create {}", E::KIND)))?;

            tracing::info!("Entity created successfully");
            Ok(created)
        })
        .await
    }

    /// Replace the entity stored under `key`; the path key wins over the body's.
    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn update(&self, ctx: &RequestContext, key: &str, mut entity: E) -> CatalogResult<E> {
        self.track("update", async {
            entity.set_key(key.to_string());
            entity.validate()?;

            let updated = self
                .repository
                .update(ctx, entity)
                .await
                .map_err(|e| e.or_internal(format!("failed to update {}", E::KIND)))?;

            tracing::info!("Entity updated successfully");
            Ok(updated)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn delete(&self, ctx: &RequestContext, key: &str) -> CatalogResult<()> {
        self.track("delete", async {
            self.repository
                .delete(ctx, key)
                .await
                .map_err(|e| e.or_internal(format!("failed to delete {}", E::KIND)))?;

            tracing::info!("Entity deleted successfully");
            Ok(())
        })
        .await
    }

    /// Snapshot of service health. Never fails: an unreachable repository
    /// yields an `unhealthy` snapshot.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    pub async fn health_status(&self, ctx: &RequestContext) -> HealthSnapshot {
        let mut dependencies = BTreeMap::new();
        let reachable = match self.repository.health_check(ctx).await {
            Ok(()) => {
                dependencies.insert("repository".to_string(), "healthy".to_string());
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Repository health check failed");
                dependencies.insert("repository".to_string(), format!("unhealthy: {e}"));
                false
            }
        };

        let requests = self.total_requests();
        let errors = self.total_errors();
        let total = self.count_or_zero(ctx, E::Filter::default()).await;
        CatalogMetrics::set_entity_count(E::KIND, total);

        let mut metrics = BTreeMap::from([
            ("total_requests".to_string(), requests),
            ("total_errors".to_string(), errors),
            (format!("{}_count", E::PLURAL), total),
        ]);
        if requests > 0 {
            metrics.insert("error_rate_percent".to_string(), errors * 100 / requests);
        }

        let status = if !reachable {
            HealthStatus::Unhealthy
        } else if exceeds_error_budget(requests, errors) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let mut inventory = BTreeMap::new();
        if E::REPORTS_ACTIVITY {
            let active = self
                .count_or_zero(ctx, E::Filter::default().only_active())
                .await;
            inventory.insert(format!("total_{}", E::PLURAL), total);
            inventory.insert(format!("active_{}", E::PLURAL), active);
        }

        tracing::info!(status = status.as_str(), requests, errors, "Health check completed");

        HealthSnapshot {
            status,
            service: self.info.service.clone(),
            version: self.info.version.clone(),
            timestamp: Utc::now(),
            uptime: format_uptime(self.started_at.elapsed()),
            environment: self.info.environment.clone(),
            metrics,
            dependencies,
            inventory,
        }
    }

    /// Pure read of the counters; rates appear once a request was recorded.
    pub fn metrics(&self) -> MetricsSnapshot {
        let requests = self.total_requests();
        let errors = self.total_errors();
        let error_rate = (requests > 0).then(|| errors as f64 / requests as f64);

        MetricsSnapshot {
            service: self.info.service.clone(),
            version: self.info.version.clone(),
            environment: self.info.environment.clone(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            total_requests: requests,
            total_errors: errors,
            timestamp: Utc::now(),
            error_rate,
            success_rate: error_rate.map(|rate| 1.0 - rate),
        }
    }

    async fn list(&self, ctx: &RequestContext, filter: E::Filter) -> CatalogResult<Listing<E>> {
        let pagination = filter.pagination();
        let page = self
            .repository
            .page(ctx, &filter)
            .await
            .map_err(|e| e.or_internal(format!("failed to retrieve {}", E::PLURAL)))?;

        let (active_count, inactive_count) = if E::REPORTS_ACTIVITY {
            let active = page.items.iter().filter(|e| e.is_active()).count() as u64;
            (Some(active), Some(page.items.len() as u64 - active))
        } else {
            (None, None)
        };

        tracing::info!(count = page.items.len(), total = page.total, "Listing retrieved successfully");

        Ok(Listing {
            items: page.items.iter().map(Entity::summary).collect(),
            total: page.total,
            active_count,
            inactive_count,
            pagination: pagination.is_requested().then_some(pagination),
        })
    }

    async fn inject_faults(&self, ctx: &RequestContext) -> CatalogResult<()> {
        if self.features.simulate_latency {
            let jitter = if self.features.max_latency_ms > 0 {
                rand::random_range(0..self.features.max_latency_ms)
            } else {
                0
            };
            let delay = Duration::from_millis(BASE_INJECTED_LATENCY_MS + jitter);
            CatalogMetrics::record_injected_fault(E::KIND, "latency");
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Injecting latency");
            ctx.sleep(delay).await?;
        }

        if self.features.simulate_errors && rand::random::<f64>() < self.features.error_rate {
            CatalogMetrics::record_injected_fault(E::KIND, "error");
            return Err(CatalogError::internal(format!("simulated {} failure", E::KIND)));
        }

        Ok(())
    }

    async fn count_or_zero(&self, ctx: &RequestContext, filter: E::Filter) -> u64 {
        match self.repository.count(ctx, &filter).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count entities for health report");
                0
            }
        }
    }

    /// Count the call, time it and classify the outcome.
    async fn track<T, F>(&self, operation: &'static str, fut: F) -> CatalogResult<T>
    where
        F: Future<Output = CatalogResult<T>>,
    {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();

        let result = fut.await;

        let outcome = match &result {
            Ok(_) => Outcome::Success,
            Err(e) if e.counts_as_failure() => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::error!(operation, error = %e, "Operation failed");
                Outcome::Failure
            }
            Err(e) => {
                tracing::warn!(operation, reason = e.kind().as_str(), "Operation rejected");
                Outcome::Rejected
            }
        };
        CatalogMetrics::record_operation(E::KIND, operation, outcome, started.elapsed());

        result
    }
}

impl<E: Entity, R: Repository<E> + ?Sized> Clone for CatalogService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            info: self.info.clone(),
            features: self.features.clone(),
            counters: Arc::clone(&self.counters),
            started_at: self.started_at,
            request_timeout: self.request_timeout,
            _entity: PhantomData,
        }
    }
}
