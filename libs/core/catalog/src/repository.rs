use async_trait::async_trait;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::{CatalogError, CatalogResult};

/// One page of matches plus the size of the whole match set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub total: u64,
}

/// Storage for one entity vertical.
///
/// Implementations return owned copies and honour the context's cancellation
/// and deadline on every call. Listings are ordered ascending by key.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Fetch one entity, `NotFound` if absent.
    async fn get_by_id(&self, ctx: &RequestContext, key: &str) -> CatalogResult<E>;

    /// Matches for `filter`, sliced to its page.
    async fn get_all(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Vec<E>>;

    /// Store a new entity with both timestamps set to now, `AlreadyExists` on a taken key.
    async fn create(&self, ctx: &RequestContext, entity: E) -> CatalogResult<E>;

    /// Replace a stored entity, keeping its `createdAt`; `NotFound` if absent.
    async fn update(&self, ctx: &RequestContext, entity: E) -> CatalogResult<E>;

    async fn delete(&self, ctx: &RequestContext, key: &str) -> CatalogResult<()>;

    /// Matches for `filter`, ignoring pagination.
    async fn count(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<u64>;

    async fn health_check(&self, ctx: &RequestContext) -> CatalogResult<()>;

    /// Page and total in one call.
    ///
    /// A failed count degrades to the size of the returned page; only
    /// cancellation is propagated.
    async fn page(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Page<E>> {
        let items = self.get_all(ctx, filter).await?;
        let total = match self.count(ctx, filter).await {
            Ok(total) => total,
            Err(CatalogError::Cancelled) => return Err(CatalogError::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count matches, using page size");
                items.len() as u64
            }
        };
        Ok(Page { items, total })
    }
}

#[async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    async fn get_by_id(&self, ctx: &RequestContext, key: &str) -> CatalogResult<E> {
        (**self).get_by_id(ctx, key).await
    }

    async fn get_all(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Vec<E>> {
        (**self).get_all(ctx, filter).await
    }

    async fn create(&self, ctx: &RequestContext, entity: E) -> CatalogResult<E> {
        (**self).create(ctx, entity).await
    }

    async fn update(&self, ctx: &RequestContext, entity: E) -> CatalogResult<E> {
        (**self).update(ctx, entity).await
    }

    async fn delete(&self, ctx: &RequestContext, key: &str) -> CatalogResult<()> {
        (**self).delete(ctx, key).await
    }

    async fn count(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<u64> {
        (**self).count(ctx, filter).await
    }

    async fn health_check(&self, ctx: &RequestContext) -> CatalogResult<()> {
        (**self).health_check(ctx).await
    }

    async fn page(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Page<E>> {
        (**self).page(ctx, filter).await
    }
}
