//! In-process repository backed by an ordered map.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::{CatalogError, CatalogResult};
use crate::filter::{self, EntityFilter};
use crate::repository::{Page, Repository};

/// Concurrent in-memory store keyed by entity key.
///
/// Reads share the lock, mutations take it exclusively, and each operation
/// acquires it exactly once. Iteration order of the map is the listing order.
pub struct InMemoryRepository<E> {
    store: RwLock<BTreeMap<String, E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
        }
    }

    /// Pre-populate the store. Entities are kept as given, timestamps included.
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let store = entities
            .into_iter()
            .map(|e| (e.key().to_string(), e))
            .collect();
        Self {
            store: RwLock::new(store),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn get_by_id(&self, ctx: &RequestContext, key: &str) -> CatalogResult<E> {
        ctx.run(async {
            let store = self.store.read().await;
            store
                .get(key)
                .cloned()
                .ok_or_else(|| CatalogError::not_found(E::KIND, key))
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn get_all(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Vec<E>> {
        ctx.run(async {
            let store = self.store.read().await;
            Ok(filter::apply(filter, store.values()))
        })
        .await
    }

    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND, key = %entity.key()))]
    async fn create(&self, ctx: &RequestContext, mut entity: E) -> CatalogResult<E> {
        ctx.run(async move {
            let mut store = self.store.write().await;
            if store.contains_key(entity.key()) {
                return Err(CatalogError::already_exists(E::KIND, entity.key()));
            }

            let now = Utc::now();
            entity.set_timestamps(now, now);
            store.insert(entity.key().to_string(), entity.clone());

            tracing::debug!("Entity stored");
            Ok(entity)
        })
        .await
    }

    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND, key = %entity.key()))]
    async fn update(&self, ctx: &RequestContext, mut entity: E) -> CatalogResult<E> {
        ctx.run(async move {
            let mut store = self.store.write().await;
            let stored = store
                .get_mut(entity.key())
                .ok_or_else(|| CatalogError::not_found(E::KIND, entity.key()))?;

            entity.set_timestamps(stored.created_at(), Utc::now());
            *stored = entity.clone();

            tracing::debug!("Entity replaced");
            Ok(entity)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn delete(&self, ctx: &RequestContext, key: &str) -> CatalogResult<()> {
        ctx.run(async {
            let mut store = self.store.write().await;
            store
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| CatalogError::not_found(E::KIND, key))
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn count(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<u64> {
        ctx.run(async {
            let store = self.store.read().await;
            Ok(filter::count(filter, store.values()))
        })
        .await
    }

    async fn health_check(&self, ctx: &RequestContext) -> CatalogResult<()> {
        ctx.run(async { Ok(()) }).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn page(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Page<E>> {
        ctx.run(async {
            let store = self.store.read().await;
            let items = filter::apply(filter, store.values());
            let total = filter::count(&filter.without_pagination(), store.values());
            Ok(Page { items, total })
        })
        .await
    }
}
