//! MongoDB implementation of [`Repository`].
//!
//! Entities cross the driver as [`Document`]s. Fields listed in
//! [`MongoEntity::DATE_FIELDS`] are stored as native BSON dates and read back
//! from either BSON dates or RFC 3339 strings.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, from_document, to_document, Bson, Document},
    error::{Error as MongoError, ErrorKind as MongoErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::context::RequestContext;
use crate::entity::Entity;
use crate::error::{CatalogError, CatalogResult};
use crate::filter::EntityFilter;
use crate::repository::Repository;

const DUPLICATE_KEY: i32 = 11000;
const CREATED_AT: &str = "createdAt";

/// Storage layout of an entity in MongoDB.
pub trait MongoEntity: Entity {
    /// Top-level fields holding timestamps, stored as BSON dates.
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];

    /// Non-unique indexes beyond the key index, as `(name, keys)`.
    fn secondary_indexes() -> Vec<(&'static str, Document)> {
        Vec::new()
    }
}

/// Translation of a filter into a MongoDB query document.
///
/// Must select the same entities as [`EntityFilter::matches`]; pagination is
/// applied separately.
pub trait DocumentFilter {
    fn to_document(&self) -> Document;
}

fn to_bson_datetime(dt: DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis()))
}

fn read_datetime(value: &Bson) -> Option<DateTime<Utc>> {
    match value {
        Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()),
        Bson::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Encode an entity for storage, turning its timestamps into BSON dates.
pub fn encode_document<E: MongoEntity>(entity: &E) -> CatalogResult<Document> {
    let mut document = to_document(entity)
        .map_err(|e| CatalogError::internal_with(format!("failed to encode {}", E::KIND), e))?;
    document.remove("_id");

    for field in E::DATE_FIELDS {
        let converted = document.get(*field).and_then(read_datetime).map(to_bson_datetime);
        if let Some(value) = converted {
            document.insert(*field, value);
        }
    }
    Ok(document)
}

/// Decode a stored document, accepting BSON dates or RFC 3339 strings.
pub fn decode_document<E: MongoEntity>(mut document: Document) -> CatalogResult<E> {
    for field in E::DATE_FIELDS {
        let converted = match document.get(*field) {
            Some(value @ Bson::DateTime(_)) => {
                let dt = read_datetime(value).ok_or_else(|| {
                    CatalogError::internal(format!("{} field '{field}' is out of range", E::KIND))
                })?;
                Some(Bson::String(dt.to_rfc3339()))
            }
            _ => None,
        };
        if let Some(value) = converted {
            document.insert(*field, value);
        }
    }

    from_document(document)
        .map_err(|e| CatalogError::internal_with(format!("failed to decode {}", E::KIND), e))
}

/// One collection per entity vertical, named after [`Entity::PLURAL`].
pub struct MongoRepository<E: Send + Sync> {
    database: Database,
    collection: Collection<Document>,
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E> MongoRepository<E>
where
    E: MongoEntity,
    E::Filter: DocumentFilter,
{
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, E::PLURAL)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            database: db.clone(),
            collection: db.collection::<Document>(collection_name),
            _entity: std::marker::PhantomData,
        }
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    /// Create the unique key index and the vertical's secondary indexes.
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let mut indexes = vec![IndexModel::builder()
            .keys(key_document(E::KEY_FIELD, 1))
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(format!("idx_{}_unique", E::KEY_FIELD))
                    .build(),
            )
            .build()];

        indexes.extend(E::secondary_indexes().into_iter().map(|(name, keys)| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        }));

        self.collection
            .create_indexes(indexes)
            .await
            .map_err(|e| CatalogError::internal_with(format!("failed to create {} indexes", E::KIND), e))?;

        tracing::info!(collection = E::PLURAL, "Indexes created successfully");
        Ok(())
    }

    fn key_filter(key: &str) -> Document {
        key_document(E::KEY_FIELD, key)
    }

    fn storage_error(operation: &str, err: MongoError) -> CatalogError {
        CatalogError::internal_with(format!("failed to {operation} {}", E::KIND), err)
    }
}

fn key_document(field: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(field, value);
    document
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        MongoErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

/// Stored timestamps are millisecond precision.
fn storage_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[async_trait]
impl<E> Repository<E> for MongoRepository<E>
where
    E: MongoEntity,
    E::Filter: DocumentFilter,
{
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn get_by_id(&self, ctx: &RequestContext, key: &str) -> CatalogResult<E> {
        ctx.run(async {
            let document = self
                .collection
                .find_one(Self::key_filter(key))
                .await
                .map_err(|e| Self::storage_error("get", e))?
                .ok_or_else(|| CatalogError::not_found(E::KIND, key))?;
            decode_document(document)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn get_all(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<Vec<E>> {
        ctx.run(async {
            let pagination = filter.pagination();
            let mut find = self
                .collection
                .find(filter.to_document())
                .sort(key_document(E::KEY_FIELD, 1));
            if pagination.is_requested() {
                find = find
                    .skip(pagination.offset())
                    .limit(i64::from(pagination.page_size));
            }

            let cursor = find.await.map_err(|e| Self::storage_error("list", e))?;
            let documents: Vec<Document> = cursor
                .try_collect()
                .await
                .map_err(|e| Self::storage_error("list", e))?;
            documents.into_iter().map(decode_document).collect()
        })
        .await
    }

    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND, key = %entity.key()))]
    async fn create(&self, ctx: &RequestContext, mut entity: E) -> CatalogResult<E> {
        ctx.run(async move {
            let existing = self
                .collection
                .count_documents(Self::key_filter(entity.key()))
                .await
                .map_err(|e| Self::storage_error("check", e))?;
            if existing > 0 {
                return Err(CatalogError::already_exists(E::KIND, entity.key()));
            }

            let now = storage_now();
            entity.set_timestamps(now, now);
            let document = encode_document(&entity)?;

            // The unique index settles races between the check and the insert.
            match self.collection.insert_one(document).await {
                Ok(_) => {
                    tracing::info!("Entity created successfully");
                    Ok(entity)
                }
                Err(e) if is_duplicate_key(&e) => {
                    Err(CatalogError::already_exists(E::KIND, entity.key()))
                }
                Err(e) => Err(Self::storage_error("create", e)),
            }
        })
        .await
    }

    #[instrument(skip(self, ctx, entity), fields(request_id = %ctx.request_id(), kind = E::KIND, key = %entity.key()))]
    async fn update(&self, ctx: &RequestContext, mut entity: E) -> CatalogResult<E> {
        ctx.run(async move {
            let stored = self
                .collection
                .find_one(Self::key_filter(entity.key()))
                .projection(key_document(CREATED_AT, 1))
                .await
                .map_err(|e| Self::storage_error("update", e))?
                .ok_or_else(|| CatalogError::not_found(E::KIND, entity.key()))?;

            let now = storage_now();
            let created_at = stored.get(CREATED_AT).and_then(read_datetime).unwrap_or(now);
            entity.set_timestamps(created_at, now);

            // Whole-document replacement so cleared optional fields disappear.
            let replaced = self
                .collection
                .find_one_and_replace(Self::key_filter(entity.key()), encode_document(&entity)?)
                .return_document(ReturnDocument::After)
                .await
                .map_err(|e| Self::storage_error("update", e))?
                .ok_or_else(|| CatalogError::not_found(E::KIND, entity.key()))?;

            tracing::info!("Entity updated successfully");
            decode_document(replaced)
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn delete(&self, ctx: &RequestContext, key: &str) -> CatalogResult<()> {
        ctx.run(async {
            let result = self
                .collection
                .delete_one(Self::key_filter(key))
                .await
                .map_err(|e| Self::storage_error("delete", e))?;

            if result.deleted_count == 0 {
                return Err(CatalogError::not_found(E::KIND, key));
            }

            tracing::info!("Entity deleted successfully");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), kind = E::KIND))]
    async fn count(&self, ctx: &RequestContext, filter: &E::Filter) -> CatalogResult<u64> {
        ctx.run(async {
            self.collection
                .count_documents(filter.to_document())
                .await
                .map_err(|e| Self::storage_error("count", e))
        })
        .await
    }

    async fn health_check(&self, ctx: &RequestContext) -> CatalogResult<()> {
        ctx.run(async {
            self.database
                .run_command(doc! { "ping": 1 })
                .await
                .map(|_| ())
                .map_err(|e| CatalogError::internal_with("mongodb ping failed", e))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Widget, WidgetFilter};
    use mongodb::bson::oid::ObjectId;

    impl MongoEntity for Widget {}

    impl DocumentFilter for WidgetFilter {
        fn to_document(&self) -> Document {
            match self.active {
                Some(active) => doc! { "active": active },
                None => Document::new(),
            }
        }
    }

    fn stamped(id: &str) -> Widget {
        let mut widget = Widget::new(id, true);
        let created = DateTime::parse_from_rfc3339("2024-03-01T10:00:00.250Z")
            .unwrap()
            .with_timezone(&Utc);
        widget.set_timestamps(created, created + chrono::Duration::hours(1));
        widget
    }

    #[test]
    fn test_encode_stores_timestamps_as_bson_dates() {
        let widget = stamped("w1");
        let document = encode_document(&widget).unwrap();

        assert_eq!(document.get_str("widgetId").unwrap(), "w1");
        assert!(document.get("_id").is_none());
        assert_eq!(
            document.get_datetime("createdAt").unwrap().timestamp_millis(),
            widget.created_at.timestamp_millis()
        );
        assert!(matches!(document.get("updatedAt"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn test_decode_reads_native_dates_and_ignores_object_id() {
        let created = bson::DateTime::from_millis(1_709_287_200_250);
        let document = doc! {
            "_id": ObjectId::new(),
            "widgetId": "w1",
            "name": "Widget w1",
            "active": true,
            "createdAt": created,
            "updatedAt": created,
        };

        let widget: Widget = decode_document(document).unwrap();
        assert_eq!(widget.widget_id, "w1");
        assert_eq!(widget.created_at.timestamp_millis(), 1_709_287_200_250);
        assert_eq!(widget.created_at, widget.updated_at);
    }

    #[test]
    fn test_decode_accepts_rfc3339_strings() {
        let document = doc! {
            "widgetId": "w2",
            "name": "Widget w2",
            "active": false,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T11:00:00Z",
        };

        let widget: Widget = decode_document(document).unwrap();
        assert!(!widget.active);
        assert_eq!(widget.updated_at - widget.created_at, chrono::Duration::hours(1));
    }

    #[test]
    fn test_document_round_trip_preserves_entity() {
        let widget = stamped("w3");
        let decoded: Widget = decode_document(encode_document(&widget).unwrap()).unwrap();
        assert_eq!(decoded, widget);
    }

    #[test]
    fn test_decode_rejects_malformed_documents() {
        let err = decode_document::<Widget>(doc! { "widgetId": "w4" }).unwrap_err();
        assert!(err.to_string().contains("failed to decode widget"));
    }

    #[test]
    fn test_key_document_targets_key_field() {
        assert_eq!(key_document(Widget::KEY_FIELD, "w1"), doc! { "widgetId": "w1" });
        assert_eq!(key_document(Widget::KEY_FIELD, 1), doc! { "widgetId": 1 });
    }

    #[test]
    fn test_widget_filter_document() {
        assert_eq!(WidgetFilter::default().to_document(), Document::new());
        let filter = WidgetFilter::default().only_active();
        assert_eq!(filter.to_document(), doc! { "active": true });
    }

    #[test]
    fn test_storage_now_has_millisecond_precision() {
        let now = storage_now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_encode_omits_cleared_optional_fields() {
        let mut widget = stamped("w5");
        widget.note = Some("fragile".to_string());
        assert_eq!(encode_document(&widget).unwrap().get_str("note").unwrap(), "fragile");

        widget.note = None;
        assert!(!encode_document(&widget).unwrap().contains_key("note"));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn test_update_replaces_whole_document() {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let client = mongodb::Client::with_uri_str(url).await.unwrap();
        let db = client.database("catalog_test");
        let repo = MongoRepository::<Widget>::with_collection(&db, "widgets_update_test");
        repo.collection().drop().await.unwrap();
        repo.init_indexes().await.unwrap();

        let ctx = RequestContext::background();
        let mut original = Widget::new("w1", true);
        original.note = Some("fragile".to_string());
        let created = repo.create(&ctx, original).await.unwrap();

        let updated = repo.update(&ctx, Widget::new("w1", false)).await.unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.note, None);
        assert!(!updated.active);
        assert_eq!(repo.get_by_id(&ctx, "w1").await.unwrap(), updated);
    }
}
