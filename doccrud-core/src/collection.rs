//! The document access object.
//!
//! [`Collection`] implements the CRUD contract ([`CrudAccess`]) for one collection of one
//! backend. It translates [`FindRequest`]s into backend queries, renames the stored primary
//! key (`_id`) to `id` on the way out, generates ids for new records and keeps model
//! timestamps.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use doccrud::prelude::*;
//! use doccrud::memory::InMemoryStore;
//!
//! let users = Collection::new("users", InMemoryStore::new());
//!
//! let created = users.insert(doc! { "name": "Alice", "age": 30 }).await?;
//! let alice = users.get_by_id(&created.id).await?;
//!
//! let page = users
//!     .find(&FindRequest::builder().search("alice").search_field("name").build())
//!     .await?;
//! ```

use async_trait::async_trait;
use bson::{Bson, Document, de::deserialize_from_document, doc};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;
use uuid::Uuid;

use crate::{
    backend::{IndexSpec, StoreBackend},
    document::{
        CREATED_AT, DeleteOutcome, DocumentWithId, ID_ALIAS, PRIMARY_KEY, UPDATED_AT,
        flatten_update, format_document, record_id, timestamp,
    },
    error::{DocumentStoreError, DocumentStoreResult},
    page::Page,
    query::{FindRequest, Offset, Query},
};

/// Per-model settings, fixed when the model is first registered.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Maintain `createdAt` and `updatedAt` on every write.
    pub timestamps: bool,
    /// Indexes ensured when the model is registered. `_id` is always indexed by the store.
    pub indexes: Vec<IndexSpec>,
}

impl ModelOptions {
    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            timestamps: true,
            indexes: Vec::new(),
        }
    }
}

/// The CRUD contract over untyped records.
///
/// Records passed in carry their primary key as `id`; records handed back do too.
#[async_trait]
pub trait CrudAccess: Send + Sync + Debug {
    /// The collection this access object reads and writes.
    fn collection_name(&self) -> &str;

    /// Fetches one record by id.
    async fn get_by_id(&self, id: &str) -> DocumentStoreResult<Option<Document>>;

    /// Fetches one page of matching records plus the total match count.
    async fn find(&self, request: &FindRequest) -> DocumentStoreResult<Page<Document>>;

    /// Fetches every matching record.
    async fn find_all(&self, request: &FindRequest) -> DocumentStoreResult<Vec<Document>>;

    /// Inserts a record. A record that already has an `id` is upserted instead.
    async fn insert(&self, record: Document) -> DocumentStoreResult<DocumentWithId>;

    /// Sets the given top-level fields on the record named by its `id`, creating it if
    /// needed.
    async fn update(&self, record: Document) -> DocumentStoreResult<DocumentWithId>;

    /// Sets only the given leaves of the record; nested siblings are kept.
    async fn partial_update(
        &self,
        id: &str,
        changes: Document,
    ) -> DocumentStoreResult<DocumentWithId>;

    /// Deletes a record. Deleting a missing record succeeds.
    async fn delete(&self, id: &str) -> DocumentStoreResult<DeleteOutcome>;
}

/// Access object bound to one collection of a backend.
#[derive(Debug, Clone)]
pub struct Collection<B: StoreBackend> {
    name: String,
    backend: B,
    options: ModelOptions,
}

impl<B: StoreBackend> Collection<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self::with_options(name, backend, ModelOptions::default())
    }

    pub fn with_options(name: impl Into<String>, backend: B, options: ModelOptions) -> Self {
        Self {
            name: name.into(),
            backend,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Creates the model's indexes on the backend.
    pub async fn ensure_indexes(&self) -> DocumentStoreResult<()> {
        if self.options.indexes.is_empty() {
            return Ok(());
        }

        self.backend
            .ensure_indexes(&self.name, &self.options.indexes)
            .await
    }

    /// Fetches one record by id and deserializes it.
    pub async fn get_by_id_as<T: DeserializeOwned>(
        &self,
        id: &str,
    ) -> DocumentStoreResult<Option<T>> {
        CrudAccess::get_by_id(self, id)
            .await?
            .map(|record| deserialize_from_document::<T>(record).map_err(DocumentStoreError::from))
            .transpose()
    }

    /// Fetches one page of matching records and deserializes them.
    pub async fn find_as<T: DeserializeOwned>(
        &self,
        request: &FindRequest,
    ) -> DocumentStoreResult<Page<T>> {
        CrudAccess::find(self, request)
            .await?
            .try_map(|record| deserialize_from_document::<T>(record).map_err(DocumentStoreError::from))
    }

    /// Fetches every matching record and deserializes them.
    pub async fn find_all_as<T: DeserializeOwned>(
        &self,
        request: &FindRequest,
    ) -> DocumentStoreResult<Vec<T>> {
        CrudAccess::find_all(self, request)
            .await?
            .into_iter()
            .map(|record| deserialize_from_document::<T>(record).map_err(DocumentStoreError::from))
            .collect()
    }

    fn build_query(&self, request: &FindRequest, offset: Option<Offset>) -> DocumentStoreResult<Query> {
        let mut builder = Query::builder()
            .filter(request.predicate()?)
            .projection(request.select.clone())
            .sort(request.sort());

        if let Some(offset) = offset {
            builder = builder.offset(offset.skip).limit(offset.limit);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl<B: StoreBackend> CrudAccess for Collection<B> {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn get_by_id(&self, id: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(self
            .backend
            .find_by_id(&self.name, id)
            .await?
            .map(format_document))
    }

    async fn find(&self, request: &FindRequest) -> DocumentStoreResult<Page<Document>> {
        let offset = request.offset.unwrap_or_default();
        let query = self.build_query(request, Some(offset))?;

        let total = self
            .backend
            .count(&self.name, query.filter.as_ref())
            .await?;

        // A zero limit means "no records" here; some stores read it as "no limit".
        let list = if offset.limit == 0 {
            Vec::new()
        } else {
            self.backend
                .find(&self.name, &query)
                .await?
                .into_iter()
                .map(format_document)
                .collect()
        };

        Ok(Page::builder(list)
            .with_total(total)
            .with_skipped(offset.skip)
            .with_limited(offset.limit)
            .build())
    }

    async fn find_all(&self, request: &FindRequest) -> DocumentStoreResult<Vec<Document>> {
        let query = self.build_query(request, None)?;

        Ok(self
            .backend
            .find(&self.name, &query)
            .await?
            .into_iter()
            .map(format_document)
            .collect())
    }

    async fn insert(&self, record: Document) -> DocumentStoreResult<DocumentWithId> {
        if let Some(id) = record.get(ID_ALIAS).filter(|id| !matches!(id, Bson::String(_) | Bson::Null)) {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "'{ID_ALIAS}' on '{}' must be a string, got {id}",
                self.name
            )));
        }

        if record_id(&record).is_some() {
            return CrudAccess::update(self, record).await;
        }

        let id = Uuid::new_v4().to_string();
        let mut document = doc! { PRIMARY_KEY: id.as_str() };

        for (key, value) in record {
            if key != ID_ALIAS && key != PRIMARY_KEY {
                document.insert(key, value);
            }
        }

        if self.options.timestamps {
            let now = timestamp();

            if document.get(CREATED_AT).is_none_or(|value| value.as_null().is_some()) {
                document.insert(CREATED_AT, now.clone());
            }
            document.insert(UPDATED_AT, now);
        }

        self.backend.insert(&self.name, document).await?;
        debug!(collection = %self.name, id = %id, "inserted record");

        Ok(DocumentWithId::new(id))
    }

    async fn update(&self, record: Document) -> DocumentStoreResult<DocumentWithId> {
        let id = record_id(&record)
            .ok_or_else(|| {
                DocumentStoreError::InvalidDocument(format!(
                    "update on '{}' requires a string '{ID_ALIAS}' field",
                    self.name
                ))
            })?
            .to_string();

        let mut set: Document = record
            .into_iter()
            .filter(|(key, _)| key != ID_ALIAS && key != PRIMARY_KEY)
            .collect();
        let mut set_on_insert = Document::new();

        if self.options.timestamps {
            let now = timestamp();

            // `createdAt` is written once, when the upsert inserts the record.
            let created_at = set
                .remove(CREATED_AT)
                .filter(|value| value.as_null().is_none());

            set.insert(UPDATED_AT, now.clone());
            set_on_insert.insert(CREATED_AT, created_at.unwrap_or(now));
        }

        self.backend
            .upsert(&self.name, &id, set, set_on_insert)
            .await?;
        debug!(collection = %self.name, id = %id, "upserted record");

        Ok(DocumentWithId::new(id))
    }

    async fn partial_update(
        &self,
        id: &str,
        changes: Document,
    ) -> DocumentStoreResult<DocumentWithId> {
        if id.is_empty() {
            return Err(DocumentStoreError::InvalidArgument(
                "partial update requires an id".to_string(),
            ));
        }

        let mut record = flatten_update(changes);
        record.insert(ID_ALIAS, id);

        CrudAccess::update(self, record).await
    }

    async fn delete(&self, id: &str) -> DocumentStoreResult<DeleteOutcome> {
        let existed = self.backend.delete(&self.name, id).await?;
        debug!(collection = %self.name, id = %id, existed, "deleted record");

        Ok(DeleteOutcome { success: true })
    }
}
