//! Storage backend abstraction.
//!
//! The [`StoreBackend`] trait is the seam between the backend-neutral access object
//! ([`crate::collection::Collection`]) and a concrete database. Backends store records as
//! [`bson::Document`]s whose primary key lives under `_id` (a string), and evaluate the
//! predicates produced by [`crate::query::translate_filter`].
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use doccrud::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! backend.insert("users", doc! { "_id": "u1", "name": "Alice" }).await?;
//! let alice = backend.find_by_id("users", "u1").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::{fmt::Debug, sync::Arc};

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// An index on one field of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: String,
    pub unique: bool,
}

impl IndexSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into(), unique: false }
    }

    pub fn unique(field: impl Into<String>) -> Self {
        Self { field: field.into(), unique: true }
    }
}

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// tasks.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Fetches the record whose `_id` is `id`.
    async fn find_by_id(&self, collection: &str, id: &str)
        -> DocumentStoreResult<Option<Document>>;

    /// Runs a query: predicate, projection, sort, then skip and limit.
    async fn find(&self, collection: &str, query: &Query) -> DocumentStoreResult<Vec<Document>>;

    /// Counts the records matching `filter` (all records when `None`).
    async fn count(&self, collection: &str, filter: Option<&Expr>) -> DocumentStoreResult<u64>;

    /// Inserts a record that already carries its `_id`.
    async fn insert(&self, collection: &str, document: Document) -> DocumentStoreResult<()>;

    /// Applies `set` to the record with `_id == id` with `$set` semantics (dotted keys address
    /// nested fields), creating the record when it does not exist. `set_on_insert` is applied
    /// only when the record is created. Returns the record as stored after the update.
    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        set_on_insert: Document,
    ) -> DocumentStoreResult<Document>;

    /// Deletes the record with `_id == id`, returning whether one existed.
    async fn delete(&self, collection: &str, id: &str) -> DocumentStoreResult<bool>;

    /// Creates the given indexes if they are missing.
    async fn ensure_indexes(
        &self,
        collection: &str,
        indexes: &[IndexSpec],
    ) -> DocumentStoreResult<()>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> DocumentStoreResult<()>;

    /// Releases backend resources.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (*self).find_by_id(collection, id).await
    }

    async fn find(&self, collection: &str, query: &Query) -> DocumentStoreResult<Vec<Document>> {
        (*self).find(collection, query).await
    }

    async fn count(&self, collection: &str, filter: Option<&Expr>) -> DocumentStoreResult<u64> {
        (*self).count(collection, filter).await
    }

    async fn insert(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        (*self).insert(collection, document).await
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        set_on_insert: Document,
    ) -> DocumentStoreResult<Document> {
        (*self)
            .upsert(collection, id, set, set_on_insert)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> DocumentStoreResult<bool> {
        (*self).delete(collection, id).await
    }

    async fn ensure_indexes(
        &self,
        collection: &str,
        indexes: &[IndexSpec],
    ) -> DocumentStoreResult<()> {
        (*self)
            .ensure_indexes(collection, indexes)
            .await
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        (*self).ping().await
    }
}

#[async_trait]
impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend,
{
    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (**self).find_by_id(collection, id).await
    }

    async fn find(&self, collection: &str, query: &Query) -> DocumentStoreResult<Vec<Document>> {
        (**self).find(collection, query).await
    }

    async fn count(&self, collection: &str, filter: Option<&Expr>) -> DocumentStoreResult<u64> {
        (**self).count(collection, filter).await
    }

    async fn insert(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        (**self).insert(collection, document).await
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        set_on_insert: Document,
    ) -> DocumentStoreResult<Document> {
        (**self)
            .upsert(collection, id, set, set_on_insert)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> DocumentStoreResult<bool> {
        (**self).delete(collection, id).await
    }

    async fn ensure_indexes(
        &self,
        collection: &str,
        indexes: &[IndexSpec],
    ) -> DocumentStoreResult<()> {
        (**self)
            .ensure_indexes(collection, indexes)
            .await
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        (**self).ping().await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
