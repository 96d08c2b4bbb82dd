//! In-memory storage implementation.
//!
//! Records are kept per collection in a map keyed by `_id`, behind an async-aware
//! read-write lock. Unsorted queries return records in insertion order.

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use doccrud_core::{
    backend::{IndexSpec, StoreBackend, StoreBackendBuilder},
    document::PRIMARY_KEY,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::{
    evaluator::{DocumentEvaluator, compare_for_sort},
    path::{lookup, remove_path, set_path},
};

#[derive(Debug)]
struct StoredRecord {
    /// Insertion sequence, used as the natural order.
    seq: u64,
    document: Document,
}

#[derive(Debug, Default)]
struct CollectionData {
    next_seq: u64,
    records: HashMap<String, StoredRecord>,
}

impl CollectionData {
    fn ordered(&self) -> Vec<&Document> {
        let mut records = self.records.values().collect::<Vec<_>>();
        records.sort_by_key(|record| record.seq);
        records.into_iter().map(|record| &record.document).collect()
    }

    fn matching(&self, filter: Option<&Expr>) -> DocumentStoreResult<Vec<&Document>> {
        match filter {
            Some(filter) => DocumentEvaluator::filter_documents(self.ordered(), filter),
            None => Ok(self.ordered()),
        }
    }
}

type StoreMap = HashMap<String, CollectionData>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones share
/// the same data. Queries scan every record of a collection; indexes are not maintained.
///
/// # Example
///
/// ```ignore
/// use doccrud_memory::InMemoryStore;
/// use doccrud_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// store.insert("users", doc! { "_id": "u1", "name": "Alice" }).await?;
///
/// let alice = store.find_by_id("users", "u1").await?;
/// assert!(alice.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Names of the collections holding at least one record.
    pub async fn collection_names(&self) -> Vec<String> {
        self.store
            .read()
            .await
            .iter()
            .filter(|(_, data)| !data.records.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Applies a projection: inclusion when any non-`_id` field is truthy, exclusion otherwise.
/// `_id` is kept unless explicitly excluded.
fn project(document: &Document, projection: &Document) -> DocumentStoreResult<Document> {
    let truthy = |value: &Bson| {
        !matches!(value, Bson::Boolean(false) | Bson::Int32(0) | Bson::Int64(0) | Bson::Null)
    };
    let inclusive = projection
        .iter()
        .any(|(field, value)| field != PRIMARY_KEY && truthy(value));
    let keep_id = projection.get(PRIMARY_KEY).is_none_or(|value| truthy(value));

    if inclusive {
        let mut projected = Document::new();

        if keep_id {
            if let Some(id) = document.get(PRIMARY_KEY) {
                projected.insert(PRIMARY_KEY, id.clone());
            }
        }
        for (field, value) in projection {
            if field == PRIMARY_KEY || !truthy(value) {
                continue;
            }
            if let Some(found) = lookup(document, field) {
                set_path(&mut projected, field, found.clone())?;
            }
        }

        Ok(projected)
    } else {
        let mut projected = document.clone();

        for (field, _) in projection {
            if field != PRIMARY_KEY {
                remove_path(&mut projected, field);
            }
        }
        if !keep_id {
            projected.remove(PRIMARY_KEY);
        }

        Ok(projected)
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn find_by_id(&self, collection: &str, id: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(self
            .store
            .read()
            .await
            .get(collection)
            .and_then(|data| data.records.get(id))
            .map(|record| record.document.clone()))
    }

    async fn find(&self, collection: &str, query: &Query) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let Some(data) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut documents = data.matching(query.filter.as_ref())?;

        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| {
                let ordering = compare_for_sort(lookup(a, &sort.field), lookup(b, &sort.field));

                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|document| match &query.projection {
                Some(projection) => project(document, projection),
                None => Ok(document.clone()),
            })
            .collect()
    }

    async fn count(&self, collection: &str, filter: Option<&Expr>) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        match store.get(collection) {
            Some(data) => Ok(data.matching(filter)?.len() as u64),
            None => Ok(0),
        }
    }

    async fn insert(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        let id = document
            .get_str(PRIMARY_KEY)
            .map_err(|_| {
                DocumentStoreError::InvalidDocument(format!(
                    "records inserted into '{collection}' need a string '{PRIMARY_KEY}'"
                ))
            })?
            .to_string();

        let mut store = self.store.write().await;
        let data = store.entry(collection.to_string()).or_default();

        if data.records.contains_key(&id) {
            return Err(DocumentStoreError::Backend(format!(
                "duplicate key '{id}' in collection '{collection}'"
            )));
        }

        let seq = data.next_seq;
        data.next_seq += 1;
        data.records.insert(id, StoredRecord { seq, document });

        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        set_on_insert: Document,
    ) -> DocumentStoreResult<Document> {
        let mut store = self.store.write().await;
        let data = store.entry(collection.to_string()).or_default();

        let (mut document, created) = match data.records.get(id) {
            Some(existing) => (existing.document.clone(), false),
            None => (doc! { PRIMARY_KEY: id }, true),
        };

        if created {
            for (path, value) in set_on_insert {
                set_path(&mut document, &path, value)?;
            }
        }
        for (path, value) in set {
            if path != PRIMARY_KEY {
                set_path(&mut document, &path, value)?;
            }
        }

        match data.records.get_mut(id) {
            Some(existing) => existing.document = document.clone(),
            None => {
                let seq = data.next_seq;
                data.next_seq += 1;
                data.records.insert(
                    id.to_string(),
                    StoredRecord { seq, document: document.clone() },
                );
            }
        }

        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &str) -> DocumentStoreResult<bool> {
        Ok(self
            .store
            .write()
            .await
            .get_mut(collection)
            .and_then(|data| data.records.remove(id))
            .is_some())
    }

    async fn ensure_indexes(&self, _collection: &str, _indexes: &[IndexSpec]) -> DocumentStoreResult<()> {
        // Scans only; nothing to build.
        Ok(())
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
