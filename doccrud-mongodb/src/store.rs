use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{
        ClientOptions, Collation, CollationStrength, CountOptions, FindOptions, IndexOptions,
        ReturnDocument,
    },
};
use tracing::debug;

use doccrud_core::{
    backend::{IndexSpec, StoreBackend, StoreBackendBuilder},
    document::PRIMARY_KEY,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::query::MongoQueryTranslator;

/// Collation locale applied to reads unless the builder says otherwise.
pub const DEFAULT_COLLATION_LOCALE: &str = "pt";

fn primary_collation(locale: &str) -> Collation {
    Collation::builder()
        .locale(locale.to_string())
        .strength(CollationStrength::Primary)
        .build()
}

/// MongoDB storage backend bound to one database.
///
/// Reads use a primary-strength collation (case and accent insensitive comparisons and
/// sorts) when one is configured.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
    collation: Option<Collation>,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String, collation: Option<Collation>) -> Self {
        Self { client, database, collation }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn find_by_id(&self, collection: &str, id: &str) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(doc! { PRIMARY_KEY: id })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn find(&self, collection: &str, query: &Query) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            });
        }
        options.projection = query.projection.clone();
        options.collation = self.collation.clone();

        self.get_collection(collection)
            .find(MongoQueryTranslator::filter(query.filter.as_ref())?)
            .with_options(options)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn count(&self, collection: &str, filter: Option<&Expr>) -> DocumentStoreResult<u64> {
        let mut options = CountOptions::default();
        options.collation = self.collation.clone();

        self.get_collection(collection)
            .count_documents(MongoQueryTranslator::filter(filter)?)
            .with_options(options)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn insert(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        mut set_on_insert: Document,
    ) -> DocumentStoreResult<Document> {
        set_on_insert.insert(PRIMARY_KEY, id);

        let mut update = doc! { "$setOnInsert": set_on_insert };
        if !set.is_empty() {
            update.insert("$set", set);
        }

        self.get_collection(collection)
            .find_one_and_update(doc! { PRIMARY_KEY: id }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .ok_or_else(|| {
                DocumentStoreError::Backend(format!(
                    "upsert of '{id}' in '{collection}' returned no document"
                ))
            })
    }

    async fn delete(&self, collection: &str, id: &str) -> DocumentStoreResult<bool> {
        Ok(self
            .get_collection(collection)
            .delete_one(doc! { PRIMARY_KEY: id })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .deleted_count
            > 0)
    }

    async fn ensure_indexes(&self, collection: &str, indexes: &[IndexSpec]) -> DocumentStoreResult<()> {
        for index in indexes {
            self.get_collection(collection)
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { index.field.clone(): 1 })
                        .options(
                            IndexOptions::builder()
                                .unique(index.unique)
                                .build()
                        )
                        .build()
                )
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

            debug!(collection, field = %index.field, unique = index.unique, "ensured index");
        }

        Ok(())
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    collation_locale: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            collation_locale: Some(DEFAULT_COLLATION_LOCALE.to_string()),
        }
    }

    /// Reads with a primary-strength collation for `locale`.
    pub fn collation_locale(mut self, locale: &str) -> Self {
        self.collation_locale = Some(locale.to_string());
        self
    }

    /// Reads with the server's binary comparison.
    pub fn without_collation(mut self) -> Self {
        self.collation_locale = None;
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let store = MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
            self.collation_locale.as_deref().map(primary_collation),
        );

        store
            .ping()
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;
        debug!(database = %store.database, "connected to MongoDB");

        Ok(store)
    }
}
