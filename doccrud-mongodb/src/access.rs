//! Process-wide access to MongoDB collections.
//!
//! Every [`MongoDbAccess::get_instance`] call for the same server, database and collection
//! returns a handle on the same connection and the same registered model.

use std::sync::LazyLock;

use doccrud_core::{
    backend::StoreBackendBuilder,
    cache::{BackendCache, ModelKey},
    collection::{Collection, ModelOptions},
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::{config::MongoConfig, store::MongoDbStore};

static CACHE: LazyLock<BackendCache<MongoDbStore>> = LazyLock::new(BackendCache::new);

/// Entry point for cached MongoDB collections.
pub struct MongoDbAccess;

impl MongoDbAccess {
    /// Returns the access object for `collection`.
    ///
    /// `database` overrides the configured database name (the prefix still applies);
    /// `config` defaults to [`MongoConfig::from_env`]. Connecting is retried with
    /// backoff; `options` only apply the first time the model is registered.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::MissingConfig`] when no URL is configured
    /// - [`DocumentStoreError::InvalidArgument`] for an empty collection name
    /// - [`DocumentStoreError::ConnectionRetriesExhausted`] when the server stays unreachable
    pub async fn get_instance(
        collection: &str,
        database: Option<&str>,
        options: ModelOptions,
        config: Option<MongoConfig>,
    ) -> DocumentStoreResult<Collection<MongoDbStore>> {
        let config = config.unwrap_or_else(MongoConfig::from_env);

        if config.url.is_empty() {
            return Err(DocumentStoreError::MissingConfig(
                "a MongoDB url is required, check MONGO_URL".to_string(),
            ));
        }
        if collection.is_empty() {
            return Err(DocumentStoreError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }

        let database = config.database_name(database);
        let key = ModelKey::new(config.connection_key(&database), database.as_str(), collection);

        CACHE
            .collection(key, options, || {
                MongoDbStore::builder(&config.url, &database).build()
            })
            .await
    }

    /// The cache shared by every instance.
    pub fn cache() -> &'static BackendCache<MongoDbStore> {
        &CACHE
    }
}
