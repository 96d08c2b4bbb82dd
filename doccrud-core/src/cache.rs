//! Connection and model caching.
//!
//! A [`BackendCache`] hands out one backend per connection key and one
//! [`Collection`] per [`ModelKey`], so every caller asking for the same
//! (server, database, collection) triple shares one physical connection and one
//! registered model. Connecting goes through a [`RetryPolicy`] with linear backoff.
//!
//! Concurrent callers for the same key wait for the first connect instead of opening
//! their own connection; callers for other keys are not blocked.

use mea::mutex::Mutex;
use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    backend::StoreBackend,
    collection::{Collection, ModelOptions},
    error::{DocumentStoreError, DocumentStoreResult},
};

type Slot<T> = Arc<Mutex<Option<T>>>;

/// Bounded retry with linear backoff: the `n`th failed attempt waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, base_delay }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Runs `operation` until it succeeds or the attempts run out.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::ConnectionRetriesExhausted`] wrapping the last error.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> DocumentStoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DocumentStoreResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(connection = label, attempt, max_attempts, error = %err, "connection attempt failed");

                    if attempt >= max_attempts {
                        return Err(DocumentStoreError::ConnectionRetriesExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    tokio::time::sleep(self.delay_for(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// Identifies one model: a collection of a database behind a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub connection: String,
    pub database: String,
    pub collection: String,
}

impl ModelKey {
    pub fn new(
        connection: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            connection: connection.into(),
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Process-wide cache of backends and registered models.
#[derive(Debug)]
pub struct BackendCache<B: StoreBackend + Clone> {
    backends: Mutex<HashMap<String, Slot<B>>>,
    models: Mutex<HashMap<ModelKey, Slot<Collection<B>>>>,
    retry: RetryPolicy,
}

impl<B: StoreBackend + Clone> BackendCache<B> {
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            backends: Mutex::new(HashMap::new()),
            models: Mutex::new(HashMap::new()),
            retry,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the backend cached under `key`, connecting with `connect` on first use.
    pub async fn backend<F, Fut>(&self, key: &str, connect: F) -> DocumentStoreResult<B>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DocumentStoreResult<B>>,
    {
        let slot = self
            .backends
            .lock()
            .await
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();
        let mut slot = slot.lock().await;

        if let Some(backend) = slot.as_ref() {
            return Ok(backend.clone());
        }

        let backend = self.retry.run(key, connect).await?;
        info!(connection = key, "opened connection");
        *slot = Some(backend.clone());

        Ok(backend)
    }

    /// Returns the model registered under `key`, registering it on first use.
    ///
    /// Registration connects (or reuses the connection) and ensures the model's indexes.
    /// `options` only apply to that first registration.
    pub async fn collection<F, Fut>(
        &self,
        key: ModelKey,
        options: ModelOptions,
        connect: F,
    ) -> DocumentStoreResult<Collection<B>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DocumentStoreResult<B>>,
    {
        let slot = self
            .models
            .lock()
            .await
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();
        let mut slot = slot.lock().await;

        if let Some(collection) = slot.as_ref() {
            return Ok(collection.clone());
        }

        let backend = self.backend(&key.connection, connect).await?;
        let collection = Collection::with_options(key.collection.clone(), backend, options);

        collection.ensure_indexes().await?;
        debug!(
            connection = %key.connection,
            database = %key.database,
            collection = %key.collection,
            "registered model"
        );
        *slot = Some(collection.clone());

        Ok(collection)
    }

    /// Number of open connections.
    pub async fn connection_count(&self) -> usize {
        let slots = self
            .backends
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        let mut count = 0;

        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }

        count
    }

    /// Number of registered models.
    pub async fn model_count(&self) -> usize {
        let slots = self
            .models
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        let mut count = 0;

        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }

        count
    }
}

impl<B: StoreBackend + Clone> Default for BackendCache<B> {
    fn default() -> Self {
        Self::new()
    }
}
