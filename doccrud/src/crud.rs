//! Typed CRUD over any access object.
//!
//! [`BaseCrud`] converts between a serde type and records, keeps `createdAt`/`updatedAt`
//! fields the type declares, and applies a default page size to `find`.

use bson::{Bson, Document};
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, marker::PhantomData, sync::Arc};

use doccrud_core::{
    collection::CrudAccess,
    document::{CREATED_AT, DeleteOutcome, DocumentExt, DocumentWithId, UPDATED_AT, timestamp},
    error::DocumentStoreResult,
    page::Page,
    query::{FindRequest, Offset},
};

/// Page size used by [`BaseCrud::find`] when the request has no offset.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Whether a declared `createdAt` still needs a value.
fn is_unset(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => true,
        Bson::String(text) => text.is_empty(),
        Bson::Boolean(flag) => !flag,
        Bson::Int32(n) => *n == 0,
        Bson::Int64(n) => *n == 0,
        Bson::Double(n) => *n == 0.0 || n.is_nan(),
        _ => false,
    }
}

/// Typed access to one collection.
///
/// # Example
///
/// ```ignore
/// use doccrud::{crud::BaseCrud, collection::Collection, memory::InMemoryStore, query::FindRequest};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     id: Option<String>,
///     name: String,
/// }
///
/// let users = BaseCrud::<User>::from_access(Collection::new("users", InMemoryStore::new()));
/// let created = users.save(&User { id: None, name: "Ana".into() }).await?;
/// let page = users.find(FindRequest::builder().search("ana").search_field("name").build()).await?;
/// ```
pub struct BaseCrud<T> {
    access: Arc<dyn CrudAccess>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for BaseCrud<T> {
    fn clone(&self) -> Self {
        Self {
            access: Arc::clone(&self.access),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for BaseCrud<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseCrud")
            .field("access", &self.access)
            .finish()
    }
}

impl<T> BaseCrud<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(access: Arc<dyn CrudAccess>) -> Self {
        Self {
            access,
            _marker: PhantomData,
        }
    }

    pub fn from_access(access: impl CrudAccess + 'static) -> Self {
        Self::new(Arc::new(access))
    }

    /// Connects to `collection` of `database` through the process-wide MongoDB cache,
    /// configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidArgument`] when a name is empty.
    ///
    /// [`DocumentStoreError::InvalidArgument`]: doccrud_core::error::DocumentStoreError::InvalidArgument
    #[cfg(feature = "mongodb")]
    pub async fn connect(
        collection: &str,
        database: &str,
        options: doccrud_core::collection::ModelOptions,
    ) -> DocumentStoreResult<Self> {
        use doccrud_core::error::DocumentStoreError;

        if collection.is_empty() {
            return Err(DocumentStoreError::InvalidArgument(
                "collection name is required".to_string(),
            ));
        }
        if database.is_empty() {
            return Err(DocumentStoreError::InvalidArgument(
                "database name is required".to_string(),
            ));
        }

        let access = doccrud_mongodb::MongoDbAccess::get_instance(
            collection,
            Some(database),
            options,
            None,
        )
        .await?;

        Ok(Self::from_access(access))
    }

    pub fn access(&self) -> &Arc<dyn CrudAccess> {
        &self.access
    }

    pub fn collection_name(&self) -> &str {
        self.access.collection_name()
    }

    /// Inserts `record`, or upserts it when it carries an `id`.
    ///
    /// A declared `updatedAt` is set to now; a declared but empty `createdAt` too.
    pub async fn save(&self, record: &T) -> DocumentStoreResult<DocumentWithId> {
        let mut document = record.to_record()?;
        let now = timestamp();

        if document.contains_key(UPDATED_AT) {
            document.insert(UPDATED_AT, now.clone());
        }
        if document.get(CREATED_AT).is_some_and(is_unset) {
            document.insert(CREATED_AT, now);
        }

        self.access.insert(document).await
    }

    /// Upserts `record` by its `id`, refreshing a declared `updatedAt`.
    pub async fn update(&self, record: &T) -> DocumentStoreResult<DocumentWithId> {
        let mut document = record.to_record()?;

        if document.contains_key(UPDATED_AT) {
            document.insert(UPDATED_AT, timestamp());
        }

        self.access.update(document).await
    }

    pub async fn partial_update(
        &self,
        id: &str,
        changes: Document,
    ) -> DocumentStoreResult<DocumentWithId> {
        self.access.partial_update(id, changes).await
    }

    pub async fn get_by_id(&self, id: &str) -> DocumentStoreResult<Option<T>> {
        self.access
            .get_by_id(id)
            .await?
            .map(T::from_record)
            .transpose()
    }

    /// One page of matching records; the first [`DEFAULT_PAGE_SIZE`] when `request` has
    /// no offset.
    pub async fn find(&self, mut request: FindRequest) -> DocumentStoreResult<Page<T>> {
        if request.offset.is_none() {
            request.offset = Some(Offset::new(0, DEFAULT_PAGE_SIZE));
        }

        self.access
            .find(&request)
            .await?
            .try_map(T::from_record)
    }

    pub async fn find_all(&self, request: FindRequest) -> DocumentStoreResult<Vec<T>> {
        self.access
            .find_all(&request)
            .await?
            .into_iter()
            .map(T::from_record)
            .collect()
    }

    pub async fn delete(&self, id: &str) -> DocumentStoreResult<DeleteOutcome> {
        self.access.delete(id).await
    }
}
