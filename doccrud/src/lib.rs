//! Main doccrud crate: a generic CRUD layer over JSON document databases.
//!
//! This crate is the primary entry point. It re-exports the core types from the sub-crates,
//! the typed [`crud::BaseCrud`] facade and the available storage backends.
//!
//! # Features
//!
//! - **Generic CRUD** - `get_by_id`, `find`, `find_all`, `insert`, `update`,
//!   `partial_update` and `delete` over any record shape
//! - **Generic filters** - Plain filter documents (`{ "age": { "$gte": 18 } }`) with the
//!   `id` alias and an optional fuzzy search over several fields
//! - **Pagination** - `find` returns the page together with the total match count
//! - **Shared connections** - One connection and one model per server, database and
//!   collection, with connect retries
//!
//! # Quick Start
//!
//! ```ignore
//! use doccrud::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let users = BaseCrud::<User>::from_access(Collection::new("users", InMemoryStore::new()));
//!
//!     let created = users.save(&User { id: None, name: "José".into() }).await?;
//!
//!     let page = users
//!         .find(FindRequest::builder().search("jose").search_field("name").build())
//!         .await?;
//!     assert_eq!(page.list[0].id.as_deref(), Some(created.id.as_str()));
//!
//!     users.delete(&created.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend and cached access (requires the `mongodb` feature)

pub mod crud;
pub mod prelude;

pub use doccrud_core::{backend, cache, collection, document, error, page, query, search};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use doccrud_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use doccrud_mongodb::{MongoConfig, MongoDbAccess, MongoDbStore, MongoDbStoreBuilder};
}
