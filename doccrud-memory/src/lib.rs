//! In-memory document storage backend for doccrud.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is meant for development and tests: it evaluates the same predicates, projections,
//! sorts and upserts as a database backend, without a server.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Dotted paths** - Filters, sorts, projections and `$set` updates address nested fields
//! - **Fuzzy search** - Search patterns are evaluated case-insensitively
//!
//! # Quick Start
//!
//! ```ignore
//! use doccrud::{collection::{Collection, CrudAccess}, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = Collection::new("users", InMemoryStore::new());
//!     let created = users.insert(doc! { "name": "Alice" }).await?;
//!
//!     assert!(users.get_by_id(&created.id).await?.is_some());
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_memory;

pub mod evaluator;
mod path;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
