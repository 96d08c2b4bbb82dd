//! MongoDB backend implementation for doccrud.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait plus a
//! process-wide access point that caches connections and models.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! doccrud = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! [`MongoConfig::from_env`] reads `MONGO_URL`, `MONGO_DB` and `MONGO_PREFIX_NAME`
//! (a `.env` file is honored). The physical database name is the prefix followed by the
//! database name.
//!
//! # Example
//!
//! ```ignore
//! use doccrud::{collection::{CrudAccess, ModelOptions}, mongodb::MongoDbAccess};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = MongoDbAccess::get_instance("users", None, ModelOptions::default(), None).await?;
//!     let created = users.insert(doc! { "name": "Alice" }).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_mongodb;

pub mod access;
pub mod config;
pub mod query;
pub mod store;

pub use access::MongoDbAccess;
pub use config::MongoConfig;
pub use store::{MongoDbStore, MongoDbStoreBuilder};
