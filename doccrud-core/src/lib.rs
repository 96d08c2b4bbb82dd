//! A generic CRUD layer over JSON document databases.
//!
//! This crate is the core of the doccrud project and provides:
//!
//! - **Records** ([`document`]) - Record shapes, id handling and serde conversions
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Filters and queries** ([`query`]) - Filter translation, predicates and find requests
//! - **Fuzzy search** ([`search`]) - Accent and spelling tolerant search patterns
//! - **Access objects** ([`collection`]) - The CRUD contract bound to one collection
//! - **Caching** ([`cache`]) - Shared connections and models with connect retries
//! - **Pagination** ([`page`]) - Page results with totals
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use doccrud_core::{collection::{Collection, CrudAccess}, query::FindRequest};
//! use bson::doc;
//!
//! let users = Collection::new("users", backend);
//! let created = users.insert(doc! { "name": "Ana", "details": { "city": "Recife" } }).await?;
//!
//! let page = users
//!     .find(
//!         &FindRequest::builder()
//!             .search("recife")
//!             .search_field("details.city")
//!             .build(),
//!     )
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_core;

pub mod backend;
pub mod cache;
pub mod collection;
pub mod document;
pub mod error;
pub mod page;
pub mod query;
pub mod search;
