//! Convenient re-exports of commonly used types from doccrud.
//!
//! ```ignore
//! use doccrud::prelude::*;
//! ```

pub use crate::crud::BaseCrud;

pub use doccrud_core::{
    backend::{IndexSpec, StoreBackend, StoreBackendBuilder},
    cache::{BackendCache, ModelKey, RetryPolicy},
    collection::{Collection, CrudAccess, ModelOptions},
    document::{DeleteOutcome, DocumentExt, DocumentWithId},
    error::{DocumentStoreError, DocumentStoreResult},
    page::Page,
    query::{Expr, FieldOp, Filter, FindRequest, Offset, Query, QueryVisitor, Sort, SortDirection},
    search::SearchPattern,
};
