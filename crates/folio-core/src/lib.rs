//! Folio Core - Schema metadata and relationship population engine.
//!
//! This crate provides the document population core for the Folio content
//! data layer: depth-limited expansion of relationship and upload fields,
//! with request-scoped deduplication of identical document loads.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod error;
pub mod populate;
pub mod schema;

pub use error::Error;
pub use populate::{
    CacheStats, DocId, Document, LoadCache, LoadKey, LoadResult, Loader, Locale, Populator,
    RequestContext,
};
pub use schema::{
    CollectionDef, CollectionRegistry, RelationField, RelationFieldKind, RelationTarget,
};
