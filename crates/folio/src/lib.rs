//! Folio - content data layer for structured documents.
//!
//! This facade re-exports the population engine and schema metadata from
//! `folio-core`.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use folio::{
//!     CollectionDef, CollectionRegistry, LoadCache, Populator, RelationField, RelationTarget,
//!     RequestContext,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), folio::Error> {
//!     let registry = CollectionRegistry::new()
//!         .with_collection(
//!             CollectionDef::new("posts").with_field(RelationField::relationship(
//!                 "author",
//!                 RelationTarget::single("authors"),
//!             )),
//!         )
//!         .with_collection(CollectionDef::new("authors"));
//!
//!     let cache = LoadCache::new(Arc::new(my_loader));
//!     let ctx = RequestContext::new(2);
//!     let populator = Populator::new(&ctx, &registry, &cache);
//!
//!     let posts = registry.lookup("posts").unwrap();
//!     populator.populate_document(posts, &mut document, 1).await?;
//!     Ok(())
//! }
//! ```

pub use folio_core::error;
pub use folio_core::populate;
pub use folio_core::schema;

pub use folio_core::{
    CacheStats, CollectionDef, CollectionRegistry, DocId, Document, Error, LoadCache, LoadKey,
    LoadResult, Loader, Locale, Populator, RelationField, RelationFieldKind, RelationTarget,
    RequestContext,
};
