//! Collection and relation field metadata.
//!
//! Field descriptors are produced by the schema sanitizer upstream of this
//! crate; the population engine only reads them.

mod collection;
mod field;
mod registry;

pub use collection::CollectionDef;
pub use field::{RelationField, RelationFieldKind, RelationTarget};
pub use registry::CollectionRegistry;
