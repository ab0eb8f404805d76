//! Depth-limited relationship population.
//!
//! Given a sibling document and a relation field descriptor, the engine
//! finds every reference value under the field, resolves the target
//! collection for each, fetches referenced documents through the request's
//! [`LoadCache`], and writes each result back into the exact position it
//! was read from. Arrays, polymorphic relation tuples, and per-locale maps
//! keep their shape; only leaf reference values are substituted.

mod cache;
mod context;
mod key;
mod loader;
mod resolve;
mod walker;

pub use cache::{CacheStats, LoadCache};
pub use context::{Locale, RequestContext};
pub use key::{DocId, LoadKey};
pub use loader::{LoadResult, Loader};

use futures::future::try_join_all;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::schema::{CollectionDef, CollectionRegistry, RelationField};
use resolve::resolve_reference;
use walker::{apply_write, collect_tasks, PopulationTask, WriteSlot};

/// One level of a document tree, keyed by field name.
pub type Document = Map<String, Value>;

/// Population driver for one request.
///
/// Borrows the request context, collection registry, and load cache. The
/// read pipeline invokes it once per relation field it encounters (or once
/// per document level via [`Populator::populate_document`]); which fields
/// are relation-typed is the pipeline's job to know, not the driver's.
pub struct Populator<'a> {
    ctx: &'a RequestContext,
    registry: &'a CollectionRegistry,
    cache: &'a LoadCache,
}

impl<'a> Populator<'a> {
    /// Create a driver over the request's shared state.
    pub fn new(
        ctx: &'a RequestContext,
        registry: &'a CollectionRegistry,
        cache: &'a LoadCache,
    ) -> Self {
        Self {
            ctx,
            registry,
            cache,
        }
    }

    /// Populate every reference under one relation field of `sibling`.
    ///
    /// All fetch tasks for the field run concurrently; the call returns
    /// only after every task has completed and its result is written back.
    /// A loader failure aborts the join and propagates; pass-through
    /// conditions (unknown collection, denied access) do not.
    pub async fn populate_field(
        &self,
        field: &RelationField,
        sibling: &mut Document,
        current_depth: u32,
    ) -> Result<(), Error> {
        let writes = self.resolve_field(field, sibling, current_depth).await?;
        for (slot, value) in writes {
            apply_write(sibling, &field.name, &slot, value);
        }
        Ok(())
    }

    /// Populate every relation field of `collection` present in `sibling`.
    ///
    /// Field-level fan-outs run concurrently with each other; all writes
    /// are applied once the joint join completes, each to its own
    /// disjoint (field, slot) address.
    pub async fn populate_document(
        &self,
        collection: &CollectionDef,
        sibling: &mut Document,
        current_depth: u32,
    ) -> Result<(), Error> {
        let doc: &Document = sibling;
        let pending = collection.fields.iter().map(|field| async move {
            let writes = self.resolve_field(field, doc, current_depth).await?;
            Ok::<_, Error>((field.name.as_str(), writes))
        });
        let resolved = try_join_all(pending).await?;

        for (name, writes) in resolved {
            for (slot, value) in writes {
                apply_write(sibling, name, &slot, value);
            }
        }
        Ok(())
    }

    /// Resolve every reference under one field without touching the
    /// document, returning the writes to apply.
    async fn resolve_field(
        &self,
        field: &RelationField,
        sibling: &Document,
        current_depth: u32,
    ) -> Result<Vec<(WriteSlot, Value)>, Error> {
        let Some(value) = sibling.get(&field.name) else {
            return Ok(Vec::new());
        };

        let depth = field.effective_depth(self.ctx.depth);
        let tasks = collect_tasks(field, value, self.ctx.all_locales());
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            field = %field.name,
            tasks = tasks.len(),
            depth,
            current_depth,
            "populating relation field"
        );

        let pending = tasks.into_iter().map(|PopulationTask { slot, raw }| async move {
            let resolved = resolve_reference(
                self.ctx,
                self.registry,
                self.cache,
                field,
                &raw,
                depth,
                current_depth,
            )
            .await?;
            Ok::<_, Error>((slot, resolved))
        });
        let resolved = try_join_all(pending).await?;

        Ok(resolved
            .into_iter()
            .filter_map(|(slot, value)| value.map(|v| (slot, v)))
            .collect())
    }
}
