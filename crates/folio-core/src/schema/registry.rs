//! Registry of known collections.

use std::collections::HashMap;

use super::collection::CollectionDef;

/// Lookup table of the collections known to a request.
///
/// A slug missing from the registry is not an error during population: the
/// reference value passes through unresolved.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: HashMap<String, CollectionDef>,
}

impl CollectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, replacing any previous definition for the
    /// same slug.
    pub fn register(&mut self, collection: CollectionDef) {
        self.collections.insert(collection.slug.clone(), collection);
    }

    /// Builder-style registration.
    pub fn with_collection(mut self, collection: CollectionDef) -> Self {
        self.register(collection);
        self
    }

    /// Look up a collection by slug.
    pub fn lookup(&self, slug: &str) -> Option<&CollectionDef> {
        self.collections.get(slug)
    }

    /// Whether a slug is known.
    pub fn contains(&self, slug: &str) -> bool {
        self.collections.contains_key(slug)
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
