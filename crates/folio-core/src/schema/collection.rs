//! Collection definitions.

use serde::{Deserialize, Serialize};

use super::field::RelationField;

/// A collection definition: its slug plus the relation fields the
/// population engine operates on. Non-relation fields are owned by the
/// wider schema and never reach this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDef {
    /// Collection slug (unique within a registry).
    pub slug: String,
    /// Relationship and upload fields declared on the collection.
    pub fields: Vec<RelationField>,
}

impl CollectionDef {
    /// Create a collection with no relation fields.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            fields: Vec::new(),
        }
    }

    /// Add a relation field.
    pub fn with_field(mut self, field: RelationField) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a relation field by name.
    pub fn relation_field(&self, name: &str) -> Option<&RelationField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
