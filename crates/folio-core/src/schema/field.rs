//! Relation field definitions.

use serde::{Deserialize, Serialize};

/// Target collection(s) of a relation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationTarget {
    /// Every value references the same collection.
    Single(String),
    /// Polymorphic: each value carries its own collection tag.
    Multi(Vec<String>),
}

impl RelationTarget {
    /// Create a single-collection target.
    pub fn single(slug: impl Into<String>) -> Self {
        Self::Single(slug.into())
    }

    /// Create a polymorphic target over an ordered list of collections.
    pub fn multi<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(slugs.into_iter().map(Into::into).collect())
    }

    /// Whether values of this target carry their own collection tag.
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

/// Kind of field that references documents in other collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationFieldKind {
    /// Reference to documents in arbitrary collections.
    Relationship,
    /// Reference to a file document in an upload-enabled collection.
    Upload,
}

/// A relationship or upload field within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationField {
    /// Key under which the value lives in a sibling document.
    pub name: String,
    /// Field kind.
    pub kind: RelationFieldKind,
    /// Target collection(s).
    pub relation_to: RelationTarget,
    /// Whether the value is an ordered list of references.
    pub has_many: bool,
    /// Per-field cap on population depth.
    pub max_depth: Option<u32>,
}

impl RelationField {
    /// Create a relationship field.
    pub fn relationship(name: impl Into<String>, relation_to: RelationTarget) -> Self {
        Self {
            name: name.into(),
            kind: RelationFieldKind::Relationship,
            relation_to,
            has_many: false,
            max_depth: None,
        }
    }

    /// Create an upload field.
    pub fn upload(name: impl Into<String>, relation_to: RelationTarget) -> Self {
        Self {
            name: name.into(),
            kind: RelationFieldKind::Upload,
            relation_to,
            has_many: false,
            max_depth: None,
        }
    }

    /// Mark the field as holding a list of references.
    pub fn with_has_many(mut self, has_many: bool) -> Self {
        self.has_many = has_many;
        self
    }

    /// Cap population depth for this field regardless of the request depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Whether the field kind allows list values. Upload fields hold a
    /// single reference; the sanitizer enforces this upstream, the engine
    /// still guards on it.
    pub fn supports_many(&self) -> bool {
        matches!(self.kind, RelationFieldKind::Relationship)
    }

    /// Whether values carry their own collection tag.
    pub fn is_polymorphic(&self) -> bool {
        self.relation_to.is_polymorphic()
    }

    /// Effective population depth for this field.
    ///
    /// The field-level `max_depth` wins when it is smaller than what the
    /// request asked for.
    pub fn effective_depth(&self, requested: u32) -> u32 {
        match self.max_depth {
            Some(max) if max < requested => max,
            _ => requested,
        }
    }
}
