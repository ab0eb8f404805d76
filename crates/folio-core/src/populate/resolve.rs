//! Resolution of a single reference value.

use serde_json::{Map, Value};

use super::cache::LoadCache;
use super::context::RequestContext;
use super::key::{DocId, LoadKey};
use crate::error::Error;
use crate::schema::{CollectionRegistry, RelationField, RelationTarget};

/// One reference value extracted from a field slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RefValue {
    /// Plain id for a single-collection relation.
    Id(DocId),
    /// Polymorphic tuple: collection tag plus id.
    Poly { relation_to: String, id: DocId },
}

impl RefValue {
    /// Extract a reference from a raw slot value.
    ///
    /// Polymorphic fields expect `{"relationTo": ..., "value": ...}`
    /// tuples; single-collection fields expect a bare id. A value that
    /// does not match the expected shape (including an already-populated
    /// document) yields `None`.
    pub(crate) fn extract(field: &RelationField, raw: &Value) -> Option<Self> {
        if field.is_polymorphic() {
            let tuple = raw.as_object()?;
            let relation_to = tuple.get("relationTo")?.as_str()?.to_string();
            let id = DocId::from_value(tuple.get("value")?)?;
            Some(Self::Poly { relation_to, id })
        } else {
            DocId::from_value(raw).map(Self::Id)
        }
    }
}

/// Whether a raw value has the polymorphic relation tuple shape.
pub(crate) fn is_relation_tuple(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key("relationTo") && o.contains_key("value"))
}

/// Resolve one reference value.
///
/// Returns `Ok(None)` when the slot must stay untouched: the target
/// collection is unknown to the registry, or the slot does not hold a
/// reference in the first place. Otherwise the returned value replaces
/// the slot contents.
///
/// With `depth > 0 && current_depth <= depth` the referenced document is
/// fetched through the load cache; a missing or access-denied document
/// falls back to the bare id, which stays visible regardless of access.
/// With the depth budget exhausted the normalized id is returned directly.
pub(crate) async fn resolve_reference(
    ctx: &RequestContext,
    registry: &CollectionRegistry,
    cache: &LoadCache,
    field: &RelationField,
    raw: &Value,
    depth: u32,
    current_depth: u32,
) -> Result<Option<Value>, Error> {
    let Some(reference) = RefValue::extract(field, raw) else {
        return Ok(None);
    };

    let (slug, id) = match &reference {
        RefValue::Id(id) => {
            let RelationTarget::Single(slug) = &field.relation_to else {
                return Ok(None);
            };
            (slug.as_str(), id)
        }
        RefValue::Poly { relation_to, id } => (relation_to.as_str(), id),
    };

    // Unknown collections are tolerated: the id passes through.
    if registry.lookup(slug).is_none() {
        return Ok(None);
    }

    let mut resolved = id.to_value();
    if depth > 0 && current_depth <= depth {
        let key = LoadKey {
            transaction_id: ctx.transaction_id.clone(),
            collection: slug.to_string(),
            id: id.clone(),
            depth,
            current_depth: current_depth + 1,
            locale: ctx.locale_key().map(str::to_string),
            fallback_locale: ctx.fallback_locale.clone(),
            override_access: ctx.override_access,
            show_hidden_fields: ctx.show_hidden_fields,
        };
        match cache.get(&key).await? {
            Some(document) if !document.is_null() => resolved = document,
            // ids are visible regardless of access controls
            _ => {}
        }
    }

    Ok(Some(match &reference {
        RefValue::Poly { relation_to, .. } => {
            let mut tuple = Map::new();
            tuple.insert("relationTo".to_string(), Value::String(relation_to.clone()));
            tuple.insert("value".to_string(), resolved);
            Value::Object(tuple)
        }
        RefValue::Id(_) => resolved,
    }))
}
