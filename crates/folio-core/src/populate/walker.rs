//! Locating reference values inside a sibling document.
//!
//! The walker classifies a field value into one of four shapes, collects
//! one population task per scalar occurrence, and writes resolved values
//! back to the exact position they were read from. Task addresses are
//! disjoint by construction, so the writes never overlap.

use serde_json::{Map, Value};

use super::resolve::is_relation_tuple;
use crate::schema::RelationField;

/// The four shapes a relation field value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldShape {
    /// A single reference.
    Scalar,
    /// An ordered list of references.
    List,
    /// Locale code mapped to a reference.
    LocalizedScalar,
    /// Locale code mapped to a list of references.
    LocalizedList,
}

impl FieldShape {
    /// Classify a field value. Returns `None` when the slot holds nothing
    /// the engine can populate.
    ///
    /// A polymorphic relation tuple is an object too; it must not be
    /// mistaken for a locale map under an all-locales read.
    pub(crate) fn detect(field: &RelationField, value: &Value, all_locales: bool) -> Option<Self> {
        if field.has_many && field.supports_many() {
            if all_locales && value.is_object() {
                return Some(Self::LocalizedList);
            }
            if value.is_array() {
                return Some(Self::List);
            }
            return None;
        }
        if all_locales && value.is_object() && !is_relation_tuple(value) {
            return Some(Self::LocalizedScalar);
        }
        if is_truthy(value) {
            return Some(Self::Scalar);
        }
        None
    }
}

/// JavaScript-style falsiness; falsy slots never produce tasks so nulls
/// survive population untouched.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Address of exactly one writable slot under a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WriteSlot {
    /// Locale key, for locale-mapped shapes.
    pub locale: Option<String>,
    /// List index, for list shapes.
    pub index: Option<usize>,
}

impl WriteSlot {
    fn scalar() -> Self {
        Self {
            locale: None,
            index: None,
        }
    }
}

/// One unit of population work: a reference value and the slot it came
/// from.
#[derive(Debug, Clone)]
pub(crate) struct PopulationTask {
    /// Where to write the resolved value.
    pub slot: WriteSlot,
    /// The raw reference value occupying the slot.
    pub raw: Value,
}

/// Collect a task for every reference occurrence under `field` in `value`.
pub(crate) fn collect_tasks(
    field: &RelationField,
    value: &Value,
    all_locales: bool,
) -> Vec<PopulationTask> {
    let mut tasks = Vec::new();
    match FieldShape::detect(field, value, all_locales) {
        None => {}
        Some(FieldShape::Scalar) => tasks.push(PopulationTask {
            slot: WriteSlot::scalar(),
            raw: value.clone(),
        }),
        Some(FieldShape::List) => {
            let Some(items) = value.as_array() else {
                return tasks;
            };
            for (index, item) in items.iter().enumerate() {
                if is_truthy(item) {
                    tasks.push(PopulationTask {
                        slot: WriteSlot {
                            locale: None,
                            index: Some(index),
                        },
                        raw: item.clone(),
                    });
                }
            }
        }
        Some(FieldShape::LocalizedScalar) => {
            let Some(locales) = value.as_object() else {
                return tasks;
            };
            for (locale, item) in locales {
                if is_truthy(item) {
                    tasks.push(PopulationTask {
                        slot: WriteSlot {
                            locale: Some(locale.clone()),
                            index: None,
                        },
                        raw: item.clone(),
                    });
                }
            }
        }
        Some(FieldShape::LocalizedList) => {
            let Some(locales) = value.as_object() else {
                return tasks;
            };
            for (locale, items) in locales {
                // Non-list locale entries are skipped, not an error.
                let Some(items) = items.as_array() else {
                    continue;
                };
                for (index, item) in items.iter().enumerate() {
                    if is_truthy(item) {
                        tasks.push(PopulationTask {
                            slot: WriteSlot {
                                locale: Some(locale.clone()),
                                index: Some(index),
                            },
                            raw: item.clone(),
                        });
                    }
                }
            }
        }
    }
    tasks
}

/// Write a resolved value back into the slot it was read from.
///
/// A slot that no longer matches its recorded address is left alone; that
/// can only happen if outside code reshaped the document mid-population.
pub(crate) fn apply_write(
    sibling: &mut Map<String, Value>,
    field_name: &str,
    slot: &WriteSlot,
    value: Value,
) {
    let Some(mut target) = sibling.get_mut(field_name) else {
        return;
    };
    if let Some(locale) = &slot.locale {
        match target.as_object_mut().and_then(|m| m.get_mut(locale)) {
            Some(inner) => target = inner,
            None => return,
        }
    }
    if let Some(index) = slot.index {
        match target.as_array_mut().and_then(|a| a.get_mut(index)) {
            Some(inner) => target = inner,
            None => return,
        }
    }
    *target = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::schema::RelationTarget;

    fn scalar_field() -> RelationField {
        RelationField::relationship("author", RelationTarget::single("authors"))
    }

    fn list_field() -> RelationField {
        RelationField::relationship("tags", RelationTarget::single("tags")).with_has_many(true)
    }

    fn poly_field() -> RelationField {
        RelationField::relationship("related", RelationTarget::multi(["posts", "pages"]))
    }

    #[test]
    fn test_detect_scalar() {
        assert_eq!(
            FieldShape::detect(&scalar_field(), &json!("42"), false),
            Some(FieldShape::Scalar)
        );
    }

    #[test]
    fn test_detect_list() {
        assert_eq!(
            FieldShape::detect(&list_field(), &json!(["1", "2"]), false),
            Some(FieldShape::List)
        );
        // hasMany stays a list even under an all-locales read when the
        // field itself is not localized.
        assert_eq!(
            FieldShape::detect(&list_field(), &json!(["1", "2"]), true),
            Some(FieldShape::List)
        );
    }

    #[test]
    fn test_detect_localized_scalar() {
        let value = json!({ "en": "1", "de": "2" });
        assert_eq!(
            FieldShape::detect(&scalar_field(), &value, true),
            Some(FieldShape::LocalizedScalar)
        );
        // Without the all-locales request an object is not a locale map.
        assert_eq!(FieldShape::detect(&scalar_field(), &value, false), Some(FieldShape::Scalar));
    }

    #[test]
    fn test_detect_localized_list() {
        let value = json!({ "en": ["1", "2"], "de": ["3"] });
        assert_eq!(
            FieldShape::detect(&list_field(), &value, true),
            Some(FieldShape::LocalizedList)
        );
    }

    #[test]
    fn test_relation_tuple_is_not_a_locale_map() {
        let value = json!({ "relationTo": "posts", "value": "7" });
        assert_eq!(
            FieldShape::detect(&poly_field(), &value, true),
            Some(FieldShape::Scalar)
        );
    }

    #[test]
    fn test_null_scalar_is_skipped() {
        assert_eq!(FieldShape::detect(&scalar_field(), &json!(null), false), None);
        assert_eq!(FieldShape::detect(&scalar_field(), &json!(""), false), None);
    }

    #[test]
    fn test_collect_list_skips_falsy_entries() {
        let tasks = collect_tasks(&list_field(), &json!(["1", null, "3"]), false);

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].slot.index, Some(0));
        assert_eq!(tasks[1].slot.index, Some(2));
    }

    #[test]
    fn test_collect_localized_list() {
        let value = json!({ "en": ["1", "2"], "de": ["3"], "fr": null });
        let tasks = collect_tasks(&list_field(), &value, true);

        assert_eq!(tasks.len(), 3);
        let mut addresses: Vec<(Option<&str>, Option<usize>)> = tasks
            .iter()
            .map(|t| (t.slot.locale.as_deref(), t.slot.index))
            .collect();
        addresses.sort();
        assert_eq!(
            addresses,
            vec![
                (Some("de"), Some(0)),
                (Some("en"), Some(0)),
                (Some("en"), Some(1)),
            ]
        );
    }

    #[test]
    fn test_collect_localized_scalar_skips_falsy_locales() {
        let value = json!({ "en": "1", "de": null });
        let tasks = collect_tasks(&scalar_field(), &value, true);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].slot.locale.as_deref(), Some("en"));
    }

    #[test]
    fn test_apply_write_scalar() {
        let mut doc = json!({ "author": "42" });
        let sibling = doc.as_object_mut().unwrap();

        apply_write(sibling, "author", &WriteSlot::scalar(), json!({ "id": "42" }));

        assert_eq!(doc, json!({ "author": { "id": "42" } }));
    }

    #[test]
    fn test_apply_write_list_index() {
        let mut doc = json!({ "tags": ["1", "2"] });
        let sibling = doc.as_object_mut().unwrap();

        let slot = WriteSlot {
            locale: None,
            index: Some(1),
        };
        apply_write(sibling, "tags", &slot, json!({ "id": "2" }));

        assert_eq!(doc, json!({ "tags": ["1", { "id": "2" }] }));
    }

    #[test]
    fn test_apply_write_locale_and_index() {
        let mut doc = json!({ "tags": { "en": ["1", "2"], "de": ["3"] } });
        let sibling = doc.as_object_mut().unwrap();

        let slot = WriteSlot {
            locale: Some("en".to_string()),
            index: Some(0),
        };
        apply_write(sibling, "tags", &slot, json!({ "id": "1" }));

        assert_eq!(
            doc,
            json!({ "tags": { "en": [{ "id": "1" }, "2"], "de": ["3"] } })
        );
    }

    #[test]
    fn test_apply_write_missing_address_is_a_noop() {
        let mut doc = json!({ "tags": ["1"] });
        let sibling = doc.as_object_mut().unwrap();

        let slot = WriteSlot {
            locale: None,
            index: Some(5),
        };
        apply_write(sibling, "tags", &slot, json!("x"));

        assert_eq!(doc, json!({ "tags": ["1"] }));
    }
}
