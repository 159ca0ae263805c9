//! Selector projection.
//!
//! A selector is the client's description of which result fields to keep,
//! recursively. On the wire it is an ordered array whose entries are either a
//! field name (copy the field verbatim) or a `[name, nested]` pair (recurse
//! into an object field, or into every element of an array field).

use crate::value::Object;
use serde_json::Value;

/// One entry of a [`Selector`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEntry {
    /// Keep the named field as-is.
    Field(String),
    /// Recurse into the named field with a nested selector.
    Nested(String, Selector),
}

/// An ordered, recursive projection of result fields.
///
/// Parsing is lenient: entries that are neither a string nor a
/// `[name, nested-array]` pair are skipped rather than rejected, matching the
/// reference behavior. Projection is pure and never mutates its input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    entries: Vec<SelectorEntry>,
}

impl Selector {
    /// Parses a selector from the wire-level array items.
    ///
    /// Malformed entries are silently dropped.
    #[must_use]
    pub fn from_array(items: &[Value]) -> Self {
        let entries = items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(SelectorEntry::Field(name.clone())),
                Value::Array(pair) => match (pair.first(), pair.get(1)) {
                    (Some(Value::String(name)), Some(Value::Array(nested))) => Some(
                        SelectorEntry::Nested(name.clone(), Self::from_array(nested)),
                    ),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        Self { entries }
    }

    /// Returns `true` if this selector keeps no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }

    /// Projects a result object down to the selected shape.
    ///
    /// - A field name copies the field verbatim when present; absent keys are
    ///   silently skipped.
    /// - A nested entry over an array field projects every object element and
    ///   keeps only elements whose projection is non-empty; the field itself
    ///   is dropped when no element survives.
    /// - A nested entry over an object field keeps the field only when the
    ///   projection is non-empty.
    /// - Any other field type is treated as absent.
    #[must_use]
    pub fn project(&self, result: &Object) -> Object {
        let mut projected = Object::new();
        for entry in &self.entries {
            match entry {
                SelectorEntry::Field(name) => {
                    if let Some(value) = result.get(name) {
                        projected.insert(name.clone(), value.clone());
                    }
                }
                SelectorEntry::Nested(name, nested) => match result.get(name) {
                    Some(Value::Array(elements)) => {
                        let kept: Vec<Value> = elements
                            .iter()
                            .filter_map(Value::as_object)
                            .map(|element| nested.project(element))
                            .filter(|projection| !projection.is_empty())
                            .map(Value::Object)
                            .collect();
                        if !kept.is_empty() {
                            projected.insert(name.clone(), Value::Array(kept));
                        }
                    }
                    Some(Value::Object(object)) => {
                        let projection = nested.project(object);
                        if !projection.is_empty() {
                            projected.insert(name.clone(), Value::Object(projection));
                        }
                    }
                    _ => {}
                },
            }
        }
        projected
    }

    /// Serializes back to the wire shape, for echoing into the request
    /// context.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|entry| match entry {
                    SelectorEntry::Field(name) => Value::String(name.clone()),
                    SelectorEntry::Nested(name, nested) => {
                        Value::Array(vec![Value::String(name.clone()), nested.to_value()])
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn selector(value: Value) -> Selector {
        match value {
            Value::Array(items) => Selector::from_array(&items),
            other => panic!("expected array, got {other}"),
        }
    }

    #[test]
    fn test_projects_nested_object_fields() {
        let result = object(json!({ "a": 1, "b": { "c": 2, "d": 3 }, "e": 4 }));
        let sel = selector(json!(["a", ["b", ["c"]]]));
        let projected = sel.project(&result);
        assert_eq!(Value::Object(projected), json!({ "a": 1, "b": { "c": 2 } }));
    }

    #[test]
    fn test_projects_array_elements_and_drops_empty_projections() {
        let result = object(json!({ "items": [ { "x": 1, "y": 2 }, { "y": 3 } ] }));
        let sel = selector(json!([["items", ["x"]]]));
        let projected = sel.project(&result);
        assert_eq!(Value::Object(projected), json!({ "items": [ { "x": 1 } ] }));
    }

    #[test]
    fn test_drops_array_field_when_every_projection_is_empty() {
        let result = object(json!({ "items": [ { "y": 1 }, { "y": 2 } ] }));
        let sel = selector(json!([["items", ["x"]]]));
        assert!(sel.project(&result).is_empty());
    }

    #[test]
    fn test_absent_keys_are_silently_skipped() {
        let result = object(json!({ "a": 1 }));
        let sel = selector(json!(["a", "missing"]));
        assert_eq!(Value::Object(sel.project(&result)), json!({ "a": 1 }));
    }

    #[test]
    fn test_nested_entry_over_scalar_is_treated_as_absent() {
        let result = object(json!({ "a": 42 }));
        let sel = selector(json!([["a", ["b"]]]));
        assert!(sel.project(&result).is_empty());
    }

    #[test]
    fn test_null_valued_field_is_copied_verbatim() {
        let result = object(json!({ "a": null }));
        let sel = selector(json!(["a"]));
        assert_eq!(Value::Object(sel.project(&result)), json!({ "a": null }));
    }

    #[test]
    fn test_projection_does_not_mutate_input() {
        let result = object(json!({ "a": 1, "b": { "c": 2 } }));
        let before = result.clone();
        let sel = selector(json!([["b", ["c"]]]));
        let _ = sel.project(&result);
        assert_eq!(result, before);
    }

    #[test]
    fn test_malformed_entries_are_skipped_on_parse() {
        let sel = selector(json!(["a", 17, ["b"], [3, ["c"]], ["d", ["e"]]]));
        assert_eq!(
            sel.entries(),
            &[
                SelectorEntry::Field("a".to_owned()),
                SelectorEntry::Nested("d".to_owned(), selector(json!(["e"]))),
            ]
        );
    }

    #[test]
    fn test_round_trips_to_wire_value() {
        let wire = json!(["a", ["b", ["c", ["d", ["e"]]]]]);
        let sel = selector(wire.clone());
        assert_eq!(sel.to_value(), wire);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Projecting an already-projected object changes nothing.
        #[test]
        fn projection_is_idempotent(
            keys in proptest::collection::vec("[a-z]{1,4}", 0..8),
            selected in proptest::collection::vec("[a-z]{1,4}", 0..8),
        ) {
            let mut object = Object::new();
            for (i, key) in keys.iter().enumerate() {
                object.insert(key.clone(), Value::from(i as i64));
            }
            let items: Vec<Value> = selected.into_iter().map(Value::String).collect();
            let sel = Selector::from_array(&items);

            let once = sel.project(&object);
            let twice = sel.project(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
