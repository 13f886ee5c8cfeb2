//! Sparse fieldset echo.
//!
//! When the caller already narrowed the response with `fields[<type>]`, the
//! row projector's fixed column list would either drop fields the server sent
//! or invent blank ones it did not. [`echo`] instead flattens each resource
//! into exactly the keys that came back.

use serde_json::{Map, Value};

use super::{Document, PrimaryData, RelationshipSlot, Resource};

/// Echoes a document as flat JSON objects.
///
/// Each resource becomes `{id, type, <attribute keys>, <relationship keys>}`.
/// Relationship values are `null`, `{type, id}` or an array of those; a
/// `data` member of any other shape is echoed as sent.
/// A single document echoes as an object and a collection as an array. When
/// `included` is non-empty the result is `{"data": ..., "included": [...]}`.
///
/// The identity keys are never overwritten. If an attribute and a
/// relationship share a name, the attribute is kept.
///
/// # Example
///
/// ```rust
/// use hauler::{Document, document::sparse};
///
/// let doc = Document::parse(br#"{"data": {"id": "1", "type": "t", "attributes": {"a": 1, "b": null}}}"#).unwrap();
/// let echoed = sparse::echo(&doc);
/// assert_eq!(echoed, serde_json::json!({"id": "1", "type": "t", "a": 1, "b": null}));
/// ```
pub fn echo(document: &Document) -> Value {
    let data = match document.data() {
        PrimaryData::Single(resource) => Value::Object(flatten(resource)),
        PrimaryData::Collection(resources) => {
            Value::Array(resources.iter().map(|r| Value::Object(flatten(r))).collect())
        }
    };

    if document.included().is_empty() {
        return data;
    }

    let included = document
        .included()
        .iter()
        .map(|r| Value::Object(flatten(r)))
        .collect();

    let mut wrapped = Map::new();
    wrapped.insert("data".to_owned(), data);
    wrapped.insert("included".to_owned(), Value::Array(included));
    Value::Object(wrapped)
}

/// Flattens one resource into its echoed object.
pub fn flatten(resource: &Resource) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("id".to_owned(), Value::String(resource.id().to_owned()));
    object.insert(
        "type".to_owned(),
        Value::String(resource.resource_type().to_owned()),
    );

    for (key, value) in resource.attributes() {
        if is_identity(key) {
            continue;
        }
        object.insert(key.clone(), value.to_json());
    }

    for (key, raw) in resource.relationships() {
        if is_identity(key) || object.contains_key(key) {
            continue;
        }
        let value = match raw.decode() {
            RelationshipSlot::None if !raw.data().is_null() => raw.data().clone(),
            slot => slot.to_json(),
        };
        object.insert(key.clone(), value);
    }

    object
}

fn is_identity(key: &str) -> bool {
    key == "id" || key == "type"
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::*;

    fn keys(value: &Value) -> BTreeSet<&str> {
        value
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_exact_key_set() {
        let doc =
            Document::parse(br#"{"data": {"id": "1", "type": "t", "attributes": {"a": "x", "b": 2}}}"#)
                .unwrap();
        let echoed = echo(&doc);
        assert_eq!(keys(&echoed), BTreeSet::from(["id", "type", "a", "b"]));
    }

    #[test]
    fn test_relationship_shapes() {
        let doc = Document::parse(
            br#"{"data": {"id": "1", "type": "t", "relationships": {
                "none": {"data": null},
                "one": {"data": {"type": "u", "id": "2"}},
                "many": {"data": [{"type": "u", "id": "3"}, {"type": "u", "id": "4"}]},
                "odd": {"data": "u/5"},
                "numeric": {"data": {"type": "u", "id": 5}},
                "linked": {"links": {"related": "/x"}},
                "bare": null
            }}}"#,
        )
        .unwrap();
        let echoed = echo(&doc);
        assert_eq!(
            echoed,
            json!({
                "id": "1",
                "type": "t",
                "none": null,
                "one": {"type": "u", "id": "2"},
                "many": [{"type": "u", "id": "3"}, {"type": "u", "id": "4"}],
                "odd": "u/5",
                "numeric": {"type": "u", "id": 5},
                "linked": null,
                "bare": null
            })
        );
    }

    #[test]
    fn test_collection_is_array() {
        let doc = Document::parse(br#"{"data": [{"id": "1", "type": "t"}, {"id": "2", "type": "t"}]}"#)
            .unwrap();
        let echoed = echo(&doc);
        assert_eq!(echoed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_included_wraps_output() {
        let doc = Document::parse(
            br#"{"data": [{"id": "1", "type": "t"}], "included": [{"id": "9", "type": "u", "attributes": {"name": "n"}}]}"#,
        )
        .unwrap();
        let echoed = echo(&doc);
        assert_eq!(
            echoed,
            json!({
                "data": [{"id": "1", "type": "t"}],
                "included": [{"id": "9", "type": "u", "name": "n"}]
            })
        );
    }

    #[test]
    fn test_identity_keys_never_overwritten() {
        let doc = Document::parse(
            br#"{"data": {"id": "1", "type": "t",
                "attributes": {"id": "spoof", "name": "attr"},
                "relationships": {"type": {"data": null}, "name": {"data": null}}}}"#,
        )
        .unwrap();
        let echoed = echo(&doc);
        assert_eq!(echoed, json!({"id": "1", "type": "t", "name": "attr"}));
    }

    #[test]
    fn test_numbers_echo_exactly() {
        let doc = Document::parse(br#"{"data": {"id": "1", "type": "t", "attributes": {"n": 10, "f": 1.5}}}"#)
            .unwrap();
        let text = serde_json::to_string(&echo(&doc)).unwrap();
        assert!(text.contains(r#""n":10"#));
        assert!(text.contains(r#""f":1.5"#));
    }
}
