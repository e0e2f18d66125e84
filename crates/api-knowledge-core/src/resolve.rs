//! Single-hop reference resolution.
//!
//! A schema slot is resolved by looking its reference up in
//! `components.schemas` exactly once. The looked-up node is returned as
//! stored: references nested inside it stay references, and a component
//! that is itself a reference is not followed. Resolution therefore
//! terminates on any document, including self-referential and mutually
//! referential schema graphs.
//!
//! The same policy applies to parameters, request bodies and responses that
//! point into their `components` sections (see [`resolve_component`]).

use serde::Serialize;
use serde_json::Value;

use crate::document::{NamedMap, Referable, SchemaNode, SchemaRef, SpecDocument};

/// A schema slot after resolution.
///
/// Serializes either as the inline schema itself or as the envelope
/// `{ "$ref": "...", "resolved": { ... } }`, where `resolved` is omitted
/// when the target could not be expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedSchema {
    Reference {
        #[serde(rename = "$ref")]
        pointer: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        resolved: Option<Value>,
    },
    Inline(Value),
}

impl ResolvedSchema {
    /// The schema body: the inline schema, or the expanded target of a
    /// reference when there is one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ResolvedSchema::Reference { resolved, .. } => resolved.as_ref(),
            ResolvedSchema::Inline(value) => Some(value),
        }
    }

    pub fn pointer(&self) -> Option<&str> {
        match self {
            ResolvedSchema::Reference { pointer, .. } => Some(pointer),
            ResolvedSchema::Inline(_) => None,
        }
    }
}

/// Resolve an optional schema slot. Absent slots stay absent.
pub fn resolve_schema(doc: &SpecDocument, node: Option<&SchemaNode>) -> Option<ResolvedSchema> {
    match node? {
        SchemaNode::Ref(reference) => Some(resolve_ref(doc, reference)),
        other => Some(ResolvedSchema::Inline(other.to_value())),
    }
}

/// Expand a reference by one lookup. Missing targets and targets that are
/// references themselves produce an envelope without `resolved`.
pub fn resolve_ref(doc: &SpecDocument, reference: &SchemaRef) -> ResolvedSchema {
    let resolved = match doc.components.schemas.get(reference.target_name()) {
        Some(SchemaNode::Ref(_)) | None => None,
        Some(target) => Some(target.to_value()),
    };
    ResolvedSchema::Reference {
        pointer: reference.pointer().to_string(),
        resolved,
    }
}

/// Resolve a parameter / request body / response slot against its
/// `components` section. `None` when the pointer does not name an entry.
pub fn resolve_component<'a, T>(
    components: &'a NamedMap<T>,
    prefix: &str,
    slot: &'a Referable<T>,
) -> Option<&'a T> {
    match slot {
        Referable::Item(item) => Some(item),
        Referable::Ref(pointer) => components.get(pointer.strip_prefix(prefix).unwrap_or(pointer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PARAMETER_REF_PREFIX;
    use serde_json::json;

    fn doc(value: Value) -> SpecDocument {
        SpecDocument::from_value(value).unwrap()
    }

    fn node(value: Value) -> SchemaNode {
        SchemaNode::from_value(&value).unwrap()
    }

    #[test]
    fn test_absent_stays_absent() {
        let d = doc(json!({}));
        assert_eq!(resolve_schema(&d, None), None);
    }

    #[test]
    fn test_inline_returned_as_is() {
        let d = doc(json!({ "components": { "schemas": { "Tag": { "type": "string" } } } }));
        let inline = json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Tag" }
        });
        let resolved = resolve_schema(&d, Some(&node(inline.clone()))).unwrap();
        // Nested references are not expanded.
        assert_eq!(serde_json::to_value(&resolved).unwrap(), inline);
    }

    #[test]
    fn test_ref_expands_one_level() {
        let d = doc(json!({
            "components": { "schemas": {
                "Item": { "type": "object", "properties": { "name": { "type": "string" } } }
            } }
        }));
        let resolved = resolve_schema(&d, Some(&node(json!({ "$ref": "#/components/schemas/Item" }))));
        assert_eq!(
            serde_json::to_value(resolved.unwrap()).unwrap(),
            json!({
                "$ref": "#/components/schemas/Item",
                "resolved": { "type": "object", "properties": { "name": { "type": "string" } } }
            })
        );
    }

    #[test]
    fn test_missing_target_has_no_resolved_field() {
        let d = doc(json!({}));
        let resolved = resolve_schema(&d, Some(&node(json!({ "$ref": "#/components/schemas/Ghost" })))).unwrap();
        assert_eq!(resolved.body(), None);
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({ "$ref": "#/components/schemas/Ghost" })
        );
    }

    #[test]
    fn test_self_referential_schema_terminates() {
        let d = doc(json!({
            "components": { "schemas": {
                "TreeNode": {
                    "type": "object",
                    "properties": {
                        "children": { "type": "array", "items": { "$ref": "#/components/schemas/TreeNode" } },
                        "parent": { "$ref": "#/components/schemas/TreeNode" }
                    }
                }
            } }
        }));
        let resolved = resolve_schema(&d, Some(&node(json!({ "$ref": "#/components/schemas/TreeNode" })))).unwrap();
        let body = resolved.body().unwrap();
        assert_eq!(
            body["properties"]["parent"],
            json!({ "$ref": "#/components/schemas/TreeNode" })
        );
    }

    #[test]
    fn test_ref_to_ref_is_not_followed() {
        let d = doc(json!({
            "components": { "schemas": {
                "A": { "$ref": "#/components/schemas/B" },
                "B": { "$ref": "#/components/schemas/A" }
            } }
        }));
        let resolved = resolve_schema(&d, Some(&node(json!({ "$ref": "#/components/schemas/A" })))).unwrap();
        assert_eq!(resolved.pointer(), Some("#/components/schemas/A"));
        assert_eq!(resolved.body(), None);
    }

    #[test]
    fn test_pointer_without_prefix_is_looked_up_verbatim() {
        let d = doc(json!({ "components": { "schemas": { "Item": { "type": "object" } } } }));
        let resolved = resolve_schema(&d, Some(&node(json!({ "$ref": "Item" })))).unwrap();
        assert_eq!(resolved.body(), Some(&json!({ "type": "object" })));
    }

    #[test]
    fn test_boolean_component_schema() {
        let d = doc(json!({ "components": { "schemas": { "Anything": true } } }));
        let direct = resolve_schema(&d, d.components.schemas.get("Anything")).unwrap();
        assert_eq!(serde_json::to_value(&direct).unwrap(), json!(true));

        let via_ref =
            resolve_schema(&d, Some(&node(json!({ "$ref": "#/components/schemas/Anything" })))).unwrap();
        assert_eq!(via_ref.body(), Some(&json!(true)));
    }

    #[test]
    fn test_component_slot_resolution() {
        let d = doc(json!({
            "components": { "parameters": { "Page": { "name": "page", "in": "query" } } }
        }));
        let hit: Referable<_> = Referable::Ref("#/components/parameters/Page".to_string());
        let miss: Referable<_> = Referable::Ref("#/components/parameters/Nope".to_string());
        let found = resolve_component(&d.components.parameters, PARAMETER_REF_PREFIX, &hit).unwrap();
        assert_eq!(found.name, "page");
        assert!(resolve_component(&d.components.parameters, PARAMETER_REF_PREFIX, &miss).is_none());
    }
}
