//! Normalized view of an OpenAPI-style API description document.
//!
//! [`SpecDocument::from_value`] walks the loosely-typed JSON tree once and
//! produces owned, typed records. The walk is permissive: a missing or
//! mistyped section becomes an empty collection, and entries that cannot be
//! interpreted (a parameter without a name, a non-object path item) are
//! dropped rather than failing the whole document. Only a root that is not a
//! JSON object is rejected.
//!
//! Schema slots keep the raw JSON of inline schemas so they can be returned
//! unchanged; reference nodes are split out into [`SchemaRef`] so callers
//! must decide explicitly how far to follow them (see [`crate::resolve`]).

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Pointer prefix for schemas declared under `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
/// Pointer prefix for parameters declared under `components.parameters`.
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
/// Pointer prefix for request bodies declared under `components.requestBodies`.
pub const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";
/// Pointer prefix for responses declared under `components.responses`.
pub const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

const REF_KEY: &str = "$ref";

/// The document root could not be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

// ═══════════════════════════════════════════════════════════════════════
// HTTP methods
// ═══════════════════════════════════════════════════════════════════════

/// The method slots an operation can occupy on a path.
///
/// [`HttpMethod::ALL`] is also the order in which operations of one path
/// are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Key under which the operation appears in a path item.
    pub fn key(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Case-insensitive parse of a method token. Unknown tokens (`HEAD`,
    /// `OPTIONS`, ...) yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Ordered name → item map
// ═══════════════════════════════════════════════════════════════════════

/// Name-keyed entries in document declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> NamedMap<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, item)| item)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, item)| (key.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> FromIterator<(String, T)> for NamedMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Schemas
// ═══════════════════════════════════════════════════════════════════════

/// A schema slot: either a reference to a named component schema or an
/// inline schema object.
///
/// The variant is decided by the presence of a string `$ref` member.
/// Named component schemas may also be non-object values, such as the
/// boolean schemas `true` / `false`; those are kept verbatim as
/// [`SchemaNode::Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Ref(SchemaRef),
    Inline(Schema),
    Literal(Value),
}

impl SchemaNode {
    /// Interpret a JSON value as a schema slot. Non-objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        match map.get(REF_KEY).and_then(Value::as_str) {
            Some(pointer) => Some(SchemaNode::Ref(SchemaRef::new(pointer))),
            None => Some(SchemaNode::Inline(Schema(map.clone()))),
        }
    }

    /// Interpret a `components.schemas` entry. Every entry is kept; values
    /// that are not objects become [`SchemaNode::Literal`].
    pub fn from_component(value: &Value) -> Self {
        Self::from_value(value).unwrap_or_else(|| SchemaNode::Literal(value.clone()))
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, SchemaNode::Ref(_))
    }

    /// The node as it appeared in the document.
    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Ref(r) => r.to_value(),
            SchemaNode::Inline(schema) => schema.to_value(),
            SchemaNode::Literal(value) => value.clone(),
        }
    }
}

/// A by-name pointer into `components.schemas`.
///
/// Holds only the pointer text; the target is found by lookup each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRef {
    pointer: String,
}

impl SchemaRef {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Component name the pointer designates. Pointers without the
    /// `#/components/schemas/` prefix are taken verbatim.
    pub fn target_name(&self) -> &str {
        self.pointer
            .strip_prefix(SCHEMA_REF_PREFIX)
            .unwrap_or(&self.pointer)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(REF_KEY.to_string(), Value::String(self.pointer.clone()));
        Value::Object(map)
    }
}

/// An inline schema object, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

impl Schema {
    pub fn schema_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn format(&self) -> Option<&str> {
        self.0.get("format").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn example(&self) -> Option<&Value> {
        self.0.get("example")
    }

    pub fn enum_values(&self) -> &[Value] {
        self.0
            .get("enum")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names listed in `required`.
    pub fn required(&self) -> Vec<&str> {
        self.0
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Property slots in declaration order. Properties whose value is not
    /// an object are skipped.
    pub fn properties(&self) -> Vec<(&str, SchemaNode)> {
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .filter_map(|(name, value)| {
                        SchemaNode::from_value(value).map(|node| (name.as_str(), node))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Element schema of an array schema.
    pub fn items(&self) -> Option<SchemaNode> {
        self.0.get("items").and_then(SchemaNode::from_value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════════════════

/// A slot that either holds an item or points at a named component.
#[derive(Debug, Clone, PartialEq)]
pub enum Referable<T> {
    Ref(String),
    Item(T),
}

impl<T> Referable<T> {
    fn parse(value: &Value, parse_item: impl Fn(&Map<String, Value>) -> Option<T>) -> Option<Self> {
        let map = value.as_object()?;
        match map.get(REF_KEY).and_then(Value::as_str) {
            Some(pointer) => Some(Referable::Ref(pointer.to_string())),
            None => parse_item(map).map(Referable::Item),
        }
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<SchemaNode>,
}

impl Parameter {
    fn parse(map: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            name: str_field(map, "name")?,
            location: map
                .get("in")
                .and_then(Value::as_str)
                .and_then(ParameterLocation::parse)?,
            required: bool_field(map, "required"),
            description: str_field(map, "description"),
            schema: map.get("schema").and_then(SchemaNode::from_value),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaType {
    pub schema: Option<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestBody {
    pub required: bool,
    pub description: Option<String>,
    /// Media types in declaration order.
    pub content: NamedMap<MediaType>,
}

impl RequestBody {
    fn parse(map: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            required: bool_field(map, "required"),
            description: str_field(map, "description"),
            content: parse_content(map),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    pub description: String,
    pub content: NamedMap<MediaType>,
}

impl Response {
    fn parse(map: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            description: str_field(map, "description").unwrap_or_default(),
            content: parse_content(map),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<Referable<Parameter>>,
    pub request_body: Option<Referable<RequestBody>>,
    /// Status code → response, in declaration order.
    pub responses: Vec<(String, Referable<Response>)>,
}

impl Operation {
    fn parse(map: &Map<String, Value>) -> Self {
        Self {
            operation_id: str_field(map, "operationId"),
            summary: str_field(map, "summary"),
            description: str_field(map, "description"),
            tags: string_list(map, "tags"),
            parameters: parse_parameters(map),
            request_body: map
                .get("requestBody")
                .and_then(|v| Referable::parse(v, RequestBody::parse)),
            responses: object(map, "responses")
                .map(|responses| {
                    responses
                        .iter()
                        .filter_map(|(status, v)| {
                            Referable::parse(v, Response::parse).map(|r| (status.clone(), r))
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The operations registered on one path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    /// Present operations in [`HttpMethod::ALL`] order.
    pub operations: Vec<(HttpMethod, Operation)>,
    /// Parameters shared by every operation on the path.
    pub parameters: Vec<Referable<Parameter>>,
}

impl PathItem {
    fn parse(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let operations = HttpMethod::ALL
            .into_iter()
            .filter_map(|method| {
                map.get(method.key())
                    .and_then(Value::as_object)
                    .map(|op| (method, Operation::parse(op)))
            })
            .collect();
        Self {
            operations,
            parameters: parse_parameters(map),
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Document root
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reusable definitions under `components`. Entries that are themselves
/// references are not kept, so following a component reference is always a
/// single lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    pub schemas: NamedMap<SchemaNode>,
    pub parameters: NamedMap<Parameter>,
    pub request_bodies: NamedMap<RequestBody>,
    pub responses: NamedMap<Response>,
}

impl Components {
    fn parse(map: &Map<String, Value>) -> Self {
        Self {
            schemas: object(map, "schemas")
                .map(|schemas| {
                    schemas
                        .iter()
                        .map(|(name, v)| (name.clone(), SchemaNode::from_component(v)))
                        .collect()
                })
                .unwrap_or_default(),
            parameters: parse_components(map, "parameters", Parameter::parse),
            request_bodies: parse_components(map, "requestBodies", RequestBody::parse),
            responses: parse_components(map, "responses", Response::parse),
        }
    }
}

/// The parsed API description document.
///
/// Immutable once built; a newer generation of the document replaces it as
/// a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDocument {
    pub openapi: Option<String>,
    pub info: ApiInfo,
    pub tags: Vec<TagInfo>,
    /// Path → path item, in declaration order.
    pub paths: Vec<(String, PathItem)>,
    pub components: Components,
}

impl SpecDocument {
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let root = match value {
            Value::Object(root) => root,
            other => return Err(DocumentError::NotAnObject(json_kind(&other))),
        };

        let info = object(&root, "info")
            .map(|info| ApiInfo {
                title: str_field(info, "title").unwrap_or_default(),
                version: str_field(info, "version").unwrap_or_default(),
                description: str_field(info, "description"),
            })
            .unwrap_or_default();

        let tags = root
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_object)
                    .filter_map(|tag| {
                        Some(TagInfo {
                            name: str_field(tag, "name")?,
                            description: str_field(tag, "description"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let paths = object(&root, "paths")
            .map(|paths| {
                paths
                    .iter()
                    .map(|(path, item)| (path.clone(), PathItem::parse(item)))
                    .collect()
            })
            .unwrap_or_default();

        let components = object(&root, "components")
            .map(Components::parse)
            .unwrap_or_default();

        Ok(Self {
            openapi: str_field(&root, "openapi").or_else(|| str_field(&root, "swagger")),
            info,
            tags,
            paths,
            components,
        })
    }

    /// Exact, verbatim path lookup.
    pub fn path(&self, path: &str) -> Option<&PathItem> {
        self.paths
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, item)| item)
    }

    /// Number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|(_, item)| item.operations.len()).sum()
    }
}

// ── Parsing helpers ──────────────────────────────────────────────────────

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn bool_field(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_parameters(map: &Map<String, Value>) -> Vec<Referable<Parameter>> {
    map.get("parameters")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| Referable::parse(p, Parameter::parse))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_content(map: &Map<String, Value>) -> NamedMap<MediaType> {
    object(map, "content")
        .map(|content| {
            content
                .iter()
                .map(|(media_type, v)| {
                    let schema = v
                        .as_object()
                        .and_then(|m| m.get("schema"))
                        .and_then(SchemaNode::from_value);
                    (media_type.clone(), MediaType { schema })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_components<T>(
    map: &Map<String, Value>,
    key: &str,
    parse_item: impl Fn(&Map<String, Value>) -> Option<T>,
) -> NamedMap<T> {
    object(map, key)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(name, v)| {
                    let item = v.as_object().filter(|m| !m.contains_key(REF_KEY))?;
                    parse_item(item).map(|parsed| (name.clone(), parsed))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object_root() {
        let err = SpecDocument::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err, DocumentError::NotAnObject("an array"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let doc = SpecDocument::from_value(json!({ "openapi": "3.0.0" })).unwrap();
        assert!(doc.paths.is_empty());
        assert!(doc.components.schemas.is_empty());
        assert!(doc.tags.is_empty());
        assert_eq!(doc.openapi.as_deref(), Some("3.0.0"));
        assert_eq!(doc.info.title, "");
    }

    #[test]
    fn test_mistyped_sections_are_empty() {
        let doc = SpecDocument::from_value(json!({
            "paths": "nope",
            "components": { "schemas": [1, 2, 3] }
        }))
        .unwrap();
        assert!(doc.paths.is_empty());
        assert!(doc.components.schemas.is_empty());
    }

    #[test]
    fn test_paths_keep_declaration_order() {
        let doc = SpecDocument::from_value(json!({
            "paths": {
                "/zeta": { "get": {} },
                "/alpha": { "get": {} },
                "/mid": { "get": {} }
            }
        }))
        .unwrap();
        let order: Vec<&str> = doc.paths.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["/zeta", "/alpha", "/mid"]);
    }

    #[test]
    fn test_operations_follow_fixed_method_order() {
        let doc = SpecDocument::from_value(json!({
            "paths": {
                "/items": {
                    "delete": {}, "get": {}, "patch": {}, "head": {}, "post": {}
                }
            }
        }))
        .unwrap();
        let methods: Vec<HttpMethod> = doc.paths[0].1.operations.iter().map(|(m, _)| *m).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Patch, HttpMethod::Delete]
        );
    }

    #[test]
    fn test_schema_node_discriminates_on_ref() {
        let node = SchemaNode::from_value(&json!({ "$ref": "#/components/schemas/Item" })).unwrap();
        match node {
            SchemaNode::Ref(r) => assert_eq!(r.target_name(), "Item"),
            _ => panic!("expected reference"),
        }

        // A non-string $ref is not a reference.
        let node = SchemaNode::from_value(&json!({ "$ref": 7, "type": "string" })).unwrap();
        assert!(!node.is_ref());

        assert!(SchemaNode::from_value(&json!("string")).is_none());
    }

    #[test]
    fn test_schema_accessors() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "example": "Widget" },
                "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } },
                "broken": 42
            }
        }))
        .unwrap();
        let SchemaNode::Inline(schema) = node else {
            panic!("expected inline schema");
        };
        assert_eq!(schema.schema_type(), Some("object"));
        assert_eq!(schema.required(), vec!["name"]);

        let props = schema.properties();
        let names: Vec<&str> = props.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["name", "tags"]);

        let SchemaNode::Inline(tags) = &props[1].1 else {
            panic!("expected inline array schema");
        };
        assert!(tags.items().unwrap().is_ref());
    }

    #[test]
    fn test_parameters_without_name_or_location_are_dropped() {
        let doc = SpecDocument::from_value(json!({
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [
                            { "name": "limit", "in": "query" },
                            { "in": "query" },
                            { "name": "x", "in": "body" },
                            { "$ref": "#/components/parameters/Page" }
                        ]
                    }
                }
            }
        }))
        .unwrap();
        let op = doc.paths[0].1.operation(HttpMethod::Get).unwrap();
        assert_eq!(op.parameters.len(), 2);
        assert!(matches!(&op.parameters[0], Referable::Item(p) if p.name == "limit" && !p.required));
        assert!(matches!(&op.parameters[1], Referable::Ref(r) if r == "#/components/parameters/Page"));
    }

    #[test]
    fn test_component_entries_that_are_refs_are_not_kept() {
        let doc = SpecDocument::from_value(json!({
            "components": {
                "parameters": {
                    "Page": { "name": "page", "in": "query" },
                    "Alias": { "$ref": "#/components/parameters/Page" }
                },
                "schemas": {
                    "Item": { "type": "object" },
                    "ItemAlias": { "$ref": "#/components/schemas/Item" }
                }
            }
        }))
        .unwrap();
        assert_eq!(doc.components.parameters.len(), 1);
        // Schema components keep references; the resolver decides what to do with them.
        assert_eq!(doc.components.schemas.len(), 2);
        assert!(doc.components.schemas.get("ItemAlias").unwrap().is_ref());
    }

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("pAtCh"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("head"), None);
        // Exact token match; surrounding whitespace is not stripped.
        assert_eq!(HttpMethod::parse(" GET "), None);
        assert_eq!(HttpMethod::parse("GET\n"), None);
    }

    #[test]
    fn test_non_object_component_schemas_are_kept() {
        let doc = SpecDocument::from_value(json!({
            "components": {
                "schemas": {
                    "Anything": true,
                    "Item": { "type": "object" },
                    "Nothing": false
                }
            }
        }))
        .unwrap();
        let names: Vec<&str> = doc.components.schemas.keys().collect();
        assert_eq!(names, vec!["Anything", "Item", "Nothing"]);
        assert_eq!(
            doc.components.schemas.get("Anything"),
            Some(&SchemaNode::Literal(json!(true)))
        );
        assert_eq!(doc.components.schemas.get("Nothing").unwrap().to_value(), json!(false));
    }
}
