//! Queries over one document snapshot.
//!
//! Every function here is a pure function of the [`SpecDocument`] it is
//! given. Lookups that find nothing return [`Lookup::Missing`] rather than
//! an error; the only failures in the system come from obtaining the
//! document in the first place.

use serde::Serialize;
use thiserror::Error;

use crate::document::SpecDocument;
use crate::index::{get_endpoint_details, list_endpoints, EndpointDetails, EndpointSummary};
use crate::resolve::{resolve_schema, ResolvedSchema};

/// A lookup that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("Endpoint not found: {method} {path}")]
    Endpoint { method: String, path: String },
    #[error("Schema \"{name}\" not found. Available schemas: {}", .available.join(", "))]
    Schema { name: String, available: Vec<String> },
}

/// Outcome of a by-key lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing(NotFound),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, NotFound> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::Missing(missing) => Err(missing),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Keyword search over the unfiltered endpoint list.
///
/// Case-insensitive substring match against path, summary, operation id and
/// each tag. An empty query matches everything; results keep index order.
pub fn search_endpoints(doc: &SpecDocument, query: &str) -> Vec<EndpointSummary> {
    let needle = query.to_lowercase();
    list_endpoints(doc, None)
        .into_iter()
        .filter(|endpoint| endpoint.matches(&needle))
        .collect()
}

pub fn find_endpoint(doc: &SpecDocument, method: &str, path: &str) -> Lookup<EndpointDetails> {
    match get_endpoint_details(doc, method, path) {
        Some(details) => Lookup::Found(details),
        None => Lookup::Missing(NotFound::Endpoint {
            method: method.to_string(),
            path: path.to_string(),
        }),
    }
}

/// Exact-name schema lookup, resolved one level.
///
/// A miss carries the full list of schema names so callers can suggest
/// alternatives.
pub fn get_schema(doc: &SpecDocument, name: &str) -> Lookup<ResolvedSchema> {
    match resolve_schema(doc, doc.components.schemas.get(name)) {
        Some(schema) => Lookup::Found(schema),
        None => Lookup::Missing(NotFound::Schema {
            name: name.to_string(),
            available: list_schema_names(doc),
        }),
    }
}

/// Schema names in declaration order.
pub fn list_schema_names(doc: &SpecDocument) -> Vec<String> {
    doc.components.schemas.keys().map(str::to_owned).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub endpoint_count: usize,
}

/// Declared tags in declaration order, then tags that only appear on
/// operations, in index order.
pub fn list_tags(doc: &SpecDocument) -> Vec<TagSummary> {
    let endpoints = list_endpoints(doc, None);
    let count = |name: &str| {
        endpoints
            .iter()
            .filter(|e| e.tags.iter().any(|t| t == name))
            .count()
    };

    let mut tags: Vec<TagSummary> = Vec::new();
    for declared in &doc.tags {
        if tags.iter().any(|t| t.name == declared.name) {
            continue;
        }
        tags.push(TagSummary {
            name: declared.name.clone(),
            description: declared.description.clone(),
            endpoint_count: count(&declared.name),
        });
    }
    for endpoint in &endpoints {
        for tag in &endpoint.tags {
            if tags.iter().any(|t| &t.name == tag) {
                continue;
            }
            tags.push(TagSummary {
                name: tag.clone(),
                description: None,
                endpoint_count: count(tag),
            });
        }
    }
    tags
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOverview {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    pub endpoint_count: usize,
    pub schema_count: usize,
}

pub fn api_overview(doc: &SpecDocument) -> ApiOverview {
    ApiOverview {
        title: doc.info.title.clone(),
        version: doc.info.version.clone(),
        description: doc.info.description.clone(),
        openapi: doc.openapi.clone(),
        endpoint_count: doc.operation_count(),
        schema_count: doc.components.schemas.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HttpMethod;
    use serde_json::json;

    fn sample() -> SpecDocument {
        SpecDocument::from_value(json!({
            "openapi": "3.0.0",
            "info": { "title": "Test API", "version": "1.0", "description": "API documentation" },
            "tags": [ { "name": "items", "description": "Item management" }, { "name": "unused" } ],
            "paths": {
                "/items": {
                    "get": { "tags": ["items"], "summary": "List items", "operationId": "ItemsController_findAll" },
                    "post": { "tags": ["items"], "summary": "Create an item", "operationId": "ItemsController_create" }
                },
                "/items/{id}": {
                    "delete": { "tags": ["items"] }
                },
                "/health": {
                    "get": { "tags": ["Ops"], "summary": "Liveness check" }
                }
            },
            "components": { "schemas": {
                "CreateItemDto": { "type": "object" },
                "Item": { "type": "object" },
                "ItemAlias": { "$ref": "#/components/schemas/Item" }
            } }
        }))
        .unwrap()
    }

    #[test]
    fn test_search_empty_query_matches_everything() {
        let d = sample();
        assert_eq!(search_endpoints(&d, ""), list_endpoints(&d, None));
    }

    #[test]
    fn test_search_matches_summary() {
        let d = sample();
        let hits = search_endpoints(&d, "list");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].method, HttpMethod::Get);
        assert_eq!(hits[0].path, "/items");
    }

    #[test]
    fn test_search_matches_operation_id_and_tags_case_insensitively() {
        let d = sample();
        let by_op: Vec<HttpMethod> = search_endpoints(&d, "CONTROLLER_CREATE")
            .iter()
            .map(|e| e.method)
            .collect();
        assert_eq!(by_op, vec![HttpMethod::Post]);

        let by_tag = search_endpoints(&d, "op");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].path, "/health");
    }

    #[test]
    fn test_search_without_hits_is_empty() {
        assert!(search_endpoints(&sample(), "nothing-like-this").is_empty());
    }

    #[test]
    fn test_find_endpoint_missing_is_a_value() {
        let d = sample();
        let missing = find_endpoint(&d, "GET", "/items/{id}");
        assert_eq!(
            missing,
            Lookup::Missing(NotFound::Endpoint {
                method: "GET".to_string(),
                path: "/items/{id}".to_string()
            })
        );
        assert_eq!(
            missing.into_result().unwrap_err().to_string(),
            "Endpoint not found: GET /items/{id}"
        );
        assert!(find_endpoint(&d, "get", "/items").is_found());
    }

    #[test]
    fn test_get_schema() {
        let d = sample();
        let item = get_schema(&d, "Item").found().unwrap();
        assert_eq!(serde_json::to_value(item).unwrap(), json!({ "type": "object" }));

        let alias = get_schema(&d, "ItemAlias").found().unwrap();
        assert_eq!(
            serde_json::to_value(alias).unwrap(),
            json!({ "$ref": "#/components/schemas/Item" })
        );
    }

    #[test]
    fn test_get_schema_miss_lists_available_names() {
        let d = sample();
        let err = get_schema(&d, "item").into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema \"item\" not found. Available schemas: CreateItemDto, Item, ItemAlias"
        );
    }

    #[test]
    fn test_get_schema_is_idempotent() {
        let d = sample();
        assert_eq!(get_schema(&d, "Item"), get_schema(&d, "Item"));
    }

    #[test]
    fn test_schema_names_keep_declaration_order() {
        assert_eq!(
            list_schema_names(&sample()),
            vec!["CreateItemDto", "Item", "ItemAlias"]
        );
    }

    #[test]
    fn test_boolean_schemas_are_listed_and_found() {
        let d = SpecDocument::from_value(json!({
            "components": { "schemas": { "Anything": true, "Item": { "type": "object" } } }
        }))
        .unwrap();
        assert_eq!(list_schema_names(&d), vec!["Anything", "Item"]);

        let found = get_schema(&d, "Anything").found().unwrap();
        assert_eq!(serde_json::to_value(found).unwrap(), json!(true));

        let err = get_schema(&d, "Order").into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema \"Order\" not found. Available schemas: Anything, Item"
        );
    }

    #[test]
    fn test_list_tags() {
        let tags = list_tags(&sample());
        let summary: Vec<(&str, usize)> = tags
            .iter()
            .map(|t| (t.name.as_str(), t.endpoint_count))
            .collect();
        assert_eq!(summary, vec![("items", 3), ("unused", 0), ("Ops", 1)]);
        assert_eq!(tags[0].description.as_deref(), Some("Item management"));
    }

    #[test]
    fn test_api_overview() {
        let overview = api_overview(&sample());
        assert_eq!(overview.title, "Test API");
        assert_eq!(overview.version, "1.0");
        assert_eq!(overview.openapi.as_deref(), Some("3.0.0"));
        assert_eq!(overview.endpoint_count, 4);
        assert_eq!(overview.schema_count, 3);
    }
}
