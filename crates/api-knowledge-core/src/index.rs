//! Endpoint index: flat records derived from the document's path map.
//!
//! Records are recomputed from the document on every call and never stored,
//! so they can only ever describe the document they were built from.

use serde::Serialize;

use crate::document::{
    HttpMethod, Operation, Parameter, ParameterLocation, PathItem, Referable, SpecDocument,
    PARAMETER_REF_PREFIX, REQUEST_BODY_REF_PREFIX, RESPONSE_REF_PREFIX,
};
use crate::resolve::{resolve_component, resolve_schema, ResolvedSchema};

/// Content type reported for a request body that declares no content.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// One operation, as listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl EndpointSummary {
    fn new(method: HttpMethod, path: &str, op: &Operation) -> Self {
        Self {
            method,
            path: path.to_string(),
            summary: op.summary.clone(),
            tags: op.tags.clone(),
            operation_id: op.operation_id.clone(),
        }
    }

    /// Case-insensitive keyword match over path, summary, operation id and
    /// tags. `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        hit(self.path.as_str())
            || self.summary.as_deref().is_some_and(hit)
            || self.operation_id.as_deref().is_some_and(hit)
            || self.tags.iter().any(|tag| hit(tag.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResolvedSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyInfo {
    pub required: bool,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResolvedSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInfo {
    pub status_code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResolvedSchema>,
}

/// Full description of one operation with its schemas resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDetails {
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyInfo>,
    pub responses: Vec<ResponseInfo>,
}

/// List every operation, optionally keeping only those carrying `tag`
/// (exact, case-sensitive). An empty tag is treated as no filter.
///
/// Order is document path order, then `GET, POST, PUT, PATCH, DELETE`
/// within a path.
pub fn list_endpoints(doc: &SpecDocument, tag: Option<&str>) -> Vec<EndpointSummary> {
    let tag = tag.filter(|t| !t.is_empty());
    doc.paths
        .iter()
        .flat_map(|(path, item)| {
            item.operations
                .iter()
                .filter(move |(_, op)| tag.map_or(true, |t| op.has_tag(t)))
                .map(move |(method, op)| EndpointSummary::new(*method, path, op))
        })
        .collect()
}

/// Look up one operation by method token (case-insensitive) and verbatim
/// path. `None` when the path is unknown, the method token is not one of the
/// five indexed methods, or the path has no operation for it.
pub fn get_endpoint_details(doc: &SpecDocument, method: &str, path: &str) -> Option<EndpointDetails> {
    let method = HttpMethod::parse(method)?;
    let item = doc.path(path)?;
    let op = item.operation(method)?;

    let parameters = merged_parameters(doc, item, op)
        .into_iter()
        .map(|p| ParameterInfo {
            name: p.name.clone(),
            location: p.location,
            required: p.required,
            description: p.description.clone(),
            schema: resolve_schema(doc, p.schema.as_ref()),
        })
        .collect();

    let request_body = op
        .request_body
        .as_ref()
        .and_then(|slot| {
            resolve_component(&doc.components.request_bodies, REQUEST_BODY_REF_PREFIX, slot)
        })
        .map(|body| {
            let first = body.content.iter().next();
            RequestBodyInfo {
                required: body.required,
                content_type: first
                    .map(|(content_type, _)| content_type.to_string())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                schema: first.and_then(|(_, media)| resolve_schema(doc, media.schema.as_ref())),
            }
        });

    let responses = op
        .responses
        .iter()
        .map(|(status, slot)| {
            match resolve_component(&doc.components.responses, RESPONSE_REF_PREFIX, slot) {
                Some(response) => ResponseInfo {
                    status_code: status.clone(),
                    description: response.description.clone(),
                    schema: response
                        .content
                        .iter()
                        .next()
                        .and_then(|(_, media)| resolve_schema(doc, media.schema.as_ref())),
                },
                None => ResponseInfo {
                    status_code: status.clone(),
                    description: String::new(),
                    schema: None,
                },
            }
        })
        .collect();

    Some(EndpointDetails {
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        operation_id: op.operation_id.clone(),
        parameters,
        request_body,
        responses,
    })
}

fn parameter<'a>(doc: &'a SpecDocument, slot: &'a Referable<Parameter>) -> Option<&'a Parameter> {
    resolve_component(&doc.components.parameters, PARAMETER_REF_PREFIX, slot)
}

/// Path-level parameters not overridden by the operation (same name and
/// location), followed by the operation's own parameters. Unresolvable
/// references are skipped.
fn merged_parameters<'a>(
    doc: &'a SpecDocument,
    item: &'a PathItem,
    op: &'a Operation,
) -> Vec<&'a Parameter> {
    let own: Vec<&Parameter> = op
        .parameters
        .iter()
        .filter_map(|slot| parameter(doc, slot))
        .collect();

    let mut merged: Vec<&Parameter> = item
        .parameters
        .iter()
        .filter_map(|slot| parameter(doc, slot))
        .filter(|shared| {
            !own.iter()
                .any(|p| p.name == shared.name && p.location == shared.location)
        })
        .collect();
    merged.extend(own);
    merged
}
