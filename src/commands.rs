//! CLI printers for the query commands.
//!
//! Each `run_*` function answers one query through a [`KnowledgeIndex`]
//! and prints the result to stdout, either as a human-readable listing or,
//! with `--json`, as the same JSON the MCP tools return.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use api_knowledge_core::document::{SchemaNode, SchemaRef};
use api_knowledge_core::index::EndpointSummary;
use api_knowledge_core::resolve::ResolvedSchema;

use crate::engine::KnowledgeIndex;
use crate::traits::render_text;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", render_text(&serde_json::to_value(value)?));
    Ok(())
}

fn print_endpoint_rows(endpoints: &[EndpointSummary]) {
    if endpoints.is_empty() {
        println!("No endpoints found.");
        return;
    }
    for ep in endpoints {
        let summary = ep.summary.as_deref().unwrap_or("");
        print!("{:<7} {}", ep.method.as_str(), ep.path);
        if !summary.is_empty() {
            print!("  {}", summary);
        }
        if !ep.tags.is_empty() {
            print!("  [{}]", ep.tags.join(", "));
        }
        println!();
    }
}

pub async fn run_endpoints(index: &KnowledgeIndex, tag: Option<&str>, json: bool) -> Result<()> {
    let endpoints = index.list_endpoints(tag).await?;
    if json {
        return print_json(&endpoints);
    }
    print_endpoint_rows(&endpoints);
    Ok(())
}

pub async fn run_search(index: &KnowledgeIndex, query: &str, json: bool) -> Result<()> {
    let endpoints = index.search_endpoints(query).await?;
    if json {
        return print_json(&endpoints);
    }
    print_endpoint_rows(&endpoints);
    Ok(())
}

/// Print one endpoint. A missing endpoint is an error.
pub async fn run_endpoint(index: &KnowledgeIndex, method: &str, path: &str, json: bool) -> Result<()> {
    let details = index.get_endpoint_details(method, path).await?.into_result()?;
    if json {
        return print_json(&details);
    }

    println!("{} {}", details.method, details.path);
    if let Some(ref summary) = details.summary {
        println!("summary:      {}", summary);
    }
    if let Some(ref id) = details.operation_id {
        println!("operation_id: {}", id);
    }
    if !details.tags.is_empty() {
        println!("tags:         {}", details.tags.join(", "));
    }
    if let Some(ref description) = details.description {
        println!();
        println!("{}", description);
    }

    println!();
    println!("--- Parameters ({}) ---", details.parameters.len());
    for p in &details.parameters {
        let required = if p.required { " (required)" } else { "" };
        print!(
            "{} [{}]{}: {}",
            p.name,
            p.location.as_str(),
            required,
            schema_label(p.schema.as_ref())
        );
        if let Some(ref description) = p.description {
            print!("  {}", description);
        }
        println!();
    }

    if let Some(ref body) = details.request_body {
        println!();
        println!("--- Request Body ---");
        let required = if body.required { " (required)" } else { "" };
        println!(
            "{}{}: {}",
            body.content_type,
            required,
            schema_label(body.schema.as_ref())
        );
    }

    println!();
    println!("--- Responses ({}) ---", details.responses.len());
    for r in &details.responses {
        println!(
            "{} {}  {}",
            r.status_code,
            r.description,
            schema_label(r.schema.as_ref())
        );
    }

    Ok(())
}

/// Print one component schema with its properties. A missing schema is an
/// error listing the available names.
pub async fn run_schema(index: &KnowledgeIndex, name: &str, json: bool) -> Result<()> {
    let schema = index.get_schema(name).await?.into_result()?;
    if json {
        return print_json(&schema);
    }

    println!("{}", name);
    if let Some(pointer) = schema.pointer() {
        println!("ref:          {}", pointer);
    }
    let body = match schema.body().map(SchemaNode::from_component) {
        Some(SchemaNode::Inline(body)) => body,
        Some(SchemaNode::Literal(value)) => {
            println!("schema:       {}", value);
            return Ok(());
        }
        _ => return Ok(()),
    };

    if let Some(t) = body.schema_type() {
        println!("type:         {}", t);
    }
    if let Some(description) = body.description() {
        println!("description:  {}", description);
    }
    if !body.enum_values().is_empty() {
        let values: Vec<String> = body.enum_values().iter().map(Value::to_string).collect();
        println!("enum:         {}", values.join(", "));
    }
    if let Some(items) = body.items() {
        println!("items:        {}", node_label(&items));
    }

    let properties = body.properties();
    if !properties.is_empty() {
        let required = body.required();
        println!();
        println!("--- Properties ({}) ---", properties.len());
        for (prop, node) in &properties {
            let marker = if required.contains(prop) { "*" } else { " " };
            println!("{} {:<24} {}", marker, prop, node_label(node));
        }
    }

    Ok(())
}

pub async fn run_schemas(index: &KnowledgeIndex, json: bool) -> Result<()> {
    let names = index.list_schemas().await?;
    if json {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("No schemas found.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub async fn run_tags(index: &KnowledgeIndex, json: bool) -> Result<()> {
    let tags = index.list_tags().await?;
    if json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("No tags found.");
    }
    for tag in &tags {
        print!("{:<20} {:>4} endpoint(s)", tag.name, tag.endpoint_count);
        if let Some(ref description) = tag.description {
            print!("  {}", description);
        }
        println!();
    }
    Ok(())
}

pub async fn run_info(index: &KnowledgeIndex, json: bool) -> Result<()> {
    let info = index.api_info().await?;
    if json {
        return print_json(&info);
    }
    println!("title:     {}", info.title);
    println!("version:   {}", info.version);
    if let Some(ref openapi) = info.openapi {
        println!("openapi:   {}", openapi);
    }
    println!("endpoints: {}", info.endpoint_count);
    println!("schemas:   {}", info.schema_count);
    if let Some(ref description) = info.description {
        println!();
        println!("{}", description);
    }
    Ok(())
}

/// Short label for a resolved slot: the target name of a reference, or the
/// inline schema's type.
fn schema_label(schema: Option<&ResolvedSchema>) -> String {
    match schema {
        None => "-".to_string(),
        Some(ResolvedSchema::Reference { pointer, .. }) => {
            SchemaRef::new(pointer.as_str()).target_name().to_string()
        }
        Some(ResolvedSchema::Inline(value)) => node_label(&SchemaNode::from_component(value)),
    }
}

fn node_label(node: &SchemaNode) -> String {
    match node {
        SchemaNode::Ref(r) => r.target_name().to_string(),
        SchemaNode::Literal(value) => value.to_string(),
        SchemaNode::Inline(schema) => {
            let base = match (schema.schema_type(), schema.items()) {
                (Some("array"), Some(items)) => format!("{}[]", node_label(&items)),
                (Some(t), _) => t.to_string(),
                (None, _) => "object".to_string(),
            };
            match schema.format() {
                Some(format) => format!("{} ({})", base, format),
                None => base,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_label() {
        let node = SchemaNode::from_value(&json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Item" }
        }))
        .unwrap();
        assert_eq!(node_label(&node), "Item[]");

        let node =
            SchemaNode::from_value(&json!({ "type": "string", "format": "uuid" })).unwrap();
        assert_eq!(node_label(&node), "string (uuid)");

        assert_eq!(node_label(&SchemaNode::from_component(&json!(true))), "true");
    }

    #[test]
    fn test_schema_label() {
        assert_eq!(schema_label(None), "-");
        let reference = ResolvedSchema::Reference {
            pointer: "#/components/schemas/CreateItemDto".to_string(),
            resolved: None,
        };
        assert_eq!(schema_label(Some(&reference)), "CreateItemDto");
        let inline = ResolvedSchema::Inline(json!({ "type": "integer" }));
        assert_eq!(schema_label(Some(&inline)), "integer");
    }
}
