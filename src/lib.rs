//! # API Knowledge
//!
//! Answers questions about an HTTP API from its OpenAPI-style description
//! document, for AI assistants and for people at a terminal.
//!
//! The document is fetched once, cached in memory, and queried through a
//! fixed set of tools: list and search endpoints, endpoint details with
//! schema references resolved one level deep, component schema lookup and
//! a cache refresh. The tools are served over MCP (stdio or streamable
//! HTTP) and as `apik` subcommands.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌────────────────┐
//! │ HTTP / file │──▶│  SpecCache   │──▶│ KnowledgeIndex │
//! │   source    │   │ (one doc)   │   │   (queries)    │
//! └─────────────┘   └─────────────┘   └───────┬────────┘
//!                                             │
//!                         ┌───────────────────┤
//!                         ▼                   ▼
//!                    ┌──────────┐       ┌──────────┐
//!                    │   CLI    │       │   MCP    │
//!                    │  (apik)  │       │stdio/HTTP│
//!                    └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export SWAGGER_URL=http://localhost:3000/api-json
//! apik endpoints --tag items
//! apik endpoint GET /items/{id}
//! apik schema CreateItemDto
//! apik serve stdio
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`error`] | Document fetch errors |
//! | [`fetch`] | Document sources and the single-document cache |
//! | [`engine`] | Query engine over the cached document |
//! | [`traits`] | Tool trait, built-in tools, registry |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | stdio and HTTP servers |
//! | [`commands`] | CLI printers |
//!
//! Document parsing, reference resolution and the pure query functions
//! live in the `api-knowledge-core` crate.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod mcp;
pub mod server;
pub mod traits;

pub use engine::KnowledgeIndex;
pub use error::FetchError;
