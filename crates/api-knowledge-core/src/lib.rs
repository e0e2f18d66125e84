//! # API Knowledge Core
//!
//! Document model and query logic for API Knowledge: parse an
//! OpenAPI-style description into typed records, resolve schema references
//! one hop at a time, index operations, and answer list / search / lookup
//! queries.
//!
//! This crate does no I/O. Fetching and caching the document, and exposing
//! the queries to callers, live in the `api-knowledge` crate.

pub mod document;
pub mod index;
pub mod query;
pub mod resolve;

pub use document::{HttpMethod, SpecDocument};
pub use index::{EndpointDetails, EndpointSummary};
pub use query::{Lookup, NotFound};
pub use resolve::ResolvedSchema;
