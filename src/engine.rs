//! Query engine.
//!
//! [`KnowledgeIndex`] owns the document cache and answers every query
//! against the snapshot it obtains at call time. Derived records are
//! computed per call and never cached, so invalidating the document is the
//! only coherence mechanism needed.
//!
//! Independent instances share nothing, which keeps tests isolated.

use std::sync::Arc;

use api_knowledge_core::document::SpecDocument;
use api_knowledge_core::index::{list_endpoints, EndpointDetails, EndpointSummary};
use api_knowledge_core::query::{self, ApiOverview, Lookup, TagSummary};
use api_knowledge_core::resolve::ResolvedSchema;

use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::{source_from_config, DocumentSource, SpecCache};

pub struct KnowledgeIndex {
    cache: SpecCache,
}

impl KnowledgeIndex {
    pub fn new(source: Box<dyn DocumentSource>) -> Self {
        Self {
            cache: SpecCache::new(source),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(source_from_config(&config.source)?))
    }

    /// Where documents are fetched from.
    pub fn source(&self) -> String {
        self.cache.source().describe()
    }

    /// The current document snapshot, fetched if not cached.
    pub async fn document(&self) -> Result<Arc<SpecDocument>, FetchError> {
        self.cache.get().await
    }

    pub async fn list_endpoints(&self, tag: Option<&str>) -> Result<Vec<EndpointSummary>, FetchError> {
        let doc = self.document().await?;
        Ok(list_endpoints(&doc, tag))
    }

    pub async fn get_endpoint_details(
        &self,
        method: &str,
        path: &str,
    ) -> Result<Lookup<EndpointDetails>, FetchError> {
        let doc = self.document().await?;
        Ok(query::find_endpoint(&doc, method, path))
    }

    pub async fn search_endpoints(&self, query: &str) -> Result<Vec<EndpointSummary>, FetchError> {
        let doc = self.document().await?;
        Ok(query::search_endpoints(&doc, query))
    }

    pub async fn get_schema(&self, name: &str) -> Result<Lookup<ResolvedSchema>, FetchError> {
        let doc = self.document().await?;
        Ok(query::get_schema(&doc, name))
    }

    pub async fn list_schemas(&self) -> Result<Vec<String>, FetchError> {
        let doc = self.document().await?;
        Ok(query::list_schema_names(&doc))
    }

    pub async fn list_tags(&self) -> Result<Vec<TagSummary>, FetchError> {
        let doc = self.document().await?;
        Ok(query::list_tags(&doc))
    }

    pub async fn api_info(&self) -> Result<ApiOverview, FetchError> {
        let doc = self.document().await?;
        Ok(query::api_overview(&doc))
    }

    /// Discard the cached document. The next query fetches a fresh one.
    pub async fn refresh_cache(&self) {
        self.cache.invalidate().await;
    }
}
