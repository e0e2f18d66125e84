//! Document retrieval and the single-document cache.
//!
//! A [`DocumentSource`] knows how to produce a fresh [`SpecDocument`];
//! [`SpecCache`] memoizes the last successful result until it is
//! explicitly invalidated.
//!
//! # Cache lifecycle
//!
//! ```text
//!   empty ──get()──▶ fetching ──ok──▶ cached ──invalidate()──▶ empty
//!                        │
//!                        └──err──▶ empty (error returned to caller)
//! ```
//!
//! The slot itself sits behind a short-lived lock that is never held across
//! an `.await`, so reads and invalidation return immediately. A separate
//! async guard is held for the duration of a fetch: concurrent callers that
//! find the cache empty wait for the one in-flight fetch instead of issuing
//! their own. Invalidation does not wait for that fetch, and a document
//! requested before an invalidation is not cached. A cached document is handed out as an `Arc` and replaced as a
//! whole; readers never observe a partially built document.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use api_knowledge_core::SpecDocument;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::error::FetchError;

/// Something that can produce the API description document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable origin (URL or path), used in logs and errors.
    fn describe(&self) -> String;

    /// Retrieve and parse the document.
    async fn fetch(&self) -> Result<SpecDocument, FetchError>;
}

/// Fetches the document with an HTTP GET. Any non-2xx status is a failure.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            url: url.into(),
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<SpecDocument, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        parse_document(&self.url, &body)
    }
}

/// Reads the document from the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<SpecDocument, FetchError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_document(&self.describe(), &body)
    }
}

/// Decode a JSON body into a document.
pub fn parse_document(origin: &str, body: &[u8]) -> Result<SpecDocument, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|source| FetchError::Decode {
            origin: origin.to_string(),
            source,
        })?;
    SpecDocument::from_value(value).map_err(|e| FetchError::Malformed {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Pick a source for the configured location: `http(s)://` URLs are fetched
/// over HTTP, `file://` URLs and anything else are read as a path.
pub fn source_from_config(config: &SourceConfig) -> anyhow::Result<Box<dyn DocumentSource>> {
    let url = config.url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        return Ok(Box::new(HttpSource::new(url, timeout)?));
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    Ok(Box::new(FileSource::new(path)))
}

#[derive(Default)]
struct Slot {
    doc: Option<Arc<SpecDocument>>,
    /// Bumped by every invalidation.
    generation: u64,
}

/// Memoizes the most recent successfully fetched document.
pub struct SpecCache {
    source: Box<dyn DocumentSource>,
    slot: RwLock<Slot>,
    /// Held across a fetch so concurrent misses wait for one request.
    fetch_guard: Mutex<()>,
}

impl SpecCache {
    pub fn new(source: Box<dyn DocumentSource>) -> Self {
        Self {
            source,
            slot: RwLock::new(Slot::default()),
            fetch_guard: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &dyn DocumentSource {
        self.source.as_ref()
    }

    /// The cached document and the generation it was read at.
    fn snapshot(&self) -> (Option<Arc<SpecDocument>>, u64) {
        match self.slot.read() {
            Ok(slot) => (slot.doc.clone(), slot.generation),
            Err(poisoned) => {
                let slot = poisoned.into_inner();
                (slot.doc.clone(), slot.generation)
            }
        }
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Slot) -> R) -> R {
        match self.slot.write() {
            Ok(mut slot) => f(&mut slot),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Return the cached document, fetching it first if the cache is empty.
    ///
    /// A failed fetch leaves the cache empty and returns the error; the next
    /// call tries again.
    pub async fn get(&self) -> Result<Arc<SpecDocument>, FetchError> {
        if let (Some(doc), _) = self.snapshot() {
            debug!("serving cached API document");
            return Ok(doc);
        }

        let _fetching = self.fetch_guard.lock().await;
        // Another caller may have filled the slot while we waited.
        let (cached, generation) = self.snapshot();
        if let Some(doc) = cached {
            debug!("serving API document fetched by a concurrent caller");
            return Ok(doc);
        }

        info!(source = %self.source.describe(), "fetching API document");
        match self.source.fetch().await {
            Ok(doc) => {
                info!(
                    paths = doc.paths.len(),
                    operations = doc.operation_count(),
                    schemas = doc.components.schemas.len(),
                    "API document cached"
                );
                let doc = Arc::new(doc);
                let stored = self.with_slot(|slot| {
                    // A document requested before an invalidation is handed
                    // to its caller but not cached.
                    if slot.generation != generation {
                        return false;
                    }
                    slot.doc = Some(Arc::clone(&doc));
                    true
                });
                if !stored {
                    debug!("cache invalidated during fetch; result not cached");
                }
                Ok(doc)
            }
            Err(e) => {
                warn!(error = %e, "API document fetch failed");
                Err(e)
            }
        }
    }

    /// Drop the cached document. No-op when nothing is cached.
    ///
    /// Returns without waiting for an in-flight fetch; that fetch's result
    /// is not cached.
    pub async fn invalidate(&self) {
        let cleared = self.with_slot(|slot| {
            slot.generation += 1;
            slot.doc.take().is_some()
        });
        if cleared {
            info!("API document cache cleared");
        } else {
            debug!("API document cache already empty");
        }
    }

    pub async fn is_cached(&self) -> bool {
        self.snapshot().0.is_some()
    }
}
