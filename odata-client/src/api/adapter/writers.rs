//! Per-family response readers, request writers and batch writers
//!
//! Payload (de)serialization lives outside this crate; these types carry the
//! protocol-version-specific headers and batch framing the rest of the client
//! needs so version checks never leak past the adapter.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;

use super::AdapterVersion;

/// Batch writer constructed on first use
pub type DeferredBatchWriter =
    Arc<Lazy<Arc<dyn BatchWriter>, Box<dyn FnOnce() -> Arc<dyn BatchWriter> + Send>>>;

/// Wrap a batch writer factory so it only runs when a request enlists
pub fn defer_batch_writer<F>(factory: F) -> DeferredBatchWriter
where
    F: FnOnce() -> Arc<dyn BatchWriter> + Send + 'static,
{
    let factory: Box<dyn FnOnce() -> Arc<dyn BatchWriter> + Send> = Box::new(factory);
    Arc::new(Lazy::new(factory))
}

pub trait ResponseReader: Send + Sync + fmt::Debug {
    /// Accept header for requests whose responses this reader handles
    fn accept_header(&self) -> &'static str;

    /// Protocol version a response reports through this family's header
    fn response_version(&self, headers: &HeaderMap) -> Option<String>;
}

pub trait RequestWriter: Send + Sync + fmt::Debug {
    /// Version headers stamped on every outgoing request
    fn request_headers(&self) -> Vec<(&'static str, String)>;

    /// Join the in-flight batch, constructing its writer if needed
    fn enlist_in_batch(&self) -> Arc<dyn BatchWriter>;

    /// Whether a batch writer has been constructed yet
    fn has_batch(&self) -> bool;
}

pub trait BatchWriter: Send + Sync + fmt::Debug {
    fn boundary(&self) -> &str;

    /// `multipart/mixed` content type carrying the boundary
    fn content_type(&self) -> String;

    fn request_headers(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Clone)]
pub struct VersionedResponseReader {
    version: AdapterVersion,
}

impl VersionedResponseReader {
    pub fn new(version: AdapterVersion) -> Self {
        Self { version }
    }
}

impl ResponseReader for VersionedResponseReader {
    fn accept_header(&self) -> &'static str {
        self.version.accept_header()
    }

    fn response_version(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.version.version_header())
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').map(str::trim).find(|t| !t.is_empty()))
            .map(str::to_string)
    }
}

pub struct VersionedRequestWriter {
    version: AdapterVersion,
    protocol_version: String,
    batch: DeferredBatchWriter,
}

impl VersionedRequestWriter {
    pub fn new(
        version: AdapterVersion,
        protocol_version: impl Into<String>,
        batch: DeferredBatchWriter,
    ) -> Self {
        Self {
            version,
            protocol_version: protocol_version.into(),
            batch,
        }
    }
}

impl fmt::Debug for VersionedRequestWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedRequestWriter")
            .field("version", &self.version)
            .field("protocol_version", &self.protocol_version)
            .field("has_batch", &self.has_batch())
            .finish()
    }
}

impl RequestWriter for VersionedRequestWriter {
    fn request_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (self.version.version_header(), self.protocol_version.clone()),
            (
                self.version.max_version_header(),
                self.version.max_version().to_string(),
            ),
            ("Accept", self.version.accept_header().to_string()),
        ]
    }

    fn enlist_in_batch(&self) -> Arc<dyn BatchWriter> {
        Arc::clone(Lazy::force(&*self.batch))
    }

    fn has_batch(&self) -> bool {
        Lazy::get(&*self.batch).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MultipartBatchWriter {
    version: AdapterVersion,
    boundary: String,
}

impl MultipartBatchWriter {
    pub fn new(version: AdapterVersion) -> Self {
        Self {
            version,
            boundary: format!("batch_{}", uuid::Uuid::new_v4()),
        }
    }
}

impl BatchWriter for MultipartBatchWriter {
    fn boundary(&self) -> &str {
        &self.boundary
    }

    fn content_type(&self) -> String {
        format!("multipart/mixed; boundary={}", self.boundary)
    }

    fn request_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                self.version.version_header(),
                self.version.max_version().to_string(),
            ),
            ("Content-Type", self.content_type()),
        ]
    }
}
