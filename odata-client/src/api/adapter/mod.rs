//! Protocol adapter families
//!
//! An adapter is the fixed bundle of version-specific capabilities selected
//! once at negotiation time. Client code talks to `dyn ODataAdapter` and
//! never branches on the protocol version itself.

/// Define an adapter family: the shared implementation bound to one `AdapterVersion`
macro_rules! family_adapter {
    ($(#[$meta:meta])* $name:ident, $version:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            protocol_version: String,
            metadata: std::sync::Arc<$crate::api::metadata::SchemaMetadata>,
        }

        impl $name {
            /// Parse the full metadata document and bind the resolver to it
            pub fn from_document(
                protocol_version: impl Into<String>,
                metadata_text: &str,
                parser: &dyn $crate::api::metadata::SchemaParser,
                matcher: $crate::api::naming::NameMatcher,
            ) -> $crate::api::error::Result<Self> {
                let graph = parser.parse(metadata_text)?;
                let protocol_version = protocol_version.into();
                log::debug!(
                    "Creating OData {} adapter for protocol {}",
                    $version,
                    protocol_version
                );
                Ok(Self {
                    protocol_version,
                    metadata: std::sync::Arc::new($crate::api::metadata::SchemaMetadata::new(
                        std::sync::Arc::new(graph),
                        matcher,
                    )),
                })
            }
        }

        impl $crate::api::adapter::ODataAdapter for $name {
            fn adapter_version(&self) -> $crate::api::adapter::AdapterVersion {
                $version
            }

            fn protocol_version(&self) -> &str {
                &self.protocol_version
            }

            fn metadata(&self) -> std::sync::Arc<dyn $crate::api::metadata::Metadata> {
                self.metadata.clone()
            }

            fn response_reader(&self) -> Box<dyn $crate::api::adapter::ResponseReader> {
                Box::new($crate::api::adapter::VersionedResponseReader::new($version))
            }

            fn request_writer(
                &self,
                deferred_batch_writer: $crate::api::adapter::DeferredBatchWriter,
            ) -> Box<dyn $crate::api::adapter::RequestWriter> {
                Box::new($crate::api::adapter::VersionedRequestWriter::new(
                    $version,
                    self.protocol_version.clone(),
                    deferred_batch_writer,
                ))
            }

            fn batch_writer(&self) -> std::sync::Arc<dyn $crate::api::adapter::BatchWriter> {
                std::sync::Arc::new($crate::api::adapter::MultipartBatchWriter::new($version))
            }
        }
    };
}

pub mod v3;
pub mod v4;
pub mod writers;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::constants::{
    DATA_SERVICE_VERSION_HEADER, MAX_DATA_SERVICE_VERSION_HEADER, ODATA_MAX_VERSION_HEADER,
    ODATA_VERSION_HEADER,
};
use super::metadata::Metadata;

pub use v3::ODataAdapterV3;
pub use v4::ODataAdapterV4;
pub use writers::{
    BatchWriter, DeferredBatchWriter, MultipartBatchWriter, RequestWriter, ResponseReader,
    VersionedRequestWriter, VersionedResponseReader, defer_batch_writer,
};

/// Protocol family an adapter implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdapterVersion {
    /// OData v1-v3
    V3,
    /// OData v4
    V4,
}

impl AdapterVersion {
    pub fn version_header(self) -> &'static str {
        match self {
            AdapterVersion::V3 => DATA_SERVICE_VERSION_HEADER,
            AdapterVersion::V4 => ODATA_VERSION_HEADER,
        }
    }

    pub fn max_version_header(self) -> &'static str {
        match self {
            AdapterVersion::V3 => MAX_DATA_SERVICE_VERSION_HEADER,
            AdapterVersion::V4 => ODATA_MAX_VERSION_HEADER,
        }
    }

    pub fn max_version(self) -> &'static str {
        match self {
            AdapterVersion::V3 => "3.0",
            AdapterVersion::V4 => "4.0",
        }
    }

    pub fn accept_header(self) -> &'static str {
        match self {
            AdapterVersion::V3 => "application/atom+xml,application/xml",
            AdapterVersion::V4 => "application/json;odata.metadata=minimal",
        }
    }
}

impl fmt::Display for AdapterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterVersion::V3 => write!(f, "V3"),
            AdapterVersion::V4 => write!(f, "V4"),
        }
    }
}

/// Capability set every protocol family provides
pub trait ODataAdapter: Send + Sync + fmt::Debug {
    fn adapter_version(&self) -> AdapterVersion;

    /// Version token the service reported, e.g. "4.0"
    ///
    /// When a header lists several tokens this is the one that selected the
    /// family, not the first one listed ("NetFx;3.0" reports "3.0").
    fn protocol_version(&self) -> &str;

    fn metadata(&self) -> Arc<dyn Metadata>;

    fn response_reader(&self) -> Box<dyn ResponseReader>;

    fn request_writer(
        &self,
        deferred_batch_writer: DeferredBatchWriter,
    ) -> Box<dyn RequestWriter>;

    fn batch_writer(&self) -> Arc<dyn BatchWriter>;
}

/// Lazily build `adapter`'s batch writer for use with `request_writer`
pub fn deferred_batch_writer_for(adapter: Arc<dyn ODataAdapter>) -> DeferredBatchWriter {
    defer_batch_writer(move || adapter.batch_writer())
}
