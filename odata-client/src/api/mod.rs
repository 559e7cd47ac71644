//! OData client core
//!
//! Negotiates the protocol family a service speaks, binds the matching
//! adapter to the service's metadata document and resolves loosely spelled
//! names against that schema.

pub mod adapter;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod negotiation;
pub mod pluralization;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use adapter::{
    AdapterVersion, BatchWriter, DeferredBatchWriter, ODataAdapter, ODataAdapterV3, ODataAdapterV4,
    RequestWriter, ResponseReader, deferred_batch_writer_for,
};
pub use error::{ODataError, ObjectCategory, Result, SchemaParseError};
pub use metadata::{CsdlParser, Metadata, SchemaGraph, SchemaMetadata, SchemaParser};
pub use naming::NameMatcher;
pub use negotiation::{AdapterFactory, select_family};
pub use pluralization::{PluralizationPolicy, Pluralizer};
pub use transport::{Credentials, HttpTransport, MetadataResponse, MetadataTransport};
