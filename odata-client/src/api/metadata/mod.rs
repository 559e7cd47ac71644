//! Service metadata: schema graph, CSDL parsing and name resolution

pub mod builder;
pub mod model;
pub mod parser;
pub mod resolver;

pub use builder::SchemaGraphBuilder;
pub use model::{
    ConcurrencyMode, ContainerId, EntityContainer, EntitySet, EntitySetId, EntityType,
    FunctionImport, FunctionImportId, Multiplicity, NavigationId, NavigationProperty, PropertyId,
    SchemaGraph, StructuralProperty, TypeId,
};
pub use parser::{CsdlParser, SchemaParser, read_document_version};
pub use resolver::{Metadata, SchemaMetadata};
