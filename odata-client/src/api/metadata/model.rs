//! In-memory schema graph
//!
//! Elements live in flat arenas owned by [`SchemaGraph`] and refer to each
//! other by index, so base types, derived types and navigation partners can
//! point both ways without shared ownership.

use serde::Serialize;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub(crate) usize);
    };
}

arena_id!(
    /// Index of an entity container
    ContainerId
);
arena_id!(
    /// Index of an entity set
    EntitySetId
);
arena_id!(
    /// Index of an entity type
    TypeId
);
arena_id!(
    /// Index of a structural property
    PropertyId
);
arena_id!(
    /// Index of a navigation property
    NavigationId
);
arena_id!(
    /// Index of a function import
    FunctionImportId
);

#[derive(Debug, Clone, Serialize)]
pub struct EntityContainer {
    pub name: String,
    pub namespace: String,
    pub entity_sets: Vec<EntitySetId>,
    pub function_imports: Vec<FunctionImportId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySet {
    pub name: String,
    pub container: ContainerId,
    pub element_type: TypeId,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityType {
    pub name: String,
    pub namespace: String,
    pub base_type: Option<TypeId>,
    pub properties: Vec<PropertyId>,
    pub navigation_properties: Vec<NavigationId>,
    /// `None` when the type declares no `Key`; ancestors may still supply one
    pub declared_key: Option<Vec<PropertyId>>,
}

impl EntityType {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// Optimistic concurrency marker on a structural property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConcurrencyMode {
    #[default]
    None,
    Fixed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuralProperty {
    pub name: String,
    pub declaring_type: TypeId,
    /// Declared EDM type, e.g. "Edm.Int32" or "Collection(Edm.String)"
    pub type_name: String,
    pub nullable: bool,
    pub concurrency_mode: ConcurrencyMode,
}

/// Multiplicity of one end of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Multiplicity {
    ZeroOrOne,
    One,
    Many,
}

impl Multiplicity {
    /// Parse a v3 association end multiplicity ("0..1", "1", "*")
    pub fn from_association_end(value: &str) -> Option<Self> {
        match value.trim() {
            "0..1" => Some(Multiplicity::ZeroOrOne),
            "1" => Some(Multiplicity::One),
            "*" => Some(Multiplicity::Many),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationProperty {
    pub name: String,
    pub declaring_type: TypeId,
    pub target_type: TypeId,
    /// Multiplicity of the end this property is declared on
    pub multiplicity: Multiplicity,
    /// Multiplicity of the end this property points to
    pub target_multiplicity: Multiplicity,
    pub partner: Option<NavigationId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionImport {
    pub name: String,
    pub container: ContainerId,
    pub return_type: Option<String>,
}

/// Immutable schema graph produced by a schema parser
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaGraph {
    pub(crate) containers: Vec<EntityContainer>,
    pub(crate) entity_sets: Vec<EntitySet>,
    pub(crate) entity_types: Vec<EntityType>,
    pub(crate) properties: Vec<StructuralProperty>,
    pub(crate) navigation_properties: Vec<NavigationProperty>,
    pub(crate) function_imports: Vec<FunctionImport>,
    /// derived[t] lists the types whose base type is t
    #[serde(skip)]
    pub(crate) derived: Vec<Vec<TypeId>>,
}

impl SchemaGraph {
    pub fn builder() -> super::builder::SchemaGraphBuilder {
        super::builder::SchemaGraphBuilder::new()
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = (EntitySetId, &EntitySet)> {
        self.containers.iter().flat_map(move |c| {
            c.entity_sets
                .iter()
                .map(move |&id| (id, &self.entity_sets[id.0]))
        })
    }

    pub fn entity_types(&self) -> impl Iterator<Item = (TypeId, &EntityType)> {
        self.entity_types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i), t))
    }

    pub fn function_imports(&self) -> impl Iterator<Item = (FunctionImportId, &FunctionImport)> {
        self.containers.iter().flat_map(move |c| {
            c.function_imports
                .iter()
                .map(move |&id| (id, &self.function_imports[id.0]))
        })
    }

    pub fn entity_set(&self, id: EntitySetId) -> &EntitySet {
        &self.entity_sets[id.0]
    }

    pub fn entity_type(&self, id: TypeId) -> &EntityType {
        &self.entity_types[id.0]
    }

    pub fn property(&self, id: PropertyId) -> &StructuralProperty {
        &self.properties[id.0]
    }

    pub fn navigation_property(&self, id: NavigationId) -> &NavigationProperty {
        &self.navigation_properties[id.0]
    }

    pub fn function_import(&self, id: FunctionImportId) -> &FunctionImport {
        &self.function_imports[id.0]
    }

    /// Types whose base type is exactly `id`; no transitive closure
    pub fn find_directly_derived_types(&self, id: TypeId) -> &[TypeId] {
        self.derived.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walk from `id` up through its base types, starting with `id` itself
    pub fn ancestors(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(Some(id), move |&t| self.entity_type(t).base_type)
    }
}
