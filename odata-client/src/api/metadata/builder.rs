//! Incremental construction of a [`SchemaGraph`]
//!
//! Parsers (and tests) add elements in any order; `build` checks the graph
//! invariants once everything is in place and indexes derived types.

use super::model::*;
use crate::api::error::SchemaParseError;

#[derive(Debug, Default)]
pub struct SchemaGraphBuilder {
    graph: SchemaGraph,
    /// Keys are resolved at build time so inherited properties are visible
    pending_keys: Vec<(TypeId, Vec<String>)>,
}

impl SchemaGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(
        &mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> ContainerId {
        self.graph.containers.push(EntityContainer {
            name: name.into(),
            namespace: namespace.into(),
            entity_sets: Vec::new(),
            function_imports: Vec::new(),
        });
        ContainerId(self.graph.containers.len() - 1)
    }

    pub fn add_entity_type(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> TypeId {
        self.graph.entity_types.push(EntityType {
            name: name.into(),
            namespace: namespace.into(),
            base_type: None,
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            declared_key: None,
        });
        TypeId(self.graph.entity_types.len() - 1)
    }

    pub fn set_base_type(&mut self, id: TypeId, base: TypeId) -> &mut Self {
        self.graph.entity_types[id.0].base_type = Some(base);
        self
    }

    /// Declare the key of `id` by property name
    pub fn set_key<S: AsRef<str>>(&mut self, id: TypeId, property_names: &[S]) -> &mut Self {
        self.pending_keys.push((
            id,
            property_names
                .iter()
                .map(|n| n.as_ref().to_string())
                .collect(),
        ));
        self
    }

    pub fn add_property(
        &mut self,
        declaring_type: TypeId,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> PropertyId {
        self.graph.properties.push(StructuralProperty {
            name: name.into(),
            declaring_type,
            type_name: type_name.into(),
            nullable: true,
            concurrency_mode: ConcurrencyMode::None,
        });
        let id = PropertyId(self.graph.properties.len() - 1);
        self.graph.entity_types[declaring_type.0].properties.push(id);
        id
    }

    pub fn set_nullable(&mut self, id: PropertyId, nullable: bool) -> &mut Self {
        self.graph.properties[id.0].nullable = nullable;
        self
    }

    pub fn set_concurrency_mode(&mut self, id: PropertyId, mode: ConcurrencyMode) -> &mut Self {
        self.graph.properties[id.0].concurrency_mode = mode;
        self
    }

    /// Add a navigation property; its own end defaults to `One` until partnered
    pub fn add_navigation(
        &mut self,
        declaring_type: TypeId,
        name: impl Into<String>,
        target_type: TypeId,
        target_multiplicity: Multiplicity,
    ) -> NavigationId {
        self.graph.navigation_properties.push(NavigationProperty {
            name: name.into(),
            declaring_type,
            target_type,
            multiplicity: Multiplicity::One,
            target_multiplicity,
            partner: None,
        });
        let id = NavigationId(self.graph.navigation_properties.len() - 1);
        self.graph.entity_types[declaring_type.0]
            .navigation_properties
            .push(id);
        id
    }

    pub fn set_navigation_multiplicity(
        &mut self,
        id: NavigationId,
        multiplicity: Multiplicity,
    ) -> &mut Self {
        self.graph.navigation_properties[id.0].multiplicity = multiplicity;
        self
    }

    /// Link two navigation properties as each other's partner
    ///
    /// Each end takes the other's target multiplicity as its own.
    pub fn link_partners(&mut self, a: NavigationId, b: NavigationId) -> &mut Self {
        let a_target = self.graph.navigation_properties[a.0].target_multiplicity;
        let b_target = self.graph.navigation_properties[b.0].target_multiplicity;
        {
            let nav_a = &mut self.graph.navigation_properties[a.0];
            nav_a.partner = Some(b);
            nav_a.multiplicity = b_target;
        }
        let nav_b = &mut self.graph.navigation_properties[b.0];
        nav_b.partner = Some(a);
        nav_b.multiplicity = a_target;
        self
    }

    pub fn add_entity_set(
        &mut self,
        container: ContainerId,
        name: impl Into<String>,
        element_type: TypeId,
    ) -> EntitySetId {
        self.graph.entity_sets.push(EntitySet {
            name: name.into(),
            container,
            element_type,
        });
        let id = EntitySetId(self.graph.entity_sets.len() - 1);
        self.graph.containers[container.0].entity_sets.push(id);
        id
    }

    pub fn add_function_import(
        &mut self,
        container: ContainerId,
        name: impl Into<String>,
        return_type: Option<String>,
    ) -> FunctionImportId {
        self.graph.function_imports.push(FunctionImport {
            name: name.into(),
            container,
            return_type,
        });
        let id = FunctionImportId(self.graph.function_imports.len() - 1);
        self.graph.containers[container.0].function_imports.push(id);
        id
    }

    /// Navigation properties declared directly on `id`
    pub fn navigation_properties_of(&self, id: TypeId) -> Vec<(NavigationId, &NavigationProperty)> {
        self.graph.entity_types[id.0]
            .navigation_properties
            .iter()
            .map(|&n| (n, &self.graph.navigation_properties[n.0]))
            .collect()
    }

    pub fn navigation(&self, id: NavigationId) -> &NavigationProperty {
        &self.graph.navigation_properties[id.0]
    }

    /// Base type of `id` as currently declared
    pub fn base_type_of(&self, id: TypeId) -> Option<TypeId> {
        self.graph.entity_types[id.0].base_type
    }

    pub fn build(mut self) -> Result<SchemaGraph, SchemaParseError> {
        self.check_acyclic()?;
        self.resolve_keys()?;

        let mut derived = vec![Vec::new(); self.graph.entity_types.len()];
        for (i, ty) in self.graph.entity_types.iter().enumerate() {
            if let Some(base) = ty.base_type {
                derived[base.0].push(TypeId(i));
            }
        }
        self.graph.derived = derived;

        log::debug!(
            "Built schema graph: {} containers, {} entity sets, {} entity types, {} function imports",
            self.graph.containers.len(),
            self.graph.entity_sets.len(),
            self.graph.entity_types.len(),
            self.graph.function_imports.len()
        );

        Ok(self.graph)
    }

    fn check_acyclic(&self) -> Result<(), SchemaParseError> {
        let limit = self.graph.entity_types.len();
        for (i, ty) in self.graph.entity_types.iter().enumerate() {
            let mut current = ty.base_type;
            let mut steps = 0;
            while let Some(base) = current {
                steps += 1;
                if base.0 == i || steps > limit {
                    return Err(SchemaParseError::new(format!(
                        "Entity type {} has a cyclic base type chain",
                        ty.qualified_name()
                    )));
                }
                current = self.graph.entity_types[base.0].base_type;
            }
        }
        Ok(())
    }

    fn resolve_keys(&mut self) -> Result<(), SchemaParseError> {
        let pending = std::mem::take(&mut self.pending_keys);
        for (type_id, names) in pending {
            let mut key = Vec::with_capacity(names.len());
            for name in &names {
                let property = self.find_visible_property(type_id, name).ok_or_else(|| {
                    SchemaParseError::new(format!(
                        "Key property {} is not declared on entity type {}",
                        name,
                        self.graph.entity_types[type_id.0].qualified_name()
                    ))
                })?;
                if key.contains(&property) {
                    return Err(SchemaParseError::new(format!(
                        "Key property {} is listed twice on entity type {}",
                        name,
                        self.graph.entity_types[type_id.0].qualified_name()
                    )));
                }
                key.push(property);
            }
            self.graph.entity_types[type_id.0].declared_key = Some(key);
        }
        Ok(())
    }

    /// Property declared on `id` or any of its ancestors, by exact name
    fn find_visible_property(&self, id: TypeId, name: &str) -> Option<PropertyId> {
        let mut current = Some(id);
        while let Some(t) = current {
            let ty = &self.graph.entity_types[t.0];
            if let Some(&p) = ty
                .properties
                .iter()
                .find(|&&p| self.graph.properties[p.0].name == name)
            {
                return Some(p);
            }
            current = ty.base_type;
        }
        None
    }
}
