//! Name and path resolution over a schema graph
//!
//! Paths are either a bare name or `Left/Right`. The left segment names an
//! entity set, or failing that an entity type that is a set's element type or
//! a direct derivation of one. The right segment must name a type derived
//! directly from the left segment's type; deeper derivations are rejected even
//! when a type with that name exists elsewhere.

use std::fmt;
use std::sync::Arc;

use super::model::{
    ConcurrencyMode, EntitySetId, FunctionImportId, Multiplicity, NavigationId, PropertyId,
    SchemaGraph, TypeId,
};
use crate::api::error::{ODataError, ObjectCategory, Result};
use crate::api::naming::NameMatcher;

/// Resolution queries answered by every adapter family
pub trait Metadata: Send + Sync + fmt::Debug {
    /// Declared names of all entity sets, in document order
    fn entity_set_names(&self) -> Vec<String>;

    fn resolve_entity_set_name(&self, path: &str) -> Result<String>;

    fn resolve_entity_type_name(&self, path: &str) -> Result<String>;

    fn resolve_entity_type_namespace(&self, path: &str) -> Result<String>;

    /// Match a type name against every entity type, regardless of entity sets
    fn resolve_entity_type_exact_name(&self, type_name: &str) -> Result<String>;

    /// True when any property of the resolved type has `ConcurrencyMode="Fixed"`
    fn requires_concurrency_check(&self, path: &str) -> Result<bool>;

    fn resolve_derived_type_name(&self, entity_set_path: &str, type_name: &str) -> Result<String>;

    /// Structural properties, inherited ones first
    fn structural_property_names(&self, path: &str) -> Result<Vec<String>>;

    fn has_structural_property(&self, path: &str, property_name: &str) -> Result<bool>;

    fn resolve_structural_property_name(&self, path: &str, property_name: &str) -> Result<String>;

    fn has_navigation_property(&self, path: &str, property_name: &str) -> Result<bool>;

    fn resolve_navigation_property_name(&self, path: &str, property_name: &str) -> Result<String>;

    /// Name of the type declaring the navigation property's partner
    fn navigation_partner_type_name(&self, path: &str, property_name: &str) -> Result<String>;

    /// True when the navigation property's partner has multiplicity "many"
    fn is_navigation_multiple(&self, path: &str, property_name: &str) -> Result<bool>;

    /// Key of the resolved type or of its nearest ancestor declaring one
    fn declared_key_property_names(&self, path: &str) -> Result<Vec<String>>;

    fn resolve_function_name(&self, function_name: &str) -> Result<String>;

    /// Declared return type of a function import, `None` for actions without one
    fn function_return_type(&self, function_name: &str) -> Result<Option<String>>;
}

/// [`Metadata`] implementation over a parsed [`SchemaGraph`]
#[derive(Debug, Clone)]
pub struct SchemaMetadata {
    graph: Arc<SchemaGraph>,
    matcher: NameMatcher,
}

impl SchemaMetadata {
    pub fn new(graph: Arc<SchemaGraph>, matcher: NameMatcher) -> Self {
        Self { graph, matcher }
    }

    /// Pick the single candidate whose name answers to `requested`
    fn find_unique<'g, T, I>(
        &self,
        candidates: I,
        requested: &str,
        category: ObjectCategory,
    ) -> Result<T>
    where
        I: IntoIterator<Item = (T, &'g str)>,
    {
        let mut matches: Vec<(T, &str)> = candidates
            .into_iter()
            .filter(|(_, name)| self.matcher.names_are_equal(name, requested))
            .collect();

        match matches.len() {
            0 => Err(ODataError::not_found(requested, category)),
            1 => Ok(matches.remove(0).0),
            _ => Err(ODataError::AmbiguousMatch {
                identifier: requested.to_string(),
                category,
                candidates: matches.iter().map(|(_, n)| n.to_string()).collect(),
            }),
        }
    }

    fn find_entity_set(&self, name: &str) -> Result<EntitySetId> {
        self.find_unique(
            self.graph
                .entity_sets()
                .map(|(id, set)| (id, set.name.as_str())),
            name,
            ObjectCategory::EntitySet,
        )
    }

    fn find_entity_type(&self, name: &str) -> Result<TypeId> {
        self.find_unique(
            self.graph
                .entity_types()
                .map(|(id, ty)| (id, ty.name.as_str())),
            name,
            ObjectCategory::EntityType,
        )
    }

    fn find_direct_derivation(&self, base: TypeId, name: &str) -> Result<TypeId> {
        self.find_unique(
            self.graph
                .find_directly_derived_types(base)
                .iter()
                .map(|&id| (id, self.graph.entity_type(id).name.as_str())),
            name,
            ObjectCategory::EntityType,
        )
    }

    /// Left segment of a path: entity set first, then a reachable bare type
    fn resolve_base_type(&self, segment: &str) -> Result<TypeId> {
        match self.find_entity_set(segment) {
            Ok(set) => Ok(self.graph.entity_set(set).element_type),
            Err(ODataError::ObjectNotFound { .. }) => {
                let ty = match self.find_entity_type(segment) {
                    Ok(ty) => ty,
                    Err(ODataError::ObjectNotFound { .. }) => {
                        return Err(ODataError::not_found(segment, ObjectCategory::EntitySet));
                    }
                    Err(err) => return Err(err),
                };
                if self.is_reachable_from_entity_set(ty) {
                    Ok(ty)
                } else {
                    log::debug!(
                        "Entity type {} exists but is not reachable from any entity set",
                        self.graph.entity_type(ty).qualified_name()
                    );
                    Err(ODataError::not_found(segment, ObjectCategory::EntitySet))
                }
            }
            Err(err) => Err(err),
        }
    }

    /// A set's element type, or a type derived directly from one (one level only)
    fn is_reachable_from_entity_set(&self, ty: TypeId) -> bool {
        let base = self.graph.entity_type(ty).base_type;
        self.graph
            .entity_sets()
            .any(|(_, set)| set.element_type == ty || Some(set.element_type) == base)
    }

    fn resolve_entity_type(&self, path: &str) -> Result<TypeId> {
        let (left, right) = split_path(path);
        let base = self.resolve_base_type(left)?;
        match right {
            Some(derived) => self.find_direct_derivation(base, single_segment(derived)?),
            None => Ok(base),
        }
    }

    /// Properties visible on `ty`, root ancestor's first
    fn visible_properties(&self, ty: TypeId) -> Vec<PropertyId> {
        let mut chain: Vec<TypeId> = self.graph.ancestors(ty).collect();
        chain.reverse();
        chain
            .into_iter()
            .flat_map(|t| self.graph.entity_type(t).properties.iter().copied())
            .collect()
    }

    fn visible_navigation_properties(&self, ty: TypeId) -> Vec<NavigationId> {
        let mut chain: Vec<TypeId> = self.graph.ancestors(ty).collect();
        chain.reverse();
        chain
            .into_iter()
            .flat_map(|t| self.graph.entity_type(t).navigation_properties.iter().copied())
            .collect()
    }

    fn find_function_import(&self, name: &str) -> Result<FunctionImportId> {
        self.find_unique(
            self.graph
                .function_imports()
                .map(|(id, f)| (id, f.name.as_str())),
            name,
            ObjectCategory::Function,
        )
    }

    fn find_structural_property(&self, path: &str, property_name: &str) -> Result<PropertyId> {
        let ty = self.resolve_entity_type(path)?;
        self.find_unique(
            self.visible_properties(ty)
                .into_iter()
                .map(|id| (id, self.graph.property(id).name.as_str())),
            property_name,
            ObjectCategory::StructuralProperty,
        )
    }

    fn find_navigation_property(&self, path: &str, property_name: &str) -> Result<NavigationId> {
        let ty = self.resolve_entity_type(path)?;
        self.find_unique(
            self.visible_navigation_properties(ty)
                .into_iter()
                .map(|id| (id, self.graph.navigation_property(id).name.as_str())),
            property_name,
            ObjectCategory::NavigationProperty,
        )
    }
}

impl Metadata for SchemaMetadata {
    fn entity_set_names(&self) -> Vec<String> {
        self.graph
            .entity_sets()
            .map(|(_, set)| set.name.clone())
            .collect()
    }

    fn resolve_entity_set_name(&self, path: &str) -> Result<String> {
        let (left, right) = split_path(path);
        let set = self.find_entity_set(left)?;
        if let Some(derived) = right {
            let derived = single_segment(derived)?;
            self.find_direct_derivation(self.graph.entity_set(set).element_type, derived)?;
        }
        Ok(self.graph.entity_set(set).name.clone())
    }

    fn resolve_entity_type_name(&self, path: &str) -> Result<String> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self.graph.entity_type(ty).name.clone())
    }

    fn resolve_entity_type_namespace(&self, path: &str) -> Result<String> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self.graph.entity_type(ty).namespace.clone())
    }

    fn resolve_entity_type_exact_name(&self, type_name: &str) -> Result<String> {
        let ty = self.find_entity_type(type_name)?;
        Ok(self.graph.entity_type(ty).name.clone())
    }

    fn requires_concurrency_check(&self, path: &str) -> Result<bool> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self
            .visible_properties(ty)
            .into_iter()
            .any(|p| self.graph.property(p).concurrency_mode == ConcurrencyMode::Fixed))
    }

    fn resolve_derived_type_name(&self, entity_set_path: &str, type_name: &str) -> Result<String> {
        let (left, _) = split_path(entity_set_path);
        let set = self.find_entity_set(left)?;
        let ty = self.find_direct_derivation(self.graph.entity_set(set).element_type, type_name)?;
        Ok(self.graph.entity_type(ty).name.clone())
    }

    fn structural_property_names(&self, path: &str) -> Result<Vec<String>> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self
            .visible_properties(ty)
            .into_iter()
            .map(|p| self.graph.property(p).name.clone())
            .collect())
    }

    fn has_structural_property(&self, path: &str, property_name: &str) -> Result<bool> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self
            .visible_properties(ty)
            .into_iter()
            .any(|p| self.matcher.names_are_equal(&self.graph.property(p).name, property_name)))
    }

    fn resolve_structural_property_name(&self, path: &str, property_name: &str) -> Result<String> {
        let property = self.find_structural_property(path, property_name)?;
        Ok(self.graph.property(property).name.clone())
    }

    fn has_navigation_property(&self, path: &str, property_name: &str) -> Result<bool> {
        let ty = self.resolve_entity_type(path)?;
        Ok(self.visible_navigation_properties(ty).into_iter().any(|n| {
            self.matcher
                .names_are_equal(&self.graph.navigation_property(n).name, property_name)
        }))
    }

    fn resolve_navigation_property_name(&self, path: &str, property_name: &str) -> Result<String> {
        let nav = self.find_navigation_property(path, property_name)?;
        Ok(self.graph.navigation_property(nav).name.clone())
    }

    fn navigation_partner_type_name(&self, path: &str, property_name: &str) -> Result<String> {
        let nav = self
            .graph
            .navigation_property(self.find_navigation_property(path, property_name)?);
        // an unpaired navigation has an implicit partner declared on its target
        let partner_type = match nav.partner {
            Some(partner) => self.graph.navigation_property(partner).declaring_type,
            None => nav.target_type,
        };
        Ok(self.graph.entity_type(partner_type).name.clone())
    }

    fn is_navigation_multiple(&self, path: &str, property_name: &str) -> Result<bool> {
        let nav = self
            .graph
            .navigation_property(self.find_navigation_property(path, property_name)?);
        let multiplicity = match nav.partner {
            Some(partner) => self.graph.navigation_property(partner).multiplicity,
            None => nav.target_multiplicity,
        };
        Ok(multiplicity == Multiplicity::Many)
    }

    fn declared_key_property_names(&self, path: &str) -> Result<Vec<String>> {
        let ty = self.resolve_entity_type(path)?;
        let key = self
            .graph
            .ancestors(ty)
            .filter_map(|t| self.graph.entity_type(t).declared_key.as_ref())
            .find(|key| !key.is_empty());

        Ok(key
            .map(|key| {
                key.iter()
                    .map(|&p| self.graph.property(p).name.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn resolve_function_name(&self, function_name: &str) -> Result<String> {
        let function = self.find_function_import(function_name)?;
        Ok(self.graph.function_import(function).name.clone())
    }

    fn function_return_type(&self, function_name: &str) -> Result<Option<String>> {
        let function = self.find_function_import(function_name)?;
        Ok(self.graph.function_import(function).return_type.clone())
    }
}

/// Split on the first '/' into (left, right)
fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((left, right)) => (left, Some(right)),
        None => (path, None),
    }
}

/// Right segment of a path; only one level of derivation is addressable
fn single_segment(segment: &str) -> Result<&str> {
    if segment.is_empty() || segment.contains('/') {
        return Err(ODataError::not_found(segment, ObjectCategory::EntityType));
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metadata::parser::{CsdlParser, SchemaParser};
    use crate::api::metadata::SchemaGraph;
    use crate::api::pluralization::PluralizationPolicy;
    use crate::api::test_fixtures::{V3_METADATA, V4_METADATA};

    fn metadata_from(text: &str) -> SchemaMetadata {
        let graph = CsdlParser.parse(text).unwrap();
        SchemaMetadata::new(Arc::new(graph), NameMatcher::default())
    }

    fn assert_not_found(
        result: Result<impl fmt::Debug>,
        identifier: &str,
        category: ObjectCategory,
    ) {
        match result {
            Err(ODataError::ObjectNotFound {
                identifier: id,
                category: cat,
            }) => {
                assert_eq!(id, identifier);
                assert_eq!(cat, category);
            }
            other => panic!("expected ObjectNotFound for {}, got {:?}", identifier, other),
        }
    }

    /// Products -> Product : Item (key Id); Item itself has no set
    fn inherited_key_schema() -> SchemaMetadata {
        let mut b = SchemaGraph::builder();
        let container = b.add_container("Default", "Shop");
        let item = b.add_entity_type("Shop", "Item");
        b.add_property(item, "Id", "Edm.Int32");
        b.set_key(item, &["Id"]);
        let product = b.add_entity_type("Shop", "Product");
        b.add_property(product, "Title", "Edm.String");
        b.set_base_type(product, item);
        b.add_entity_set(container, "Products", product);
        SchemaMetadata::new(Arc::new(b.build().unwrap()), NameMatcher::default())
    }

    #[test]
    fn test_key_inherited_from_nearest_ancestor() {
        let metadata = inherited_key_schema();
        assert_eq!(
            metadata.declared_key_property_names("Products").unwrap(),
            vec!["Id"]
        );
        assert_eq!(
            metadata.structural_property_names("Products").unwrap(),
            vec!["Id", "Title"]
        );
    }

    #[test]
    fn test_missing_key_is_empty_not_error() {
        let metadata = metadata_from(V4_METADATA);
        assert!(metadata.declared_key_property_names("Notes").unwrap().is_empty());
    }

    #[test]
    fn test_empty_declared_key_defers_to_ancestor() {
        let mut b = SchemaGraph::builder();
        let container = b.add_container("Default", "Shop");
        let base = b.add_entity_type("Shop", "Base");
        b.add_property(base, "Code", "Edm.String");
        b.set_key(base, &["Code"]);
        let child = b.add_entity_type("Shop", "Child");
        b.set_base_type(child, base);
        b.set_key::<&str>(child, &[]);
        b.add_entity_set(container, "Children", child);
        let metadata = SchemaMetadata::new(Arc::new(b.build().unwrap()), NameMatcher::default());

        assert_eq!(
            metadata.declared_key_property_names("Children").unwrap(),
            vec!["Code"]
        );
    }

    #[test]
    fn test_entity_set_name_variants_resolve_to_canonical() {
        let metadata = metadata_from(V4_METADATA);
        let pluralizer = PluralizationPolicy::English.pluralizer();

        for name in metadata.entity_set_names() {
            let singular = pluralizer.singularize(&name);
            let variants = [
                name.clone(),
                name.to_lowercase(),
                name.to_uppercase(),
                singular.clone(),
                singular.to_lowercase(),
                pluralizer.pluralize(&singular),
            ];
            for variant in variants {
                assert_eq!(
                    metadata.resolve_entity_set_name(&variant).unwrap(),
                    name,
                    "variant {} of {}",
                    variant,
                    name
                );
            }
        }
    }

    #[test]
    fn test_entity_set_with_derived_segment() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(
            metadata.resolve_entity_set_name("products/books").unwrap(),
            "Products"
        );
        assert_not_found(
            metadata.resolve_entity_set_name("Products/Customer"),
            "Customer",
            ObjectCategory::EntityType,
        );
    }

    #[test]
    fn test_derived_path_must_be_direct_derivation() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(metadata.resolve_entity_type_name("Products/Book").unwrap(), "Book");
        assert_eq!(metadata.resolve_entity_type_name("Products/gadget").unwrap(), "Gadget");

        // Ebook derives from Book, not directly from Product
        assert_not_found(
            metadata.resolve_entity_type_name("Products/Ebook"),
            "Ebook",
            ObjectCategory::EntityType,
        );
        assert_not_found(
            metadata.resolve_entity_type_name("Products/Order"),
            "Order",
            ObjectCategory::EntityType,
        );
    }

    #[test]
    fn test_nested_path_is_rejected() {
        let metadata = metadata_from(V4_METADATA);
        assert_not_found(
            metadata.resolve_entity_type_name("Products/Bo/ok"),
            "Bo/ok",
            ObjectCategory::EntityType,
        );
        assert_not_found(
            metadata.resolve_entity_type_name("Products/Book/"),
            "Book/",
            ObjectCategory::EntityType,
        );
        assert_not_found(
            metadata.resolve_entity_type_name("Products/"),
            "",
            ObjectCategory::EntityType,
        );
        assert_not_found(
            metadata.resolve_entity_set_name("Products/Book/Ebook"),
            "Book/Ebook",
            ObjectCategory::EntityType,
        );
        assert_eq!(metadata.resolve_entity_set_name("Products/Book").unwrap(), "Products");
    }

    #[test]
    fn test_bare_type_fallback_is_one_level() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(metadata.resolve_entity_type_name("Book").unwrap(), "Book");
        assert_eq!(metadata.resolve_entity_type_namespace("Book").unwrap(), "Demo");
        assert_eq!(metadata.resolve_entity_type_name("Book/Ebook").unwrap(), "Ebook");

        assert_not_found(
            metadata.resolve_entity_type_name("Ebook"),
            "Ebook",
            ObjectCategory::EntitySet,
        );
        assert_not_found(
            metadata.resolve_entity_type_name("Ghost"),
            "Ghost",
            ObjectCategory::EntitySet,
        );
        assert_not_found(
            metadata.resolve_entity_type_name("Item"),
            "Item",
            ObjectCategory::EntitySet,
        );
    }

    #[test]
    fn test_entity_set_requires_a_set() {
        let metadata = metadata_from(V4_METADATA);
        assert_not_found(
            metadata.resolve_entity_set_name("Book"),
            "Book",
            ObjectCategory::EntitySet,
        );
    }

    #[test]
    fn test_exact_type_name_ignores_reachability() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(metadata.resolve_entity_type_exact_name("ghosts").unwrap(), "Ghost");
        assert_eq!(metadata.resolve_entity_type_exact_name("ebook").unwrap(), "Ebook");
    }

    #[test]
    fn test_resolve_derived_type_name() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(
            metadata.resolve_derived_type_name("Products", "books").unwrap(),
            "Book"
        );
        assert_not_found(
            metadata.resolve_derived_type_name("Products", "Ebook"),
            "Ebook",
            ObjectCategory::EntityType,
        );
        assert_not_found(
            metadata.resolve_derived_type_name("Widgets", "Book"),
            "Widgets",
            ObjectCategory::EntitySet,
        );
    }

    #[test]
    fn test_structural_properties_include_inherited() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(
            metadata.structural_property_names("Products/Book").unwrap(),
            vec!["Id", "Name", "Price", "Rating", "Isbn"]
        );
        assert!(metadata.has_structural_property("Products", "price").unwrap());
        assert!(!metadata.has_structural_property("Products", "Isbn").unwrap());
        assert_eq!(
            metadata
                .resolve_structural_property_name("Products/Book", "ISBN")
                .unwrap(),
            "Isbn"
        );
        assert_not_found(
            metadata.resolve_structural_property_name("Products", "Weight"),
            "Weight",
            ObjectCategory::StructuralProperty,
        );
    }

    #[test]
    fn test_concurrency_check() {
        let metadata = metadata_from(V3_METADATA);
        assert!(metadata.requires_concurrency_check("Products").unwrap());
        assert!(!metadata.requires_concurrency_check("Categories").unwrap());
        // inherited from Product
        assert!(metadata.requires_concurrency_check("FeaturedProduct").unwrap());
    }

    #[test]
    fn test_navigation_property_case_insensitive() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(
            metadata
                .resolve_navigation_property_name("Orders", "customer")
                .unwrap(),
            "Customer"
        );
        assert!(metadata.has_navigation_property("Customers", "order").unwrap());
        assert!(!metadata.has_navigation_property("Customers", "Invoices").unwrap());
        assert_not_found(
            metadata.resolve_navigation_property_name("Orders", "Invoice"),
            "Invoice",
            ObjectCategory::NavigationProperty,
        );
    }

    #[test]
    fn test_navigation_partner_and_multiplicity_v4() {
        let metadata = metadata_from(V4_METADATA);
        assert_eq!(
            metadata.navigation_partner_type_name("Customers", "Orders").unwrap(),
            "Order"
        );
        assert!(metadata.is_navigation_multiple("Customers", "Orders").unwrap());
        assert_eq!(
            metadata.navigation_partner_type_name("Orders", "Customer").unwrap(),
            "Customer"
        );
        assert!(!metadata.is_navigation_multiple("Orders", "Customer").unwrap());

        // unpaired navigation falls back to its own target
        assert_eq!(
            metadata.navigation_partner_type_name("Orders", "Lines").unwrap(),
            "Product"
        );
        assert!(metadata.is_navigation_multiple("Orders", "Lines").unwrap());

        // navigation inherited from Product is visible on Book
        assert!(!metadata.is_navigation_multiple("Products/Book", "Category").unwrap());
    }

    #[test]
    fn test_navigation_partner_and_multiplicity_v3() {
        let metadata = metadata_from(V3_METADATA);
        assert_eq!(
            metadata.navigation_partner_type_name("Categories", "Products").unwrap(),
            "Product"
        );
        assert!(metadata.is_navigation_multiple("Categories", "Products").unwrap());
        assert!(!metadata.is_navigation_multiple("Products", "Category").unwrap());
        assert_eq!(
            metadata.navigation_partner_type_name("Products", "Supplier").unwrap(),
            "Supplier"
        );
        assert!(!metadata.is_navigation_multiple("Products", "Supplier").unwrap());
    }

    #[test]
    fn test_function_resolution() {
        let metadata = metadata_from(V3_METADATA);
        assert_eq!(
            metadata.resolve_function_name("getproductsbyrating").unwrap(),
            "GetProductsByRating"
        );
        assert_not_found(
            metadata.resolve_function_name("GetTopProducts"),
            "GetTopProducts",
            ObjectCategory::Function,
        );
    }

    #[test]
    fn test_function_return_type() {
        let v3 = metadata_from(V3_METADATA);
        assert_eq!(
            v3.function_return_type("GetProductsByRating").unwrap().as_deref(),
            Some("Collection(ODataDemo.Product)")
        );

        // v4 imports take the return type from the referenced function
        let v4 = metadata_from(V4_METADATA);
        assert_eq!(
            v4.function_return_type("getbestsellers").unwrap().as_deref(),
            Some("Collection(Demo.Product)")
        );
        assert_not_found(
            v4.function_return_type("GetWorstSellers"),
            "GetWorstSellers",
            ObjectCategory::Function,
        );
    }

    #[test]
    fn test_ambiguous_match_is_reported() {
        let mut b = SchemaGraph::builder();
        let container = b.add_container("Default", "Shop");
        let item = b.add_entity_type("Shop", "Item");
        b.add_entity_set(container, "Item", item);
        b.add_entity_set(container, "Items", item);
        let metadata = SchemaMetadata::new(Arc::new(b.build().unwrap()), NameMatcher::default());

        match metadata.resolve_entity_set_name("items") {
            Err(ODataError::AmbiguousMatch {
                category,
                candidates,
                ..
            }) => {
                assert_eq!(category, ObjectCategory::EntitySet);
                assert_eq!(candidates, vec!["Item", "Items"]);
            }
            other => panic!("expected AmbiguousMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_pluralization_policy_is_injected() {
        let graph = Arc::new(CsdlParser.parse(V4_METADATA).unwrap());
        let strict = SchemaMetadata::new(
            graph,
            NameMatcher::from_policy(PluralizationPolicy::None),
        );
        assert_eq!(strict.resolve_entity_set_name("ORDERS").unwrap(), "Orders");
        assert_not_found(
            strict.resolve_entity_set_name("Order"),
            "Order",
            ObjectCategory::EntitySet,
        );
    }

    #[test]
    fn test_concurrent_queries_share_graph() {
        let metadata: Arc<dyn Metadata> = Arc::new(metadata_from(V4_METADATA));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metadata = Arc::clone(&metadata);
                std::thread::spawn(move || {
                    (
                        metadata.resolve_entity_set_name("customer").unwrap(),
                        metadata.declared_key_property_names("Products").unwrap(),
                    )
                })
            })
            .collect();

        for handle in handles {
            let (set, key) = handle.join().unwrap();
            assert_eq!(set, "Customers");
            assert_eq!(key, vec!["Id"]);
        }
    }
}
