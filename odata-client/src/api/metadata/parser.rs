//! CSDL (EDMX) metadata document parsing
//!
//! Understands both navigation styles found in the wild:
//! - v1-v3: `NavigationProperty` with `Relationship`/`FromRole`/`ToRole`,
//!   resolved through the schema's `Association` ends
//! - v4: `NavigationProperty` with `Type` (possibly `Collection(...)`) and
//!   an optional `Partner` naming the inverse property

use std::collections::HashMap;
use std::fmt;

use quick_xml::events::Event;
use roxmltree::{Document, Node};

use super::builder::SchemaGraphBuilder;
use super::model::{ConcurrencyMode, Multiplicity, NavigationId, SchemaGraph, TypeId};
use crate::api::constants::VERSION_ATTRIBUTE;
use crate::api::error::SchemaParseError;

/// Turns a metadata document into a schema graph
pub trait SchemaParser: Send + Sync + fmt::Debug {
    fn parse(&self, text: &str) -> Result<SchemaGraph, SchemaParseError>;
}

/// Default parser for CSDL documents of every supported protocol version
#[derive(Debug, Clone, Copy, Default)]
pub struct CsdlParser;

impl SchemaParser for CsdlParser {
    fn parse(&self, text: &str) -> Result<SchemaGraph, SchemaParseError> {
        let doc = Document::parse(text)?;
        let mut ctx = ParseContext::default();

        let schemas: Vec<Node> = doc
            .root_element()
            .descendants()
            .filter(|n| is_element(n, "Schema"))
            .collect();
        if schemas.is_empty() {
            return Err(SchemaParseError::new(
                "Metadata document does not contain any Schema element",
            ));
        }

        for schema in &schemas {
            ctx.declare_types(schema)?;
            ctx.collect_associations(schema)?;
            ctx.collect_functions(schema);
        }
        for schema in &schemas {
            ctx.define_types(schema)?;
        }
        ctx.link_navigation_partners();
        for schema in &schemas {
            ctx.define_containers(schema)?;
        }

        ctx.builder.build()
    }
}

/// Read the root element's `Version` attribute without parsing the document body
pub fn read_document_version(text: &str) -> Result<Option<String>, SchemaParseError> {
    let mut reader = quick_xml::Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| {
                        SchemaParseError::new(format!("Invalid root attribute: {}", err))
                    })?;
                    if attr.key.local_name().as_ref() == VERSION_ATTRIBUTE.as_bytes() {
                        let value = std::str::from_utf8(&attr.value).map_err(|err| {
                            SchemaParseError::new(format!(
                                "Version attribute is not UTF-8: {}",
                                err
                            ))
                        })?;
                        return Ok(Some(value.trim().to_string()));
                    }
                }
                return Ok(None);
            }
            Ok(Event::Eof) => {
                return Err(SchemaParseError::new(
                    "Metadata document has no root element",
                ));
            }
            Ok(_) => continue,
            Err(err) => {
                return Err(SchemaParseError::new(format!(
                    "Malformed metadata document at byte {}: {}",
                    reader.buffer_position(),
                    err
                )));
            }
        }
    }
}

/// One end of a v3 association
#[derive(Debug, Clone)]
struct AssociationEnd {
    type_name: String,
    multiplicity: Multiplicity,
}

/// v3 navigation property awaiting partner resolution
#[derive(Debug, Clone)]
struct RoleNavigation {
    id: NavigationId,
    relationship: String,
    from_role: String,
    to_role: String,
}

#[derive(Default)]
struct ParseContext {
    builder: SchemaGraphBuilder,
    /// "Namespace.Name" and "Alias.Name" -> type
    types: HashMap<String, TypeId>,
    /// qualified association name -> role -> end
    associations: HashMap<String, HashMap<String, AssociationEnd>>,
    /// qualified function name -> return type (v4 function imports)
    function_returns: HashMap<String, Option<String>>,
    role_navigations: Vec<RoleNavigation>,
    /// (navigation, partner property name) for v4 `Partner` attributes
    partner_navigations: Vec<(NavigationId, String)>,
}

impl ParseContext {
    fn declare_types(&mut self, schema: &Node) -> Result<(), SchemaParseError> {
        let namespace = required_attr(schema, "Namespace")?;
        let alias = schema.attribute("Alias");

        for node in schema.children().filter(|n| is_element(n, "EntityType")) {
            let name = required_attr(&node, "Name")?;
            let id = self.builder.add_entity_type(namespace, name);
            self.types.insert(format!("{}.{}", namespace, name), id);
            if let Some(alias) = alias {
                self.types.insert(format!("{}.{}", alias, name), id);
            }
        }
        Ok(())
    }

    fn collect_associations(&mut self, schema: &Node) -> Result<(), SchemaParseError> {
        let namespace = required_attr(schema, "Namespace")?;
        let alias = schema.attribute("Alias");

        for node in schema.children().filter(|n| is_element(n, "Association")) {
            let name = required_attr(&node, "Name")?;
            let mut ends = HashMap::new();
            for end in node.children().filter(|n| is_element(n, "End")) {
                let role = required_attr(&end, "Role")?;
                let raw = required_attr(&end, "Multiplicity")?;
                let multiplicity = Multiplicity::from_association_end(raw).ok_or_else(|| {
                    error_at(&end, format!("Unknown association multiplicity '{}'", raw))
                })?;
                ends.insert(
                    role.to_string(),
                    AssociationEnd {
                        type_name: required_attr(&end, "Type")?.to_string(),
                        multiplicity,
                    },
                );
            }
            if let Some(alias) = alias {
                self.associations
                    .insert(format!("{}.{}", alias, name), ends.clone());
            }
            self.associations
                .insert(format!("{}.{}", namespace, name), ends);
        }
        Ok(())
    }

    fn collect_functions(&mut self, schema: &Node) {
        let Some(namespace) = schema.attribute("Namespace") else {
            return;
        };
        for node in schema.children().filter(|n| is_element(n, "Function")) {
            let Some(name) = node.attribute("Name") else {
                continue;
            };
            let return_type = node
                .children()
                .find(|n| is_element(n, "ReturnType"))
                .and_then(|n| n.attribute("Type"))
                .map(str::to_string);
            self.function_returns
                .insert(format!("{}.{}", namespace, name), return_type);
        }
    }

    fn define_types(&mut self, schema: &Node) -> Result<(), SchemaParseError> {
        let namespace = required_attr(schema, "Namespace")?;

        for node in schema.children().filter(|n| is_element(n, "EntityType")) {
            let name = required_attr(&node, "Name")?;
            let id = self.lookup_type(&node, &format!("{}.{}", namespace, name))?;

            if let Some(base) = node.attribute("BaseType") {
                let base_id = self.lookup_type(&node, base)?;
                self.builder.set_base_type(id, base_id);
            }

            for child in node.children().filter(Node::is_element) {
                match child.tag_name().name() {
                    "Key" => {
                        let names: Vec<&str> = child
                            .children()
                            .filter(|n| is_element(n, "PropertyRef"))
                            .map(|n| required_attr(&n, "Name"))
                            .collect::<Result<_, _>>()?;
                        self.builder.set_key(id, &names);
                    }
                    "Property" => self.define_property(id, &child)?,
                    "NavigationProperty" => self.define_navigation(id, &child)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn define_property(&mut self, owner: TypeId, node: &Node) -> Result<(), SchemaParseError> {
        let property = self.builder.add_property(
            owner,
            required_attr(node, "Name")?,
            required_attr(node, "Type")?,
        );
        if node.attribute("Nullable") == Some("false") {
            self.builder.set_nullable(property, false);
        }
        if node.attribute("ConcurrencyMode") == Some("Fixed") {
            self.builder
                .set_concurrency_mode(property, ConcurrencyMode::Fixed);
        }
        Ok(())
    }

    fn define_navigation(&mut self, owner: TypeId, node: &Node) -> Result<(), SchemaParseError> {
        let name = required_attr(node, "Name")?;

        if let Some(relationship) = node.attribute("Relationship") {
            let from_role = required_attr(node, "FromRole")?;
            let to_role = required_attr(node, "ToRole")?;
            let ends = self.associations.get(relationship).ok_or_else(|| {
                error_at(node, format!("Unknown association '{}'", relationship))
            })?;
            let (Some(from), Some(to)) = (ends.get(from_role), ends.get(to_role)) else {
                return Err(error_at(
                    node,
                    format!(
                        "Association '{}' has no roles '{}' and '{}'",
                        relationship, from_role, to_role
                    ),
                ));
            };
            let (from_multiplicity, to) = (from.multiplicity, to.clone());

            let target = self.lookup_type(node, &to.type_name)?;
            let id = self
                .builder
                .add_navigation(owner, name, target, to.multiplicity);
            self.builder.set_navigation_multiplicity(id, from_multiplicity);
            self.role_navigations.push(RoleNavigation {
                id,
                relationship: relationship.to_string(),
                from_role: from_role.to_string(),
                to_role: to_role.to_string(),
            });
            return Ok(());
        }

        let raw_type = required_attr(node, "Type")?;
        let (type_name, target_multiplicity) = match unwrap_collection(raw_type) {
            Some(inner) => (inner, Multiplicity::Many),
            None if node.attribute("Nullable") == Some("false") => (raw_type, Multiplicity::One),
            None => (raw_type, Multiplicity::ZeroOrOne),
        };
        let target = self.lookup_type(node, type_name)?;
        let id = self
            .builder
            .add_navigation(owner, name, target, target_multiplicity);
        if let Some(partner) = node.attribute("Partner") {
            self.partner_navigations.push((id, partner.to_string()));
        }
        Ok(())
    }

    fn link_navigation_partners(&mut self) {
        let role_navigations = std::mem::take(&mut self.role_navigations);
        for nav in &role_navigations {
            let inverse = role_navigations.iter().find(|other| {
                other.relationship == nav.relationship
                    && other.from_role == nav.to_role
                    && other.to_role == nav.from_role
                    && other.id != nav.id
            });
            if let Some(inverse) = inverse {
                self.builder.link_partners(nav.id, inverse.id);
            }
        }

        let partner_navigations = std::mem::take(&mut self.partner_navigations);
        for (id, partner_name) in partner_navigations {
            let target = self.builder.navigation(id).target_type;
            match self.find_navigation_in_hierarchy(target, &partner_name) {
                Some(partner) => {
                    self.builder.link_partners(id, partner);
                }
                None => log::warn!(
                    "Navigation partner {} not found on target type, leaving {} unpaired",
                    partner_name,
                    self.builder.navigation(id).name
                ),
            }
        }
    }

    fn find_navigation_in_hierarchy(&self, start: TypeId, name: &str) -> Option<NavigationId> {
        let mut current = Some(start);
        while let Some(t) = current {
            if let Some((id, _)) = self
                .builder
                .navigation_properties_of(t)
                .into_iter()
                .find(|(_, nav)| nav.name == name)
            {
                return Some(id);
            }
            current = self.builder.base_type_of(t);
        }
        None
    }

    fn define_containers(&mut self, schema: &Node) -> Result<(), SchemaParseError> {
        let namespace = required_attr(schema, "Namespace")?;

        for node in schema.children().filter(|n| is_element(n, "EntityContainer")) {
            let container = self
                .builder
                .add_container(required_attr(&node, "Name")?, namespace);

            for child in node.children().filter(Node::is_element) {
                match child.tag_name().name() {
                    "EntitySet" => {
                        let element_type =
                            self.lookup_type(&child, required_attr(&child, "EntityType")?)?;
                        self.builder.add_entity_set(
                            container,
                            required_attr(&child, "Name")?,
                            element_type,
                        );
                    }
                    "FunctionImport" => {
                        let return_type = match child.attribute("ReturnType") {
                            Some(rt) => Some(rt.to_string()),
                            None => child
                                .attribute("Function")
                                .and_then(|f| self.function_returns.get(f).cloned())
                                .flatten(),
                        };
                        self.builder.add_function_import(
                            container,
                            required_attr(&child, "Name")?,
                            return_type,
                        );
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn lookup_type(&self, node: &Node, qualified_name: &str) -> Result<TypeId, SchemaParseError> {
        self.types.get(qualified_name).copied().ok_or_else(|| {
            error_at(
                node,
                format!("Reference to unknown entity type '{}'", qualified_name),
            )
        })
    }
}

fn is_element(node: &Node, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

fn required_attr<'a>(node: &Node<'a, '_>, name: &str) -> Result<&'a str, SchemaParseError> {
    node.attribute(name).ok_or_else(|| {
        error_at(
            node,
            format!(
                "Element {} is missing attribute {}",
                node.tag_name().name(),
                name
            ),
        )
    })
}

/// "Collection(NS.Order)" -> "NS.Order"
fn unwrap_collection(type_name: &str) -> Option<&str> {
    type_name
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
}

fn error_at(node: &Node, message: String) -> SchemaParseError {
    let pos = node.document().text_pos_at(node.range().start);
    SchemaParseError::at(message, pos.row, pos.col)
}
