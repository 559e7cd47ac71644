//! Name resolution and schema inspection commands

pub mod handler;

use clap::Subcommand;

pub use handler::{execute, handle_command};

#[derive(Subcommand, Debug, Clone)]
pub enum ResolveCommands {
    /// Entity set name
    Set { path: String },
    /// Entity type name of a set or `Set/DerivedType` path
    Type { path: String },
    /// Namespace of the resolved entity type
    Namespace { path: String },
    /// Exact entity type name, searched across all types
    ExactType { name: String },
    /// Type derived directly from the set's element type
    Derived { set: String, type_name: String },
    /// Structural property name
    Property { path: String, name: String },
    /// Navigation property name
    Navigation { path: String, name: String },
    /// Function import name
    Function { name: String },
}
