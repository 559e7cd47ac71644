//! CLI subcommands

pub mod inspect;

use clap::Subcommand;

pub use inspect::ResolveCommands;

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the negotiated protocol family and version
    Version,
    /// List entity set names
    Sets,
    /// Resolve a loosely spelled name to its declared form
    Resolve {
        #[command(subcommand)]
        target: ResolveCommands,
    },
    /// Key property names of an entity type, inherited keys included
    Keys {
        /// Entity set or type path, e.g. `Products` or `Products/Book`
        path: String,
    },
    /// Structural property names of an entity type
    Properties { path: String },
    /// Whether an entity type carries a concurrency token
    Concurrency { path: String },
    /// Type on the far side of a navigation and whether it is a collection
    Partner { path: String, navigation: String },
    /// Function import name and return type
    Function { name: String },
}
