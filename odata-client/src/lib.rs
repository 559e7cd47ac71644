//! OData metadata resolution and protocol adapter negotiation

pub mod api;
pub mod cli;
pub mod config;

pub use api::{AdapterFactory, Metadata, ODataAdapter, ODataError};
pub use config::ClientSettings;
