//! Command-line interface for inspecting an OData service

pub mod commands;

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::api::pluralization::PluralizationPolicy;
use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "odata-cli")]
#[command(about = "Negotiate an OData service's protocol and resolve names against its metadata")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where metadata comes from and how to reach the service
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Service root URL (overrides config and ODATA_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Read a local $metadata document instead of fetching it
    #[arg(long, short = 'f', global = true, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Username for HTTP basic authentication
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(long, global = true, requires = "user")]
    pub password: Option<String>,

    /// Bearer token
    #[arg(long, global = true, conflicts_with = "user")]
    pub token: Option<String>,

    /// How requested names are pluralized when matching
    #[arg(long, global = true, value_enum)]
    pub pluralization: Option<PluralizationPolicy>,

    /// Metadata request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}
