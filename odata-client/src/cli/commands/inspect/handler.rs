//! Inspect command handler

use anyhow::{Context, Result};
use colored::*;
use log::{debug, warn};
use serde_json::{Value, json};
use std::fs;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::ResolveCommands;
use crate::api::{AdapterFactory, ODataAdapter};
use crate::cli::commands::Commands;
use crate::cli::{Cli, SourceArgs};
use crate::config::{ClientSettings, default_config_path};

/// Negotiate an adapter for the configured service and run the command
pub async fn handle_command(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = resolve_settings(&cli.source, |key| std::env::var(key).ok())?;
    let adapter = load_adapter(&cli.source, &settings).await?;

    let value = execute(&cli.command, adapter.as_ref())?;
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialize output")?
        );
    } else {
        print_text(&cli.command, &value);
    }
    Ok(())
}

/// Settings file, then environment, then command-line flags
pub fn resolve_settings<F>(args: &SourceArgs, lookup: F) -> Result<ClientSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = match &args.config {
        Some(path) => ClientSettings::from_toml_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                ClientSettings::from_toml_file(&path)?
            } else {
                debug!("No settings file at {}", path.display());
                ClientSettings::default()
            }
        }
    };

    let mut settings = settings.overlay_env(lookup)?;

    if let Some(url) = &args.url {
        settings.base_url = url.clone();
    }
    if let Some(token) = &args.token {
        settings.credentials = crate::api::Credentials::Bearer {
            token: token.clone(),
        };
    } else if let Some(username) = &args.user {
        settings.credentials = crate::api::Credentials::Basic {
            username: username.clone(),
            password: args.password.clone().unwrap_or_default(),
        };
    }
    if let Some(policy) = args.pluralization {
        settings.pluralization = policy;
    }
    if let Some(secs) = args.timeout {
        settings.request_timeout_secs = secs;
    }

    Ok(settings)
}

async fn load_adapter(
    args: &SourceArgs,
    settings: &ClientSettings,
) -> Result<Arc<dyn ODataAdapter>> {
    let factory = AdapterFactory::new(settings).context("Failed to create HTTP client")?;

    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
        return factory
            .negotiate_from_document(&text)
            .with_context(|| format!("Failed to load metadata from {}", path.display()));
    }

    if settings.base_url.trim().is_empty() {
        anyhow::bail!(
            "No service URL. Use --url, set ODATA_URL, or pass --file with a $metadata document"
        );
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling metadata request");
            trigger.cancel();
        }
    });

    let result = factory
        .negotiate(&cancel)
        .await
        .with_context(|| format!("Failed to negotiate with {}", factory.metadata_url()));
    ctrl_c.abort();
    result
}

/// Run a command against the adapter's metadata and return its result as JSON
pub fn execute(command: &Commands, adapter: &dyn ODataAdapter) -> Result<Value> {
    let metadata = adapter.metadata();

    let value = match command {
        Commands::Version => json!({
            "adapter": adapter.adapter_version(),
            "protocol_version": adapter.protocol_version(),
        }),
        Commands::Sets => json!(metadata.entity_set_names()),
        Commands::Keys { path } => json!(metadata.declared_key_property_names(path)?),
        Commands::Properties { path } => json!(metadata.structural_property_names(path)?),
        Commands::Concurrency { path } => json!(metadata.requires_concurrency_check(path)?),
        Commands::Partner { path, navigation } => {
            let resolved = metadata.resolve_navigation_property_name(path, navigation)?;
            json!({
                "navigation": resolved,
                "partner_type": metadata.navigation_partner_type_name(path, navigation)?,
                "multiple": metadata.is_navigation_multiple(path, navigation)?,
            })
        }
        Commands::Function { name } => json!({
            "function": metadata.resolve_function_name(name)?,
            "return_type": metadata.function_return_type(name)?,
        }),
        Commands::Resolve { target } => {
            let resolved = match target {
                ResolveCommands::Set { path } => metadata.resolve_entity_set_name(path)?,
                ResolveCommands::Type { path } => metadata.resolve_entity_type_name(path)?,
                ResolveCommands::Namespace { path } => {
                    metadata.resolve_entity_type_namespace(path)?
                }
                ResolveCommands::ExactType { name } => {
                    metadata.resolve_entity_type_exact_name(name)?
                }
                ResolveCommands::Derived { set, type_name } => {
                    metadata.resolve_derived_type_name(set, type_name)?
                }
                ResolveCommands::Property { path, name } => {
                    metadata.resolve_structural_property_name(path, name)?
                }
                ResolveCommands::Navigation { path, name } => {
                    metadata.resolve_navigation_property_name(path, name)?
                }
                ResolveCommands::Function { name } => metadata.resolve_function_name(name)?,
            };
            json!(resolved)
        }
    };

    Ok(value)
}

fn print_text(command: &Commands, value: &Value) {
    match (command, value) {
        (Commands::Version, _) => {
            println!(
                "{} {}",
                "Adapter:".bold(),
                value["adapter"].as_str().unwrap_or_default().bright_green()
            );
            println!(
                "{} {}",
                "Protocol:".bold(),
                value["protocol_version"].as_str().unwrap_or_default().cyan()
            );
        }
        (Commands::Partner { .. }, _) => {
            println!(
                "{} {}",
                "Navigation:".bold(),
                value["navigation"].as_str().unwrap_or_default().cyan()
            );
            println!(
                "{} {}",
                "Partner type:".bold(),
                value["partner_type"].as_str().unwrap_or_default().bright_green()
            );
            let multiple = value["multiple"].as_bool().unwrap_or_default();
            println!(
                "{} {}",
                "Collection:".bold(),
                if multiple { "yes".yellow() } else { "no".dimmed() }
            );
        }
        (Commands::Function { .. }, _) => {
            println!(
                "{} {}",
                "Function:".bold(),
                value["function"].as_str().unwrap_or_default().cyan()
            );
            println!(
                "{} {}",
                "Returns:".bold(),
                value["return_type"].as_str().unwrap_or("(nothing)").bright_green()
            );
        }
        (_, Value::Array(items)) => {
            if items.is_empty() {
                println!("{}", "(none)".dimmed());
            }
            for item in items {
                println!("{}", item.as_str().unwrap_or_default());
            }
        }
        (_, Value::Bool(flag)) => {
            println!("{}", if *flag { "yes".yellow() } else { "no".dimmed() });
        }
        (_, Value::String(name)) => println!("{}", name.bright_green()),
        (_, other) => println!("{}", other),
    }
}
