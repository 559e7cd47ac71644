use anyhow::Result;
use clap::Parser;

use odata_client::cli::Cli;
use odata_client::cli::commands::inspect::handle_command;

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so load it before the logger
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    handle_command(cli).await
}
