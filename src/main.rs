mod auth;
mod cli;
mod core;
mod error;
mod loader;
mod mock;
mod models;
mod output;
mod providers;
mod settings;
mod views;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting AdoLens - Azure DevOps Dashboard");
    cli.execute().await?;

    Ok(())
}
