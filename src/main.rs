use anyhow::Result;
use clap::Parser;

mod api;
mod cli;
mod config;
mod engine;
mod lander;
mod monitoring;
mod wallet;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::args::Cli::parse();
    cli::run(cli).await
}
