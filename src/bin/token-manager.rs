use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use token_manager::config::proc_loader::file_to_config;
use token_manager::manager::TokenManager;
use token_manager::observability::metrics::get_metrics;
use token_manager::utils::logging;
use token_manager::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-manager.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    /// dump prometheus metrics to stderr before exit
    #[arg(long)]
    print_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current access token (memory, storage, then issuer)
    Token,
    /// Request a new access token from the issuer and print it
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let config = file_to_config(Path::new(&args.config)).await?;
    logging::run(&config, args.log_level);

    // -------------------------------
    // 2. Build manager: issuer + storage
    // -------------------------------

    let manager = TokenManager::from_config(&config)?;
    info!("token manager ready, app '{}', storage '{}'", manager.app_id(), manager.storage().kind());

    // -------------------------------
    // 3. Resolve token
    // -------------------------------

    let token = match args.command {
        Command::Token => manager.token().await?,
        Command::Refresh => manager.refresh().await?,
    };
    println!("{}", token);

    if args.print_metrics || config.metrics.is_enabled {
        eprintln!("{}", get_metrics().await.render()?);
    }

    Ok(())
}
