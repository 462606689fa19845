use clap::{Parser, Subcommand};
use colored::*;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process;

mod cli;

use cli::products::ProductsCommands;
use vitrine_cli::config::Config;
use vitrine_cli::error::AppResult;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Vitrine - live product catalog server")]
#[command(version)]
struct Cli {
    /// Catalog file (overrides VITRINE_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the catalog server (REST, WebSocket and SSE)
    Serve {
        /// Port to listen on (overrides VITRINE_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides VITRINE_HOST)
        #[arg(long)]
        host: Option<IpAddr>,
        /// Directory of static files served at the root (overrides VITRINE_STATIC_DIR)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Inspect or edit the catalog file directly (stop the server first)
    #[command(subcommand)]
    Products(ProductsCommands),
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    vitrine_cli::logging::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> AppResult<()> {
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let config = config.with_overrides(port, host, cli.catalog, static_dir)?;
            println!(
                "{} http://{}",
                "Starting Vitrine on".green().bold(),
                config.socket_addr()
            );
            vitrine_cli::server::run_server(config).await
        }
        Commands::Products(products_cmd) => {
            let catalog_path = cli.catalog.unwrap_or(config.catalog_path);
            cli::products::handle_products_command(products_cmd, catalog_path).await
        }
    }
}
