use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use navsphere_engine::{ContentStore, MemoryStore, NavigationService, SiteConfigService};
use navsphere_server::{AdminConfig, AdminServer, github_store, load_config, load_config_from_path, resolve_bind_address};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "navsphere", version, about = "Admin backend for NavSphere navigation sites")]
struct Cli {
    /// Path to the JSON config file (defaults to NAVSPHERE_CONFIG_PATH or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the admin HTTP API
    Serve {
        /// Socket address to listen on, overriding the config file
        #[arg(long)]
        bind: Option<String>,
        /// Keep content in memory instead of committing to GitHub
        #[arg(long)]
        in_memory: bool,
    },
    /// Inspect the navigation document
    Nav {
        #[command(subcommand)]
        command: NavCommand,
    },
    /// Inspect the site configuration document
    Site {
        #[command(subcommand)]
        command: SiteCommand,
    },
}

#[derive(Debug, Subcommand)]
enum NavCommand {
    /// Print every navigation item
    List,
    /// Print one navigation item
    Show { id: String },
}

#[derive(Debug, Subcommand)]
enum SiteCommand {
    /// Print the site configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
    .context("failed to load configuration")?;

    match cli.command {
        Command::Serve { bind, in_memory } => serve(config, bind, in_memory).await,
        Command::Nav { command } => {
            let navigation = NavigationService::new(repository_store(&config)?);
            let output = match command {
                NavCommand::List => serde_json::to_string_pretty(&navigation.list().await?)?,
                NavCommand::Show { id } => serde_json::to_string_pretty(&navigation.get(&id).await?)?,
            };
            println!("{output}");
            Ok(())
        }
        Command::Site {
            command: SiteCommand::Show,
        } => {
            let site = SiteConfigService::new(repository_store(&config)?);
            println!("{}", serde_json::to_string_pretty(&site.get().await?)?);
            Ok(())
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "info";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter from `RUST_LOG`; unset, blank or unparsable values fall back to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn repository_store(config: &AdminConfig) -> Result<Arc<dyn ContentStore>> {
    github_store(config).context("failed to configure the GitHub content store")
}

async fn serve(config: AdminConfig, bind: Option<String>, in_memory: bool) -> Result<()> {
    let bind_address = resolve_bind_address(bind.as_deref().unwrap_or(&config.bind_address))?;
    let store: Arc<dyn ContentStore> = if in_memory {
        info!("serving content from memory; changes are discarded on exit");
        Arc::new(MemoryStore::new())
    } else {
        repository_store(&config)?
    };

    let server = AdminServer::new(bind_address, store)
        .start()
        .await
        .context("failed to start admin server")?;
    println!("NavSphere admin API listening on http://{}", server.bound_address());

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    server.stop().await
}
