//! textroute - main entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use textroute::config::ServiceConfig;
use textroute::exchange::ExchangeCoordinator;
use textroute::llm::providers::{OpenRouterClient, OpenRouterConfig};
use textroute::observability::init_default_logging;
use textroute::responders::ResponderRegistry;
use textroute::server::{self, AppState};
use tokio::signal;
use tracing::{error, info};

/// WebSocket triage service for natural-language queries
#[derive(Parser)]
#[command(name = "textroute")]
#[command(about = "Routes natural-language queries among LLM-backed responders")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the service
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("starting textroute v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_service(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("command failed: {}", e);
        process::exit(1);
    }

    info!("shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("loading configuration from: {}", path.display());
            Ok(ServiceConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["textroute.toml", "config/textroute.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("loading configuration from: {}", path.display());
                    return Ok(ServiceConfig::load_from_file(&path)?);
                }
            }

            error!(
                "no configuration file found; provide one with -c/--config or create textroute.toml"
            );
            process::exit(1);
        }
    }
}

/// Client factory - the only place a concrete completion client is constructed
struct CompletionClientFactory;

impl CompletionClientFactory {
    fn create(
        config: &ServiceConfig,
    ) -> Result<OpenRouterClient, Box<dyn std::error::Error>> {
        // Fail fast: a missing credential is a startup error, not a runtime one
        let api_key = config.resolve_api_key()?;
        let client_config = OpenRouterConfig {
            api_key,
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
            timeout: std::time::Duration::from_secs(config.llm.timeout_secs),
        };
        Ok(OpenRouterClient::new(client_config)?)
    }
}

async fn run_service(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(CompletionClientFactory::create(&config)?);
    let registry = Arc::new(ResponderRegistry::builtin());
    let coordinator = ExchangeCoordinator::new(registry, client);
    let state = Arc::new(AppState::new(coordinator, config.exchange.max_rounds));

    let addr: std::net::SocketAddr = config.server.bind_addr.parse()?;

    info!(
        bind_addr = %addr,
        max_rounds = config.exchange.max_rounds,
        model = %config.llm.model,
        "service configured"
    );

    server::serve(state, addr, shutdown_signal()).await;

    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let mut sigint = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGINT handler: {}", e);
            return;
        }
    };
    let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGTERM handler: {}", e);
            return;
        }
    };

    tokio::select! {
        _ = sigint.recv() => info!("received SIGINT, shutting down gracefully"),
        _ = sigterm.recv() => info!("received SIGTERM, shutting down gracefully"),
    }
}

fn handle_config_command(
    config: ServiceConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("configuration validation complete");
    Ok(())
}
