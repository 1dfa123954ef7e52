use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use fleetgate::{
    build_http_client, build_router, AppState, EsiStatusApi, EveSsoExchanger, GateConfig,
    GateError, SlackWebApi,
};

/// Fleetgate: status relay and SSO-gated Slack invites for an EVE
/// Online community.
#[derive(Parser, Debug)]
#[command(name = "fleetgate", version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway HTTP server
    Serve {
        /// Bind address, overrides the config file
        #[arg(long)]
        bind: Option<String>,

        /// Port, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and exit
    CheckConfig,

    /// Write the current (or default) configuration to disk
    WriteConfig,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("fleetgate=debug,fleetgate_state=debug,fleetgate_slack=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleetgate=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GateConfig, GateError> {
    match path {
        Some(p) => GateConfig::load(p),
        None => GateConfig::load(&GateConfig::default_config_path()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GateError> {
    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(cli.config.as_ref(), bind, port).await,
        Commands::CheckConfig => cmd_check_config(cli.config.as_ref()),
        Commands::WriteConfig => cmd_write_config(cli.config.as_ref()),
    }
}

async fn cmd_serve(
    config_path: Option<&PathBuf>,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<(), GateError> {
    let mut config = load_config(config_path)?;
    if let Some(bind) = bind {
        config.listen.bind = bind;
    }
    if let Some(port) = port {
        config.listen.port = port;
    }
    config.validate()?;
    config.validate_secrets()?;

    let http = build_http_client(&config.cache)?;
    let chat = Arc::new(SlackWebApi::new(http.clone(), &config.slack));
    let status_api = Arc::new(EsiStatusApi::new(http.clone(), &config.eve));
    let exchanger = Arc::new(EveSsoExchanger::new(http, &config.eve));

    let state = Arc::new(AppState::new(config, chat, status_api, exchanger));
    spawn_sweeper(state.clone());

    let addr = format!("{}:{}", state.config.listen.bind, state.config.listen.port);
    info!(%addr, "starting gateway");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Background timer that evicts expired state tokens and snapshots.
/// Reads already ignore expired entries; this just reclaims memory.
fn spawn_sweeper(state: Arc<AppState>) {
    let interval_secs = state.config.cache.sweep_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            match state.csrf.purge_expired() {
                Ok(n) if n > 0 => info!(purged = n, "swept expired state tokens"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "state token sweep failed"),
            }
            match state.status_cache.purge_expired() {
                Ok(n) if n > 0 => info!(purged = n, "swept expired snapshots"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "snapshot sweep failed"),
            }
        }
    });
}

fn cmd_check_config(config_path: Option<&PathBuf>) -> Result<(), GateError> {
    let config = load_config(config_path)?;
    config.validate()?;
    config.validate_secrets()?;
    println!("Configuration OK.");
    Ok(())
}

fn cmd_write_config(config_path: Option<&PathBuf>) -> Result<(), GateError> {
    let config = load_config(config_path)?;
    let save_path = config_path
        .cloned()
        .unwrap_or_else(GateConfig::default_config_path);
    config.save(&save_path)?;
    println!("Configuration written to {}", save_path.display());
    Ok(())
}
