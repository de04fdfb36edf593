use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nba::commands;
use nba::config::{self, Config};
use nba::data_provider::{Client, PlayerDataProvider};
use nba::live::{LiveSession, ReplayConnector, WebSocketConnector};
use nba::tui;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "nba")]
#[command(
    about = "NBA live box score driven by a game replay",
    long_about = "NBA live box score driven by a game replay\n\nIf no command is specified, the program starts in interactive mode."
)]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Player information service base URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Replay server WebSocket URL (overrides config)
    #[arg(long, global = true)]
    replay_url: Option<String>,

    /// Serve fixture players and a scripted replay instead of the network
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive live box score (default)
    Live,
    /// Run a replay without the TUI and print stats as they arrive
    Watch {
        /// Replay speed multiplier (defaults to config)
        #[arg(short, long)]
        speed: Option<u32>,

        /// Stop after this many seconds of wall time
        #[arg(short = 't', long)]
        seconds: Option<u64>,
    },
    /// List players from the player information service
    Players,
    /// Display current configuration
    Config,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command() {
    let cfg = config::read();

    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!(
        "Configuration File: {} (Exists: {})",
        path_str,
        if exists { "yes" } else { "no" }
    );
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("api_url: {}", cfg.api_url);
    println!("replay_url: {}", cfg.replay_url);
    println!("default_speed: {}x", cfg.initial_speed());
    println!("time_format: {}", cfg.time_format);
    println!();
    println!("[theme]");
    println!("selection_fg: {:?}", cfg.theme.selection_fg);
    println!("flash_fg: {:?}", cfg.theme.flash_fg);
    println!("error_fg: {:?}", cfg.theme.error_fg);
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Apply URL overrides from the command line
fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(url) = &cli.replay_url {
        config.replay_url = url.clone();
    }
}

#[cfg(feature = "development")]
fn create_sources(
    mock: bool,
    config: &Config,
) -> Result<(Arc<dyn PlayerDataProvider>, Arc<dyn ReplayConnector>)> {
    if mock {
        tracing::info!("Using mock data sources");
        return Ok((
            Arc::new(nba::dev::mock_client::MockClient::new()),
            Arc::new(nba::dev::mock_connector::MockConnector::new()),
        ));
    }
    create_network_sources(config)
}

#[cfg(not(feature = "development"))]
fn create_sources(
    mock: bool,
    config: &Config,
) -> Result<(Arc<dyn PlayerDataProvider>, Arc<dyn ReplayConnector>)> {
    if mock {
        anyhow::bail!("--mock requires a build with the `development` feature");
    }
    create_network_sources(config)
}

fn create_network_sources(
    config: &Config,
) -> Result<(Arc<dyn PlayerDataProvider>, Arc<dyn ReplayConnector>)> {
    let client = Client::new(config.api_url.as_str()).context("Failed to create player API client")?;
    let connector = WebSocketConnector::new(config.replay_url.as_str());
    Ok((Arc::new(client), Arc::new(connector)))
}

/// Run TUI mode with the live session in the background
async fn run_tui_mode(
    provider: Arc<dyn PlayerDataProvider>,
    connector: Arc<dyn ReplayConnector>,
    config: Config,
) -> Result<()> {
    let handle = LiveSession::spawn(provider, connector, config.initial_speed());
    tui::run(handle, config)
        .await
        .context("Error running TUI")
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(command: Commands, mock: bool, config: Config) -> Result<()> {
    let (provider, connector) = create_sources(mock, &config)?;
    match command {
        Commands::Config => unreachable!("Config command should be handled before execute_command"),
        Commands::Live => run_tui_mode(provider, connector, config).await,
        Commands::Watch { speed, seconds } => {
            let speed = speed.unwrap_or_else(|| config.initial_speed());
            commands::watch::run(provider, connector, speed, seconds).await
        }
        Commands::Players => commands::players::run(provider.as_ref()).await,
    }
}

#[tokio::main]
async fn main() {
    let mut config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }
    apply_cli_overrides(&cli, &mut config);

    // No subcommand means the interactive view
    let command = cli.command.unwrap_or(Commands::Live);

    // Handle Config command separately (doesn't need a client)
    if let Commands::Config = command {
        handle_config_command();
        return;
    }

    if let Err(e) = execute_command(command, cli.mock, config).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
