//! conoha-ojs CLI application
//!
//! Authenticates to ConoHa Object Storage, caches the token in the config
//! file and prints a valid token with its storage endpoint on demand.

use std::process;

use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use conoha_ojs::cli::{handle_auth, handle_logout, handle_status, handle_token, Cli, Commands};
use conoha_ojs::config::AppConfig;
use conoha_ojs::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        report_error(&e);
        process::exit(1);
    }
}

/// Print a failed command's error, with a hint when a rerun may succeed
fn report_error(e: &AppError) {
    error!(category = e.category(), "Command failed: {}", e);

    eprintln!("Error: {}", e);
    if let Some(hint) = e.retry_hint() {
        eprintln!("{}", hint);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let (config, config_path) = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("conoha-ojs v{} starting", env!("CARGO_PKG_VERSION"));
    debug!("Using config file: {}", config_path.display());

    match cli.command {
        Commands::Auth(args) => {
            info!("Executing auth command");
            handle_auth(args, config, &config_path).await
        }
        Commands::Token(args) => {
            info!("Executing token command");
            handle_token(args, config, &config_path).await
        }
        Commands::Status => handle_status(config, &config_path).await,
        Commands::Logout => {
            info!("Executing logout command");
            handle_logout(config, &config_path).await
        }
    }
}

/// Initialize logging from CLI verbosity flags and the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let configured = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);
    let log_level = cli.log_level(configured);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("conoha_ojs={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
