//! Command-line argument parsing for conoha-ojs
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::auth::CredentialInput;

/// conoha-ojs - ConoHa Object Storage authentication
#[derive(Parser, Debug)]
#[command(
    name = "conoha-ojs",
    version,
    about = "Authenticate to ConoHa Object Storage and cache the token",
    long_about = "Authenticates against a Keystone-compatible identity service, caches the token \
with its expiry and resolves the object-storage endpoint. The cached token is reused until it \
expires and refreshed lazily on the next use."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate to ConoHa ObjectStorage and save the credentials
    Auth(AuthArgs),

    /// Print a valid token and the object-storage endpoint, refreshing if needed
    Token(TokenArgs),

    /// Show stored credentials and cached token state
    Status,

    /// Forget the cached token and endpoint, keeping the credentials
    Logout,
}

/// Arguments for the auth command
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// API Username
    #[arg(short = 'u', long = "api-username")]
    pub username: Option<String>,

    /// API Password (prompted when omitted)
    #[arg(short = 'p', long = "api-password")]
    pub password: Option<String>,

    /// Tenant ID
    #[arg(short = 't', long = "tenant-id")]
    pub tenant_id: Option<String>,

    /// Auth URL (optional). Defaults to https://identity.tyo1.conoha.io/v2.0
    #[arg(short = 'a', long = "auth-url")]
    pub auth_url: Option<String>,
}

impl AuthArgs {
    /// Flags as credential input, before environment fallback
    pub fn to_input(&self) -> CredentialInput {
        CredentialInput {
            username: self.username.clone(),
            password: self.password.clone(),
            tenant_id: self.tenant_id.clone(),
            auth_url: self.auth_url.clone(),
        }
    }
}

/// Arguments for the token command
#[derive(Args, Debug, Clone, Default)]
pub struct TokenArgs {
    /// Print shell `export` lines for OS_AUTH_TOKEN and OS_STORAGE_URL
    #[arg(long)]
    pub export: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level, falling back to `configured` without flags
    pub fn log_level(&self, configured: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured
        }
    }
}
