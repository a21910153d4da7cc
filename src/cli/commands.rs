//! Command handlers for the conoha-ojs CLI
//!
//! Each handler receives the loaded configuration and the path it came
//! from, and is responsible for saving the configuration back when the
//! credential record changed.

use std::path::Path;

use tracing::{info, warn};

use crate::app::{authenticate_record, ensure_fresh_token, CredentialRecord, IdentityClient};
use crate::auth::{apply_credentials, prompt_password, show_auth_status};
use crate::cli::args::{AuthArgs, TokenArgs};
use crate::config::AppConfig;
use crate::errors::Result;

/// Handle the auth command
///
/// Stores the given credentials, authenticates unconditionally and saves
/// the record only if authentication succeeded.
pub async fn handle_auth(args: AuthArgs, mut config: AppConfig, config_path: &Path) -> Result<()> {
    let input = args.to_input().with_env_fallback();
    let record = apply_credentials(&config.account, input, prompt_password)?;

    let client = IdentityClient::with_config(config.client.to_runtime_config())?;
    let record = authenticate_record(&record, &client).await?;
    warn_if_no_endpoint(&record);

    config.account = record;
    config.save(config_path).await?;

    println!("Authentication succeeded.");
    println!("Credentials saved to {}", config_path.display());
    Ok(())
}

/// Handle the token command
pub async fn handle_token(args: TokenArgs, mut config: AppConfig, config_path: &Path) -> Result<()> {
    let client = IdentityClient::with_config(config.client.to_runtime_config())?;
    let outcome = ensure_fresh_token(&config.account, &client).await?;

    if outcome.was_refreshed() {
        info!("Token refreshed, saving configuration");
        config.account = outcome.into_record();
        config.save(config_path).await?;
    } else {
        config.account = outcome.into_record();
    }
    warn_if_no_endpoint(&config.account);

    let record = &config.account;
    if args.export {
        println!("export OS_AUTH_TOKEN={}", record.token);
        println!("export OS_STORAGE_URL={}", record.endpoint_url);
    } else {
        println!("Token:    {}", record.token);
        println!("Expires:  {}", record.token_expires);
        println!("Endpoint: {}", record.endpoint_url);
    }

    Ok(())
}

/// Handle the status command
pub async fn handle_status(config: AppConfig, config_path: &Path) -> Result<()> {
    show_auth_status(&config.account, config_path);
    Ok(())
}

/// Handle the logout command
pub async fn handle_logout(mut config: AppConfig, config_path: &Path) -> Result<()> {
    if config.account.token.is_empty() && config.account.endpoint_url.is_empty() {
        println!("No cached token.");
        return Ok(());
    }

    config.account = config.account.without_session();
    config.save(config_path).await?;

    println!("Cached token removed from {}", config_path.display());
    Ok(())
}

fn warn_if_no_endpoint(record: &CredentialRecord) {
    if record.endpoint_url.is_empty() {
        warn!("The service catalog has no object-store endpoint; the token will be refreshed on next use");
        eprintln!("Warning: no object-store endpoint was found in the service catalog.");
    }
}
