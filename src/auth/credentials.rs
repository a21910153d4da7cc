//! Credential input and status reporting
//!
//! This module turns command-line flags, environment variables and an
//! optional password prompt into the input fields of a
//! [`CredentialRecord`], and summarizes a record for display.

use std::env;
use std::io::{self, IsTerminal};

use chrono::{DateTime, Utc};
use url::Url;

use crate::app::record::normalize_auth_url;
use crate::app::CredentialRecord;
use crate::constants::{env as env_constants, COMMAND_NAME};
use crate::errors::{AuthError, AuthResult};

/// Credentials supplied for an explicit `auth` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub tenant_id: Option<String>,
    pub auth_url: Option<String>,
}

impl CredentialInput {
    /// Fill fields missing from the command line with environment variables
    pub fn with_env_fallback(self) -> Self {
        Self {
            username: self.username.or_else(|| env_value(env_constants::USERNAME)),
            password: self.password.or_else(|| env_value(env_constants::PASSWORD)),
            tenant_id: self.tenant_id.or_else(|| env_value(env_constants::TENANT_ID)),
            auth_url: self.auth_url.or_else(|| env_value(env_constants::AUTH_URL)),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Authentication status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    /// Whether a username is stored
    pub username_set: bool,
    /// Whether a password is stored
    pub password_set: bool,
    /// Whether a tenant id is stored
    pub tenant_set: bool,
    /// Identity service URL that will be used
    pub auth_url: String,
    /// Whether a token is cached
    pub token_cached: bool,
    /// Parsed expiry of the cached token
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the cached token can be used without refresh
    pub token_usable: bool,
    /// Cached object-storage endpoint, empty if unresolved
    pub endpoint_url: String,
}

impl AuthStatus {
    /// Check if all input credentials are available
    pub fn has_credentials(&self) -> bool {
        self.username_set && self.password_set && self.tenant_set
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (self.has_credentials(), self.token_cached, self.token_usable) {
            (false, _, _) => format!("Missing credentials - run '{} auth' to configure", COMMAND_NAME),
            (true, false, _) => "Credentials configured, no token cached".to_string(),
            (true, true, true) => "Credentials configured, cached token is valid".to_string(),
            (true, true, false) => {
                "Credentials configured, cached token will be refreshed on next use".to_string()
            }
        }
    }
}

/// Summarize a record at `now` without contacting the identity service
pub fn get_auth_status(record: &CredentialRecord, now: DateTime<Utc>) -> AuthStatus {
    AuthStatus {
        username_set: !record.username.is_empty(),
        password_set: !record.password.is_empty(),
        tenant_set: !record.tenant_id.is_empty(),
        auth_url: record.effective_auth_url(),
        token_cached: !record.token.is_empty(),
        expires_at: record.expires_at(),
        token_usable: record.has_credentials() && !record.needs_refresh(now),
        endpoint_url: record.endpoint_url.clone(),
    }
}

/// Prompt for the API password without echo
pub fn prompt_password() -> AuthResult<String> {
    if !io::stdin().is_terminal() {
        return Err(AuthError::InvalidInput {
            reason: "API password not given and stdin is not a terminal".to_string(),
        });
    }

    let password = rpassword::prompt_password("API Password: ").map_err(|e| {
        AuthError::InvalidInput {
            reason: format!("failed to read password: {}", e),
        }
    })?;

    if password.is_empty() {
        return Err(AuthError::InvalidInput {
            reason: "Password cannot be empty".to_string(),
        });
    }

    Ok(password)
}

/// Store supplied credentials into a copy of `record`
///
/// Username and tenant id are mandatory. A missing password is read with
/// `read_password`. The auth URL is defaulted, normalized and must be
/// http or https. Changing any
/// credential drops the cached token, which belonged to the old identity.
pub fn apply_credentials<F>(
    record: &CredentialRecord,
    input: CredentialInput,
    read_password: F,
) -> AuthResult<CredentialRecord>
where
    F: FnOnce() -> AuthResult<String>,
{
    let username = non_empty(input.username);
    let tenant_id = non_empty(input.tenant_id);

    let (Some(username), Some(tenant_id)) = (username, tenant_id) else {
        return Err(AuthError::InvalidInput {
            reason: "Not enough arguments. API username and tenant ID are required".to_string(),
        });
    };

    let password = match non_empty(input.password) {
        Some(password) => password,
        None => read_password()?,
    };

    let auth_url = normalize_auth_url(input.auth_url.as_deref().unwrap_or_default());
    validate_auth_url(&auth_url)?;

    let updated = CredentialRecord {
        username,
        password,
        tenant_id,
        auth_url,
        ..record.clone()
    };

    let same_identity = updated.username == record.username
        && updated.password == record.password
        && updated.tenant_id == record.tenant_id
        && updated.auth_url == record.effective_auth_url();

    if same_identity {
        Ok(updated)
    } else {
        Ok(updated.without_session())
    }
}

fn validate_auth_url(auth_url: &str) -> AuthResult<()> {
    let parsed = Url::parse(auth_url).map_err(|e| AuthError::InvalidInput {
        reason: format!("Invalid auth URL '{}': {}", auth_url, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AuthError::InvalidInput {
            reason: format!("Unsupported auth URL scheme '{}'", scheme),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Show current authentication status
pub fn show_auth_status(record: &CredentialRecord, config_path: &std::path::Path) {
    let status = get_auth_status(record, Utc::now());

    println!("ConoHa Object Storage Authentication Status");
    println!("===========================================");
    println!();
    println!("Config file: {}", config_path.display());

    if status.username_set {
        println!("Username:    {}", record.username);
    } else {
        println!("Username:    Not set");
    }
    println!(
        "Password:    {}",
        if status.password_set { "Set" } else { "Not set" }
    );
    if status.tenant_set {
        println!("Tenant ID:   {}", record.tenant_id);
    } else {
        println!("Tenant ID:   Not set");
    }
    println!("Auth URL:    {}", status.auth_url);
    println!();

    match (status.token_cached, status.expires_at) {
        (false, _) => println!("Token:       Not cached"),
        (true, Some(expires_at)) => println!("Token:       Cached, expires {}", expires_at),
        (true, None) => println!("Token:       Cached, expiry unknown"),
    }
    if status.endpoint_url.is_empty() {
        println!("Endpoint:    Not resolved");
    } else {
        println!("Endpoint:    {}", status.endpoint_url);
    }

    println!();
    println!("Status: {}", status.status_message());
}
