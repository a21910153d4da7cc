//! HTTP client for the Keystone-compatible identity service
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `auth`: token request construction and the HTTP exchange
//! - `response`: response parsing into an [`AuthSession`]

use reqwest::Client;

use crate::app::policy::Authenticate;
use crate::errors::AuthResult;

// Module declarations
pub mod auth;
pub mod config;
pub mod response;

pub use auth::{AuthHandler, AuthRequest};
pub use config::ClientConfig;
pub use response::{extract_error_message, parse_auth_response, AuthSession};

/// Identity service client backed by reqwest
///
/// Performs exactly one POST per authentication; no retries or backoff.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    config: ClientConfig,
}

impl IdentityClient {
    /// Creates a client with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the HTTP client cannot be built
    pub fn new() -> AuthResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration settings
    pub fn with_config(config: ClientConfig) -> AuthResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Authenticate for IdentityClient {
    async fn authenticate(&self, request: &AuthRequest) -> AuthResult<AuthSession> {
        AuthHandler::authenticate(&self.client, request, self.config.content_type()).await
    }
}
