//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP
//! client used to talk to the identity service.

use std::time::Duration;

use reqwest::Client;

use crate::constants::{http, identity};
use crate::errors::{AuthError, AuthResult};

/// Configuration for the identity service HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent header value
    pub user_agent: String,
    /// Send `application/x-www-form-urlencoded` with the JSON body.
    /// Disable to send `application/json`.
    pub legacy_content_type: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
            legacy_content_type: true,
        }
    }
}

impl ClientConfig {
    /// Content type header for token requests
    pub fn content_type(&self) -> &'static str {
        if self.legacy_content_type {
            identity::LEGACY_CONTENT_TYPE
        } else {
            identity::JSON_CONTENT_TYPE
        }
    }

    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> AuthResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(AuthError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert!(config.legacy_content_type);
        assert_eq!(config.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(config.request_timeout, http::DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("conoha-ojs/"));
    }

    #[test]
    fn test_json_content_type() {
        let config = ClientConfig {
            legacy_content_type: false,
            ..Default::default()
        };
        assert_eq!(config.content_type(), "application/json");
    }

    #[test]
    fn test_http_client_with_custom_config() {
        let config = ClientConfig {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Default::default()
        };

        let result = config.build_http_client();
        assert!(result.is_ok());
    }
}
