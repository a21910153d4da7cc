//! Keystone v2.0 password authentication
//!
//! This module builds the token request, performs the single HTTP exchange
//! and hands the body to the response parser. Nothing is retried.

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;

use super::response::{extract_error_message, parse_auth_response, AuthSession};
use crate::app::record::CredentialRecord;
use crate::constants::identity;
use crate::errors::{AuthError, AuthResult};

/// Credentials and endpoint for one token request
#[derive(Clone, PartialEq, Eq)]
pub struct AuthRequest {
    /// Identity service base URL, defaulted and without trailing slash
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub tenant_id: String,
}

impl AuthRequest {
    /// Build a request from a record's input credentials
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            auth_url: record.effective_auth_url(),
            username: record.username.clone(),
            password: record.password.clone(),
            tenant_id: record.tenant_id.clone(),
        }
    }

    /// `{auth_url}/tokens`
    pub fn tokens_url(&self) -> String {
        format!("{}{}", self.auth_url, identity::TOKENS_PATH)
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: PasswordAuth<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuth<'a> {
    tenant_id: &'a str,
    password_credentials: PasswordCredentials<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Handles identity service authentication operations
pub struct AuthHandler;

impl AuthHandler {
    /// Performs password authentication against `{auth_url}/tokens`
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for authentication
    /// * `request` - Credentials and identity endpoint
    /// * `content_type` - Content-Type header sent with the JSON body
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if:
    /// - The request cannot be sent (`Transport`)
    /// - The server answers with status 400 or above (`HttpStatus`)
    /// - The server rejects the credentials (`AuthRejected`)
    /// - The response lacks a token, expiry or catalog (`MalformedResponse`)
    pub async fn authenticate(
        client: &Client,
        request: &AuthRequest,
        content_type: &str,
    ) -> AuthResult<AuthSession> {
        let url = request.tokens_url();
        tracing::info!(
            "Authenticating user {} (tenant {}) at {}",
            request.username,
            request.tenant_id,
            url
        );

        let body = Self::request_body(request)?;
        tracing::debug!("Token request body: {} bytes", body.len());

        let response = client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Token request to {} failed: {}", url, e);
                AuthError::Transport(e)
            })?;

        let status = response.status();
        tracing::debug!("Token response status: {}", status);

        // Reading the body to the end releases the connection on every path
        let body = response.bytes().await;

        if status.as_u16() >= 400 {
            let message = match &body {
                Ok(bytes) => extract_error_message(bytes),
                Err(_) => identity::NO_ERROR_MESSAGE.to_string(),
            };
            tracing::warn!("Identity service returned {}: {}", status, message);
            return Err(AuthError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.map_err(AuthError::Transport)?;
        tracing::debug!("Token response content length: {} bytes", body.len());

        let session = parse_auth_response(&body)?;
        tracing::info!(
            "Received token for tenant {} expiring {}",
            request.tenant_id,
            session.token_expires()
        );

        Ok(session)
    }

    /// Serializes the Keystone v2.0 password credentials document
    fn request_body(request: &AuthRequest) -> AuthResult<Vec<u8>> {
        let document = TokenRequest {
            auth: PasswordAuth {
                tenant_id: &request.tenant_id,
                password_credentials: PasswordCredentials {
                    username: &request.username,
                    password: &request.password,
                },
            },
        };

        serde_json::to_vec(&document).map_err(|e| AuthError::InvalidInput {
            reason: format!("cannot encode token request: {}", e),
        })
    }
}
