//! Credential record persisted between invocations
//!
//! The record holds both the user's input credentials and the cached result
//! of the last successful authentication. It is loaded and saved by the
//! configuration layer; the token lifecycle only reads and returns it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::client::AuthSession;
use crate::constants::{identity, time};

/// Durable credentials plus cached authentication results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialRecord {
    /// API username
    pub username: String,
    /// API password
    pub password: String,
    /// Tenant (project) id the token is scoped to
    pub tenant_id: String,
    /// Identity service base URL; empty means the default endpoint
    pub auth_url: String,
    /// Cached bearer token; empty means no cached token
    pub token: String,
    /// Token expiry in the storage format
    pub token_expires: String,
    /// Object-storage public URL from the service catalog
    pub endpoint_url: String,
}

impl CredentialRecord {
    /// Create a record holding only input credentials
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    /// Check that username, password and tenant id are all present
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.tenant_id.is_empty()
    }

    /// Auth URL to use, defaulted and without a trailing slash
    pub fn effective_auth_url(&self) -> String {
        normalize_auth_url(&self.auth_url)
    }

    /// Parsed token expiry, `None` if empty or unparseable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_storage_time(&self.token_expires)
    }

    /// Decide whether the cached token cannot be used at `now`
    ///
    /// The token is reusable only when token and endpoint are present and
    /// the expiry parses to a time strictly after `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() || self.endpoint_url.is_empty() {
            return true;
        }

        match self.expires_at() {
            Some(expires_at) => expires_at <= now,
            None => true,
        }
    }

    /// Return a copy with the cached fields replaced by `session`
    pub fn with_session(&self, session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            token_expires: session.token_expires(),
            endpoint_url: session.endpoint_url.clone(),
            ..self.clone()
        }
    }

    /// Return a copy with token, expiry and endpoint cleared
    pub fn without_session(&self) -> Self {
        Self {
            token: String::new(),
            token_expires: String::new(),
            endpoint_url: String::new(),
            ..self.clone()
        }
    }
}

/// Apply the default identity endpoint and strip one trailing slash
pub fn normalize_auth_url(auth_url: &str) -> String {
    let url = auth_url.trim();
    let url = if url.is_empty() {
        identity::DEFAULT_AUTH_URL
    } else {
        url
    };
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// Render a timestamp in the record's storage format
pub fn format_storage_time(value: DateTime<Utc>) -> String {
    value.format(time::STORAGE_FORMAT).to_string()
}

/// Parse a timestamp written in the record's storage format
pub fn parse_storage_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    [time::STORAGE_FORMAT, time::STORAGE_FORMAT_GMT]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
