//! Token cache policy
//!
//! Decides whether the token cached in a [`CredentialRecord`] can be reused
//! or must be refreshed, and performs the refresh through an
//! [`Authenticate`] implementation. Refresh is lazy: it only happens when a
//! caller asks for a usable token.
//!
//! The policy never mutates the caller's record. A refreshed record is
//! returned as a new value and persisting it is the caller's job.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::app::client::{AuthRequest, AuthSession};
use crate::app::record::CredentialRecord;
use crate::errors::{AuthError, AuthResult};

/// Something that can exchange credentials for a token
pub trait Authenticate {
    /// Perform one authentication exchange
    fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> impl Future<Output = AuthResult<AuthSession>> + Send;
}

/// Outcome of [`ensure_fresh_token`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The cached token is still valid; the record is unchanged
    Cached(CredentialRecord),
    /// A new token was obtained; the record carries the new session
    Refreshed(CredentialRecord),
}

impl Freshness {
    /// Whether a network exchange replaced the cached token
    pub fn was_refreshed(&self) -> bool {
        matches!(self, Freshness::Refreshed(_))
    }

    /// The usable record
    pub fn record(&self) -> &CredentialRecord {
        match self {
            Freshness::Cached(record) | Freshness::Refreshed(record) => record,
        }
    }

    /// Consume into the usable record
    pub fn into_record(self) -> CredentialRecord {
        match self {
            Freshness::Cached(record) | Freshness::Refreshed(record) => record,
        }
    }
}

/// Ensure `record` holds a usable token, refreshing it if needed
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` before any expiry check if
/// username, password or tenant id is empty. Any error of the refresh
/// exchange is returned unchanged; the caller's record is never modified.
pub async fn ensure_fresh_token<A: Authenticate>(
    record: &CredentialRecord,
    authenticator: &A,
) -> AuthResult<Freshness> {
    ensure_fresh_token_at(record, authenticator, Utc::now()).await
}

/// [`ensure_fresh_token`] evaluated against an explicit clock reading
pub async fn ensure_fresh_token_at<A: Authenticate>(
    record: &CredentialRecord,
    authenticator: &A,
    now: DateTime<Utc>,
) -> AuthResult<Freshness> {
    if !record.has_credentials() {
        return Err(AuthError::MissingCredentials);
    }

    if !record.needs_refresh(now) {
        tracing::debug!("Using the cached token");
        return Ok(Freshness::Cached(record.clone()));
    }

    tracing::info!("Cached token is missing or expired, requesting a new one");
    let refreshed = authenticate_record(record, authenticator).await?;
    Ok(Freshness::Refreshed(refreshed))
}

/// Authenticate unconditionally and return the record with the new session
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if the record lacks input
/// credentials, otherwise whatever the authenticator returns.
pub async fn authenticate_record<A: Authenticate>(
    record: &CredentialRecord,
    authenticator: &A,
) -> AuthResult<CredentialRecord> {
    if !record.has_credentials() {
        return Err(AuthError::MissingCredentials);
    }

    let request = AuthRequest::from_record(record);
    let session = authenticator.authenticate(&request).await?;
    Ok(record.with_session(&session))
}
