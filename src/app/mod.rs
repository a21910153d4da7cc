//! Core token lifecycle for conoha-ojs
//!
//! This module contains the credential record, the identity service client
//! and the token cache policy that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conoha_ojs::app::{ensure_fresh_token, CredentialRecord, IdentityClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let record = CredentialRecord::new("gncu12345678", "secret", "tenant-id");
//! let client = IdentityClient::new()?;
//!
//! let outcome = ensure_fresh_token(&record, &client).await?;
//! if outcome.was_refreshed() {
//!     // persist outcome.record() here
//! }
//! println!("endpoint: {}", outcome.record().endpoint_url);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod policy;
pub mod record;

// Re-export main public API
pub use client::{AuthRequest, AuthSession, ClientConfig, IdentityClient};
pub use policy::{authenticate_record, ensure_fresh_token, Authenticate, Freshness};
pub use record::CredentialRecord;
