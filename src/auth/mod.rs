//! Credential management for the identity service
//!
//! This module collects credentials from flags, environment variables and
//! an interactive prompt, and reports the state of the stored record.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conoha_ojs::app::CredentialRecord;
//! use conoha_ojs::auth::{apply_credentials, prompt_password, CredentialInput};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = CredentialInput {
//!     username: Some("gncu12345678".to_string()),
//!     tenant_id: Some("0123456789abcdef".to_string()),
//!     ..Default::default()
//! }
//! .with_env_fallback();
//!
//! let record = apply_credentials(&CredentialRecord::default(), input, prompt_password)?;
//! assert!(record.has_credentials());
//! # Ok(())
//! # }
//! ```

pub mod credentials;

// Re-export main public API
pub use credentials::{
    apply_credentials, get_auth_status, prompt_password, show_auth_status, AuthStatus,
    CredentialInput,
};
