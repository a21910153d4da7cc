//! conoha-ojs Library
//!
//! Authenticates against a Keystone-compatible identity service (ConoHa by
//! default), caches the token with its expiry and resolves the
//! object-storage endpoint from the service catalog.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(
            identity::DEFAULT_AUTH_URL,
            "https://identity.tyo1.conoha.io/v2.0"
        );
        assert_eq!(env::USERNAME, "CONOHA_USERNAME");
        assert!(http::USER_AGENT.starts_with(COMMAND_NAME));
    }

    #[test]
    fn test_error_types() {
        let auth_error = errors::AuthError::MissingCredentials;
        let app_error = AppError::Auth(auth_error);

        assert_eq!(app_error.category(), "authentication");
        assert!(!app_error.is_recoverable());
    }
}
