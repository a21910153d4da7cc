//! Error types for conoha-ojs
//!
//! This module defines the error types for the token lifecycle and the
//! configuration layer. Errors are designed to be actionable and to carry
//! enough context for user feedback without logging secrets.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Specific reason an identity service response could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDefect {
    /// Body is not a JSON object
    InvalidJson(String),
    /// `error` object present but without title, code and message
    MalformedErrorObject,
    /// No `access` object in the response
    NoAccess,
    /// No `access.token` object in the response
    NoToken,
    /// No `access.serviceCatalog` array in the response
    NoServiceCatalog,
    /// An `object-store` endpoint without a `publicURL`
    MissingPublicUrl,
    /// A required field is absent
    MissingField { field: &'static str },
    /// A field is present but has an unexpected JSON type
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// `access.token.expires` is not an RFC 3339 timestamp
    InvalidExpiry { value: String, reason: String },
}

impl fmt::Display for ResponseDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseDefect::InvalidJson(reason) => write!(f, "invalid JSON: {}", reason),
            ResponseDefect::MalformedErrorObject => {
                write!(f, "error object without title, code and message")
            }
            ResponseDefect::NoAccess => write!(f, "no access object"),
            ResponseDefect::NoToken => write!(f, "no token object"),
            ResponseDefect::NoServiceCatalog => write!(f, "service catalog not available"),
            ResponseDefect::MissingPublicUrl => write!(f, "missing publicURL"),
            ResponseDefect::MissingField { field } => write!(f, "missing field: {}", field),
            ResponseDefect::WrongType { field, expected } => {
                write!(f, "field {} is not {}", field, expected)
            }
            ResponseDefect::InvalidExpiry { value, reason } => {
                write!(f, "invalid token expiry '{}': {}", value, reason)
            }
        }
    }
}

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username, password or tenant id missing from the record
    #[error(
        "API username, password and tenant ID were not found in the config file. Run 'conoha-ojs auth' first"
    )]
    MissingCredentials,

    /// Connection, DNS or timeout failure during the exchange
    #[error("HTTP request to the identity service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Identity service answered with status >= 400
    #[error("Return {status} status code from the server with message. [{message}]")]
    HttpStatus { status: u16, message: String },

    /// Response could not be turned into a token, expiry and endpoint
    #[error("Malformed identity service response: {0}")]
    MalformedResponse(ResponseDefect),

    /// Identity service returned a structured `error` object
    #[error("{title}({code}): {message}")]
    AuthRejected {
        title: String,
        code: i64,
        message: String,
    },

    /// Invalid user input such as an empty prompt answer
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl From<ResponseDefect> for AuthError {
    fn from(defect: ResponseDefect) -> Self {
        AuthError::MalformedResponse(defect)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// Invalid configuration format
    #[error("Invalid configuration format in {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// I/O error reading or writing the configuration file
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Check if the error is recoverable (transient)
    ///
    /// Nothing is retried internally; this only tells the user whether
    /// running the same command again may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Auth(AuthError::Transport(_)) => true,
            AppError::Auth(AuthError::HttpStatus { status, .. }) => *status >= 500,
            _ => false,
        }
    }

    /// Hint printed after the error message when a rerun may succeed
    pub fn retry_hint(&self) -> Option<&'static str> {
        self.is_recoverable()
            .then_some("This looks like a temporary failure; run the command again.")
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Config(_) => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejected_message() {
        let err = AuthError::AuthRejected {
            title: "Unauthorized".to_string(),
            code: 401,
            message: "bad creds".to_string(),
        };
        assert_eq!(err.to_string(), "Unauthorized(401): bad creds");
    }

    #[test]
    fn test_http_status_message() {
        let err = AuthError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("[boom]"));
    }

    #[test]
    fn test_defect_messages() {
        let err: AuthError = ResponseDefect::NoServiceCatalog.into();
        assert!(err.to_string().contains("service catalog not available"));

        let err: AuthError = ResponseDefect::WrongType {
            field: "access.token.id",
            expected: "a string",
        }
        .into();
        assert!(err.to_string().contains("access.token.id is not a string"));
    }

    #[test]
    fn test_error_categories() {
        let app_error = AppError::Auth(AuthError::MissingCredentials);
        assert_eq!(app_error.category(), "authentication");
        assert!(!app_error.is_recoverable());

        let server_error = AppError::Auth(AuthError::HttpStatus {
            status: 503,
            message: String::new(),
        });
        assert!(server_error.is_recoverable());

        let rejected = AppError::Auth(AuthError::HttpStatus {
            status: 401,
            message: String::new(),
        });
        assert!(!rejected.is_recoverable());

        let config_error = AppError::Config(ConfigError::NoConfigDir);
        assert_eq!(config_error.category(), "config");
        assert!(!config_error.is_recoverable());
    }

    #[test]
    fn test_retry_hint_only_for_transient_failures() {
        let server_error = AppError::Auth(AuthError::HttpStatus {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert!(server_error.retry_hint().is_some());

        let rejected = AppError::Auth(AuthError::AuthRejected {
            title: "Unauthorized".to_string(),
            code: 401,
            message: "bad creds".to_string(),
        });
        assert_eq!(rejected.retry_hint(), None);
        assert_eq!(AppError::Auth(AuthError::MissingCredentials).retry_hint(), None);
    }
}
