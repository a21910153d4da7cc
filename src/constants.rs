//! Application constants for conoha-ojs
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Name used in usage text and user-facing hints
pub const COMMAND_NAME: &str = "conoha-ojs";

/// Environment variable names for authentication
pub mod env {
    /// Environment variable name for the API username
    pub const USERNAME: &str = "CONOHA_USERNAME";

    /// Environment variable name for the API password
    pub const PASSWORD: &str = "CONOHA_PASSWORD";

    /// Environment variable name for the tenant id
    pub const TENANT_ID: &str = "CONOHA_TENANT_ID";

    /// Environment variable name for the identity service URL
    pub const AUTH_URL: &str = "CONOHA_AUTH_URL";
}

/// Identity service (Keystone v2.0) constants
pub mod identity {
    /// Identity endpoint used when no auth URL is configured
    pub const DEFAULT_AUTH_URL: &str = "https://identity.tyo1.conoha.io/v2.0";

    /// Path appended to the auth URL for token requests
    pub const TOKENS_PATH: &str = "/tokens";

    /// Service catalog type of the object-storage service
    pub const OBJECT_STORE_TYPE: &str = "object-store";

    /// Content type historically sent by ConoHa clients. The body is JSON regardless.
    pub const LEGACY_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// Correct media type for the JSON body
    pub const JSON_CONTENT_TYPE: &str = "application/json";

    /// Placeholder when an error response carries no usable message
    pub const NO_ERROR_MESSAGE: &str = "no error message";

    /// Longest raw error body echoed back to the user
    pub const MAX_ERROR_BODY_CHARS: usize = 512;
}

/// Timestamp formats
pub mod time {
    /// Storage format of `token_expires` (RFC 1123 rendered in UTC)
    pub const STORAGE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

    /// Same layout with a GMT zone name, accepted when reading
    pub const STORAGE_FORMAT_GMT: &str = "%a, %d %b %Y %H:%M:%S GMT";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("conoha-ojs/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Configuration file locations and permissions
pub mod config {
    /// Project-local config file name
    pub const LOCAL_FILE_NAME: &str = "conoha-ojs.toml";

    /// Directory under the user config dir
    pub const APP_DIR: &str = "conoha-ojs";

    /// Config file name under the user config dir
    pub const FILE_NAME: &str = "config.toml";

    /// File permissions for the config file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const FILE_PERMISSIONS: u32 = 0o600;
}
