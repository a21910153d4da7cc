//! Identity service response parsing
//!
//! Keystone v2.0 token responses are deserialized into structs whose fields
//! are all optional and whose values are wrapped in [`Slot`], so an absent
//! field and a field of the wrong JSON type surface as different
//! [`ResponseDefect`]s instead of a single opaque serde error.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};

use crate::app::record::format_storage_time;
use crate::constants::identity;
use crate::errors::{AuthError, AuthResult, ResponseDefect};

/// Result of one successful authentication exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Bearer token (`access.token.id`)
    pub token: String,
    /// Token expiry (`access.token.expires`)
    pub expires_at: DateTime<Utc>,
    /// Public URL of the last `object-store` catalog entry, empty if none
    pub endpoint_url: String,
}

impl AuthSession {
    /// Expiry rendered in the credential record's storage format
    pub fn token_expires(&self) -> String {
        format_storage_time(self.expires_at)
    }
}

/// A JSON value that either has the expected type or is skipped
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Slot<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// A struct that only deserializes from a JSON object
///
/// Derived struct deserializers also accept arrays, matching elements to
/// fields by position.
#[derive(Debug)]
struct Object<T>(T);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Object<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(Object)
                .map_err(de::Error::custom),
            _ => Err(de::Error::custom("expected a JSON object")),
        }
    }
}

impl<T> Slot<Object<T>> {
    fn object(self, field: &'static str) -> Result<T, ResponseDefect> {
        self.typed(field, "an object").map(|Object(value)| value)
    }

    fn valid_object(self) -> Option<T> {
        self.valid().map(|Object(value)| value)
    }
}

impl<T> Slot<T> {
    fn typed(self, field: &'static str, expected: &'static str) -> Result<T, ResponseDefect> {
        match self {
            Slot::Valid(value) => Ok(value),
            Slot::Invalid(_) => Err(ResponseDefect::WrongType { field, expected }),
        }
    }

    fn valid(self) -> Option<T> {
        match self {
            Slot::Valid(value) => Some(value),
            Slot::Invalid(_) => None,
        }
    }
}

fn required<T>(
    slot: Option<Slot<T>>,
    field: &'static str,
    expected: &'static str,
) -> Result<T, ResponseDefect> {
    slot.ok_or(ResponseDefect::MissingField { field })?
        .typed(field, expected)
}

#[derive(Debug, Deserialize)]
struct AuthDocument {
    error: Option<Slot<Object<ErrorBody>>>,
    access: Option<Slot<Object<AccessBody>>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    title: Option<Slot<String>>,
    code: Option<Slot<f64>>,
    message: Option<Slot<String>>,
}

#[derive(Debug, Deserialize)]
struct AccessBody {
    token: Option<Slot<Object<TokenBody>>>,
    #[serde(rename = "serviceCatalog")]
    service_catalog: Option<Slot<Vec<Slot<Object<CatalogEntry>>>>>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    id: Option<Slot<String>>,
    expires: Option<Slot<String>>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: Option<Slot<String>>,
    endpoints: Option<Slot<Vec<Slot<Object<EndpointBody>>>>>,
}

#[derive(Debug, Deserialize)]
struct EndpointBody {
    #[serde(rename = "publicURL")]
    public_url: Option<Slot<String>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<Slot<Object<ErrorBody>>>,
    message: Option<Slot<String>>,
}

/// Parse a successful (status < 400) token response body
///
/// # Errors
///
/// Returns `AuthError::AuthRejected` when the body carries an `error`
/// object, and `AuthError::MalformedResponse` when the body is not JSON,
/// lacks `access`, `access.token` or `access.serviceCatalog`, has an
/// unparsable expiry, or an `object-store` endpoint without `publicURL`.
pub fn parse_auth_response(body: &[u8]) -> AuthResult<AuthSession> {
    let Object(document) = serde_json::from_slice::<Object<AuthDocument>>(body)
        .map_err(|e| ResponseDefect::InvalidJson(e.to_string()))?;

    if let Some(error) = document.error {
        return Err(rejection(error));
    }

    let access = document
        .access
        .ok_or(ResponseDefect::NoAccess)?
        .object("access")?;

    let token = access
        .token
        .ok_or(ResponseDefect::NoToken)?
        .object("access.token")?;
    let token_id = required(token.id, "access.token.id", "a string")?;

    let expires = required(token.expires, "access.token.expires", "a string")?;
    let expires_at = DateTime::parse_from_rfc3339(&expires)
        .map_err(|e| ResponseDefect::InvalidExpiry {
            value: expires.clone(),
            reason: e.to_string(),
        })?
        .with_timezone(&Utc);

    let catalog = access
        .service_catalog
        .ok_or(ResponseDefect::NoServiceCatalog)?
        .typed("access.serviceCatalog", "an array")?;

    let endpoint_url = object_store_url(catalog)?;
    if endpoint_url.is_empty() {
        tracing::warn!("Service catalog has no object-store entry");
    }

    Ok(AuthSession {
        token: token_id,
        expires_at,
        endpoint_url,
    })
}

/// Scan the whole catalog; the last `object-store` entry wins
fn object_store_url(catalog: Vec<Slot<Object<CatalogEntry>>>) -> Result<String, ResponseDefect> {
    let mut endpoint_url = String::new();

    for entry in catalog {
        let entry = entry.object("access.serviceCatalog[]")?;

        let is_object_store = matches!(
            &entry.service_type,
            Some(Slot::Valid(service_type)) if service_type == identity::OBJECT_STORE_TYPE
        );
        if !is_object_store {
            continue;
        }

        let endpoints = required(entry.endpoints, "endpoints", "an array")?;
        let first = endpoints
            .into_iter()
            .next()
            .ok_or(ResponseDefect::MissingField {
                field: "endpoints[0]",
            })?
            .object("endpoints[0]")?;

        endpoint_url = first
            .public_url
            .ok_or(ResponseDefect::MissingPublicUrl)?
            .typed("publicURL", "a string")?;
    }

    Ok(endpoint_url)
}

fn rejection(error: Slot<Object<ErrorBody>>) -> AuthError {
    let Some(body) = error.valid_object() else {
        return ResponseDefect::MalformedErrorObject.into();
    };

    match (
        body.title.and_then(Slot::valid),
        body.code.and_then(Slot::valid),
        body.message.and_then(Slot::valid),
    ) {
        (Some(title), Some(code), Some(message)) => {
            tracing::warn!("Identity service rejected authentication: {}", title);
            AuthError::AuthRejected {
                title,
                code: code.round() as i64,
                message,
            }
        }
        _ => ResponseDefect::MalformedErrorObject.into(),
    }
}

/// Best-effort human-readable message from an error response body
///
/// Never fails: a Keystone `error.message` or a top-level `message` is
/// returned when present, otherwise the raw body text, otherwise a
/// placeholder.
pub fn extract_error_message(body: &[u8]) -> String {
    if let Ok(Object(envelope)) = serde_json::from_slice::<Object<ErrorEnvelope>>(body) {
        let keystone_message = envelope
            .error
            .and_then(Slot::valid_object)
            .and_then(|error| error.message)
            .and_then(Slot::valid);
        let message = keystone_message.or_else(|| envelope.message.and_then(Slot::valid));

        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() {
        return identity::NO_ERROR_MESSAGE.to_string();
    }

    raw.chars().take(identity::MAX_ERROR_BODY_CHARS).collect()
}
