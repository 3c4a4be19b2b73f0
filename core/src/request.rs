//! Request building and response classification.
//!
//! # Design
//! `build_request` merges per-call `RequestOptions` over the `ClientConfig`
//! defaults and the CSRF cookie, producing a complete `HttpRequest`.
//! `parse_response` turns an `HttpResponse` into JSON or an `ApiError`.
//! Neither function performs I/O, so both halves are usable by hosts that
//! run the round trip themselves.
//!
//! Precedence is call-level over default: a call's method, body and
//! credential mode replace the defaults outright, and its headers replace
//! default headers of the same name (ASCII case-insensitive) while leaving
//! the remaining defaults in place.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::cookie::CookieSource;
use crate::error::ApiError;
use crate::http::{CredentialMode, HttpMethod, HttpRequest, HttpResponse};

/// A request payload before it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, serialized to a JSON string when the request is built.
    Json(serde_json::Value),
    /// Pre-encoded text, sent unchanged.
    Text(String),
}

impl RequestBody {
    /// Capture any serializable payload as a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(ApiError::Serialization)
    }

    fn into_wire(self) -> Result<String, ApiError> {
        match self {
            RequestBody::Json(value) => serde_json::to_string(&value).map_err(ApiError::Serialization),
            RequestBody::Text(text) => Ok(text),
        }
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

/// Per-call overrides. Every `None` / empty field falls back to the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub credentials: Option<CredentialMode>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::method(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::method(HttpMethod::Post)
    }

    pub fn method(method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialMode) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Merge `overrides` over `defaults` by header name.
///
/// An override replaces the default with the same name in its original
/// position; overrides with new names are appended in order.
pub fn merge_headers(
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged = defaults;
    for (name, value) in overrides {
        match merged.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some(slot) => *slot = (name, value),
            None => merged.push((name, value)),
        }
    }
    merged
}

/// Build the complete request for `endpoint`, reading the CSRF cookie once.
///
/// The CSRF header is left out when the cookie is absent. A browser `fetch`
/// with `'X-CSRFToken': getCookie(...)` would instead send the literal `null`;
/// the backend rejects either the same way.
pub fn build_request(
    config: &ClientConfig,
    cookies: &dyn CookieSource,
    endpoint: &str,
    options: RequestOptions,
) -> Result<HttpRequest, ApiError> {
    let mut defaults = config.default_headers.clone();
    if let Some(token) = cookies.cookie(&config.csrf_cookie) {
        defaults.push((config.csrf_header.clone(), token));
    }

    let body = options.body.map(RequestBody::into_wire).transpose()?;

    Ok(HttpRequest {
        method: options.method.unwrap_or(HttpMethod::Get),
        url: config.url_for(endpoint),
        headers: merge_headers(defaults, options.headers),
        body,
        credentials: options.credentials.unwrap_or(config.credentials),
    })
}

/// Parse the body as JSON, then classify by status.
///
/// The body is parsed before the status is checked, so a non-JSON error page
/// surfaces as `Parse` rather than `Http`.
pub fn parse_response(response: &HttpResponse) -> Result<serde_json::Value, ApiError> {
    let data: serde_json::Value = serde_json::from_str(&response.body).map_err(ApiError::Parse)?;
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            data,
        });
    }
    Ok(data)
}

/// `parse_response` followed by decoding into `T`.
pub fn parse_response_as<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let data = parse_response(response)?;
    serde_json::from_value(data).map_err(ApiError::Decode)
}
