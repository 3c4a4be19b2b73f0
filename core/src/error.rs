//! Error types for the webtoon API client.
//!
//! # Design
//! Three failure families reach the caller and stay distinguishable:
//! the request never completed (`Transport`), the server answered with a
//! non-success status (`Http`, carrying the parsed JSON body), or the body
//! could not be read as JSON (`Parse`). `Decode` separates "valid JSON of the
//! wrong shape" from "not JSON at all".

use thiserror::Error;

/// Boxed error kept as the `source` of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `WebtoonClient` and the executor functions.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server or its response never arrived.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside `[200, 400)`.
    #[error("HTTP {status}: {data}")]
    Http {
        status: u16,
        data: serde_json::Value,
    },

    /// The response body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The response is valid JSON but does not match the expected type.
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("request body could not be serialized: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Query parameters could not be form-encoded.
    #[error("query parameters could not be encoded: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl ApiError {
    /// HTTP status of an `Http` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body of an `Http` failure.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Http { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failures raised by a `Transport` before any HTTP status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("request timed out")]
    Timeout(#[source] BoxError),

    /// The request could not be constructed (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport failure: {0}")]
    Other(#[source] BoxError),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(Box::new(err))
        } else if err.is_connect() {
            TransportError::Connect(Box::new(err))
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}
