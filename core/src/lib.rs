//! Async API client for the webtoon-tracking service.
//!
//! # Overview
//! Wraps the backend's JSON API: CSRF-token injection from the `csrftoken`
//! cookie, cookie-based session passthrough, JSON (de)serialization, and one
//! method per endpoint (accounts, webtoon listing and detail, favorites,
//! recommendations).
//!
//! # Design
//! - `WebtoonClient` is stateless apart from what its transport's cookie jar
//!   remembers between calls.
//! - The request executor is split into `build_request` (merges options into
//!   an `HttpRequest`) and `parse_response` (classifies an `HttpResponse`),
//!   so the I/O boundary is explicit and hosts may run the round trip
//!   themselves.
//! - `Transport` and `CookieSource` are the seams for the network and the
//!   cookie store; `ReqwestTransport` and `JarCookies` are the defaults.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod cookie;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use client::WebtoonClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use cookie::{get_cookie, CookieSource, CookieString, NoCookies, CSRF_COOKIE};
pub use endpoints::Endpoint;
pub use error::{ApiError, TransportError};
pub use http::{CredentialMode, HttpMethod, HttpRequest, HttpResponse};
pub use request::{build_request, parse_response, parse_response_as, RequestBody, RequestOptions};
pub use transport::{JarCookies, ReqwestTransport, Transport};
pub use types::{
    FavoriteQuery, FavoriteToggle, LoginRequest, Recommendation, Recommendations, SignupRequest,
    User, Webtoon, WebtoonPage, WebtoonQuery,
};
