//! Client configuration.
//!
//! `ClientConfig` replaces per-call option spreading with one typed value
//! fixed at construction time. Per-call `RequestOptions` take precedence over
//! everything here.

use crate::cookie::CSRF_COOKIE;
use crate::http::CredentialMode;

/// Address of the backend API when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable that overrides `DEFAULT_BASE_URL` in `from_env`.
pub const BASE_URL_ENV: &str = "WEBTOON_API_BASE";

/// Header the backend reads the anti-forgery token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for every endpoint path, without a trailing slash.
    pub base_url: String,
    /// Headers sent on every request unless a call overrides them by name.
    pub default_headers: Vec<(String, String)>,
    pub credentials: CredentialMode,
    /// Cookie holding the CSRF token.
    pub csrf_cookie: String,
    /// Header the CSRF token is echoed in.
    pub csrf_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            credentials: CredentialMode::Include,
            csrf_cookie: CSRF_COOKIE.to_string(),
            csrf_header: CSRF_HEADER.to_string(),
        }
    }

    /// Build a config whose base URL comes from `WEBTOON_API_BASE`, falling
    /// back to `DEFAULT_BASE_URL`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// Join the base URL and an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.credentials, CredentialMode::Include);
        assert_eq!(config.csrf_cookie, "csrftoken");
        assert_eq!(config.csrf_header, "X-CSRFToken");
        assert_eq!(
            config.default_headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://localhost:8000/api/");
        assert_eq!(config.url_for("/webtoons/"), "http://localhost:8000/api/webtoons/");
    }
}
