//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! executor builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` (or the host itself) performs
//! the actual round trip.
//!
//! All fields use owned types (`String`, `Vec`) so built requests can be
//! handed to any HTTP stack without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether session cookies travel with a request.
///
/// Mirrors the browser's `credentials` request option. The client defaults to
/// `Include` so the backend session follows every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    /// Send and store cookies for every request.
    #[default]
    Include,
    /// Never send or store cookies.
    Omit,
    /// Send and store cookies only when the request targets the base URL's origin.
    SameOrigin,
}

/// A fully merged HTTP request described as plain data.
///
/// Built by `WebtoonClient::build`. Headers are in wire order; `body` is
/// already serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: CredentialMode,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` (or the host) after executing an `HttpRequest`,
/// then handed to `parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Statuses in `[200, 400)` count as success.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("Set-Cookie".to_string(), "csrftoken=abc".to_string())],
            body: "{}".to_string(),
        }
    }

    #[test]
    fn success_range_is_200_to_399() {
        assert!(!response(199).is_success());
        assert!(response(200).is_success());
        assert!(response(302).is_success());
        assert!(response(399).is_success());
        assert!(!response(400).is_success());
        assert!(!response(500).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(response(200).header("set-cookie"), Some("csrftoken=abc"));
        assert_eq!(response(200).header("content-type"), None);
    }

    #[test]
    fn method_displays_as_wire_token() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }
}
