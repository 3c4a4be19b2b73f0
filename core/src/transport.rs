//! The network seam and its reqwest implementation.
//!
//! # Design
//! `Transport` executes one already-built `HttpRequest`. `ReqwestTransport`
//! keeps a cookie jar that stands in for the browser's cookie store: the
//! session cookie and the CSRF cookie the backend sets land in the jar and
//! travel on later requests, and `JarCookies` reads the same jar when the
//! executor needs the CSRF token.
//!
//! Two reqwest clients are kept, one wired to the jar and one without it, so
//! `CredentialMode` is honored per request without rebuilding clients.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use url::{Origin, Url};

use crate::cookie::{get_cookie, CookieSource};
use crate::error::TransportError;
use crate::http::{CredentialMode, HttpMethod, HttpRequest, HttpResponse};

/// Executes exactly one HTTP round trip per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// reqwest-backed transport with a shared cookie jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    with_cookies: Client,
    without_cookies: Client,
    jar: Arc<Jar>,
    base: Url,
    origin: Origin,
}

impl ReqwestTransport {
    /// Create a transport whose same-origin checks and jar lookups are
    /// relative to `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_jar(base_url, Arc::new(Jar::default()))
    }

    /// Like `new`, but reusing an existing jar (e.g. one pre-seeded with a
    /// session cookie).
    pub fn with_jar(base_url: &str, jar: Arc<Jar>) -> Result<Self, TransportError> {
        let base = Url::parse(base_url).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let with_cookies = Client::builder().cookie_provider(jar.clone()).build()?;
        let without_cookies = Client::builder().build()?;
        let origin = base.origin();
        Ok(Self {
            with_cookies,
            without_cookies,
            jar,
            base,
            origin,
        })
    }

    /// Cookie source reading this transport's jar for the base URL.
    pub fn cookies(&self) -> JarCookies {
        JarCookies {
            jar: self.jar.clone(),
            url: self.base.clone(),
        }
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    fn client_for(&self, credentials: CredentialMode, url: &Url) -> &Client {
        match credentials {
            CredentialMode::Include => &self.with_cookies,
            CredentialMode::Omit => &self.without_cookies,
            CredentialMode::SameOrigin if url.origin() == self.origin => &self.with_cookies,
            CredentialMode::SameOrigin => &self.without_cookies,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let client = self.client_for(request.credentials, &url);

        let mut builder = client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Reads cookies the backend stored in a `ReqwestTransport` jar.
#[derive(Debug, Clone)]
pub struct JarCookies {
    jar: Arc<Jar>,
    url: Url,
}

impl CookieSource for JarCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        get_cookie(header.to_str().ok()?, name)
    }
}
