//! Async client for the webtoon API.
//!
//! # Design
//! `WebtoonClient` owns a `ClientConfig`, a `Transport` and a `CookieSource`
//! and carries no mutable state of its own. Every endpoint call goes through
//! the same three steps: the endpoint table produces an `Endpoint`, `build`
//! merges it into a complete `HttpRequest`, and the transport's response is
//! classified by `parse_response`. `build` and the `parse_*` functions are
//! public so a host can also drive the round trip itself.
//!
//! Endpoint methods resolve with the parsed JSON as-is. Decoding into the
//! DTOs in `types` is opt-in through `call_as` / `request_as`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::cookie::CookieSource;
use crate::endpoints::{self, Endpoint};
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::request::{build_request, parse_response, RequestOptions};
use crate::transport::{JarCookies, ReqwestTransport, Transport};

/// Client for the webtoon API.
///
/// The default type parameters wire a reqwest transport to a cookie jar that
/// the CSRF token is read back from.
#[derive(Debug, Clone)]
pub struct WebtoonClient<T = ReqwestTransport, C = JarCookies> {
    config: ClientConfig,
    transport: T,
    cookies: C,
}

impl WebtoonClient {
    /// Client for `DEFAULT_BASE_URL`, or `WEBTOON_API_BASE` when set.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.base_url)?;
        let cookies = transport.cookies();
        Ok(Self::from_parts(config, transport, cookies))
    }
}

impl<T: Transport, C: CookieSource> WebtoonClient<T, C> {
    pub fn from_parts(config: ClientConfig, transport: T, cookies: C) -> Self {
        Self {
            config,
            transport,
            cookies,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Merge `options` over the defaults for `endpoint` without sending anything.
    pub fn build(&self, endpoint: &str, options: RequestOptions) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &self.cookies, endpoint, options)
    }

    /// Send one request and return the parsed JSON body.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let request = self.build(endpoint, options)?;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request).await.inspect_err(|err| {
            tracing::debug!(endpoint, error = %err, "transport failed");
        })?;
        tracing::debug!(endpoint, status = response.status, "received response");

        parse_response(&response)
    }

    /// `request`, then decode the JSON body into `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let data = self.request(endpoint, options).await?;
        serde_json::from_value(data).map_err(ApiError::Decode)
    }

    /// Send a prepared `Endpoint` and return the parsed JSON body.
    pub async fn call(&self, endpoint: Endpoint) -> Result<Value, ApiError> {
        self.request(&endpoint.path, endpoint.options).await
    }

    /// `call`, then decode into one of the DTOs in `types` (or any `R`).
    ///
    /// The endpoint methods below stay untyped; this is the opt-in layer for
    /// callers that know the backend's response shape.
    pub async fn call_as<R: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R, ApiError> {
        self.request_as(&endpoint.path, endpoint.options).await
    }

    pub async fn signup<B: Serialize + ?Sized>(&self, user_data: &B) -> Result<Value, ApiError> {
        self.call(endpoints::signup(user_data)?).await
    }

    pub async fn login<B: Serialize + ?Sized>(&self, credentials: &B) -> Result<Value, ApiError> {
        self.call(endpoints::login(credentials)?).await
    }

    pub async fn logout(&self) -> Result<Value, ApiError> {
        self.call(endpoints::logout()).await
    }

    pub async fn get_me(&self) -> Result<Value, ApiError> {
        self.call(endpoints::me()).await
    }

    /// `params` is any map-like value, e.g. a `WebtoonQuery` or a `json!` object.
    pub async fn get_webtoons<Q: Serialize + ?Sized>(&self, params: &Q) -> Result<Value, ApiError> {
        self.call(endpoints::webtoons(params)?).await
    }

    pub async fn get_webtoon(&self, id: u64) -> Result<Value, ApiError> {
        self.call(endpoints::webtoon(id)).await
    }

    pub async fn toggle_favorite(&self, id: u64) -> Result<Value, ApiError> {
        self.call(endpoints::toggle_favorite(id)).await
    }

    pub async fn get_my_favorites<Q: Serialize + ?Sized>(&self, params: &Q) -> Result<Value, ApiError> {
        self.call(endpoints::my_favorites(params)?).await
    }

    pub async fn recommend_by_favorites(&self) -> Result<Value, ApiError> {
        self.call(endpoints::recommend_by_favorites()).await
    }

    pub async fn recommend_by_synopsis(&self, id: u64) -> Result<Value, ApiError> {
        self.call(endpoints::recommend_by_synopsis(id)).await
    }
}
