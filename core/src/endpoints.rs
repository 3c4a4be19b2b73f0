//! The endpoint table: logical operation name to path and options.
//!
//! Each function pins a path and method and, where needed, a JSON body or a
//! query string. Nothing here touches configuration or cookies; the executor
//! adds those when the `Endpoint` is built into an `HttpRequest`.

use serde::Serialize;

use crate::error::ApiError;
use crate::request::{RequestBody, RequestOptions};

/// A path relative to the base URL plus the call-level options for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub options: RequestOptions,
}

impl Endpoint {
    fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            options: RequestOptions::get(),
        }
    }

    fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            options: RequestOptions::post(),
        }
    }

    fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.options.body = Some(RequestBody::json(body)?);
        Ok(self)
    }
}

pub fn signup<B: Serialize + ?Sized>(user_data: &B) -> Result<Endpoint, ApiError> {
    Endpoint::post("/accounts/signup/").with_json(user_data)
}

pub fn login<B: Serialize + ?Sized>(credentials: &B) -> Result<Endpoint, ApiError> {
    Endpoint::post("/accounts/login/").with_json(credentials)
}

pub fn logout() -> Endpoint {
    Endpoint::post("/accounts/logout/")
}

pub fn me() -> Endpoint {
    Endpoint::get("/accounts/me/")
}

/// `params` is encoded whole, so keys beyond `WebtoonQuery`'s reach the backend.
pub fn webtoons<Q: Serialize + ?Sized>(params: &Q) -> Result<Endpoint, ApiError> {
    Ok(Endpoint::get(with_query("/webtoons/", params)?))
}

pub fn webtoon(id: u64) -> Endpoint {
    Endpoint::get(format!("/webtoons/{id}/"))
}

pub fn toggle_favorite(id: u64) -> Endpoint {
    Endpoint::post(format!("/webtoons/{id}/favorite/"))
}

pub fn my_favorites<Q: Serialize + ?Sized>(params: &Q) -> Result<Endpoint, ApiError> {
    Ok(Endpoint::get(with_query("/me/favorites/", params)?))
}

/// Genre-based recommendations for the current user's favorites.
pub fn recommend_by_favorites() -> Endpoint {
    Endpoint::get("/webtoons/favorites/")
}

/// Webtoons whose synopsis resembles webtoon `id`'s.
pub fn recommend_by_synopsis(id: u64) -> Endpoint {
    Endpoint::get(format!("/webtoons/synopsis/{id}/"))
}

/// Append `params` as a form-encoded query string; no `?` when it encodes empty.
pub fn with_query<Q: Serialize + ?Sized>(path: &str, params: &Q) -> Result<String, ApiError> {
    let query = serde_urlencoded::to_string(params)?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::types::{FavoriteQuery, LoginRequest, WebtoonQuery};
    use serde_json::json;

    #[test]
    fn empty_query_has_no_question_mark() {
        let endpoint = webtoons(&WebtoonQuery::default()).unwrap();
        assert_eq!(endpoint.path, "/webtoons/");
        assert_eq!(endpoint.options.method, Some(HttpMethod::Get));
        assert!(endpoint.options.body.is_none());
    }

    #[test]
    fn page_is_encoded_into_query() {
        let params = WebtoonQuery {
            page: Some(2),
            ..WebtoonQuery::default()
        };
        assert_eq!(webtoons(&params).unwrap().path, "/webtoons/?page=2");
    }

    #[test]
    fn query_values_are_form_encoded() {
        let params = WebtoonQuery {
            provider: Some("KAKAO".to_string()),
            q: Some("solo & leveling".to_string()),
            page: None,
            per_page: Some(20),
        };
        assert_eq!(
            webtoons(&params).unwrap().path,
            "/webtoons/?provider=KAKAO&q=solo+%26+leveling&per_page=20"
        );
    }

    #[test]
    fn favorites_query() {
        assert_eq!(my_favorites(&FavoriteQuery::default()).unwrap().path, "/me/favorites/");
        let params = FavoriteQuery {
            provider: Some("ALL".to_string()),
            q: None,
        };
        assert_eq!(my_favorites(&params).unwrap().path, "/me/favorites/?provider=ALL");
    }

    #[test]
    fn map_params_pass_through() {
        let endpoint = webtoons(&json!({"page": 2, "sort": "asc"})).unwrap();
        assert_eq!(endpoint.path, "/webtoons/?page=2&sort=asc");
        assert_eq!(webtoons(&json!({})).unwrap().path, "/webtoons/");

        let mut params = std::collections::BTreeMap::new();
        params.insert("provider", "KAKAO");
        params.insert("q", "solo");
        assert_eq!(my_favorites(&params).unwrap().path, "/me/favorites/?provider=KAKAO&q=solo");
    }

    #[test]
    fn login_carries_credentials_as_json() {
        let credentials = LoginRequest {
            username: "a".to_string(),
            password: "b".to_string(),
        };
        let endpoint = login(&credentials).unwrap();
        assert_eq!(endpoint.path, "/accounts/login/");
        assert_eq!(endpoint.options.method, Some(HttpMethod::Post));
        assert_eq!(
            endpoint.options.body,
            Some(RequestBody::Json(json!({"username": "a", "password": "b"})))
        );
    }

    #[test]
    fn signup_accepts_arbitrary_payloads() {
        let endpoint = signup(&json!({"username": "new", "extra": [1, 2]})).unwrap();
        assert_eq!(endpoint.path, "/accounts/signup/");
        assert_eq!(
            endpoint.options.body,
            Some(RequestBody::Json(json!({"username": "new", "extra": [1, 2]})))
        );
    }

    #[test]
    fn bodiless_posts() {
        for endpoint in [logout(), toggle_favorite(42)] {
            assert_eq!(endpoint.options.method, Some(HttpMethod::Post));
            assert!(endpoint.options.body.is_none());
        }
        assert_eq!(toggle_favorite(42).path, "/webtoons/42/favorite/");
        assert_eq!(logout().path, "/accounts/logout/");
    }

    #[test]
    fn fixed_get_paths() {
        assert_eq!(me().path, "/accounts/me/");
        assert_eq!(webtoon(7).path, "/webtoons/7/");
        assert_eq!(recommend_by_favorites().path, "/webtoons/favorites/");
        assert_eq!(recommend_by_synopsis(7).path, "/webtoons/synopsis/7/");
    }

    #[test]
    fn non_map_query_is_rejected() {
        let err = with_query("/webtoons/", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, ApiError::Query(_)));
    }
}
