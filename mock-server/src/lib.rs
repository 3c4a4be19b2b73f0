use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const SESSION_COOKIE: &str = "sessionid";
pub const CSRF_HEADER: &str = "x-csrftoken";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Webtoon {
    pub id: u64,
    pub provider: String,
    pub title: String,
    pub writers: String,
    pub painters: String,
    pub original_author: String,
    pub update_days: String,
    pub thumbnail: String,
    pub url: String,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub is_adult: bool,
    pub is_up: bool,
    pub is_end: bool,
    #[serde(default)]
    pub is_favorited: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: Option<String>,
    pub gender: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct ListParams {
    pub provider: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct FavoriteParams {
    pub provider: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
struct Scored {
    #[serde(flatten)]
    webtoon: Webtoon,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
}

struct Account {
    user: User,
    password: String,
}

/// In-memory backend state: accounts, live sessions, favorites, catalog.
#[derive(Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
    sessions: HashMap<Uuid, String>,
    favorites: HashMap<String, BTreeSet<u64>>,
    webtoons: Vec<Webtoon>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with(seed_webtoons())
}

pub fn app_with(webtoons: Vec<Webtoon>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        webtoons,
        ..Store::default()
    }));
    let api = Router::new()
        .route("/accounts/signup/", post(signup))
        .route("/accounts/login/", post(login))
        .route("/accounts/logout/", post(logout))
        .route("/accounts/me/", get(me))
        .route("/webtoons/", get(list_webtoons))
        .route("/webtoons/favorites/", get(recommend_by_favorites))
        .route("/webtoons/synopsis/{id}/", get(recommend_by_synopsis))
        .route("/webtoons/{id}/", get(get_webtoon))
        .route("/webtoons/{id}/favorite/", post(toggle_favorite))
        .route("/me/favorites/", get(my_favorites));
    Router::new()
        .nest("/api", api)
        .fallback(unknown_route)
        .layer(middleware::from_fn(csrf))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A small catalog covering two providers, an adult title and a title with
/// no serialization days (both hidden from the listing).
pub fn seed_webtoons() -> Vec<Webtoon> {
    let toon = |id: u64, provider: &str, title: &str, days: &str, genres: &[&str], synopsis: &str| Webtoon {
        id,
        provider: provider.to_string(),
        title: title.to_string(),
        writers: format!("writer{id}"),
        painters: format!("painter{id}"),
        update_days: days.to_string(),
        thumbnail: format!("https://img.example.com/{id}.jpg"),
        url: format!("https://comic.example.com/{id}"),
        synopsis: synopsis.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        ..Webtoon::default()
    };
    vec![
        toon(1, "NAVER", "Tower of God", "mon", &["fantasy", "action"], "a boy climbs a mysterious tower to find his friend"),
        toon(2, "NAVER", "Lookism", "fri", &["drama", "action"], "a bullied boy wakes up in a second body"),
        toon(3, "NAVER", "True Beauty", "wed", &["romance", "drama", "comedy"], "a girl hides her face behind makeup at school"),
        toon(4, "NAVER", "Omniscient Reader", "wed", &["fantasy", "action"], "a reader finds himself inside the novel he read for years"),
        Webtoon {
            is_adult: true,
            ..toon(5, "NAVER", "Night Shift", "sat", &["romance"], "an adult drama")
        },
        toon(6, "NAVER", "Finished Story", "", &["drama"], "a story that already ended"),
        toon(7, "KAKAO", "Solo Leveling", "thu", &["fantasy", "action"], "a weak hunter becomes the strongest hunter after a mysterious dungeon"),
        toon(8, "KAKAO", "Semantic Error", "tue", &["romance", "comedy"], "two students clash over a school project"),
    ]
}

// --- cookies, sessions, CSRF ---

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(str::to_string)
}

fn set_cookie(response: &mut Response, value: String) {
    if let Ok(value) = HeaderValue::from_str(&value) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// Rejects unsafe methods whose `X-CSRFToken` does not echo the `csrftoken`
/// cookie, and hands out a token to any client that lacks one.
async fn csrf(request: Request, next: Next) -> Response {
    let token = cookie(request.headers(), CSRF_COOKIE);
    let safe = [Method::GET, Method::HEAD, Method::OPTIONS].contains(request.method());
    if !safe {
        let echoed = request.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok());
        if token.is_none() || echoed != token.as_deref() {
            tracing::debug!(path = %request.uri().path(), "csrf check failed");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "CSRF Failed: CSRF token missing or incorrect."})),
            )
                .into_response();
        }
    }

    let mut response = next.run(request).await;
    if token.is_none() {
        set_cookie(&mut response, format!("{CSRF_COOKIE}={}; Path=/", Uuid::new_v4().simple()));
    }
    response
}

async fn current_user(db: &Db, headers: &HeaderMap) -> Option<User> {
    let session: Uuid = cookie(headers, SESSION_COOKIE)?.parse().ok()?;
    let store = db.read().await;
    let username = store.sessions.get(&session)?;
    store.accounts.get(username).map(|account| account.user.clone())
}

async fn require_user(db: &Db, headers: &HeaderMap) -> Result<User, Failure> {
    current_user(db, headers).await.ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "not authenticated"})),
        )
    })
}

async fn start_session(db: &Db, username: &str) -> String {
    let session = Uuid::new_v4();
    db.write().await.sessions.insert(session, username.to_string());
    format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly")
}

fn bad_request(detail: Value) -> Failure {
    (StatusCode::BAD_REQUEST, Json(detail))
}

fn webtoon_not_found() -> Failure {
    (StatusCode::NOT_FOUND, Json(json!({"error": "webtoon not found"})))
}

fn parse_id(raw: &str) -> Result<u64, Failure> {
    raw.parse().map_err(|_| webtoon_not_found())
}

async fn unknown_route() -> Failure {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
}

// --- accounts ---

async fn signup(
    State(db): State<Db>,
    payload: Result<Json<SignupForm>, JsonRejection>,
) -> Result<Response, Failure> {
    let Json(form) = payload.map_err(|e| bad_request(json!({"detail": e.body_text()})))?;
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(bad_request(json!({"detail": "username and password are required"})));
    }

    let user = {
        let mut store = db.write().await;
        if store.accounts.contains_key(&form.username) {
            return Err(bad_request(
                json!({"username": ["A user with that username already exists."]}),
            ));
        }
        let user = User {
            id: store.accounts.len() as u64 + 1,
            username: form.username.clone(),
            email: Some(form.email),
            gender: form.gender,
        };
        store.accounts.insert(
            form.username,
            Account {
                user: user.clone(),
                password: form.password,
            },
        );
        user
    };
    tracing::info!(username = %user.username, "signed up");

    // Signing up logs the new user in.
    let session = start_session(&db, &user.username).await;
    let mut response = (StatusCode::CREATED, Json(user)).into_response();
    set_cookie(&mut response, session);
    Ok(response)
}

async fn login(
    State(db): State<Db>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<Response, Failure> {
    let Json(form) = payload.map_err(|e| bad_request(json!({"detail": e.body_text()})))?;
    let user = {
        let store = db.read().await;
        store
            .accounts
            .get(&form.username)
            .filter(|account| account.password == form.password)
            .map(|account| account.user.clone())
    };
    let Some(user) = user else {
        return Err(bad_request(json!({"detail": "invalid username or password"})));
    };
    tracing::info!(username = %user.username, "logged in");

    let session = start_session(&db, &user.username).await;
    let mut response = Json(user).into_response();
    set_cookie(&mut response, session);
    Ok(response)
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<Response, Failure> {
    let user = require_user(&db, &headers).await?;
    if let Some(session) = cookie(&headers, SESSION_COOKIE).and_then(|s| s.parse::<Uuid>().ok()) {
        db.write().await.sessions.remove(&session);
    }
    tracing::info!(username = %user.username, "logged out");

    let mut response = Json(json!({"detail": "logged out"})).into_response();
    set_cookie(&mut response, format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"));
    Ok(response)
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<User>, Failure> {
    require_user(&db, &headers).await.map(Json)
}

// --- webtoons ---

fn with_favorite_flag(webtoon: &Webtoon, favorites: Option<&BTreeSet<u64>>) -> Webtoon {
    Webtoon {
        is_favorited: favorites.is_some_and(|f| f.contains(&webtoon.id)),
        ..webtoon.clone()
    }
}

async fn user_favorites(db: &Db, user: Option<&User>) -> Option<BTreeSet<u64>> {
    let user = user?;
    db.read().await.favorites.get(&user.username).cloned()
}

async fn list_webtoons(
    State(db): State<Db>,
    headers: HeaderMap,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, Failure> {
    let Query(params) = params.map_err(|e| bad_request(json!({"detail": e.body_text()})))?;
    let provider = params.provider.unwrap_or_else(|| "NAVER".to_string());
    let needle = params.q.unwrap_or_default().to_lowercase();
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(100).max(1);

    let user = current_user(&db, &headers).await;
    let favorites = user_favorites(&db, user.as_ref()).await;

    let store = db.read().await;
    let mut matching: Vec<&Webtoon> = store
        .webtoons
        .iter()
        .filter(|w| w.provider == provider && !w.update_days.is_empty() && !w.is_adult)
        .filter(|w| needle.is_empty() || w.title.to_lowercase().contains(&needle))
        .collect();
    matching.sort_by(|a, b| b.id.cmp(&a.id));

    let count = matching.len();
    let total_pages = count.div_ceil(per_page).max(1);
    // Out-of-range pages fall back to the last page.
    let shown = if (1..=total_pages).contains(&page) { page } else { total_pages };
    let results: Vec<Webtoon> = matching
        .into_iter()
        .skip((shown - 1) * per_page)
        .take(per_page)
        .map(|w| with_favorite_flag(w, favorites.as_ref()))
        .collect();

    Ok(Json(json!({
        "count": count,
        "total_pages": total_pages,
        "current_page": page,
        "results": results,
    })))
}

async fn get_webtoon(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Webtoon>, Failure> {
    let id = parse_id(&id)?;
    let user = current_user(&db, &headers).await;
    let favorites = user_favorites(&db, user.as_ref()).await;
    let store = db.read().await;
    store
        .webtoons
        .iter()
        .find(|w| w.id == id)
        .map(|w| Json(with_favorite_flag(w, favorites.as_ref())))
        .ok_or_else(webtoon_not_found)
}

async fn toggle_favorite(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    let id = parse_id(&id)?;
    let user = require_user(&db, &headers).await?;

    let mut store = db.write().await;
    if !store.webtoons.iter().any(|w| w.id == id) {
        return Err(webtoon_not_found());
    }
    let favorites = store.favorites.entry(user.username).or_default();
    let is_favorited = if favorites.remove(&id) {
        false
    } else {
        favorites.insert(id);
        true
    };
    let message = if is_favorited { "favorite added" } else { "favorite removed" };
    Ok(Json(json!({"message": message, "is_favorited": is_favorited})))
}

async fn my_favorites(
    State(db): State<Db>,
    headers: HeaderMap,
    params: Result<Query<FavoriteParams>, QueryRejection>,
) -> Result<Json<Vec<Webtoon>>, Failure> {
    let Query(params) = params.map_err(|e| bad_request(json!({"detail": e.body_text()})))?;
    let user = require_user(&db, &headers).await?;
    let favorites = user_favorites(&db, Some(&user)).await.unwrap_or_default();
    let provider = params.provider.filter(|p| p != "ALL");
    let needle = params.q.unwrap_or_default().to_lowercase();

    let store = db.read().await;
    let results = store
        .webtoons
        .iter()
        .filter(|w| favorites.contains(&w.id))
        .filter(|w| provider.as_ref().is_none_or(|p| &w.provider == p))
        .filter(|w| {
            needle.is_empty()
                || w.title.to_lowercase().contains(&needle)
                || w.writers.to_lowercase().contains(&needle)
        })
        .map(|w| with_favorite_flag(w, Some(&favorites)))
        .collect();
    Ok(Json(results))
}

// --- recommendations ---

const MAX_RECOMMENDATIONS: usize = 10;

fn percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

/// Scores unfavorited webtoons by cosine similarity between their genres and
/// a profile built from the user's favorites; the three highest-id favorites
/// weigh 3, the next seven 2, the rest 1.
async fn recommend_by_favorites(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    let user = require_user(&db, &headers).await?;
    let favorites = user_favorites(&db, Some(&user)).await.unwrap_or_default();
    if favorites.is_empty() {
        return Ok(Json(json!({"message": "no favorites to recommend from"})));
    }

    let store = db.read().await;
    let mut profile: HashMap<&str, f64> = HashMap::new();
    for (rank, id) in favorites.iter().rev().enumerate() {
        let weight = match rank {
            0..=2 => 3.0,
            3..=9 => 2.0,
            _ => 1.0,
        };
        if let Some(webtoon) = store.webtoons.iter().find(|w| w.id == *id) {
            for genre in &webtoon.genres {
                *profile.entry(genre.as_str()).or_default() += weight;
            }
        }
    }
    let norm = profile.values().map(|w| w * w).sum::<f64>().sqrt();

    let mut scored: Vec<(f64, &Webtoon)> = store
        .webtoons
        .iter()
        .filter(|w| !favorites.contains(&w.id) && !w.genres.is_empty())
        .map(|w| {
            let dot: f64 = w.genres.iter().filter_map(|g| profile.get(g.as_str())).sum();
            (dot / (norm * (w.genres.len() as f64).sqrt()), w)
        })
        .filter(|(score, _)| *score > 0.0)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let items: Vec<Scored> = scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(score, w)| Scored {
            webtoon: with_favorite_flag(w, Some(&favorites)),
            match_score: Some(percent(score)),
            similarity: None,
        })
        .collect();
    Ok(Json(json!(items)))
}

fn words(text: &str) -> BTreeSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Scores other webtoons by word overlap (Jaccard) with the target synopsis.
async fn recommend_by_synopsis(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    let target = store
        .webtoons
        .iter()
        .find(|w| w.id == id)
        .ok_or_else(webtoon_not_found)?;
    let target_words = words(&target.synopsis);

    let mut scored: Vec<(f64, &Webtoon)> = store
        .webtoons
        .iter()
        .filter(|w| w.id != id)
        .map(|w| {
            let other = words(&w.synopsis);
            let union = target_words.union(&other).count();
            let shared = target_words.intersection(&other).count();
            let score = if union == 0 { 0.0 } else { shared as f64 / union as f64 };
            (score, w)
        })
        .filter(|(score, _)| *score >= 0.05)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let items: Vec<Scored> = scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(score, w)| Scored {
            webtoon: w.clone(),
            match_score: None,
            similarity: Some(percent(score)),
        })
        .collect();
    Ok(Json(json!(items)))
}
