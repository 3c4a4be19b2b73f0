//! Domain DTOs for the webtoon API.
//!
//! # Design
//! These types mirror the backend's JSON but are defined independently of the
//! mock-server crate; integration tests catch schema drift between the two.
//! Response types are lenient: every field except the identifying ones
//! defaults when the backend leaves it out.

use serde::{Deserialize, Serialize};

/// A webtoon as returned by list, detail, favorites and recommendation calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webtoon {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub writers: String,
    #[serde(default)]
    pub painters: String,
    #[serde(default)]
    pub original_author: String,
    /// Comma-separated serialization days, e.g. `"mon,thu"`.
    #[serde(default)]
    pub update_days: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub is_adult: bool,
    #[serde(default)]
    pub is_up: bool,
    #[serde(default)]
    pub is_end: bool,
    /// Whether the current session's user has favorited this webtoon.
    #[serde(default)]
    pub is_favorited: bool,
}

/// One page of the webtoon listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebtoonPage {
    pub count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub results: Vec<Webtoon>,
}

/// Result of toggling a favorite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub message: String,
    pub is_favorited: bool,
}

/// A recommended webtoon with its score, in percent.
///
/// Genre-based recommendations fill `match_score`; synopsis-based ones fill
/// `similarity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub webtoon: Webtoon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Recommendation endpoints answer 200 with either a list or an explanatory
/// message when there is nothing to recommend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Recommendations {
    Items(Vec<Recommendation>),
    Message { message: String },
}

impl Recommendations {
    /// The recommended items; empty for the message form.
    pub fn items(&self) -> &[Recommendation] {
        match self {
            Recommendations::Items(items) => items,
            Recommendations::Message { .. } => &[],
        }
    }
}

/// The authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// `"M"` or `"F"` when the user chose one.
    #[serde(default)]
    pub gender: Option<String>,
}

/// Payload for `signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Payload for `login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query for the webtoon listing. Unset fields stay out of the query string;
/// the backend then defaults to provider `NAVER`, page 1 and 100 per page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebtoonQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Case-insensitive title search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Query for the current user's favorites. Provider `ALL` disables the
/// provider filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webtoon_tolerates_missing_optional_fields() {
        let webtoon: Webtoon = serde_json::from_str(r#"{"id":3,"title":"Tower"}"#).unwrap();
        assert_eq!(webtoon.id, 3);
        assert_eq!(webtoon.title, "Tower");
        assert!(webtoon.genres.is_empty());
        assert!(!webtoon.is_favorited);
    }

    #[test]
    fn webtoon_requires_id() {
        let result: Result<Webtoon, _> = serde_json::from_str(r#"{"title":"No id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn recommendations_decode_list_form() {
        let raw = r#"[{"id":1,"title":"A","genres":["action"],"match_score":87.5}]"#;
        let recs: Recommendations = serde_json::from_str(raw).unwrap();
        let items = recs.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].webtoon.title, "A");
        assert_eq!(items[0].match_score, Some(87.5));
        assert_eq!(items[0].similarity, None);
    }

    #[test]
    fn recommendations_decode_message_form() {
        let raw = r#"{"message":"no favorites yet"}"#;
        let recs: Recommendations = serde_json::from_str(raw).unwrap();
        assert_eq!(
            recs,
            Recommendations::Message {
                message: "no favorites yet".to_string()
            }
        );
        assert!(recs.items().is_empty());
    }

    #[test]
    fn signup_omits_unset_gender() {
        let input = SignupRequest {
            username: "kim".to_string(),
            email: "kim@example.com".to_string(),
            password: "pw".to_string(),
            gender: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("gender").is_none());
        assert_eq!(json["username"], "kim");
    }
}
