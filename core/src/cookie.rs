//! Cookie reading and the cookie-source seam.
//!
//! The CSRF token lives in a cookie the backend sets. `get_cookie` reads one
//! value out of a `Cookie`-header style string; `CookieSource` abstracts where
//! that string comes from so the executor can be exercised without a live jar.

use std::borrow::Cow;

/// Cookie the backend uses to hand out its anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Return the percent-decoded value of cookie `name` from a
/// `name1=value1; name2=value2` string, or `None` when it is absent.
///
/// The first matching pair wins. A value that does not decode to valid UTF-8
/// is returned as-is.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(decode_value)
}

fn decode_value(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Supplies cookie values to the executor at request-build time.
pub trait CookieSource: Send + Sync {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// A fixed cookie string, as a browser would expose it.
#[derive(Debug, Clone, Default)]
pub struct CookieString(pub String);

impl CookieString {
    pub fn new(cookies: impl Into<String>) -> Self {
        Self(cookies.into())
    }
}

impl CookieSource for CookieString {
    fn cookie(&self, name: &str) -> Option<String> {
        get_cookie(&self.0, name)
    }
}

/// A source with no cookies at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCookies;

impl CookieSource for NoCookies {
    fn cookie(&self, _name: &str) -> Option<String> {
        None
    }
}

impl<S: CookieSource + ?Sized> CookieSource for std::sync::Arc<S> {
    fn cookie(&self, name: &str) -> Option<String> {
        (**self).cookie(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cookie_among_several() {
        let cookies = "sessionid=s1; csrftoken=tok123; theme=dark";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(get_cookie(cookies, "sessionid").as_deref(), Some("s1"));
        assert_eq!(get_cookie(cookies, "theme").as_deref(), Some("dark"));
    }

    #[test]
    fn tolerates_whitespace_around_pairs() {
        let cookies = "  a=1 ;   csrftoken=xyz  ;b=2";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("xyz"));
        assert_eq!(get_cookie(cookies, "b").as_deref(), Some("2"));
    }

    #[test]
    fn percent_decodes_value() {
        let cookies = "greeting=hello%20world%21; name=%EC%9B%B9%ED%88%B0";
        assert_eq!(get_cookie(cookies, "greeting").as_deref(), Some("hello world!"));
        assert_eq!(get_cookie(cookies, "name").as_deref(), Some("웹툰"));
    }

    #[test]
    fn undecodable_value_is_returned_raw() {
        assert_eq!(get_cookie("bad=%FF%FE", "bad").as_deref(), Some("%FF%FE"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(get_cookie("a=1; b=2", "csrftoken"), None);
        assert_eq!(get_cookie("", "csrftoken"), None);
        assert_eq!(get_cookie("a=1", ""), None);
    }

    #[test]
    fn prefix_of_another_name_does_not_match() {
        let cookies = "csrftokenx=wrong; xcsrftoken=wrong2";
        assert_eq!(get_cookie(cookies, "csrftoken"), None);
    }

    #[test]
    fn first_match_wins_and_empty_value_is_kept() {
        assert_eq!(get_cookie("k=first; k=second", "k").as_deref(), Some("first"));
        assert_eq!(get_cookie("k=; other=1", "k").as_deref(), Some(""));
    }

    #[test]
    fn value_may_contain_equals_sign() {
        assert_eq!(get_cookie("token=a=b==", "token").as_deref(), Some("a=b=="));
    }

    #[test]
    fn sources_read_through_get_cookie() {
        let source = CookieString::new("csrftoken=abc");
        assert_eq!(source.cookie(CSRF_COOKIE).as_deref(), Some("abc"));
        assert_eq!(NoCookies.cookie(CSRF_COOKIE), None);
        let shared = std::sync::Arc::new(source);
        assert_eq!(shared.cookie(CSRF_COOKIE).as_deref(), Some("abc"));
    }
}
