//! `session` cookie attributes: HttpOnly, SameSite=Lax, Path=/, 7-day Max-Age,
//! `Secure` in production.

use axum::http::{header::COOKIE, HeaderMap};

use super::SESSION_DURATION_SECS;

pub const SESSION_COOKIE: &str = "session";

/// `Set-Cookie` value installing a session.
pub fn session_cookie_header(value: &str, secure: bool) -> String {
    cookie_header(value, SESSION_DURATION_SECS, secure)
}

/// `Set-Cookie` value deleting the session cookie.
pub fn clear_session_cookie_header(secure: bool) -> String {
    cookie_header("", 0, secure)
}

fn cookie_header(value: &str, max_age: i64, secure: bool) -> String {
    let mut header =
        format!("{SESSION_COOKIE}={value}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        header.push_str("; Secure");
    }
    header
}

/// Reads the session cookie from the request's `Cookie` headers.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
