//! The `auth` session cookie.
//!
//! The cookie value is `<email>|<check>`, where `check` is the hex
//! HMAC of the email under the server's login key.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "auth";

/// Build the cookie value for a logged-in email.
///
/// Returns `None` when the email holds a byte that is not a valid cookie
/// octet (controls, space, `"`, `,`, `;`, `\\` or non-ASCII).
pub fn encode_session(email: &str, check: &str) -> Option<String> {
    is_cookie_safe(email).then(|| format!("{email}|{check}"))
}

/// Whether `value` can travel unquoted in a `Set-Cookie` header.
pub fn is_cookie_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// Split a cookie value into `(email, check)`.
pub fn decode_session(value: &str) -> Option<(&str, &str)> {
    let (email, check) = value.rsplit_once('|')?;
    (!email.is_empty() && !check.is_empty()).then_some((email, check))
}

/// `Set-Cookie` header value that installs the session.
pub fn session_cookie(value: &str, secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax{}",
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` header value that removes the session.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", secure) + "; Max-Age=0"
}

/// Find a cookie by name across all `Cookie` request headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
