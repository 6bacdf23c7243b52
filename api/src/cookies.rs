//! Cookie policy for the two auth cookies.
//!
//! The CSRF cookie is readable by scripts on purpose: the client must
//! echo it into the access-token signing key, which is what binds an
//! access token to the browser that asked for it. The refresh cookie
//! never leaves `/authn/` and is invisible to scripts.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Script-readable CSRF cookie, valid for a year
pub fn csrf_cookie(value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, value.to_string())
        .path("/")
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(365))
        .finish()
}

/// HttpOnly refresh cookie scoped to the `/authn/` routes, expiring
/// together with the session row
pub fn refresh_cookie(token: &str, expires_at: DateTime<Utc>, secure: bool) -> Cookie<'static> {
    let remaining = (expires_at - Utc::now()).num_seconds().max(0);
    Cookie::build(REFRESH_COOKIE, token.to_string())
        .path("/authn/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(remaining))
        .finish()
}

/// Expired empty cookie that removes the refresh cookie
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, "")
        .path("/authn/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// Expired empty cookie that removes the CSRF cookie
pub fn clear_csrf_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, "")
        .path("/")
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_refresh_cookie_is_scoped_and_hidden() {
        let cookie = refresh_cookie("tok", Utc::now() + Duration::days(7), true);
        assert_eq!(cookie.path(), Some("/authn/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_csrf_cookie_is_script_readable() {
        let cookie = csrf_cookie("value", false);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(false));
    }

    #[test]
    fn test_expired_session_yields_zero_max_age() {
        let cookie = refresh_cookie("tok", Utc::now() - Duration::hours(1), false);
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
