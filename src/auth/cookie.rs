//! Stores the session in an encrypted private cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::api::UserProfile;

use super::{AuthError, Session};

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn session_cookie(value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION, value))
        .path("/")
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

fn write_session(jar: PrivateCookieJar, session: &Session) -> Result<PrivateCookieJar, AuthError> {
    let value = serde_json::to_string(session)
        .map_err(|error| AuthError::SerializationError(error.to_string()))?;

    Ok(jar.add(session_cookie(value, session.expires_at)))
}

/// Add a session cookie to the jar, indicating that a user is signed in.
///
/// The cookie expires `duration` from now, expressed in `local_offset`.
///
/// # Errors
///
/// Returns an [AuthError::DateError] if the expiry overflows, or an
/// [AuthError::SerializationError] if the session cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    access_token: &str,
    user: UserProfile,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, AuthError> {
    let expires_at = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    let session = Session {
        access_token: access_token.to_owned(),
        user,
        expires_at,
    };

    write_session(jar, &session)
}

/// Read the session from the jar.
///
/// # Errors
///
/// - [AuthError::CookieMissing] if there is no session cookie.
/// - [AuthError::InvalidSession] if the cookie does not hold a session.
/// - [AuthError::SessionExpired] if the session has expired.
pub fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, AuthError> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(AuthError::CookieMissing)?;
    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| AuthError::InvalidSession)?;

    if session.is_expired() {
        return Err(AuthError::SessionExpired);
    }

    Ok(session)
}

/// Set the expiry of the session cookie to the later of its current expiry and now plus `duration`.
///
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_session_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, AuthError> {
    let mut session = get_session_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or(AuthError::DateError)?;

    session.expires_at = max(session.expires_at, new_expiry);

    write_session(jar, &session)
}

/// Replace the cached user profile and keep the current expiry.
pub(crate) fn update_session_user(
    jar: PrivateCookieJar,
    user: UserProfile,
) -> Result<PrivateCookieJar, AuthError> {
    let mut session = get_session_from_cookies(&jar)?;
    session.user = user;

    write_session(jar, &session)
}

/// A cookie that overwrites the session cookie and expires immediately.
///
/// The value is not encrypted, so a jar will treat it as missing if the browser sends it back.
pub(crate) fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION, "deleted"))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which deletes the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(expired_session_cookie())
}
