//! Session handling: the encrypted session cookie, the auth guards, and the log-in,
//! registration and log-out routes.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod session;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, get_session_from_cookies, invalidate_session_cookie,
    set_session_cookie,
};
pub(crate) use cookie::{expired_session_cookie, update_session_user};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub(crate) use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub use register::{get_register_page, post_register};
pub use session::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub(crate) use middleware::AuthState;

/// The errors that may occur when reading or writing the session cookie.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// The session cookie is not in the cookie jar.
    #[error("the session cookie is missing")]
    CookieMissing,

    /// The session cookie could not be decrypted or decoded.
    #[error("the session cookie does not contain a valid session")]
    InvalidSession,

    /// The session has passed its expiry date.
    #[error("the session has expired")]
    SessionExpired,

    /// The new expiry date could not be computed.
    #[error("could not compute the session expiry")]
    DateError,

    /// The session could not be serialized as JSON.
    #[error("could not serialize the session: {0}")]
    SerializationError(String),
}
