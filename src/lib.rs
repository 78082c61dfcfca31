//! Presupuesto is a web client for managing budgets, transactions and categories.
//!
//! This library serves HTML pages and htmx fragments, and forwards every change to a remote
//! budget REST API. The API access token is kept in an encrypted session cookie.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod auth;
mod budget;
mod category;
mod currency;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod settings;
mod timezone;
mod transaction;
mod validation;

#[cfg(test)]
mod test_utils;

pub use api::{ApiClient, ApiError};
pub use app_state::AppState;
pub use auth::{AuthError, Session};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

use crate::{
    alert::error_alert_response,
    auth::expired_session_cookie,
    html::error_view,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A call to the budget API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session cookie could not be read or written.
    #[error(transparent)]
    Session(#[from] AuthError),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file is not a CSV file.
    #[error("file is not a CSV")]
    NotCsv,

    /// A row of an uploaded CSV file is invalid. Rows are numbered from 1, counting the header.
    #[error("Row {row}: {reason}")]
    InvalidCsv {
        /// The 1-based row number.
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Default categories are managed by the API and cannot be edited or deleted.
    #[error("default categories cannot be edited or deleted")]
    DefaultCategoryLocked,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

/// Clear the session cookie and send the browser to the log-in page.
fn session_expired_redirect() -> Response {
    (
        AppendHeaders([(SET_COOKIE, expired_session_cookie().to_string())]),
        Redirect::to(endpoints::LOG_IN_VIEW),
    )
        .into_response()
}

/// Clear the session cookie and tell htmx to load the log-in page.
fn session_expired_hx_redirect() -> Response {
    (
        AppendHeaders([(SET_COOKIE, expired_session_cookie().to_string())]),
        HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
        StatusCode::OK,
    )
        .into_response()
}

fn invalid_timezone_fix(timezone: &str) -> String {
    format!(
        "Could not get local timezone \"{timezone}\". Check your server settings and \
        ensure the timezone has been set to valid, canonical timezone string"
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Api(ApiError::Unauthorized) => session_expired_redirect(),
            Error::NotFound | Error::Api(ApiError::NotFound(_)) => get_404_not_found_response(),
            Error::DefaultCategoryLocked => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Default Category",
                    "400",
                    "Default categories cannot be edited.",
                    "Create your own category if you need a different one.",
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &invalid_timezone_fix(&timezone),
            }
            .into_response(),
            Error::Api(error @ (ApiError::Http(_) | ApiError::Decode(_))) => {
                tracing::error!("Could not get a usable response from the API: {error}");
                InternalServerError {
                    description: "The budget service is not available.",
                    fix: "Try again in a few minutes.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx to swap into `#alert-container`.
    fn into_alert_response(self) -> Response {
        match self {
            Error::Api(ApiError::Unauthorized) => session_expired_hx_redirect(),
            Error::Api(ApiError::Validation { message, .. }) => error_alert_response(
                StatusCode::BAD_REQUEST,
                "Please check the form",
                &message,
            ),
            Error::Api(ApiError::BadRequest(message)) => {
                error_alert_response(StatusCode::BAD_REQUEST, "Request rejected", &message)
            }
            Error::Api(ApiError::Conflict(message)) => {
                error_alert_response(StatusCode::CONFLICT, "Request rejected", &message)
            }
            Error::Api(ApiError::NotFound(message)) => {
                error_alert_response(StatusCode::NOT_FOUND, "Not found", &message)
            }
            Error::Api(error @ ApiError::Server { .. }) => {
                tracing::error!("The API returned an error: {error}");
                error_alert_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    &error.user_message(),
                )
            }
            Error::Api(error @ (ApiError::Http(_) | ApiError::Decode(_))) => {
                tracing::error!("Could not get a usable response from the API: {error}");
                error_alert_response(
                    StatusCode::BAD_GATEWAY,
                    "Something went wrong",
                    &error.user_message(),
                )
            }
            Error::MultipartError(error) => {
                tracing::warn!("Could not read upload: {error}");
                error_alert_response(
                    StatusCode::BAD_REQUEST,
                    "Could not read the upload",
                    "Check that a file was selected and try again.",
                )
            }
            Error::NotCsv => error_alert_response(
                StatusCode::BAD_REQUEST,
                "Invalid file type",
                "Select a CSV file with the columns Fecha, Descripción, Monto, Tipo, Categoría and Notas.",
            ),
            error @ Error::InvalidCsv { .. } => error_alert_response(
                StatusCode::BAD_REQUEST,
                "Could not import the file",
                &error.to_string(),
            ),
            Error::NotFound => error_alert_response(
                StatusCode::NOT_FOUND,
                "Not found",
                "The item could not be found. Try refreshing the page.",
            ),
            Error::DefaultCategoryLocked => error_alert_response(
                StatusCode::BAD_REQUEST,
                "Default category",
                "Default categories cannot be edited or deleted.",
            ),
            Error::InvalidTimezoneError(timezone) => error_alert_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                &invalid_timezone_fix(&timezone),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                error_alert_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{
        http::{StatusCode, header::SET_COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::cookie::Cookie;

    use crate::{ApiError, Error, auth::COOKIE_SESSION, endpoints, test_utils::get_header};

    #[track_caller]
    fn assert_session_cleared(response: &axum::response::Response) {
        let cookie = Cookie::parse(get_header(response, SET_COOKIE.as_str())).unwrap();

        assert_eq!(cookie.name(), COOKIE_SESSION);
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn unauthorized_page_clears_session_and_redirects() {
        let response = Error::Api(ApiError::Unauthorized).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);
        assert_session_cleared(&response);
    }

    #[test]
    fn unauthorized_htmx_request_clears_session_and_hx_redirects() {
        let response = Error::Api(ApiError::Unauthorized).into_alert_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-redirect"), endpoints::LOG_IN_VIEW);
        assert_session_cleared(&response);
    }

    #[test]
    fn default_category_page_is_bad_request() {
        let response = Error::DefaultCategoryLocked.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_not_found_renders_404_page() {
        let response =
            Error::Api(ApiError::NotFound("Budget not found".to_owned())).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn alert_statuses_match_error() {
        let cases = [
            (
                Error::Api(ApiError::Conflict("Budget exceeded".to_owned())),
                StatusCode::CONFLICT,
            ),
            (
                Error::Api(ApiError::BadRequest("Bad".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::InvalidCsv {
                    row: 3,
                    reason: "invalid date".to_owned(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (Error::DefaultCategoryLocked, StatusCode::BAD_REQUEST),
            (Error::NotCsv, StatusCode::BAD_REQUEST),
            (
                Error::Api(ApiError::Decode("oops".to_owned())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_alert_response();
            assert_eq!(response.status(), want_status, "for error {description}");
        }
    }

    #[test]
    fn invalid_csv_message_names_row() {
        let error = Error::InvalidCsv {
            row: 4,
            reason: "amount must be a positive number".to_owned(),
        };

        assert_eq!(error.to_string(), "Row 4: amount must be a positive number");
    }
}
