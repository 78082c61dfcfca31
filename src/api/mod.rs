//! HTTP clients for the remote budget API.
//!
//! Every resource client borrows a shared [ApiClient] and turns a CRUD intent
//! into a single HTTP call. The API wraps every response body in an
//! [ApiResponse] envelope, which is unwrapped here so that callers only see
//! the payload or an [ApiError].

use std::{collections::BTreeMap, time::Duration};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

mod auth;
mod budgets;
mod categories;
mod models;
mod reports;
mod transactions;

pub use auth::{AuthClient, UserClient};
pub use budgets::BudgetClient;
pub use categories::CategoryClient;
pub use models::{
    AuthResponse, BalancePoint, Budget, BudgetId, BudgetPeriod, BudgetRequest, BudgetVsActual,
    Category, CategoryBreakdown, CategoryId, CategoryRequest, DashboardQuery, DashboardReport,
    ExpenseType, FixedVsVariable, IncomeVsExpense, LoginRequest, PageRequest, PageResponse,
    RegisterRequest, Transaction, TransactionFilter, TransactionId, TransactionRequest,
    TransactionType, UserProfile, UserSettingsRequest,
};
pub use reports::ReportClient;
pub use transactions::TransactionClient;

/// The envelope the API wraps around every response body.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// The errors returned by the resource clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The access token was missing, invalid or expired.
    #[error("the API rejected the access token")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The API rejected one or more fields of the request body.
    ///
    /// `fields` maps the request field name to a human readable message.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// The API rejected the request for a reason other than field validation.
    #[error("{0}")]
    BadRequest(String),

    /// The request conflicts with the current state, e.g. a budget would be exceeded.
    #[error("{0}")]
    Conflict(String),

    /// Any other non-success status.
    #[error("the API responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the API: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("could not decode the API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message that can be shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired, please log in again.".to_owned(),
            ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::Conflict(message)
            | ApiError::Validation { message, .. } => message.clone(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Http(_) | ApiError::Decode(_) => {
                "The budget service is not available right now. Try again later.".to_owned()
            }
        }
    }
}

/// A handle to the remote budget API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`, e.g. "http://localhost:8080/api".
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Unauthenticated endpoints for logging in and registering.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    /// Endpoints for the signed-in user's profile.
    pub fn users<'a>(&'a self, token: &'a str) -> UserClient<'a> {
        UserClient::new(self, token)
    }

    pub fn budgets<'a>(&'a self, token: &'a str) -> BudgetClient<'a> {
        BudgetClient::new(self, token)
    }

    pub fn transactions<'a>(&'a self, token: &'a str) -> TransactionClient<'a> {
        TransactionClient::new(self, token)
    }

    pub fn categories<'a>(&'a self, token: &'a str) -> CategoryClient<'a> {
        CategoryClient::new(self, token)
    }

    pub fn reports<'a>(&'a self, token: &'a str) -> ReportClient<'a> {
        ReportClient::new(self, token)
    }

    pub(crate) fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.with_token(self.http.get(self.url(path)), token)
    }

    pub(crate) fn post(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.with_token(self.http.post(self.url(path)), token)
    }

    pub(crate) fn put(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.with_token(self.http.put(self.url(path)), token)
    }

    pub(crate) fn patch(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.with_token(self.http.patch(self.url(path)), token)
    }

    pub(crate) fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.with_token(self.http.delete(self.url(path)), token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_token(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send `request` and return the `data` field of the response envelope.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = checked_response(request).await?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|error| ApiError::Decode(error.to_string()))?;

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("the response envelope has no data".to_owned()))
    }

    /// Send `request` and discard the response body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        checked_response(request).await.map(|_| ())
    }

    /// Send `request` and return the raw response body.
    pub(crate) async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = checked_response(request).await?;
        let bytes = response.bytes().await?;

        Ok(bytes.to_vec())
    }
}

async fn checked_response(request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("API {} responded with {}", response.url().path(), status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(error_from_response(status, &body))
}

/// Map a failed response to an [ApiError], using the envelope message where
/// the API provided one.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|envelope| envelope.message.clone())
        .filter(|message| !message.trim().is_empty());

    match status {
        // Only a 401 ends the session, a 403 is reported like any other failure.
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => {
            ApiError::NotFound(message.unwrap_or_else(|| "Resource not found".to_owned()))
        }
        StatusCode::CONFLICT => ApiError::Conflict(
            message.unwrap_or_else(|| "The request conflicts with existing data".to_owned()),
        ),
        StatusCode::BAD_REQUEST => {
            let fields = envelope
                .and_then(|envelope| envelope.data)
                .and_then(|data| serde_json::from_value::<BTreeMap<String, String>>(data).ok())
                .filter(|fields| !fields.is_empty());
            let message = message.unwrap_or_else(|| "The request was invalid".to_owned());

            match fields {
                Some(fields) => ApiError::Validation { message, fields },
                None => ApiError::BadRequest(message),
            }
        }
        status => ApiError::Server {
            status: status.as_u16(),
            message: message
                .unwrap_or_else(|| "Unexpected error from the budget service".to_owned()),
        },
    }
}
