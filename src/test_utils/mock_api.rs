//! Helpers for handler tests that talk to a [wiremock] stand-in for the budget API.

use std::time::Duration;

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use serde_json::{Value, json};
use time::{OffsetDateTime, UtcOffset};
use wiremock::{MockServer, ResponseTemplate};

use crate::{
    ApiClient, AppState, PaginationConfig,
    api::UserProfile,
    app_state::create_cookie_key,
    auth::{DEFAULT_COOKIE_DURATION, Session, set_session_cookie},
};

pub(crate) const TEST_SECRET: &str = "a very secret test secret";
pub(crate) const TEST_TOKEN: &str = "test-token";

/// App state whose API client points at `server`.
pub(crate) fn test_state(server: &MockServer) -> AppState {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5))
        .expect("Could not create API client");

    AppState::new(TEST_SECRET, "Etc/UTC", PaginationConfig::default(), api)
}

/// A successful response wrapping `data` in the API envelope.
pub(crate) fn api_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "message": null,
        "data": data,
    }))
}

/// A failed response with `message` in the API envelope.
pub(crate) fn api_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "message": message,
        "data": null,
    }))
}

pub(crate) fn test_user() -> UserProfile {
    UserProfile {
        id: 1,
        email: "ana@example.com".to_owned(),
        full_name: "Ana Gómez".to_owned(),
        preferred_currency: "COP".to_owned(),
        preferred_locale: "es".to_owned(),
    }
}

pub(crate) fn test_user_json() -> Value {
    json!({
        "id": 1,
        "email": "ana@example.com",
        "fullName": "Ana Gómez",
        "preferredCurrency": "COP",
        "preferredLocale": "es",
    })
}

pub(crate) fn test_session() -> Session {
    Session {
        access_token: TEST_TOKEN.to_owned(),
        user: test_user(),
        expires_at: OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
    }
}

/// A cookie jar, encrypted with the test secret, that holds a valid session.
pub(crate) fn signed_in_jar() -> PrivateCookieJar {
    let jar = PrivateCookieJar::new(create_cookie_key(TEST_SECRET));

    set_session_cookie(
        jar,
        TEST_TOKEN,
        test_user(),
        DEFAULT_COOKIE_DURATION,
        UtcOffset::UTC,
    )
    .expect("Could not set session cookie")
}

/// The encrypted session cookie from [signed_in_jar], for requests sent through a test server.
pub(crate) fn signed_in_cookie() -> Cookie<'static> {
    let response = signed_in_jar().into_response();
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("No session cookie set")
        .to_str()
        .expect("Could not convert cookie to str")
        .to_owned();

    Cookie::parse(header).expect("Could not parse session cookie")
}

pub(crate) fn budget_json(id: i64, name: &str, usage_percentage: f64) -> Value {
    let total = 2_000_000.0;
    let spent = total * usage_percentage / 100.0;

    json!({
        "id": id,
        "name": name,
        "totalAmount": total,
        "spentAmount": spent,
        "remainingAmount": total - spent,
        "usagePercentage": usage_percentage,
        "period": "MONTHLY",
        "startDate": "2025-03-01",
        "endDate": "2025-03-31",
        "currency": "COP",
        "active": true,
        "createdAt": "2025-03-01T08:00:00",
    })
}

pub(crate) fn transaction_json(id: i64, description: &str, amount: f64, kind: &str) -> Value {
    json!({
        "id": id,
        "description": description,
        "amount": amount,
        "type": kind,
        "transactionDate": "2025-03-09",
        "notes": null,
        "categoryName": "Food",
        "categoryId": 2,
        "budgetName": "Marzo",
        "budgetId": 1,
        "createdAt": null,
    })
}

pub(crate) fn category_json(id: i64, name: &str, is_default: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "icon": null,
        "color": "#3f51b5",
        "expenseType": "VARIABLE",
        "isDefault": is_default,
    })
}

/// A page of `content` in the API's page format.
pub(crate) fn page_json(content: Vec<Value>, number: u64, size: u64, total_elements: u64) -> Value {
    let total_pages = total_elements.div_ceil(size);

    json!({
        "content": content,
        "totalElements": total_elements,
        "totalPages": total_pages,
        "size": size,
        "number": number,
    })
}
