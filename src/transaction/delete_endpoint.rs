//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;

use crate::{
    Error,
    api::{ApiClient, TransactionId},
    auth::Session,
};

/// A route handler for deleting a transaction, asks htmx to reload the page on success.
pub async fn delete_transaction_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match api
        .transactions(&session.access_token)
        .delete(transaction_id)
        .await
    {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            (HxRefresh(true), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Error::from(error).into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use axum::{
        Extension,
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::{
        api::ApiClient,
        test_utils::{api_error, get_header, test_session, test_state},
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn delete_refreshes_page() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/transactions/12"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response =
            delete_transaction_endpoint(State(api), Extension(test_session()), Path(12)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-refresh"), "true");
    }

    #[tokio::test]
    async fn missing_transaction_shows_alert() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/transactions/12"))
            .respond_with(api_error(404, "Transaction not found"))
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response =
            delete_transaction_endpoint(State(api), Extension(test_session()), Path(12)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
