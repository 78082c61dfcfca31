//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    api::ApiClient,
    auth::Session,
    transaction::form::{
        FormAction, TransactionFormData, api_error_response, invalid_form_response,
    },
};

/// A route handler for creating a new transaction, redirects back to the
/// transactions page the form was opened from.
pub async fn create_transaction_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(data): Form<TransactionFormData>,
) -> Response {
    let token = session.access_token.as_str();
    let action = FormAction::Create;

    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => {
            return invalid_form_response(&api, token, &action, &data, &errors).await;
        }
    };

    match api.transactions(token).create(&request).await {
        Ok(transaction) => {
            tracing::info!(
                "Created transaction {} in budget {}",
                transaction.id,
                transaction.budget_id
            );
            (HxRedirect(data.list_url()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => api_error_response(&api, token, error, &action, &data).await,
    }
}
