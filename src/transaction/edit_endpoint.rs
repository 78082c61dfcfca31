//! Defines the endpoint for updating a transaction.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    api::{ApiClient, TransactionId},
    auth::Session,
    endpoints::{self, format_endpoint},
    transaction::form::{
        FormAction, TransactionFormData, api_error_response, invalid_form_response,
    },
};

/// A route handler for saving changes to a transaction, redirects back to the
/// transactions page the form was opened from.
pub async fn edit_transaction_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
    Form(data): Form<TransactionFormData>,
) -> Response {
    let token = session.access_token.as_str();
    let action = FormAction::Update(format_endpoint(endpoints::TRANSACTION_API, transaction_id));

    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => {
            return invalid_form_response(&api, token, &action, &data, &errors).await;
        }
    };

    match api
        .transactions(token)
        .update(transaction_id, &request)
        .await
    {
        Ok(_) => {
            tracing::info!("Updated transaction {transaction_id}");
            (HxRedirect(data.list_url()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => api_error_response(&api, token, error, &action, &data).await,
    }
}
