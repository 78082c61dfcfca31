//! Defines the endpoint for deleting a budget.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;

use crate::{
    Error,
    api::{ApiClient, BudgetId},
    auth::Session,
};

/// A route handler for deleting a budget, asks htmx to reload the list on success.
pub async fn delete_budget_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    match api.budgets(&session.access_token).delete(budget_id).await {
        Ok(()) => {
            tracing::info!("Deleted budget {budget_id}");
            (HxRefresh(true), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete budget {budget_id}: {error}");
            Error::from(error).into_alert_response()
        }
    }
}
