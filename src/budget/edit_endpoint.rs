//! Defines the endpoint for updating a budget.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    api::{ApiClient, BudgetId},
    auth::Session,
    budget::form::{BudgetFormData, FormAction, api_error_response, budget_form},
    endpoints::{self, format_endpoint},
};

const SUBMIT_TEXT: &str = "Save Budget";

/// A route handler for updating a budget, redirects to the budgets view on success.
pub async fn edit_budget_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(budget_id): Path<BudgetId>,
    Form(data): Form<BudgetFormData>,
) -> Response {
    let action = FormAction::Update(format_endpoint(endpoints::BUDGET_API, budget_id));

    let request = match data.validate(&session.user.preferred_currency) {
        Ok(request) => request,
        Err(errors) => return budget_form(&action, &data, &errors, SUBMIT_TEXT).into_response(),
    };

    match api
        .budgets(&session.access_token)
        .update(budget_id, &request)
        .await
    {
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::debug!("Could not update budget {budget_id}: {error}");
            api_error_response(error, &action, &data, SUBMIT_TEXT)
        }
    }
}
