//! Defines the endpoint for creating a new budget.

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
    budget::form::{BudgetFormData, FormAction, api_error_response, budget_form},
    endpoints,
};

const SUBMIT_TEXT: &str = "Create Budget";

/// A route handler for creating a new budget, redirects to the budgets view on success.
///
/// Invalid input is sent back as the form with the problems marked.
pub async fn create_budget_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(data): Form<BudgetFormData>,
) -> Response {
    let action = FormAction::Create(endpoints::BUDGETS_API);

    let request = match data.validate(&session.user.preferred_currency) {
        Ok(request) => request,
        Err(errors) => return budget_form(&action, &data, &errors, SUBMIT_TEXT).into_response(),
    };

    match api.budgets(&session.access_token).create(&request).await {
        Ok(budget) => {
            tracing::info!("Created budget {}", budget.id);
            (
                HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => api_error_response(error, &action, &data, SUBMIT_TEXT),
    }
}
