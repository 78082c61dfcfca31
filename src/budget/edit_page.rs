use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api::{ApiClient, BudgetId},
    auth::Session,
    budget::{
        create_page::budget_page,
        form::{BudgetFormData, FormAction, budget_form},
    },
    endpoints::{self, format_endpoint},
    validation::FieldErrors,
};

/// Renders the page for editing a budget.
pub async fn get_edit_budget_page(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let budget = match api.budgets(&session.access_token).get(budget_id).await {
        Ok(budget) => budget,
        Err(error) => {
            tracing::debug!("Could not get budget {budget_id}: {error}");
            return Error::from(error).into_response();
        }
    };

    let form = budget_form(
        &FormAction::Update(format_endpoint(endpoints::BUDGET_API, budget.id)),
        &BudgetFormData::from_budget(&budget),
        &FieldErrors::new(),
        "Save Budget",
    );

    budget_page("Edit Budget", form).into_response()
}
