//! Defines the route handler for the page for creating a budget.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    auth::Session,
    budget::form::{BudgetFormData, FormAction, budget_form},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::local_today,
    validation::FieldErrors,
};

/// The state needed for the create budget page.
#[derive(Debug, Clone)]
pub struct CreateBudgetPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

pub(super) fn budget_page(title: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { (title) }

            (form)
        }
    };

    base(title, &[], &content)
}

/// Renders the page for creating a budget, prefilled with the current month.
pub async fn get_create_budget_page(
    State(state): State<CreateBudgetPageState>,
    Extension(session): Extension<Session>,
) -> Response {
    let today = local_today(&state.local_timezone);
    let data = BudgetFormData::for_month(today, &session.user.preferred_currency);
    let form = budget_form(
        &FormAction::Create(endpoints::BUDGETS_API),
        &data,
        &FieldErrors::new(),
        "Create Budget",
    );

    budget_page("Create Budget", form).into_response()
}
