//! Displays the user's budgets as cards with their spending progress.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    api::{ApiClient, Budget, PageRequest},
    auth::Session,
    currency::{format_currency, format_percentage},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_MUTED_STYLE, BADGE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        edit_delete_action_links,
    },
    navigation::NavBar,
    pagination::{create_pagination_indicators, pagination_nav, to_api_page},
};

/// The number of budgets on one page of the list.
pub const BUDGETS_PAGE_SIZE: u64 = 10;

/// Usage above this percentage shows the progress bar in the warning style.
const WARNING_THRESHOLD: f64 = 90.0;

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    pub api: ApiClient,
    pub max_pages: u64,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            max_pages: state.pagination_config.max_pages,
        }
    }
}

/// The query string of the budgets page. Unparseable values fall back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetsQuery {
    pub page: Option<String>,
}

impl BudgetsQuery {
    fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<u64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

/// How much of a budget has been used, ready for display.
#[derive(Debug, PartialEq)]
struct BudgetUsage {
    /// The usage with one decimal place, e.g. "87.5%". May be over 100%.
    label: String,
    /// The width of the progress bar as a percentage, between 0 and 100.
    bar_width: f64,
    is_warning: bool,
}

impl BudgetUsage {
    fn new(usage_percentage: f64) -> Self {
        Self {
            label: format_percentage(usage_percentage),
            bar_width: usage_percentage.clamp(0.0, 100.0),
            is_warning: usage_percentage > WARNING_THRESHOLD,
        }
    }
}

fn budget_card(budget: &Budget) -> Markup {
    let usage = BudgetUsage::new(budget.usage_percentage);
    let bar_style = if usage.is_warning {
        "h-2.5 rounded-full bg-red-600 dark:bg-red-500"
    } else {
        "h-2.5 rounded-full bg-blue-600 dark:bg-blue-500"
    };
    let edit_url = format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);
    let delete_url = format_endpoint(endpoints::BUDGET_API, budget.id);
    let start_date = budget.start_date.to_string();
    let end_date = budget.end_date.to_string();

    html! {
        li class=(CARD_STYLE) data-budget-id=(budget.id)
        {
            div class="flex items-start justify-between gap-3"
            {
                div
                {
                    h2 class="text-lg font-semibold" { (budget.name) }
                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (budget.period.label()) " · "
                        time datetime=(start_date) { (start_date) }
                        " to "
                        time datetime=(end_date) { (end_date) }
                    }
                }

                @if budget.active {
                    span class=(BADGE_STYLE) { "Active" }
                } @else {
                    span class=(BADGE_MUTED_STYLE) { "Inactive" }
                }
            }

            div class="mt-3"
            {
                div class="flex justify-between text-sm mb-1"
                {
                    span { "Used" }
                    span data-usage=(usage.label) { (usage.label) }
                }

                div
                    class="w-full h-2.5 bg-gray-200 rounded-full dark:bg-gray-700"
                    role="progressbar"
                    aria-valuemin="0"
                    aria-valuemax="100"
                    aria-valuenow=(usage.bar_width)
                {
                    div class=(bar_style) style=(format!("width: {}%", usage.bar_width)) {}
                }
            }

            dl class="mt-3 grid grid-cols-3 gap-2 text-sm"
            {
                div
                {
                    dt class="text-gray-500 dark:text-gray-400" { "Spent" }
                    dd class="tabular-nums" { (format_currency(budget.spent_amount, &budget.currency)) }
                }
                div
                {
                    dt class="text-gray-500 dark:text-gray-400" { "Remaining" }
                    dd class="tabular-nums" { (format_currency(budget.remaining_amount, &budget.currency)) }
                }
                div
                {
                    dt class="text-gray-500 dark:text-gray-400" { "Total" }
                    dd class="tabular-nums" { (format_currency(budget.total_amount, &budget.currency)) }
                }
            }

            div class="mt-3 flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &format!(
                        "Are you sure you want to delete the budget '{}'? \
                        Its transactions will be deleted too.",
                        budget.name
                    ),
                    "closest li",
                    "delete",
                ))
            }
        }
    }
}

fn budgets_view(budgets: &[Budget], pagination: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Budgets" }

                    a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE) { "New Budget" }
                }

                @if budgets.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No budgets yet. Create one "
                        a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE) { "here" }
                        "."
                    }
                } @else {
                    ul class="grid gap-4 md:grid-cols-2"
                    {
                        @for budget in budgets {
                            (budget_card(budget))
                        }
                    }

                    (pagination)
                }
            }
        }
    };

    base("Budgets", &[], &content)
}

/// Renders a page of the user's budgets.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Extension(session): Extension<Session>,
    Query(query): Query<BudgetsQuery>,
) -> Response {
    let page = query.page();
    let request = PageRequest {
        page: to_api_page(page),
        size: BUDGETS_PAGE_SIZE,
    };

    let budgets = match state.api.budgets(&session.access_token).list(request).await {
        Ok(budgets) => budgets,
        Err(error) => return Error::from(error).into_response(),
    };

    let indicators = create_pagination_indicators(page, budgets.total_pages, state.max_pages);
    let pagination = pagination_nav(&indicators, |page| {
        format!("{}?page={page}", endpoints::BUDGETS_VIEW)
    });

    budgets_view(&budgets.content, pagination).into_response()
}
