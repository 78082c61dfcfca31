//! This file defines the dashboard route and its handler.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiClient, DashboardQuery, DashboardReport},
    auth::Session,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    validation::parse_date,
};

use super::{
    cards::{budget_alert_view, kpi_cards_view},
    charts::{DashboardChart, charts_script, charts_view, dashboard_charts},
};

/// The query string of the dashboard. Dates that do not parse are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DashboardQueryParams {
    fn to_query(&self) -> DashboardQuery {
        DashboardQuery {
            start_date: self.start_date.as_deref().and_then(parse_date),
            end_date: self.end_date.as_deref().and_then(parse_date),
        }
    }
}

/// Whether the report has nothing worth drawing.
fn is_empty_report(report: &DashboardReport) -> bool {
    report.total_income == 0.0
        && report.total_expenses == 0.0
        && report.category_breakdown.is_empty()
        && report.budget_vs_actual.is_empty()
        && report.balance_history.is_empty()
        && report.fixed_vs_variable.is_empty()
        && report.income_vs_expenses.is_empty()
}

fn date_range_form(query: &DashboardQuery) -> Markup {
    let start_date = query.start_date.map(|date| date.to_string());
    let end_date = query.end_date.map(|date| date.to_string());

    html! {
        form
            id="date-range"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start_date"
                    name="start_date"
                    type="date"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end_date"
                    name="end_date"
                    type="date"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn dashboard_no_data_view() -> Markup {
    html! {
        section class="w-full text-center space-y-2" data-empty-dashboard
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "Charts and summaries will show up here once you "
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "add some transactions" }
                " or "
                a href=(endpoints::BUDGETS_VIEW) class=(LINK_STYLE) { "create a budget" }
                "."
            }
        }
    }
}

fn dashboard_view(
    query: &DashboardQuery,
    report: &DashboardReport,
    charts: &[DashboardChart],
    currency: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-7xl"
            {
                h1 class="text-xl font-bold mb-4" { "Dashboard" }

                (date_range_form(query))

                @if is_empty_report(report) {
                    (dashboard_no_data_view())
                } @else {
                    (budget_alert_view(report.budget_usage_percentage))
                    (kpi_cards_view(report, currency))
                    (charts_view(charts))
                }
            }
        }
    };

    let scripts = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(charts),
        ]
    };

    base("Dashboard", &scripts, &content)
}

/// Display a page with an overview of the user's finances for the chosen date range.
pub async fn get_dashboard_page(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Query(params): Query<DashboardQueryParams>,
) -> Response {
    let query = params.to_query();

    let report = match api.reports(&session.access_token).dashboard(query).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!("Could not load the dashboard report: {error}");
            return Error::from(error).into_response();
        }
    };

    let currency = &session.user.preferred_currency;
    let charts = if is_empty_report(&report) {
        Vec::new()
    } else {
        dashboard_charts(&report, currency)
    };

    dashboard_view(&query, &report, &charts, currency).into_response()
}
