//! The KPI cards and the budget warning banner at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    api::DashboardReport,
    currency::{format_currency, format_percentage},
    html::CARD_STYLE,
};

/// Usage above this percentage shows the near-limit warning.
const NEAR_LIMIT_THRESHOLD: f64 = 80.0;
/// Usage above this percentage means the budgets have been exceeded.
const OVER_BUDGET_THRESHOLD: f64 = 100.0;

/// How the overall budget usage compares to the warning thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn from_usage(usage_percentage: f64) -> Self {
        if usage_percentage > OVER_BUDGET_THRESHOLD {
            BudgetStatus::OverBudget
        } else if usage_percentage > NEAR_LIMIT_THRESHOLD {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::OnTrack
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "On track",
            BudgetStatus::NearLimit => "Near the limit",
            BudgetStatus::OverBudget => "Over budget",
        }
    }

    fn text_style(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "text-gray-600 dark:text-gray-400",
            BudgetStatus::NearLimit => "text-orange-500 dark:text-orange-400",
            BudgetStatus::OverBudget => "text-red-600 dark:text-red-400",
        }
    }
}

fn kpi_card(
    key: &str,
    label: &str,
    value: &str,
    value_style: &str,
    footer: Option<Markup>,
) -> Markup {
    html! {
        div class=(CARD_STYLE) data-kpi=(key)
        {
            div class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            div class={"text-2xl font-bold tabular-nums " (value_style)} data-kpi-value { (value) }

            @if let Some(footer) = footer {
                (footer)
            }
        }
    }
}

fn signed_style(amount: f64) -> &'static str {
    if amount > 0.0 {
        "text-green-600 dark:text-green-400"
    } else if amount < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        ""
    }
}

pub(super) fn kpi_cards_view(report: &DashboardReport, currency: &str) -> Markup {
    let status = BudgetStatus::from_usage(report.budget_usage_percentage);
    let status_footer = html! {
        div class={"text-sm mt-1 " (status.text_style())} data-budget-status { (status.label()) }
    };

    html! {
        section id="kpis" class="w-full grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-4 mb-4"
        {
            (kpi_card(
                "total-income",
                "Total income",
                &format_currency(report.total_income, currency),
                "text-green-600 dark:text-green-400",
                None,
            ))
            (kpi_card(
                "total-expenses",
                "Total expenses",
                &format_currency(report.total_expenses, currency),
                "text-red-600 dark:text-red-400",
                None,
            ))
            (kpi_card("balance", "Balance", &format_currency(report.balance, currency), "", None))
            (kpi_card(
                "monthly-average",
                "Monthly average expense",
                &format_currency(report.monthly_average_expense, currency),
                "",
                None,
            ))
            (kpi_card(
                "savings",
                "Savings",
                &format_currency(report.total_savings, currency),
                signed_style(report.total_savings),
                None,
            ))
            (kpi_card(
                "budget-usage",
                "Budget usage",
                &format_percentage(report.budget_usage_percentage),
                status.text_style(),
                Some(status_footer),
            ))
        }
    }
}

/// The warning shown when budget usage passes the near-limit threshold.
pub(super) fn budget_alert_view(usage_percentage: f64) -> Markup {
    let (style, message) = match BudgetStatus::from_usage(usage_percentage) {
        BudgetStatus::OnTrack => return html! {},
        BudgetStatus::NearLimit => (
            "text-orange-800 border-orange-300 bg-orange-50 dark:text-orange-300",
            "You have used more than 80% of your budgets.",
        ),
        BudgetStatus::OverBudget => (
            "text-red-800 border-red-300 bg-red-50 dark:text-red-400",
            "You have spent more than your budgets allow.",
        ),
    };

    html! {
        div
            id="budget-alert"
            role="alert"
            class={"w-full p-4 mb-4 border rounded-lg dark:bg-gray-800 " (style)}
        {
            "⚠ " (message)
        }
    }
}

#[cfg(test)]
mod cards_tests {
    use scraper::{Html, Selector};

    use crate::{api::DashboardReport, test_utils::assert_valid_html};

    use super::{BudgetStatus, budget_alert_view, kpi_cards_view};

    #[test]
    fn status_thresholds() {
        assert_eq!(BudgetStatus::from_usage(0.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_usage(80.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_usage(80.1), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_usage(100.0), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_usage(100.5), BudgetStatus::OverBudget);
    }

    #[test]
    fn banner_only_above_near_limit() {
        assert!(budget_alert_view(80.0).into_string().is_empty());

        let near = budget_alert_view(85.0).into_string();
        assert!(near.contains("more than 80%"));

        let over = budget_alert_view(120.0).into_string();
        assert!(over.contains("more than your budgets allow"));
    }

    #[test]
    fn cards_show_formatted_values() {
        let report = DashboardReport {
            total_income: 4_000_000.0,
            total_expenses: 1_250_000.0,
            balance: 2_750_000.0,
            monthly_average_expense: 625_000.0,
            total_savings: -10_000.0,
            budget_usage_percentage: 92.34,
            ..Default::default()
        };

        let html = Html::parse_fragment(&kpi_cards_view(&report, "COP").into_string());
        assert_valid_html(&html);

        let value = |key: &str| {
            html.select(&Selector::parse(&format!("[data-kpi={key}] [data-kpi-value]")).unwrap())
                .next()
                .unwrap()
                .text()
                .collect::<String>()
        };
        assert_eq!(value("total-income"), "$4,000,000");
        assert_eq!(value("savings"), "-$10,000");
        assert_eq!(value("budget-usage"), "92.3%");

        let status = html
            .select(&Selector::parse("[data-budget-status]").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert_eq!(status, "Near the limit");
    }
}
