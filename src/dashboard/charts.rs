//! Chart generation and rendering for the dashboard.
//!
//! Each chart is built from one series of the dashboard report:
//! - **Spending by category**: Donut of expenses per category, in the category colours
//! - **Budget vs actual**: Budgeted and spent amounts side by side per category
//! - **Balance history**: Running balance over the selected range
//! - **Fixed vs variable**: Monthly expenses stacked by expense type
//! - **Income vs expenses**: Monthly income and expense totals
//!
//! Each chart is rendered as ECharts options with a container and initialization script.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{api::DashboardReport, html::HeadElement};

/// Used for categories the API sends without a colour.
const FALLBACK_CATEGORY_COLOR: &str = "#9e9e9e";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    fn new(id: &'static str, chart: &Chart) -> Self {
        // Display keeps the formatters as JS functions, serde would quote them.
        Self {
            id,
            options: escape_inline_script(&chart.to_string()),
        }
    }
}

/// Stops user text in the chart data from closing the surrounding `<script>`
/// element. `<\/` and `<\!--` read the same inside JS string literals.
fn escape_inline_script(options: &str) -> String {
    options.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// Builds every chart that has data in `report`, skipping the empty series.
pub(super) fn dashboard_charts(report: &DashboardReport, currency: &str) -> Vec<DashboardChart> {
    let mut charts = Vec::new();

    if !report.category_breakdown.is_empty() {
        charts.push(DashboardChart::new(
            "category-chart",
            &category_chart(report, currency),
        ));
    }
    if !report.budget_vs_actual.is_empty() {
        charts.push(DashboardChart::new(
            "budget-vs-actual-chart",
            &budget_vs_actual_chart(report, currency),
        ));
    }
    if !report.balance_history.is_empty() {
        charts.push(DashboardChart::new(
            "balance-chart",
            &balance_chart(report, currency),
        ));
    }
    if !report.fixed_vs_variable.is_empty() {
        charts.push(DashboardChart::new(
            "fixed-vs-variable-chart",
            &fixed_vs_variable_chart(report, currency),
        ));
    }
    if !report.income_vs_expenses.is_empty() {
        charts.push(DashboardChart::new(
            "income-vs-expenses-chart",
            &income_vs_expenses_chart(report, currency),
        ));
    }

    charts
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn category_chart(report: &DashboardReport, currency: &str) -> Chart {
    let colors = report
        .category_breakdown
        .iter()
        .map(|category| {
            Color::from(
                category
                    .color
                    .as_deref()
                    .unwrap_or(FALLBACK_CATEGORY_COLOR),
            )
        })
        .collect::<Vec<_>>();
    let data = report
        .category_breakdown
        .iter()
        .map(|category| (category.amount, category.category_name.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency)),
        )
        .legend(Legend::new().top("bottom"))
        .color(colors)
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

fn budget_vs_actual_chart(report: &DashboardReport, currency: &str) -> Chart {
    let labels = report
        .budget_vs_actual
        .iter()
        .map(|row| row.category_name.clone())
        .collect::<Vec<_>>();
    let budgeted = report
        .budget_vs_actual
        .iter()
        .map(|row| row.budgeted)
        .collect::<Vec<_>>();
    let actual = report
        .budget_vs_actual
        .iter()
        .map(|row| row.actual)
        .collect::<Vec<_>>();

    monthly_bar_chart("Budget vs actual", labels, currency)
        .series(bar::Bar::new().name("Budgeted").data(budgeted))
        .series(bar::Bar::new().name("Actual").data(actual))
}

fn balance_chart(report: &DashboardReport, currency: &str) -> Chart {
    let labels = report
        .balance_history
        .iter()
        .map(|point| point.date.clone())
        .collect::<Vec<_>>();
    let values = report
        .balance_history
        .iter()
        .map(|point| point.balance)
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Balance history"))
        .tooltip(currency_tooltip(currency))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency))),
        )
        .series(Line::new().name("Balance").data(values))
}

fn fixed_vs_variable_chart(report: &DashboardReport, currency: &str) -> Chart {
    let labels = report
        .fixed_vs_variable
        .iter()
        .map(|row| row.month.clone())
        .collect::<Vec<_>>();
    let fixed = report
        .fixed_vs_variable
        .iter()
        .map(|row| row.fixed_expenses)
        .collect::<Vec<_>>();
    let variable = report
        .fixed_vs_variable
        .iter()
        .map(|row| row.variable_expenses)
        .collect::<Vec<_>>();

    monthly_bar_chart("Fixed vs variable expenses", labels, currency)
        .series(
            bar::Bar::new()
                .name("Fixed")
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(fixed),
        )
        .series(
            bar::Bar::new()
                .name("Variable")
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(variable),
        )
}

fn income_vs_expenses_chart(report: &DashboardReport, currency: &str) -> Chart {
    let labels = report
        .income_vs_expenses
        .iter()
        .map(|row| row.month.clone())
        .collect::<Vec<_>>();
    let income = report
        .income_vs_expenses
        .iter()
        .map(|row| row.income)
        .collect::<Vec<_>>();
    let expenses = report
        .income_vs_expenses
        .iter()
        .map(|row| row.expense)
        .collect::<Vec<_>>();

    monthly_bar_chart("Income vs expenses", labels, currency)
        .color(vec![Color::from("#16a34a"), Color::from("#dc2626")])
        .series(bar::Bar::new().name("Income").data(income))
        .series(bar::Bar::new().name("Expenses").data(expenses))
}

/// A bar chart skeleton with a category x-axis and a currency y-axis.
fn monthly_bar_chart(title: &str, labels: Vec<String>, currency: &str) -> Chart {
    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .tooltip(currency_tooltip(currency))
        .legend(Legend::new().left(250).top("1%"))
        .grid(chart_grid().top(60))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency))),
        )
}

fn chart_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

fn currency_formatter(currency: &str) -> JsFunction {
    // The code ends up inside a JS string literal.
    let currency: String = currency
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();

    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('en-US', {{
                  style: 'currency',
                  currency: '{currency}'
                }});
                return (number) ? currencyFormatter.format(number) : \"-\";"
        ),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip(currency: &str) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(currency))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod charts_tests {
    use crate::{
        api::{BalancePoint, CategoryBreakdown, DashboardReport, IncomeVsExpense},
        html::HeadElement,
    };

    use super::{charts_script, dashboard_charts};

    fn report_with_categories() -> DashboardReport {
        DashboardReport {
            category_breakdown: vec![
                CategoryBreakdown {
                    category_name: "Food".to_owned(),
                    color: Some("#ff9800".to_owned()),
                    amount: 300_000.0,
                    percentage: 60.0,
                },
                CategoryBreakdown {
                    category_name: "Transport".to_owned(),
                    color: None,
                    amount: 200_000.0,
                    percentage: 40.0,
                },
            ],
            balance_history: vec![BalancePoint {
                date: "2025-03-01".to_owned(),
                balance: 1_000_000.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn empty_series_are_skipped() {
        let charts = dashboard_charts(&report_with_categories(), "COP");

        let ids: Vec<_> = charts.iter().map(|chart| chart.id).collect();
        assert_eq!(ids, vec!["category-chart", "balance-chart"]);
    }

    #[test]
    fn category_chart_uses_category_colours() {
        let charts = dashboard_charts(&report_with_categories(), "COP");
        let options = &charts[0].options;

        assert!(options.contains("#ff9800"), "got {options}");
        assert!(options.contains("#9e9e9e"), "got {options}");
        assert!(options.contains("Transport"));
    }

    #[test]
    fn income_chart_formats_user_currency() {
        let report = DashboardReport {
            income_vs_expenses: vec![IncomeVsExpense {
                month: "2025-03".to_owned(),
                income: 4_000_000.0,
                expense: 1_500_000.0,
            }],
            ..Default::default()
        };

        let charts = dashboard_charts(&report, "USD");
        let options = &charts[0].options;

        assert!(options.contains("Income"));
        assert!(options.contains("Expenses"));
        assert!(options.contains("currency: 'USD'"));
        // Formatters must be emitted as functions, not strings.
        assert!(options.contains("function"));
        assert!(!options.contains("\"function"), "got {options}");
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = dashboard_charts(&report_with_categories(), "COP");

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        assert!(script.0.starts_with("document.addEventListener('DOMContentLoaded'"));
        assert!(script.0.contains(r#"getElementById("category-chart")"#));
        assert!(script.0.contains(r#"getElementById("balance-chart")"#));
    }

    #[test]
    fn category_names_cannot_close_the_script_element() {
        let mut report = report_with_categories();
        report.category_breakdown[0].category_name =
            "</script><script>alert(1)</script><!--".to_owned();

        let charts = dashboard_charts(&report, "COP");
        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        let lowercase = script.0.to_lowercase();
        assert!(!lowercase.contains("</script"), "got {}", script.0);
        assert!(!lowercase.contains("<!--"), "got {}", script.0);
        assert!(script.0.contains(r"<\/script><script>alert(1)<\/script><\!--"));
    }
}
