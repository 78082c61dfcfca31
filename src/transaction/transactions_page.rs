//! The transactions page: filters, the paged table, CSV export and import, and
//! the inline form for creating or editing a transaction.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    api::{ApiClient, Budget, Category, PageRequest, Transaction, TransactionType},
    auth::Session,
    currency::format_currency,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    pagination::{
        PAGE_SIZE_OPTIONS, PaginationConfig, create_pagination_indicators, pagination_nav,
        to_api_page,
    },
    timezone::local_today,
    validation::FieldErrors,
};

use super::{
    form::{
        BUDGET_OPTIONS_LIMIT, FormAction, FormOptions, TransactionFormData, transaction_form,
    },
    query::{FormMode, TransactionsQuery, TransactionsQueryParams},
};

/// Descriptions longer than this many graphemes are cut short in the table.
const DESCRIPTION_DISPLAY_LENGTH: usize = 32;

/// The event sent by the import endpoint so the table reloads.
pub const TRANSACTIONS_IMPORTED_EVENT: &str = "transactions-imported";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub api: ApiClient,
    pub pagination_config: PaginationConfig,
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            pagination_config: state.pagination_config.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn truncate_description(description: &str) -> String {
    let mut graphemes = description.graphemes(true);
    let shortened: String = graphemes
        .by_ref()
        .take(DESCRIPTION_DISPLAY_LENGTH)
        .collect();

    if graphemes.next().is_some() {
        format!("{shortened}…")
    } else {
        shortened
    }
}

fn signed_amount(transaction: &Transaction, currency: &str) -> (String, &'static str) {
    let amount = format_currency(transaction.amount.abs(), currency);

    match transaction.transaction_type {
        TransactionType::Income => (
            format!("+{amount}"),
            "text-green-600 dark:text-green-400",
        ),
        TransactionType::Expense => (format!("-{amount}"), "text-red-600 dark:text-red-400"),
    }
}

fn filter_select(
    name: &str,
    label: &str,
    options: &[(String, String)],
    selected: &str,
    placeholder: &str,
) -> Markup {
    let id = format!("filter-{name}");

    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            select id=(id) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected.is_empty()] { (placeholder) }

                @for (value, text) in options {
                    option value=(value) selected[value == selected] { (text) }
                }
            }
        }
    }
}

fn filter_form(query: &TransactionsQuery, budgets: &[Budget], categories: &[Category]) -> Markup {
    let filter = &query.filter;
    let budget_options = budgets
        .iter()
        .map(|budget| (budget.id.to_string(), budget.name.clone()))
        .collect::<Vec<_>>();
    let category_options = categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect::<Vec<_>>();
    let type_options = TransactionType::ALL
        .iter()
        .map(|kind| (kind.as_str().to_owned(), kind.label().to_owned()))
        .collect::<Vec<_>>();
    let selected_budget = filter.budget_id.map(|id| id.to_string()).unwrap_or_default();
    let selected_category = filter
        .category_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let selected_type = filter
        .transaction_type
        .map(|kind| kind.as_str().to_owned())
        .unwrap_or_default();

    html! {
        form
            id="transaction-filters"
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid gap-4 md:grid-cols-4 p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            (filter_select("budget_id", "Budget", &budget_options, &selected_budget, "All budgets"))
            (filter_select(
                "category_id",
                "Category",
                &category_options,
                &selected_category,
                "All categories",
            ))
            (filter_select("type", "Type", &type_options, &selected_type, "All types"))

            div
            {
                label for="filter-search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="filter-search"
                    type="search"
                    name="search"
                    placeholder="Description"
                    value=[filter.search.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="filter-start_date"
                    type="date"
                    name="start_date"
                    value=[filter.start_date.map(|date| date.to_string())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="filter-end_date"
                    type="date"
                    name="end_date"
                    value=[filter.end_date.map(|date| date.to_string())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-size" class=(FORM_LABEL_STYLE) { "Per page" }
                select id="filter-size" name="size" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for size in PAGE_SIZE_OPTIONS {
                        option value=(size) selected[size == query.size] { (size) }
                    }
                }
            }

            div class="flex gap-4 items-end"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

/// Export and import only make sense for a single budget, so both are disabled
/// until the filter names one.
fn csv_controls(query: &TransactionsQuery) -> Markup {
    let budget_id = query.filter.budget_id;
    let hint = "Choose a budget in the filters to export or import transactions.";

    html! {
        section id="csv-controls" class="flex flex-wrap gap-4 items-end"
        {
            @match budget_id {
                Some(budget_id) => {
                    a
                        id="export-link"
                        href=(format!("{}?budget_id={budget_id}", endpoints::EXPORT_TRANSACTIONS))
                        download="transacciones.csv"
                        class=(LINK_STYLE)
                    {
                        "Export CSV"
                    }
                }
                None => {
                    span
                        id="export-link"
                        aria-disabled="true"
                        title=(hint)
                        class="text-gray-400 cursor-not-allowed"
                    {
                        "Export CSV"
                    }
                }
            }

            form
                id="import-form"
                hx-post=(endpoints::IMPORT_TRANSACTIONS)
                hx-encoding="multipart/form-data"
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class="flex flex-wrap gap-2 items-end"
            {
                fieldset disabled[budget_id.is_none()] class="flex flex-wrap gap-2 items-end"
                {
                    input
                        type="hidden"
                        name="budget_id"
                        value=[budget_id];

                    label for="import-file" class=(FORM_LABEL_STYLE) { "Import CSV" }
                    input
                        id="import-file"
                        type="file"
                        name="file"
                        accept=".csv,text/csv"
                        required
                        class="text-sm";

                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Upload" }
                }
            }

            @if budget_id.is_none() {
                p class="text-xs text-gray-500 dark:text-gray-400 w-full" { (hint) }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, query: &TransactionsQuery, currency: &str) -> Markup {
    let (amount, amount_style) = signed_amount(transaction, currency);
    let edit_url = query
        .with_form(FormMode::Edit(transaction.id))
        .to_url(endpoints::TRANSACTIONS_VIEW);
    let delete_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id);
    let date = transaction.transaction_date.to_string();
    let type_style = match transaction.transaction_type {
        TransactionType::Income => "px-2 py-0.5 text-xs rounded-full bg-green-100 text-green-800 \
            dark:bg-green-900 dark:text-green-300",
        TransactionType::Expense => "px-2 py-0.5 text-xs rounded-full bg-red-100 text-red-800 \
            dark:bg-red-900 dark:text-red-300",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(date) { (date) }
            }
            td class=(TABLE_CELL_STYLE) title=(transaction.description)
            {
                (truncate_description(&transaction.description))
            }
            td class={(TABLE_CELL_STYLE) " text-right tabular-nums " (amount_style)} data-amount
            {
                (amount)
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(type_style) { (transaction.transaction_type.label()) }
            }
            td class=(TABLE_CELL_STYLE) data-category
            {
                (transaction.category_name.as_deref().unwrap_or("-"))
            }
            td class={(TABLE_CELL_STYLE) " flex gap-4"}
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &format!(
                        "Are you sure you want to delete the transaction '{}'?",
                        transaction.description
                    ),
                    "closest tr",
                    "delete",
                ))
            }
        }
    }
}

fn transactions_table(
    transactions: &[Transaction],
    query: &TransactionsQuery,
    currency: &str,
    pagination: Markup,
) -> Markup {
    let current_url = query.to_url(endpoints::TRANSACTIONS_VIEW);

    html! {
        section
            id="transactions-table"
            hx-get=(current_url)
            hx-trigger={(TRANSACTIONS_IMPORTED_EVENT) " from:body"}
            hx-select="#transactions-table"
            hx-target="this"
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            @if transactions.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400"
                {
                    "No transactions match these filters."
                }
            } @else {
                div class="overflow-x-auto rounded shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction, query, currency))
                            }
                        }
                    }
                }

                (pagination)
            }
        }
    }
}

struct TransactionsView<'a> {
    query: &'a TransactionsQuery,
    transactions: &'a [Transaction],
    budgets: &'a [Budget],
    categories: &'a [Category],
    currency: &'a str,
    inline_form: Option<Markup>,
    pagination: Markup,
}

fn transactions_view(view: TransactionsView<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let new_url = view
        .query
        .with_form(FormMode::New)
        .to_url(endpoints::TRANSACTIONS_VIEW);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-6xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    @if view.inline_form.is_none() {
                        a href=(new_url) class=(LINK_STYLE) { "New Transaction" }
                    }
                }

                @if let Some(form) = view.inline_form {
                    (form)
                }

                (filter_form(view.query, view.budgets, view.categories))

                (csv_controls(view.query))

                (transactions_table(view.transactions, view.query, view.currency, view.pagination))
            }
        }
    };

    base("Transactions", &[], &content)
}

/// Renders a filtered page of transactions, with the inline form when `new` or
/// `edit` is in the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(session): Extension<Session>,
    Query(params): Query<TransactionsQueryParams>,
) -> Response {
    let query = TransactionsQuery::from_params(&params, &state.pagination_config);
    let token = session.access_token.as_str();

    let budget_page = PageRequest {
        page: 0,
        size: BUDGET_OPTIONS_LIMIT,
    };
    let transaction_page = PageRequest {
        page: to_api_page(query.page),
        size: query.size,
    };
    let budgets_client = state.api.budgets(token);
    let categories_client = state.api.categories(token);
    let transactions_client = state.api.transactions(token);

    let result = tokio::try_join!(
        budgets_client.list(budget_page),
        categories_client.list(),
        transactions_client.list(&query.filter, transaction_page),
    );
    let (budgets, categories, transactions) = match result {
        Ok(lists) => lists,
        Err(error) => return Error::from(error).into_response(),
    };

    let list_url = query
        .with_form(FormMode::Closed)
        .to_url(endpoints::TRANSACTIONS_VIEW);
    let options = FormOptions {
        budgets: &budgets.content,
        categories: &categories,
    };

    let inline_form = match query.form {
        FormMode::Closed => None,
        FormMode::New => {
            let data = TransactionFormData {
                redirect_url: list_url,
                ..TransactionFormData::new_expense(
                    local_today(&state.local_timezone),
                    query.filter.budget_id,
                )
            };
            Some(transaction_form(
                &FormAction::Create,
                &data,
                &options,
                &FieldErrors::new(),
            ))
        }
        FormMode::Edit(transaction_id) => match transactions_client.get(transaction_id).await {
            Ok(transaction) => {
                let data = TransactionFormData {
                    redirect_url: list_url,
                    ..TransactionFormData::from_transaction(&transaction)
                };
                let action = FormAction::Update(format_endpoint(
                    endpoints::TRANSACTION_API,
                    transaction_id,
                ));
                Some(transaction_form(&action, &data, &options, &FieldErrors::new()))
            }
            Err(error) => return Error::from(error).into_response(),
        },
    };

    let indicators = create_pagination_indicators(
        query.page,
        transactions.total_pages,
        state.pagination_config.max_pages,
    );
    let pagination = pagination_nav(&indicators, |page| {
        query
            .with_page(page)
            .with_form(FormMode::Closed)
            .to_url(endpoints::TRANSACTIONS_VIEW)
    });

    transactions_view(TransactionsView {
        query: &query,
        transactions: &transactions.content,
        budgets: &budgets.content,
        categories: &categories,
        currency: &session.user.preferred_currency,
        inline_form,
        pagination,
    })
    .into_response()
}
