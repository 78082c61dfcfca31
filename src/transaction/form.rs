//! The inline form for creating and editing transactions.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    api::{
        ApiClient, ApiError, Budget, Category, PageRequest, Transaction, TransactionRequest,
        TransactionType,
    },
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error,
        select_input, submit_button,
    },
    validation::{FieldErrors, char_count, non_empty, parse_amount, parse_date},
};

const DESCRIPTION_MAX_LENGTH: usize = 200;
const NOTES_MAX_LENGTH: usize = 500;
const MIN_AMOUNT: f64 = 0.01;

/// The budget dropdowns list at most this many budgets.
pub(super) const BUDGET_OPTIONS_LIMIT: u64 = 100;

/// The raw values of the transaction form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFormData {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_date: String,
    #[serde(default)]
    pub budget_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub notes: String,
    /// The transactions page to go back to once the transaction is saved.
    #[serde(default)]
    pub redirect_url: String,
}

impl TransactionFormData {
    /// An expense dated `today`, in the budget selected in the list filter if there is one.
    pub fn new_expense(today: Date, budget_id: Option<i64>) -> Self {
        Self {
            transaction_type: TransactionType::Expense.as_str().to_owned(),
            transaction_date: today.to_string(),
            budget_id: budget_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            transaction_type: transaction.transaction_type.as_str().to_owned(),
            transaction_date: transaction.transaction_date.to_string(),
            budget_id: transaction.budget_id.to_string(),
            category_id: transaction
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            notes: transaction.notes.clone().unwrap_or_default(),
            redirect_url: String::new(),
        }
    }

    pub fn validate(&self) -> Result<TransactionRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "Description is required.");
        } else if char_count(description) > DESCRIPTION_MAX_LENGTH {
            errors.add(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX_LENGTH} characters."),
            );
        }

        let amount = parse_amount(&self.amount);
        match amount {
            Some(amount) if amount >= MIN_AMOUNT => {}
            Some(_) => errors.add("amount", "Amount must be at least 0.01."),
            None => errors.add("amount", "Enter an amount, e.g. 52000."),
        }

        let transaction_type = TransactionType::parse(&self.transaction_type);
        if transaction_type.is_none() {
            errors.add("type", "Choose income or expense.");
        }

        let transaction_date = parse_date(&self.transaction_date);
        if transaction_date.is_none() {
            errors.add("transaction_date", "Enter a date.");
        }

        let budget_id = self.budget_id.trim().parse::<i64>().ok();
        if budget_id.is_none() {
            errors.add("budget_id", "Choose a budget.");
        }

        let category_id = match non_empty(&self.category_id) {
            None => None,
            Some(text) => match text.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("category_id", "Choose a category from the list.");
                    None
                }
            },
        };

        let notes = non_empty(&self.notes);
        if notes
            .as_deref()
            .is_some_and(|notes| char_count(notes) > NOTES_MAX_LENGTH)
        {
            errors.add(
                "notes",
                format!("Notes must be at most {NOTES_MAX_LENGTH} characters."),
            );
        }

        match (amount, transaction_type, transaction_date, budget_id) {
            (Some(amount), Some(transaction_type), Some(transaction_date), Some(budget_id))
                if errors.is_empty() =>
            {
                Ok(TransactionRequest {
                    description: description.to_owned(),
                    amount,
                    transaction_type,
                    transaction_date,
                    budget_id,
                    category_id,
                    notes,
                })
            }
            _ => Err(errors),
        }
    }

    /// The page to return to after saving. Only transactions page URLs are accepted.
    pub fn list_url(&self) -> String {
        let url = self.redirect_url.trim();
        let is_transactions_page = url == endpoints::TRANSACTIONS_VIEW
            || url.starts_with(&format!("{}?", endpoints::TRANSACTIONS_VIEW));

        if is_transactions_page {
            url.to_owned()
        } else {
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

/// Where the form sends its data.
pub enum FormAction {
    Create,
    Update(String),
}

/// The choices for the budget and category selects.
pub struct FormOptions<'a> {
    pub budgets: &'a [Budget],
    pub categories: &'a [Category],
}

pub fn transaction_form(
    action: &FormAction,
    data: &TransactionFormData,
    options: &FormOptions,
    errors: &FieldErrors,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        FormAction::Create => (Some(endpoints::TRANSACTIONS_API), None, "Create Transaction"),
        FormAction::Update(url) => (None, Some(url.as_str()), "Save Transaction"),
    };
    let types = TransactionType::ALL
        .iter()
        .map(|kind| (kind.as_str().to_owned(), kind.label().to_owned()))
        .collect::<Vec<_>>();
    let budgets = options
        .budgets
        .iter()
        .map(|budget| (budget.id.to_string(), budget.name.clone()))
        .collect::<Vec<_>>();
    let categories = options
        .categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect::<Vec<_>>();
    let cancel_url = data.list_url();

    html! {
        form
            id="transaction-form"
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full grid gap-4 md:grid-cols-3 p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            input type="hidden" name="redirect_url" value=(cancel_url);

            div class="md:col-span-2"
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    maxlength=(DESCRIPTION_MAX_LENGTH)
                    required
                    autofocus
                    value=(data.description)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "description"))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    required
                    value=(data.amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "amount"))
            }

            (select_input("type", "Type", &types, &data.transaction_type, None, errors))

            div
            {
                label for="transaction_date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="transaction_date"
                    type="date"
                    name="transaction_date"
                    required
                    value=(data.transaction_date)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "transaction_date"))
            }

            (select_input(
                "budget_id",
                "Budget",
                &budgets,
                &data.budget_id,
                Some("Choose a budget"),
                errors,
            ))

            (select_input(
                "category_id",
                "Category",
                &categories,
                &data.category_id,
                Some("None"),
                errors,
            ))

            div class="md:col-span-2"
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                textarea
                    id="notes"
                    name="notes"
                    rows="2"
                    maxlength=(NOTES_MAX_LENGTH)
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (data.notes)
                }

                (field_error(errors, "notes"))
            }

            div class="md:col-span-3 flex gap-4 items-center"
            {
                a href=(cancel_url) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }

                (submit_button(submit_text))
            }
        }
    }
}

/// Re-render the form with `errors`, loading the budget and category choices again.
pub(super) async fn invalid_form_response(
    api: &ApiClient,
    token: &str,
    action: &FormAction,
    data: &TransactionFormData,
    errors: &FieldErrors,
) -> Response {
    let budgets_client = api.budgets(token);
    let categories_client = api.categories(token);
    let budget_page = PageRequest {
        page: 0,
        size: BUDGET_OPTIONS_LIMIT,
    };

    match tokio::try_join!(budgets_client.list(budget_page), categories_client.list()) {
        Ok((budgets, categories)) => {
            let options = FormOptions {
                budgets: &budgets.content,
                categories: &categories,
            };
            transaction_form(action, data, &options, errors).into_response()
        }
        Err(error) => Error::from(error).into_alert_response(),
    }
}

/// Show the API's field errors on the form, or any other error as an alert.
pub(super) async fn api_error_response(
    api: &ApiClient,
    token: &str,
    error: ApiError,
    action: &FormAction,
    data: &TransactionFormData,
) -> Response {
    match error {
        ApiError::Validation { fields, .. } => {
            invalid_form_response(api, token, action, data, &FieldErrors::from_api(&fields)).await
        }
        error => Error::from(error).into_alert_response(),
    }
}
