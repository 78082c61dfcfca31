//! The form shared by the create and edit budget pages.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error,
    api::{ApiError, Budget, BudgetPeriod, BudgetRequest},
    currency::{SUPPORTED_CURRENCIES, is_supported_currency},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error, select_input, submit_button,
    },
    validation::{FieldErrors, char_count, non_empty, parse_amount, parse_date},
};

const NAME_MAX_LENGTH: usize = 100;
const MIN_AMOUNT: f64 = 0.01;

/// The raw values of the budget form. Everything is kept as text so that
/// invalid input can be shown back to the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BudgetFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub currency: String,
}

impl BudgetFormData {
    /// A monthly budget for the month containing `today`.
    pub fn for_month(today: Date, currency: &str) -> Self {
        let start = today.replace_day(1).unwrap_or(today);
        let end = last_day_of_month(today);

        Self {
            name: String::new(),
            total_amount: String::new(),
            period: BudgetPeriod::Monthly.as_str().to_owned(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            currency: currency.to_owned(),
        }
    }

    pub fn from_budget(budget: &Budget) -> Self {
        Self {
            name: budget.name.clone(),
            total_amount: budget.total_amount.to_string(),
            period: budget.period.as_str().to_owned(),
            start_date: budget.start_date.to_string(),
            end_date: budget.end_date.to_string(),
            currency: budget.currency.clone(),
        }
    }

    /// Check the form and build the API request.
    ///
    /// A blank currency falls back to `default_currency`.
    pub fn validate(&self, default_currency: &str) -> Result<BudgetRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required.");
        } else if char_count(name) > NAME_MAX_LENGTH {
            errors.add(
                "name",
                format!("Name must be at most {NAME_MAX_LENGTH} characters."),
            );
        }

        let total_amount = parse_amount(&self.total_amount);
        match total_amount {
            Some(amount) if amount >= MIN_AMOUNT => {}
            Some(_) => errors.add("total_amount", "Amount must be at least 0.01."),
            None => errors.add("total_amount", "Enter an amount, e.g. 1500000."),
        }

        let period = BudgetPeriod::parse(&self.period);
        if period.is_none() {
            errors.add("period", "Choose a period.");
        }

        let start_date = parse_date(&self.start_date);
        if start_date.is_none() {
            errors.add("start_date", "Enter a start date.");
        }

        let end_date = parse_date(&self.end_date);
        match (start_date, end_date) {
            (_, None) => errors.add("end_date", "Enter an end date."),
            (Some(start), Some(end)) if end < start => {
                errors.add("end_date", "End date cannot be before the start date.")
            }
            _ => {}
        }

        let currency = non_empty(&self.currency).unwrap_or_else(|| default_currency.to_owned());
        if !is_supported_currency(&currency) {
            errors.add("currency", "Choose a supported currency.");
        }

        match (total_amount, period, start_date, end_date) {
            (Some(total_amount), Some(period), Some(start_date), Some(end_date))
                if errors.is_empty() =>
            {
                Ok(BudgetRequest {
                    name: name.to_owned(),
                    total_amount,
                    period,
                    start_date,
                    end_date,
                    currency: Some(currency),
                })
            }
            _ => Err(errors),
        }
    }
}

fn last_day_of_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(|first_of_next| first_of_next.previous_day())
        .unwrap_or(date)
}

/// Where the form sends its data.
pub enum FormAction {
    Create(&'static str),
    Update(String),
}

/// The budget form. Fields with a problem show the message from `errors` below them.
pub fn budget_form(
    action: &FormAction,
    data: &BudgetFormData,
    errors: &FieldErrors,
    submit_text: &str,
) -> Markup {
    let (hx_post, hx_put) = match action {
        FormAction::Create(url) => (Some(*url), None),
        FormAction::Update(url) => (None, Some(url.as_str())),
    };
    let periods = BudgetPeriod::ALL
        .iter()
        .map(|period| (period.as_str().to_owned(), period.label().to_owned()))
        .collect::<Vec<_>>();
    let currencies = SUPPORTED_CURRENCIES
        .iter()
        .map(|code| (code.to_string(), code.to_string()))
        .collect::<Vec<_>>();

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="March"
                    maxlength=(NAME_MAX_LENGTH)
                    required
                    autofocus
                    value=(data.name)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "name"))
            }

            div
            {
                label for="total_amount" class=(FORM_LABEL_STYLE) { "Total amount" }

                input
                    id="total_amount"
                    type="number"
                    name="total_amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=(data.total_amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "total_amount"))
            }

            div class="grid grid-cols-2 gap-4"
            {
                (select_input("period", "Period", &periods, &data.period, None, errors))
                (select_input("currency", "Currency", &currencies, &data.currency, None, errors))
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }

                    input
                        id="start_date"
                        type="date"
                        name="start_date"
                        required
                        value=(data.start_date)
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error(errors, "start_date"))
                }

                div
                {
                    label for="end_date" class=(FORM_LABEL_STYLE) { "End date" }

                    input
                        id="end_date"
                        type="date"
                        name="end_date"
                        required
                        value=(data.end_date)
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error(errors, "end_date"))
                }
            }

            (submit_button(submit_text))
        }
    }
}

/// Show the API's field errors on the form, or any other error as an alert.
pub(super) fn api_error_response(
    error: ApiError,
    action: &FormAction,
    data: &BudgetFormData,
    submit_text: &str,
) -> Response {
    match error {
        ApiError::Validation { fields, .. } => {
            budget_form(action, data, &FieldErrors::from_api(&fields), submit_text).into_response()
        }
        error => Error::from(error).into_alert_response(),
    }
}

#[cfg(test)]
mod budget_form_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        api::BudgetPeriod,
        endpoints,
        test_utils::{
            assert_field_error, assert_form_input, assert_form_input_with_value,
            assert_hx_endpoint, assert_valid_html, must_get_form,
        },
        validation::FieldErrors,
    };

    use super::{BudgetFormData, FormAction, budget_form, last_day_of_month};

    fn valid_data() -> BudgetFormData {
        BudgetFormData {
            name: "Marzo".to_owned(),
            total_amount: "2000000".to_owned(),
            period: "MONTHLY".to_owned(),
            start_date: "2025-03-01".to_owned(),
            end_date: "2025-03-31".to_owned(),
            currency: String::new(),
        }
    }

    #[test]
    fn valid_form_becomes_request_with_default_currency() {
        let request = valid_data().validate("USD").unwrap();

        assert_eq!(request.name, "Marzo");
        assert_eq!(request.total_amount, 2_000_000.0);
        assert_eq!(request.period, BudgetPeriod::Monthly);
        assert_eq!(request.start_date, date!(2025 - 03 - 01));
        assert_eq!(request.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let errors = BudgetFormData {
            end_date: "2025-02-28".to_owned(),
            ..valid_data()
        }
        .validate("COP")
        .unwrap_err();

        assert_eq!(
            errors.get("end_date"),
            Some("End date cannot be before the start date.")
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = BudgetFormData {
            name: "x".repeat(101),
            total_amount: "0".to_owned(),
            period: "YEARLY".to_owned(),
            start_date: "tomorrow".to_owned(),
            end_date: String::new(),
            currency: "GBP".to_owned(),
        }
        .validate("COP")
        .unwrap_err();

        assert_eq!(errors.get("name"), Some("Name must be at most 100 characters."));
        assert_eq!(errors.get("total_amount"), Some("Amount must be at least 0.01."));
        assert_eq!(errors.get("period"), Some("Choose a period."));
        assert_eq!(errors.get("start_date"), Some("Enter a start date."));
        assert_eq!(errors.get("end_date"), Some("Enter an end date."));
        assert_eq!(errors.get("currency"), Some("Choose a supported currency."));
    }

    #[test]
    fn errors_are_shown_under_their_fields() {
        let data = BudgetFormData {
            end_date: "2025-02-28".to_owned(),
            period: "YEARLY".to_owned(),
            ..valid_data()
        };
        let errors = data.validate("COP").unwrap_err();

        let markup = budget_form(
            &FormAction::Create(endpoints::BUDGETS_API),
            &data,
            &errors,
            "Create Budget",
        );
        let html = Html::parse_fragment(&markup.into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_field_error(&form, "period", "Choose a period.");
        assert_field_error(&form, "end_date", "End date cannot be before the start date.");
    }

    #[test]
    fn new_budget_defaults_to_current_month() {
        let data = BudgetFormData::for_month(date!(2024 - 02 - 14), "COP");

        assert_eq!(data.start_date, "2024-02-01");
        assert_eq!(data.end_date, "2024-02-29");
        assert_eq!(data.period, "MONTHLY");
    }

    #[test]
    fn december_ends_on_the_31st() {
        assert_eq!(last_day_of_month(date!(2025 - 12 - 05)), date!(2025 - 12 - 31));
    }

    #[test]
    fn update_form_uses_put() {
        let markup = budget_form(
            &FormAction::Update("/api/budgets/3".to_owned()),
            &valid_data(),
            &FieldErrors::new(),
            "Save",
        );
        let html = Html::parse_fragment(&markup.into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/budgets/3", "hx-put");
        assert!(form.value().attr("hx-post").is_none());
        assert_form_input_with_value(&form, "name", "text", "Marzo");
        assert_form_input(&form, "start_date", "date");
        assert_form_input(&form, "end_date", "date");

        let selected_period = form
            .select(&Selector::parse("select#period option[selected]").unwrap())
            .next()
            .unwrap();
        assert_eq!(selected_period.value().attr("value"), Some("MONTHLY"));
    }
}
