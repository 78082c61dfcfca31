//! The registration page and the endpoint that creates an account through the API.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiError, RegisterRequest},
    auth::{log_in::LoginState, set_session_cookie},
    currency::{
        DEFAULT_CURRENCY, DEFAULT_LOCALE, SUPPORTED_CURRENCIES, SUPPORTED_LOCALES,
        is_supported_currency, is_supported_locale,
    },
    endpoints,
    html::{
        FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        email_input, field_error, log_in_register, password_input, select_input, submit_button,
    },
    timezone::get_local_offset,
    validation::{FieldErrors, char_count, is_valid_email},
};

const PASSWORD_MIN_LENGTH: u8 = 8;
const FULL_NAME_MAX_LENGTH: usize = 150;

/// The raw data entered by the user in the registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub preferred_currency: String,
    #[serde(default)]
    pub preferred_locale: String,
}

impl Default for RegisterData {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            preferred_currency: DEFAULT_CURRENCY.to_owned(),
            preferred_locale: DEFAULT_LOCALE.to_owned(),
        }
    }
}

impl RegisterData {
    /// Check the form and build the API request, or return the problems with each field.
    fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let full_name = self.full_name.trim();
        let email = self.email.trim();

        if full_name.is_empty() {
            errors.add("full_name", "Full name is required.");
        } else if char_count(full_name) > FULL_NAME_MAX_LENGTH {
            errors.add(
                "full_name",
                format!("Full name must be at most {FULL_NAME_MAX_LENGTH} characters."),
            );
        }

        if !is_valid_email(email) {
            errors.add("email", "Enter a valid email address.");
        }

        if char_count(&self.password) < PASSWORD_MIN_LENGTH as usize {
            errors.add(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters."),
            );
        }

        let currency = non_empty_or(&self.preferred_currency, DEFAULT_CURRENCY);
        if !is_supported_currency(&currency) {
            errors.add("preferred_currency", "Choose a supported currency.");
        }

        let locale = non_empty_or(&self.preferred_locale, DEFAULT_LOCALE);
        if !is_supported_locale(&locale) {
            errors.add("preferred_locale", "Choose a supported language.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterRequest {
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            preferred_currency: currency,
            preferred_locale: locale,
        })
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    let value = value.trim();

    if value.is_empty() {
        default.to_owned()
    } else {
        value.to_owned()
    }
}

fn register_form(data: &RegisterData, errors: &FieldErrors, form_error: Option<&str>) -> Markup {
    let currencies = SUPPORTED_CURRENCIES
        .iter()
        .map(|code| (code.to_string(), code.to_string()))
        .collect::<Vec<_>>();
    let locales = SUPPORTED_LOCALES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect::<Vec<_>>();

    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(form_error) = form_error {
                p class=(FORM_ERROR_STYLE) role="alert" { (form_error) }
            }

            div
            {
                label for="full_name" class=(FORM_LABEL_STYLE) { "Full name" }

                input
                    type="text"
                    name="full_name"
                    id="full_name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    maxlength=(FULL_NAME_MAX_LENGTH)
                    value=(data.full_name);

                (field_error(errors, "full_name"))
            }

            (email_input(&data.email, errors.get("email")))

            (password_input("", PASSWORD_MIN_LENGTH, errors.get("password")))

            div class="grid grid-cols-2 gap-4"
            {
                (select_input(
                    "preferred_currency",
                    "Currency",
                    &currencies,
                    &data.preferred_currency,
                    None,
                    errors,
                ))

                (select_input(
                    "preferred_locale",
                    "Language",
                    &locales,
                    &data.preferred_locale,
                    None,
                    errors,
                ))
            }

            (submit_button("Create account"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = register_form(&RegisterData::default(), &FieldErrors::new(), None);
    let content = log_in_register("Create your account", &form);

    base("Register", &[], &content).into_response()
}

/// Create an account through the API and sign the new user in.
///
/// Invalid input, or an email that is already registered, returns the form with the problems
/// marked next to each field.
pub async fn post_register(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(data): Form<RegisterData>,
) -> Response {
    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => return register_form(&data, &errors, None).into_response(),
    };

    let auth = match state.api.auth().register(&request).await {
        Ok(auth) => auth,
        Err(ApiError::Validation { fields, message }) => {
            let errors = FieldErrors::from_api(&fields);
            return register_form(&data, &errors, Some(&message)).into_response();
        }
        Err(ApiError::Conflict(message) | ApiError::BadRequest(message)) => {
            let mut errors = FieldErrors::new();
            errors.add("email", message);
            return register_form(&data, &errors, None).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while registering: {error}");
            return register_form(&data, &FieldErrors::new(), Some(&error.user_message()))
                .into_response();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    match set_session_cookie(
        jar,
        &auth.access_token,
        auth.user,
        state.cookie_duration,
        local_offset,
    ) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting session cookie: {error}");
            (
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
                .into_response()
        }
    }
}
