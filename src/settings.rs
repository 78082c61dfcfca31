//! The settings page, where users choose their preferred currency and locale.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    alert::{Alert, error_alert_response},
    api::{ApiClient, UserProfile, UserSettingsRequest},
    auth::{Session, update_session_user},
    currency::{
        SUPPORTED_CURRENCIES, SUPPORTED_LOCALES, is_supported_currency, is_supported_locale,
    },
    endpoints,
    html::{
        CARD_STYLE, FORM_LABEL_STYLE, PAGE_CONTAINER_STYLE, base, select_input, submit_button,
    },
    navigation::NavBar,
    validation::FieldErrors,
};

/// The raw data from the settings form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFormData {
    pub preferred_currency: String,
    pub preferred_locale: String,
}

impl SettingsFormData {
    fn validate(&self) -> Result<UserSettingsRequest, FieldErrors> {
        let currency = self.preferred_currency.trim().to_uppercase();
        let locale = self.preferred_locale.trim().to_lowercase();
        let mut errors = FieldErrors::new();

        if !is_supported_currency(&currency) {
            errors.add("preferred_currency", "Choose one of the listed currencies.");
        }
        if !is_supported_locale(&locale) {
            errors.add("preferred_locale", "Choose one of the listed languages.");
        }

        if errors.is_empty() {
            Ok(UserSettingsRequest {
                preferred_currency: currency,
                preferred_locale: locale,
            })
        } else {
            Err(errors)
        }
    }
}

fn settings_form(user: &UserProfile) -> Markup {
    let currencies: Vec<(String, String)> = SUPPORTED_CURRENCIES
        .iter()
        .map(|code| (code.to_string(), code.to_string()))
        .collect();
    let locales: Vec<(String, String)> = SUPPORTED_LOCALES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();
    let no_errors = FieldErrors::new();

    html! {
        form
            id="settings-form"
            hx-put=(endpoints::SETTINGS_API)
            hx-target="#alert-container"
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            (select_input(
                "preferred_currency",
                "Currency",
                &currencies,
                &user.preferred_currency,
                None,
                &no_errors,
            ))

            (select_input(
                "preferred_locale",
                "Language",
                &locales,
                &user.preferred_locale,
                None,
                &no_errors,
            ))

            (submit_button("Save"))
        }
    }
}

fn settings_view(user: &UserProfile) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Settings" }

                div class=(CARD_STYLE) id="profile"
                {
                    dl class="space-y-2"
                    {
                        div
                        {
                            dt class=(FORM_LABEL_STYLE) { "Name" }
                            dd data-profile="full-name" { (user.full_name) }
                        }
                        div
                        {
                            dt class=(FORM_LABEL_STYLE) { "Email" }
                            dd data-profile="email" { (user.email) }
                        }
                    }
                }

                div class=(CARD_STYLE)
                {
                    (settings_form(user))
                }
            }
        }
    };

    base("Settings", &[], &content)
}

/// Display the user's profile and their currency and language preferences.
pub async fn get_settings_page(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
) -> Response {
    match api.users(&session.access_token).me().await {
        Ok(user) => settings_view(&user).into_response(),
        Err(error) => {
            tracing::error!("Could not load the user profile: {error}");
            Error::from(error).into_response()
        }
    }
}

/// Save the user's preferences and refresh the profile cached in the session cookie.
pub async fn update_settings_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    jar: PrivateCookieJar,
    Form(data): Form<SettingsFormData>,
) -> Response {
    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => {
            let details = ["preferred_currency", "preferred_locale"]
                .iter()
                .filter_map(|field| errors.get(field))
                .collect::<Vec<_>>()
                .join(" ");

            return error_alert_response(StatusCode::BAD_REQUEST, "Please check the form", &details);
        }
    };

    let user = match api.users(&session.access_token).update_settings(&request).await {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("Could not update settings: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    match update_session_user(jar, user) {
        Ok(jar) => {
            tracing::info!(
                "Updated settings to {} / {}",
                request.preferred_currency,
                request.preferred_locale
            );
            (
                jar,
                Alert::SuccessSimple {
                    message: "Settings saved".to_owned(),
                },
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update the session after saving settings: {error}");
            Error::from(error).into_alert_response()
        }
    }
}

#[cfg(test)]
mod settings_tests {
    use axum::{
        Extension, Form,
        extract::{FromRef, State},
        http::{HeaderMap, StatusCode, header::COOKIE},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
    use scraper::Selector;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{body_json, method, path},
    };

    use crate::{
        api::ApiClient,
        app_state::create_cookie_key,
        auth::get_session_from_cookies,
        endpoints,
        test_utils::{
            api_error, api_ok, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            get_header, mock_api::TEST_SECRET, must_get_form, parse_html_document,
            parse_html_fragment, signed_in_jar, test_session, test_state, test_user_json,
        },
    };

    use super::{SettingsFormData, get_settings_page, update_settings_endpoint};

    fn form(currency: &str, locale: &str) -> Form<SettingsFormData> {
        Form(SettingsFormData {
            preferred_currency: currency.to_owned(),
            preferred_locale: locale.to_owned(),
        })
    }

    #[tokio::test]
    async fn page_shows_profile_and_current_choices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(api_ok(test_user_json()))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = get_settings_page(State(api), Extension(test_session())).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let email = html
            .select(&Selector::parse("[data-profile=email]").unwrap())
            .next()
            .unwrap();
        assert_eq!(email.text().collect::<String>(), "ana@example.com");

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::SETTINGS_API, "hx-put");

        let selected = form
            .select(&Selector::parse("#preferred_currency option[selected]").unwrap())
            .next()
            .unwrap();
        assert_eq!(selected.value().attr("value"), Some("COP"));
        let selected = form
            .select(&Selector::parse("#preferred_locale option[selected]").unwrap())
            .next()
            .unwrap();
        assert_eq!(selected.value().attr("value"), Some("es"));
    }

    #[tokio::test]
    async fn saving_updates_session_profile() {
        let server = MockServer::start().await;
        let mut user = test_user_json();
        user["preferredCurrency"] = json!("USD");
        user["preferredLocale"] = json!("en");
        Mock::given(method("PATCH"))
            .and(path("/users/me/settings"))
            .and(body_json(json!({
                "preferredCurrency": "USD",
                "preferredLocale": "en"
            })))
            .respond_with(api_ok(user))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = update_settings_endpoint(
            State(api),
            Extension(test_session()),
            signed_in_jar(),
            form(" usd", "EN "),
        )
        .await;

        assert_status_ok(&response);
        let cookie = Cookie::parse(get_header(&response, "set-cookie")).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("{}={}", cookie.name(), cookie.value()).parse().unwrap(),
        );
        let jar = PrivateCookieJar::from_headers(&headers, create_cookie_key(TEST_SECRET));
        let session = get_session_from_cookies(&jar).unwrap();
        assert_eq!(session.user.preferred_currency, "USD");
        assert_eq!(session.user.preferred_locale, "en");

        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("[data-alert-type=success]").unwrap())
            .next()
            .unwrap();
        assert!(alert.text().collect::<String>().contains("Settings saved"));
    }

    #[tokio::test]
    async fn unsupported_values_are_rejected_without_calling_api() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(api_ok(test_user_json()))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = update_settings_endpoint(
            State(api),
            Extension(test_session()),
            signed_in_jar(),
            form("GBP", "fr"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Choose one of the listed currencies."));
        assert!(text.contains("Choose one of the listed languages."));
    }

    #[tokio::test]
    async fn api_error_is_shown_as_alert() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/me/settings"))
            .respond_with(api_error(503, "Service unavailable"))
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = update_settings_endpoint(
            State(api),
            Extension(test_session()),
            signed_in_jar(),
            form("USD", "en"),
        )
        .await;

        assert!(response.headers().get("set-cookie").is_none());
        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("[data-alert-type=error]").unwrap())
                .next()
                .is_some()
        );
    }
}
