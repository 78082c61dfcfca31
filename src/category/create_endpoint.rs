//! Defines the endpoint for creating a new category.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    api::ApiClient,
    auth::Session,
    category::form::{CategoryFormData, FormAction, api_error_response, category_form},
    endpoints,
};

/// A route handler for creating a new category, redirects to the categories view on success.
pub async fn create_category_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(data): Form<CategoryFormData>,
) -> Response {
    let action = FormAction::Create;

    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => return category_form(&action, &data, &errors).into_response(),
    };

    match api.categories(&session.access_token).create(&request).await {
        Ok(category) => {
            tracing::info!("Created category {}", category.id);
            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => api_error_response(error, &action, &data),
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{
        Extension, Form,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use crate::{
        api::ApiClient,
        category::form::CategoryFormData,
        endpoints,
        test_utils::{
            api_ok, assert_hx_redirect, category_json, parse_html_fragment, test_session,
            test_state,
        },
    };

    use super::create_category_endpoint;

    #[tokio::test]
    async fn creates_category_with_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/categories"))
            .and(body_json(json!({
                "name": "Mascotas",
                "icon": "pets",
                "color": "#3f51b5",
                "expenseType": "VARIABLE"
            })))
            .respond_with(api_ok(category_json(7, "Mascotas", false)))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));
        let data = CategoryFormData {
            name: "Mascotas".to_owned(),
            icon: "pets".to_owned(),
            ..Default::default()
        };

        let response =
            create_category_endpoint(State(api), Extension(test_session()), Form(data)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
    }

    #[tokio::test]
    async fn blank_name_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = create_category_endpoint(
            State(api),
            Extension(test_session()),
            Form(CategoryFormData::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Name is required."));
    }
}
