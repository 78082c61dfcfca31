use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api::{ApiClient, CategoryId},
    auth::Session,
    category::{
        create_page::category_page,
        form::{CategoryFormData, FormAction, category_form},
    },
    endpoints::{self, format_endpoint},
    validation::FieldErrors,
};

/// Renders the page for editing a category. Default categories cannot be edited.
pub async fn get_edit_category_page(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let category = match api.categories(&session.access_token).get(category_id).await {
        Ok(category) => category,
        Err(error) => return Error::from(error).into_response(),
    };

    if category.is_default {
        return Error::DefaultCategoryLocked.into_response();
    }

    let form = category_form(
        &FormAction::Update(format_endpoint(endpoints::CATEGORY_API, category.id)),
        &CategoryFormData::from_category(&category),
        &FieldErrors::new(),
    );

    category_page("Edit Category", form).into_response()
}

#[cfg(test)]
mod edit_category_page_tests {
    use axum::{
        Extension,
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{method, path},
    };

    use crate::{
        api::ApiClient,
        test_utils::{
            api_ok, assert_form_input_with_value, assert_hx_endpoint, category_json,
            must_get_form, parse_html_document, test_session, test_state,
        },
    };

    use super::get_edit_category_page;

    async fn server_with_categories() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(api_ok(json!([
                category_json(1, "Food", true),
                category_json(7, "Mascotas", false),
            ])))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn prefills_own_category() {
        let server = server_with_categories().await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = get_edit_category_page(State(api), Extension(test_session()), Path(7)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, "/api/categories/7", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Mascotas");
    }

    #[tokio::test]
    async fn default_category_is_refused() {
        let server = server_with_categories().await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = get_edit_category_page(State(api), Extension(test_session()), Path(1)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_category_is_404() {
        let server = server_with_categories().await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response =
            get_edit_category_page(State(api), Extension(test_session()), Path(99)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
