//! Defines the endpoint for deleting a category.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;

use crate::{
    Error,
    api::{ApiClient, CategoryId},
    auth::Session,
};

/// A route handler for deleting a category. Default categories are refused.
pub async fn delete_category_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let categories = api.categories(&session.access_token);

    let result = match categories.get(category_id).await {
        Ok(category) if category.is_default => Err(Error::DefaultCategoryLocked),
        Ok(_) => categories.delete(category_id).await.map_err(Error::from),
        Err(error) => Err(Error::from(error)),
    };

    match result {
        Ok(()) => {
            tracing::info!("Deleted category {category_id}");
            (HxRefresh(true), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{
        Extension,
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::{
        api::ApiClient,
        test_utils::{api_ok, category_json, get_header, test_session, test_state},
    };

    use super::delete_category_endpoint;

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
    async fn deletes_own_category() {
        let server = server_with_categories().await;
        Mock::given(method("DELETE"))
            .and(path("/categories/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response =
            delete_category_endpoint(State(api), Extension(test_session()), Path(7)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-refresh"), "true");
    }

    #[tokio::test]
    async fn default_category_is_refused() {
        let server = server_with_categories().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response =
            delete_category_endpoint(State(api), Extension(test_session()), Path(1)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
