//! Defines the endpoint for updating a category.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    api::{ApiClient, CategoryId},
    auth::Session,
    category::form::{CategoryFormData, FormAction, api_error_response, category_form},
    endpoints::{self, format_endpoint},
};

/// A route handler for saving changes to a category. Default categories are refused.
pub async fn edit_category_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(category_id): Path<CategoryId>,
    Form(data): Form<CategoryFormData>,
) -> Response {
    let categories = api.categories(&session.access_token);

    match categories.get(category_id).await {
        Ok(category) if category.is_default => {
            tracing::warn!("Refused to edit default category {category_id}");
            return Error::DefaultCategoryLocked.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => return Error::from(error).into_alert_response(),
    }

    let action = FormAction::Update(format_endpoint(endpoints::CATEGORY_API, category_id));

    let request = match data.validate() {
        Ok(request) => request,
        Err(errors) => return category_form(&action, &data, &errors).into_response(),
    };

    match categories.update(category_id, &request).await {
        Ok(_) => {
            tracing::info!("Updated category {category_id}");
            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => api_error_response(error, &action, &data),
    }
}
