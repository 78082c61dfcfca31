//! Defines the route handler for the page for creating a category.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    category::form::{CategoryFormData, FormAction, category_form},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    validation::FieldErrors,
};

pub(super) fn category_page(title: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { (title) }

            (form)
        }
    };

    base(title, &[], &content)
}

pub async fn get_create_category_page() -> Response {
    let form = category_form(
        &FormAction::Create,
        &CategoryFormData::default(),
        &FieldErrors::new(),
    );

    category_page("Create Category", form).into_response()
}
