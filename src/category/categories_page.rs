//! Lists the user's categories. Default categories are read-only.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::{ApiClient, Category, ExpenseType},
    auth::Session,
    category::form::DEFAULT_CATEGORY_COLOR,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_MUTED_STYLE, BADGE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        edit_delete_action_links,
    },
    navigation::NavBar,
};

fn category_card(category: &Category) -> Markup {
    let color = category.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR);
    let expense_badge = match category.expense_type {
        ExpenseType::Fixed => BADGE_STYLE,
        ExpenseType::Variable => BADGE_MUTED_STYLE,
    };

    html! {
        li
            class=(CARD_STYLE)
            style=(format!("border-left: 4px solid {color}"))
            data-category-id=(category.id)
        {
            div class="flex items-start justify-between gap-3"
            {
                div
                {
                    h2 class="text-lg font-semibold"
                    {
                        @if let Some(icon) = &category.icon {
                            span class="me-2 text-sm text-gray-500" data-icon=(icon) { (icon) }
                        }
                        (category.name)
                    }

                    @if let Some(description) = &category.description {
                        p class="text-sm text-gray-500 dark:text-gray-400" { (description) }
                    }
                }

                div class="flex gap-2"
                {
                    span class=(expense_badge) { (category.expense_type.label()) }

                    @if category.is_default {
                        span class=(BADGE_MUTED_STYLE) data-default { "Default" }
                    }
                }
            }

            @if !category.is_default {
                div class="mt-3 flex items-center gap-4 text-sm" data-actions
                {
                    (edit_delete_action_links(
                        &format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
                        &format_endpoint(endpoints::CATEGORY_API, category.id),
                        &format!(
                            "Are you sure you want to delete the category '{}'?",
                            category.name
                        ),
                        "closest li",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn categories_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "New Category" }
                }

                @if categories.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No categories yet."
                    }
                } @else {
                    ul class="grid gap-4 md:grid-cols-2 lg:grid-cols-3"
                    {
                        @for category in categories {
                            (category_card(category))
                        }
                    }
                }
            }
        }
    };

    base("Categories", &[], &content)
}

/// Renders every category of the user.
pub async fn get_categories_page(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
) -> Response {
    match api.categories(&session.access_token).list().await {
        Ok(categories) => categories_view(&categories).into_response(),
        Err(error) => Error::from(error).into_response(),
    }
}

#[cfg(test)]
mod categories_page_tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{method, path},
    };

    use crate::{
        api::ApiClient,
        test_utils::{
            api_ok, assert_valid_html, category_json, parse_html_document, test_session,
            test_state,
        },
    };

    use super::get_categories_page;

    #[tokio::test]
    async fn default_categories_have_no_actions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(api_ok(json!([
                category_json(1, "Food", true),
                category_json(7, "Mascotas", false),
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::from_ref(&test_state(&server));

        let response = get_categories_page(State(api), Extension(test_session())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let with_actions = document
            .select(&Selector::parse("li[data-category-id]:has([data-actions])").unwrap())
            .map(|li| li.value().attr("data-category-id").unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(with_actions, vec!["7"]);

        let edit_link = document
            .select(&Selector::parse("li[data-category-id='7'] a").unwrap())
            .next()
            .unwrap();
        assert_eq!(edit_link.value().attr("href"), Some("/categories/7/edit"));

        let defaults = document
            .select(&Selector::parse("[data-default]").unwrap())
            .count();
        assert_eq!(defaults, 1);
    }
}
