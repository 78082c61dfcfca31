//! The form for creating and editing categories.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiError, Category, CategoryRequest, ExpenseType},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error,
        select_input, submit_button,
    },
    validation::{FieldErrors, char_count, is_hex_color, non_empty},
};

const NAME_MAX_LENGTH: usize = 80;
const DESCRIPTION_MAX_LENGTH: usize = 255;

/// The colour given to new categories.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3f51b5";

/// The raw values of the category form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub expense_type: String,
}

impl Default for CategoryFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            icon: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
            expense_type: ExpenseType::Variable.as_str().to_owned(),
        }
    }
}

impl CategoryFormData {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            icon: category.icon.clone().unwrap_or_default(),
            color: category
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_owned()),
            expense_type: category.expense_type.as_str().to_owned(),
        }
    }

    /// Blank colour and expense type fall back to the defaults for new categories.
    pub fn validate(&self) -> Result<CategoryRequest, FieldErrors> {
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

        let description = non_empty(&self.description);
        if description
            .as_deref()
            .is_some_and(|description| char_count(description) > DESCRIPTION_MAX_LENGTH)
        {
            errors.add(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX_LENGTH} characters."),
            );
        }

        let color = non_empty(&self.color).unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_owned());
        if !is_hex_color(&color) {
            errors.add("color", "Colour must look like #3f51b5.");
        }

        let expense_type = match non_empty(&self.expense_type) {
            None => Some(ExpenseType::Variable),
            Some(text) => ExpenseType::parse(&text),
        };
        if expense_type.is_none() {
            errors.add("expense_type", "Choose fixed or variable.");
        }

        match expense_type {
            Some(expense_type) if errors.is_empty() => Ok(CategoryRequest {
                name: name.to_owned(),
                description,
                icon: non_empty(&self.icon),
                color: Some(color.to_lowercase()),
                expense_type,
            }),
            _ => Err(errors),
        }
    }
}

/// Where the form sends its data.
pub enum FormAction {
    Create,
    Update(String),
}

pub fn category_form(action: &FormAction, data: &CategoryFormData, errors: &FieldErrors) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        FormAction::Create => (Some(endpoints::CATEGORIES_API), None, "Create Category"),
        FormAction::Update(url) => (None, Some(url.as_str()), "Save Category"),
    };
    let expense_types = ExpenseType::ALL
        .iter()
        .map(|kind| (kind.as_str().to_owned(), kind.label().to_owned()))
        .collect::<Vec<_>>();

    html! {
        form
            id="category-form"
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
                    placeholder="Groceries"
                    maxlength=(NAME_MAX_LENGTH)
                    required
                    autofocus
                    value=(data.name)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "name"))
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    maxlength=(DESCRIPTION_MAX_LENGTH)
                    value=(data.description)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors, "description"))
            }

            (select_input(
                "expense_type",
                "Expense type",
                &expense_types,
                &data.expense_type,
                None,
                errors,
            ))

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="icon" class=(FORM_LABEL_STYLE) { "Icon" }

                    input
                        id="icon"
                        type="text"
                        name="icon"
                        placeholder="restaurant"
                        value=(data.icon)
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error(errors, "icon"))
                }

                div
                {
                    label for="color" class=(FORM_LABEL_STYLE) { "Colour" }

                    input
                        id="color"
                        type="color"
                        name="color"
                        value=(data.color)
                        class="block w-full h-10 rounded";

                    (field_error(errors, "color"))
                }
            }

            div class="flex gap-4 items-center"
            {
                a href=(endpoints::CATEGORIES_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }

                (submit_button(submit_text))
            }
        }
    }
}

/// Show the API's field errors on the form, or any other error as an alert.
pub(super) fn api_error_response(
    error: ApiError,
    action: &FormAction,
    data: &CategoryFormData,
) -> Response {
    match error {
        ApiError::Validation { fields, .. } => {
            category_form(action, data, &FieldErrors::from_api(&fields)).into_response()
        }
        error => Error::from(error).into_alert_response(),
    }
}

#[cfg(test)]
mod category_form_tests {
    use scraper::{Html, Selector};

    use crate::{
        api::{Category, ExpenseType},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_hx_endpoint,
            assert_valid_html, must_get_form,
        },
        validation::FieldErrors,
    };

    use super::{CategoryFormData, FormAction, category_form};

    #[test]
    fn defaults_to_variable_and_indigo() {
        let request = CategoryFormData {
            name: " Mascotas ".to_owned(),
            color: String::new(),
            expense_type: String::new(),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(request.name, "Mascotas");
        assert_eq!(request.color.as_deref(), Some("#3f51b5"));
        assert_eq!(request.expense_type, ExpenseType::Variable);
        assert_eq!(request.description, None);
        assert_eq!(request.icon, None);
    }

    #[test]
    fn reports_each_invalid_field() {
        let errors = CategoryFormData {
            name: "n".repeat(81),
            description: "d".repeat(256),
            icon: String::new(),
            color: "blue".to_owned(),
            expense_type: "SOMETIMES".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get("name"), Some("Name must be at most 80 characters."));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at most 255 characters.")
        );
        assert_eq!(errors.get("color"), Some("Colour must look like #3f51b5."));
        assert_eq!(errors.get("expense_type"), Some("Choose fixed or variable."));
    }

    #[test]
    fn name_limit_counts_graphemes() {
        let data = CategoryFormData {
            name: "🐶".repeat(80),
            ..Default::default()
        };

        assert!(data.validate().is_ok());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let category = Category {
            id: 4,
            name: "Arriendo".to_owned(),
            description: Some("Apartamento".to_owned()),
            icon: Some("home".to_owned()),
            color: None,
            expense_type: ExpenseType::Fixed,
            is_default: false,
        };
        let action = FormAction::Update("/api/categories/4".to_owned());

        let markup = category_form(
            &action,
            &CategoryFormData::from_category(&category),
            &FieldErrors::new(),
        );
        let html = Html::parse_fragment(&markup.into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/categories/4", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Arriendo");
        let color = form
            .select(&Selector::parse("input[name=color]").unwrap())
            .next()
            .unwrap();
        assert_eq!(color.value().attr("value"), Some("#3f51b5"));
        let selected = form
            .select(&Selector::parse("select[name=expense_type] option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["FIXED"]);
    }

    #[test]
    fn create_form_posts_to_categories() {
        let markup = category_form(
            &FormAction::Create,
            &CategoryFormData::default(),
            &FieldErrors::new(),
        );
        let html = Html::parse_fragment(&markup.into_string());

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES_API, "hx-post");
        assert_form_input(&form, "name", "text");
    }
}
