//! Shared helpers for validating form input before it is sent to the API.

use std::collections::BTreeMap;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

/// ISO calendar date as used by HTML date inputs and the API, e.g. "2025-03-31".
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert the API's field map, keyed by camelCase JSON names, into form field names.
    pub fn from_api(fields: &BTreeMap<String, String>) -> Self {
        let mut errors = Self::new();

        for (field, message) in fields {
            errors.add(&to_snake_case(field), message.clone());
        }

        errors
    }
}

fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);

    for c in name.chars() {
        if c.is_ascii_uppercase() {
            snake.push('_');
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }

    snake
}

/// The number of user-perceived characters in `text`.
pub fn char_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Check that `text` looks like `local@domain.tld`.
pub fn is_valid_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Parse a money amount. Accepts a leading currency symbol and thousands separators.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches(['$', '€'])
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).ok()
}

/// Check for a `#rrggbb` colour.
pub fn is_hex_color(text: &str) -> bool {
    text.len() == 7
        && text.starts_with('#')
        && text[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Return `None` for blank strings and the trimmed string otherwise.
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
