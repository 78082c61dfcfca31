//! Currency and locale choices, and money formatting for the views.

use numfmt::{Formatter, Precision};

/// The currency codes a user can choose as their preferred currency.
pub const SUPPORTED_CURRENCIES: [&str; 6] = ["COP", "USD", "EUR", "MXN", "ARS", "BRL"];

/// The locales a user can choose, paired with a display name.
pub const SUPPORTED_LOCALES: [(&str, &str); 3] =
    [("es", "Español"), ("en", "English"), ("pt", "Português")];

pub const DEFAULT_CURRENCY: &str = "COP";
pub const DEFAULT_LOCALE: &str = "es";

pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

pub fn is_supported_locale(code: &str) -> bool {
    SUPPORTED_LOCALES.iter().any(|(locale, _)| *locale == code)
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "COP" | "MXN" | "ARS" => "$",
        "USD" => "US$",
        "EUR" => "€",
        "BRL" => "R$",
        other => other,
    }
}

/// Pesos are shown without cents.
fn decimal_places(code: &str) -> u8 {
    match code {
        "COP" => 0,
        _ => 2,
    }
}

/// Format `amount` with the symbol and thousands separators for `currency_code`.
///
/// For example, 1234567 COP is "$1,234,567" and -52.5 USD is "-US$52.50".
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let symbol = currency_symbol(currency_code);
    let decimals = decimal_places(currency_code);
    let scale = 10_f64.powi(decimals as i32);
    let scaled = (amount.abs() * scale).round();
    let whole = (scaled / scale).trunc();
    let fraction = (scaled - whole * scale) as u64;
    let sign = if amount < 0.0 && scaled > 0.0 { "-" } else { "" };
    let prefix = format!("{sign}{symbol}");

    // numfmt renders zero as a bare "0" without the prefix.
    let whole_text = if whole == 0.0 {
        format!("{prefix}0")
    } else {
        match Formatter::currency(&prefix) {
            Ok(formatter) => formatter
                .precision(Precision::Decimals(0))
                .fmt_string(whole),
            Err(error) => {
                tracing::warn!("Could not create currency formatter for {prefix:?}: {error:?}");
                format!("{prefix}{whole}")
            }
        }
    };

    if decimals == 0 {
        whole_text
    } else {
        format!("{whole_text}.{fraction:0width$}", width = decimals as usize)
    }
}

/// Format a percentage with one decimal place, e.g. "87.5%".
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}
